use crate::db::models::event_models::{Detection, NewDetection};
use crate::db::models::stats_models::ObjectTypeCount;
use crate::db::to_sql_timestamp;
use crate::error::Error;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;

/// Detections repository
#[derive(Clone)]
pub struct DetectionsRepository {
    pool: Arc<SqlitePool>,
}

impl DetectionsRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Append a detection. Rows are never updated afterwards.
    pub async fn create(&self, detection: &NewDetection) -> Result<Detection> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            INSERT INTO detections (camera_id, object_type, confidence, timestamp)
            VALUES (?1, ?2, ?3, COALESCE(?4, CURRENT_TIMESTAMP))
            RETURNING id, camera_id, object_type, confidence, timestamp
            "#,
        )
        .bind(&detection.camera_id)
        .bind(&detection.object_type)
        .bind(detection.confidence)
        .bind(detection.timestamp.map(to_sql_timestamp))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create detection: {}", e)))?;

        Ok(result)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Detection>> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            SELECT id, camera_id, object_type, confidence, timestamp
            FROM detections
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get detection by ID: {}", e)))?;

        Ok(result)
    }

    /// Newest detections for a camera, 100 unless `limit` says otherwise
    pub async fn get_by_camera(&self, camera_id: &str, limit: Option<i64>) -> Result<Vec<Detection>> {
        let limit = limit.unwrap_or(100);

        let result = sqlx::query_as::<_, Detection>(
            r#"
            SELECT id, camera_id, object_type, confidence, timestamp
            FROM detections
            WHERE camera_id = ?1
            ORDER BY julianday(timestamp) DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(camera_id)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get detections for camera: {}", e)))?;

        Ok(result)
    }

    /// Count a camera's detections in `[start, end]` per object type.
    ///
    /// Runs on the caller's connection so several reads can share one checkout.
    pub async fn count_by_object_type(
        conn: &mut SqliteConnection,
        camera_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ObjectTypeCount>, sqlx::Error> {
        sqlx::query_as::<_, ObjectTypeCount>(
            r#"
            SELECT object_type, COUNT(*) AS count
            FROM detections
            WHERE camera_id = ?1
              AND julianday(timestamp) >= julianday(?2)
              AND julianday(timestamp) <= julianday(?3)
            GROUP BY object_type
            "#,
        )
        .bind(camera_id)
        .bind(to_sql_timestamp(start))
        .bind(to_sql_timestamp(end))
        .fetch_all(conn)
        .await
    }
}
