use crate::db::models::event_models::{MotionEvent, NewMotionEvent};
use crate::db::models::stats_models::MotionStateCount;
use crate::db::to_sql_timestamp;
use crate::error::Error;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;

/// Motion events repository
#[derive(Clone)]
pub struct MotionEventsRepository {
    pool: Arc<SqlitePool>,
}

impl MotionEventsRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, event: &NewMotionEvent) -> Result<MotionEvent> {
        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            INSERT INTO motion_events (camera_id, motion_detected, timestamp)
            VALUES (?1, ?2, COALESCE(?3, CURRENT_TIMESTAMP))
            RETURNING id, camera_id, motion_detected, timestamp
            "#,
        )
        .bind(&event.camera_id)
        .bind(event.motion_detected)
        .bind(event.timestamp.map(to_sql_timestamp))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create motion event: {}", e)))?;

        Ok(result)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<MotionEvent>> {
        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            SELECT id, camera_id, motion_detected, timestamp
            FROM motion_events
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get motion event by ID: {}", e)))?;

        Ok(result)
    }

    pub async fn get_by_camera(&self, camera_id: &str, limit: Option<i64>) -> Result<Vec<MotionEvent>> {
        let limit = limit.unwrap_or(100);

        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            SELECT id, camera_id, motion_detected, timestamp
            FROM motion_events
            WHERE camera_id = ?1
            ORDER BY julianday(timestamp) DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(camera_id)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get motion events for camera: {}", e)))?;

        Ok(result)
    }

    /// Count a camera's motion events in `[start, end]` per motion state
    pub async fn count_by_motion_state(
        conn: &mut SqliteConnection,
        camera_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MotionStateCount>, sqlx::Error> {
        sqlx::query_as::<_, MotionStateCount>(
            r#"
            SELECT motion_detected, COUNT(*) AS count
            FROM motion_events
            WHERE camera_id = ?1
              AND julianday(timestamp) >= julianday(?2)
              AND julianday(timestamp) <= julianday(?3)
            GROUP BY motion_detected
            "#,
        )
        .bind(camera_id)
        .bind(to_sql_timestamp(start))
        .bind(to_sql_timestamp(end))
        .fetch_all(conn)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::Duration;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, MotionEventsRepository) {
        let dir = TempDir::new().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("motion.db"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        (dir, MotionEventsRepository::new(Arc::new(pool)))
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let (_dir, repo) = setup().await;

        let stored = repo.create(&NewMotionEvent::new("2", true)).await.unwrap();
        assert!(stored.motion_detected);

        let fetched = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.camera_id, "2");
        assert!(fetched.motion_detected);

        let rows = repo.get_by_camera("2", None).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_count_by_motion_state() {
        let (_dir, repo) = setup().await;
        let now = Utc::now();
        let recent = now - Duration::minutes(1);
        repo.create(&NewMotionEvent::new("2", true).at(recent)).await.unwrap();
        repo.create(&NewMotionEvent::new("2", true).at(recent)).await.unwrap();
        repo.create(&NewMotionEvent::new("2", false).at(recent)).await.unwrap();
        repo.create(&NewMotionEvent::new("2", false).at(now - Duration::hours(2)))
            .await
            .unwrap();

        let mut conn = repo.pool.acquire().await.unwrap();
        let mut counts = MotionEventsRepository::count_by_motion_state(
            &mut conn,
            "2",
            now - Duration::hours(1),
            now,
        )
        .await
        .unwrap();
        counts.sort_by_key(|c| c.motion_detected);

        assert_eq!(
            counts,
            vec![
                MotionStateCount {
                    motion_detected: false,
                    count: 1
                },
                MotionStateCount {
                    motion_detected: true,
                    count: 2
                },
            ]
        );
    }
}
