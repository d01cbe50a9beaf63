//! Windowed aggregation over the event store.
//!
//! `GET /stats` answers "what did this camera see in the last hour": detection
//! counts per object type and motion-event counts per motion state. The window
//! is trailing and inclusive, `[now - 1h, now]`, with `now` taken when the query
//! runs. Callers always get a [`StatsResult`] back; storage errors become its
//! `Failure` variant.

use crate::db::models::stats_models::StatsResult;
use crate::db::repositories::{DetectionsRepository, MotionEventsRepository};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error};

/// Camera queried when the caller does not name one. A string, not a number.
pub const DEFAULT_CAMERA_ID: &str = "0";

/// Length of the trailing window
pub fn stats_window() -> Duration {
    Duration::hours(1)
}

#[derive(Clone)]
pub struct StatsService {
    pool: Arc<SqlitePool>,
}

impl StatsService {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Stats for `camera_id` (or [`DEFAULT_CAMERA_ID`]) over the last hour
    pub async fn get_stats(&self, camera_id: Option<&str>) -> StatsResult {
        self.get_stats_at(camera_id, Utc::now()).await
    }

    /// Same as [`get_stats`](Self::get_stats) with an explicit query time
    pub async fn get_stats_at(&self, camera_id: Option<&str>, now: DateTime<Utc>) -> StatsResult {
        let camera_id = camera_id.unwrap_or(DEFAULT_CAMERA_ID);
        let start = now - stats_window();

        match self.query(camera_id, start, now).await {
            Ok(result) => result,
            Err(e) => {
                error!("Stats query failed for camera {}: {}", camera_id, e);
                StatsResult::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn query(
        &self,
        camera_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<StatsResult, sqlx::Error> {
        // One checkout for both reads; returned to the pool when `conn` drops.
        let mut conn = self.pool.acquire().await?;

        let detections =
            DetectionsRepository::count_by_object_type(&mut conn, camera_id, start, end).await?;
        let motion_events =
            MotionEventsRepository::count_by_motion_state(&mut conn, camera_id, start, end).await?;

        debug!(
            "Camera {}: {} object types, {} motion states in window",
            camera_id,
            detections.len(),
            motion_events.len()
        );

        Ok(StatsResult::Success {
            detections,
            motion_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::models::event_models::{NewDetection, NewMotionEvent};
    use crate::db::models::stats_models::{MotionStateCount, ObjectTypeCount};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        pool: Arc<SqlitePool>,
        service: StatsService,
        detections: DetectionsRepository,
        motion_events: MotionEventsRepository,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("stats.db"))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        let pool = Arc::new(pool);

        Fixture {
            _dir: dir,
            service: StatsService::new(pool.clone()),
            detections: DetectionsRepository::new(pool.clone()),
            motion_events: MotionEventsRepository::new(pool.clone()),
            pool,
        }
    }

    fn unwrap_success(result: StatsResult) -> (Vec<ObjectTypeCount>, Vec<MotionStateCount>) {
        match result {
            StatsResult::Success {
                mut detections,
                mut motion_events,
            } => {
                detections.sort_by(|a, b| a.object_type.cmp(&b.object_type));
                motion_events.sort_by_key(|m| m.motion_detected);
                (detections, motion_events)
            }
            StatsResult::Failure { error } => panic!("expected success, got failure: {}", error),
        }
    }

    #[tokio::test]
    async fn test_no_rows_is_empty_success() {
        let f = fixture().await;

        let (detections, motion_events) = unwrap_success(f.service.get_stats(Some("42")).await);
        assert!(detections.is_empty());
        assert!(motion_events.is_empty());
    }

    #[tokio::test]
    async fn test_old_detection_excluded() {
        let f = fixture().await;
        let now = Utc::now();
        f.detections
            .create(&NewDetection::new("1", "person", 0.9).at(now))
            .await
            .unwrap();
        f.detections
            .create(&NewDetection::new("1", "car", 0.8).at(now - Duration::hours(2)))
            .await
            .unwrap();

        let (detections, _) = unwrap_success(f.service.get_stats(Some("1")).await);
        assert_eq!(
            detections,
            vec![ObjectTypeCount {
                object_type: Some("person".to_string()),
                count: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_motion_events_grouped_by_state() {
        let f = fixture().await;
        for detected in [true, true, false] {
            f.motion_events
                .create(&NewMotionEvent::new("2", detected))
                .await
                .unwrap();
        }

        let (_, motion_events) = unwrap_success(f.service.get_stats(Some("2")).await);
        assert_eq!(
            motion_events,
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

    #[tokio::test]
    async fn test_missing_camera_id_means_camera_zero() {
        let f = fixture().await;
        let now = Utc::now();
        f.detections
            .create(&NewDetection::new("0", "person", 0.7).at(now))
            .await
            .unwrap();
        f.detections
            .create(&NewDetection::new("00", "car", 0.7).at(now))
            .await
            .unwrap();
        f.motion_events
            .create(&NewMotionEvent::new("0", true).at(now))
            .await
            .unwrap();

        let query_time = Utc::now();
        let implicit = f.service.get_stats_at(None, query_time).await;
        let explicit = f.service.get_stats_at(Some("0"), query_time).await;
        assert_eq!(implicit, explicit);

        let (detections, motion_events) = unwrap_success(implicit);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].object_type.as_deref(), Some("person"));
        assert_eq!(motion_events.len(), 1);
    }

    #[tokio::test]
    async fn test_window_bounds_are_inclusive() {
        let f = fixture().await;
        let now = Utc::now();
        let edge = now - stats_window();
        f.detections
            .create(&NewDetection::new("5", "edge", 0.5).at(edge))
            .await
            .unwrap();
        f.detections
            .create(&NewDetection::new("5", "now", 0.5).at(now))
            .await
            .unwrap();
        f.detections
            .create(&NewDetection::new("5", "future", 0.5).at(now + Duration::minutes(5)))
            .await
            .unwrap();
        f.detections
            .create(&NewDetection::new("5", "stale", 0.5).at(edge - Duration::seconds(1)))
            .await
            .unwrap();

        // Rows and bounds are both written at millisecond precision, so the edges compare equal.
        let (detections, _) = unwrap_success(f.service.get_stats_at(Some("5"), now).await);
        let labels: Vec<&str> = detections.iter().map(|d| d.object_type.as_deref().unwrap_or("")).collect();
        assert_eq!(labels, vec!["edge", "now"]);
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported_not_raised() {
        let f = fixture().await;
        f.pool.close().await;

        match f.service.get_stats(Some("1")).await {
            StatsResult::Failure { error } => assert!(!error.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_table_is_reported() {
        let f = fixture().await;
        sqlx::query("DROP TABLE motion_events")
            .execute(&*f.pool)
            .await
            .unwrap();

        match f.service.get_stats(None).await {
            StatsResult::Failure { error } => assert!(error.contains("motion_events")),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
