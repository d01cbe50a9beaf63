use sqlx::SqlitePool;
use tracing::info;

const CREATE_DETECTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS detections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    camera_id TEXT NOT NULL,
    object_type TEXT NOT NULL,
    confidence REAL,
    timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_MOTION_EVENTS: &str = r#"
CREATE TABLE IF NOT EXISTS motion_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    camera_id TEXT NOT NULL,
    motion_detected BOOLEAN NOT NULL,
    timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_DETECTIONS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_detections_camera_timestamp
    ON detections (camera_id, timestamp)
"#;

const CREATE_MOTION_EVENTS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_motion_events_camera_timestamp
    ON motion_events (camera_id, timestamp)
"#;

/// Ordered schema statements. Every entry must be create-if-absent.
const MIGRATIONS: &[(&str, &str)] = &[
    ("create_detections", CREATE_DETECTIONS),
    ("create_motion_events", CREATE_MOTION_EVENTS),
    ("create_detections_index", CREATE_DETECTIONS_INDEX),
    ("create_motion_events_index", CREATE_MOTION_EVENTS_INDEX),
];

/// Create the event tables and their indexes if they do not exist yet.
///
/// Safe to call on every start and from several processes at once; nothing
/// here drops or alters existing tables.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for &(name, sql) in MIGRATIONS {
        sqlx::query(sql).execute(&mut *tx).await?;
        info!("Applied migration: {}", name);
    }

    tx.commit().await?;

    Ok(())
}
