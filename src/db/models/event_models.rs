use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detection row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Detection {
    pub id: i64,
    pub camera_id: String,
    pub object_type: String,
    pub confidence: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Detection as submitted by a writer. `timestamp: None` lets the database
/// stamp the row at insertion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDetection {
    pub camera_id: String,
    pub object_type: String,
    pub confidence: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewDetection {
    pub fn new(camera_id: impl Into<String>, object_type: impl Into<String>, confidence: f64) -> Self {
        Self {
            camera_id: camera_id.into(),
            object_type: object_type.into(),
            confidence,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Motion event row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MotionEvent {
    pub id: i64,
    pub camera_id: String,
    pub motion_detected: bool,
    pub timestamp: DateTime<Utc>,
}

/// Motion event as submitted by a writer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMotionEvent {
    pub camera_id: String,
    pub motion_detected: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewMotionEvent {
    pub fn new(camera_id: impl Into<String>, motion_detected: bool) -> Self {
        Self {
            camera_id: camera_id.into(),
            motion_detected,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
