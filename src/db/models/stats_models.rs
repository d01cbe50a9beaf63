use serde::{Deserialize, Serialize};

/// Detections in the window for one object class. `None` groups rows with a NULL label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ObjectTypeCount {
    pub object_type: Option<String>,
    pub count: i64,
}

/// Motion events in the window for one motion state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MotionStateCount {
    pub motion_detected: bool,
    pub count: i64,
}

/// Outcome of a stats query. Storage failures are carried as data, never raised.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsResult {
    Success {
        detections: Vec<ObjectTypeCount>,
        motion_events: Vec<MotionStateCount>,
    },
    Failure {
        error: String,
    },
}

impl StatsResult {
    pub fn is_success(&self) -> bool {
        matches!(self, StatsResult::Success { .. })
    }
}

/// Wire shape of `GET /stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections: Option<Vec<ObjectTypeCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion_events: Option<Vec<MotionStateCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<StatsResult> for StatsResponse {
    fn from(result: StatsResult) -> Self {
        match result {
            StatsResult::Success {
                detections,
                motion_events,
            } => StatsResponse {
                success: true,
                detections: Some(detections),
                motion_events: Some(motion_events),
                error: None,
            },
            StatsResult::Failure { error } => StatsResponse {
                success: false,
                detections: None,
                motion_events: None,
                error: Some(error),
            },
        }
    }
}
