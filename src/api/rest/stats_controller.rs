use crate::api::rest::AppState;
use crate::db::models::stats_models::{StatsResponse, StatsResult};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use log::warn;

/// Query parameter naming the camera
pub const CAMERA_ID_PARAM: &str = "camera_id";

/// First `camera_id` in the query string, if any. Later repeats are ignored.
pub fn camera_id(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == CAMERA_ID_PARAM)
        .map(|(_, value)| value.as_str())
}

/// Counts for the last hour. Always 200; failures are reported in the body.
pub async fn get_stats(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<StatsResponse> {
    let Query(pairs) = match query {
        Ok(query) => query,
        Err(e) => {
            warn!("Rejected stats query: {}", e);
            return Json(StatsResponse::from(StatsResult::Failure {
                error: e.body_text(),
            }));
        }
    };

    let result = state.stats_service.get_stats(camera_id(&pairs)).await;

    Json(StatsResponse::from(result))
}
