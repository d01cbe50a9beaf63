pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod security;
pub mod services;

// Re-export main components for easier use
pub use api::rest::{router, AppState, RestApi};
pub use db::models::stats_models::{MotionStateCount, ObjectTypeCount, StatsResponse, StatsResult};
pub use error::Error;
pub use services::{StatsService, DEFAULT_CAMERA_ID};
