pub mod stats;

pub use stats::{StatsService, DEFAULT_CAMERA_ID};
