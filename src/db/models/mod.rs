pub mod event_models;
pub mod stats_models;
