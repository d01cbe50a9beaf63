pub mod detections;
pub mod motion_events;

pub use detections::DetectionsRepository;
pub use motion_events::MotionEventsRepository;
