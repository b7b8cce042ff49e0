pub mod readiness_tracker;

pub use readiness_tracker::ReadinessTracker;
