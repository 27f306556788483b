//! Per-exercise profiles.
//!
//! Each module specializes the shared rep counter or hold timer with the
//! joints it watches, its thresholds and its feedback vocabulary.

pub mod bicep_curl;
pub mod lunge;
pub mod plank;
pub mod push_up;
pub mod squat;
pub mod tree_pose;
