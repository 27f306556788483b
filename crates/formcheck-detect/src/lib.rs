//! # Formcheck-Detect
//!
//! Per-exercise state machines that turn a stream of [`PoseFrame`]s into
//! repetition counts, hold durations and a 0-100 form score.
//!
//! ## Detector Families
//!
//! - **Rep counting** (bicep curl, squat, push-up, lunge): a smoothed joint
//!   angle moves between a baseline and an active extreme. Stage changes need
//!   `confirm_frames` consecutive frames past a threshold, and the dead zone
//!   between thresholds resets the count.
//! - **Hold timing** (plank, tree pose): a smoothed posture angle must keep
//!   its score above a floor. Any dip zeroes the timer.
//!
//! Every detector implements [`Detector`]. [`Stabilized`] wraps any of them
//! to keep the displayed feedback steady while the signal settles.
//!
//! [`PoseFrame`]: formcheck_core::PoseFrame

pub mod detector;
pub mod exercise;
pub mod exercises;
pub mod hold;
pub mod measure;
pub mod rep;
pub mod scoring;
pub mod smoothing;
pub mod stability;

pub use detector::*;
pub use exercise::{ExerciseDetector, Profile};
pub use hold::{HoldDetector, HoldPhrases, HoldProfile, HoldThresholds};
pub use measure::{MeasureFn, Measurement};
pub use rep::{RepDetector, RepPhrases, RepProfile, RepStage, RepThresholds};
pub use scoring::ScoreCurve;
pub use smoothing::MovingAverage;
pub use stability::{StabilityConfig, Stabilized, StabilizedOutput};
