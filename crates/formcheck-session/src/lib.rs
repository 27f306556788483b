//! # Formcheck-Session
//!
//! Boundary crate between a pose source and the detectors: loads the
//! [`WorkoutConfig`], runs each delivered frame through the stride filter,
//! quality gate and stabilized detector, and aggregates the results into a
//! [`SessionSummary`] when the session ends.

pub mod config;
pub mod recorder;
pub mod workout;

pub use config::*;
pub use recorder::*;
pub use workout::*;
