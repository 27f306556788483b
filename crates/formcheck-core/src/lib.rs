//! # Formcheck-Core
//!
//! Core types and utilities shared by the formcheck exercise-tracking crates.
//!
//! A pose source delivers one [`PoseFrame`] per camera frame: 33 optional
//! [`Keypoint`]s indexed by [`Landmark`], stamped with the capture time.
//! This crate provides the geometric feature extractor ([`angle_at`]) and the
//! frame quality gate ([`sufficient_full_body`], [`sufficient_upper_body`])
//! that every detector sits behind.

pub mod error;
pub mod geometry;
pub mod quality;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use quality::*;
pub use types::*;
