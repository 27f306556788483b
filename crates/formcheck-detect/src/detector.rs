//! Detector contract and per-frame result types.
//!
//! Rep-counting and hold-timing detectors report through two distinct result
//! types, [`RepUpdate`] and [`HoldUpdate`]. Anything that sits between a
//! detector and its consumer (the stability wrapper, the session recorder)
//! reads them through the [`Reading`] trait.

use formcheck_core::{PoseFrame, Side, Timestamp};
use serde::{Deserialize, Serialize};

/// A per-exercise state machine fed one pose frame at a time.
///
/// Implementations own all of their temporal state; two instances never
/// share anything.
pub trait Detector {
    type Output: Reading;

    /// Consume one delivered frame
    fn update(&mut self, frame: &PoseFrame) -> Self::Output;

    /// Return to the freshly constructed state
    fn reset(&mut self);
}

/// Read access to the display-relevant parts of a detector result
pub trait Reading: Clone {
    /// Representative scalar: the monitored joint angle if one was measured,
    /// otherwise the hold timer
    fn metric(&self) -> Option<f64>;

    /// Whether the detector considers the user in the target position.
    /// `None` lets the consumer fall back to a metric threshold.
    fn active(&self) -> Option<bool>;

    fn feedback(&self) -> &str;

    fn score(&self) -> Option<u8>;

    /// Replace the user-facing feedback and score, leaving counts untouched
    fn show(&mut self, feedback: String, score: Option<u8>);
}

/// Which joint a reported angle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleKind {
    Elbow,
    Knee,
    Body,
}

/// A smoothed joint angle, rounded to whole degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngle {
    pub kind: AngleKind,
    pub degrees: f64,
}

impl JointAngle {
    pub fn new(kind: AngleKind, degrees: f64) -> Self {
        Self {
            kind,
            degrees: degrees.round(),
        }
    }
}

/// Details of one completed repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepMeta {
    /// Best instantaneous score seen while the rep was open
    pub rep_score: u8,
    pub joint: AngleKind,
    pub angle_min: f64,
    pub angle_max: f64,
    #[serde(with = "formcheck_core::rfc3339")]
    pub start_timestamp: Timestamp,
    #[serde(with = "formcheck_core::rfc3339")]
    pub end_timestamp: Timestamp,
    pub duration_ms: i64,
    /// Working leg, for exercises that pick one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg: Option<Side>,
}

/// Emitted exactly once per completed repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepRecord {
    #[serde(with = "formcheck_core::rfc3339")]
    pub timestamp: Timestamp,
    pub score: u8,
    pub meta: RepMeta,
}

/// Per-frame result of a rep-counting detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepUpdate {
    /// Cumulative repetitions
    pub reps: u32,
    pub feedback: String,
    pub angle: Option<JointAngle>,
    pub score: Option<u8>,
    pub active: bool,
    /// Present only on the frame that completed a rep
    pub completed: Option<RepRecord>,
}

impl RepUpdate {
    /// Non-advancing result for a frame without usable geometry
    pub fn missing(reps: u32, feedback: &str) -> Self {
        Self {
            reps,
            feedback: feedback.to_string(),
            angle: None,
            score: None,
            active: false,
            completed: None,
        }
    }
}

impl Reading for RepUpdate {
    fn metric(&self) -> Option<f64> {
        self.angle.map(|a| a.degrees)
    }

    fn active(&self) -> Option<bool> {
        Some(self.active)
    }

    fn feedback(&self) -> &str {
        &self.feedback
    }

    fn score(&self) -> Option<u8> {
        self.score
    }

    fn show(&mut self, feedback: String, score: Option<u8>) {
        self.feedback = feedback;
        self.score = score;
    }
}

/// Hold-specific details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldMeta {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "formcheck_core::rfc3339::option"
    )]
    pub hold_start: Option<Timestamp>,
    /// Supporting leg, for single-leg holds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg: Option<Side>,
}

/// Per-frame result of a hold-timing detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldUpdate {
    /// Whole seconds since the current hold began; 0 when not holding
    pub hold_seconds: u64,
    pub feedback: String,
    pub angle: Option<JointAngle>,
    pub score: u8,
    pub active: bool,
    pub meta: HoldMeta,
}

impl HoldUpdate {
    /// Result for a frame in which no hold is running
    pub fn idle(feedback: &str, angle: Option<JointAngle>) -> Self {
        Self {
            hold_seconds: 0,
            feedback: feedback.to_string(),
            angle,
            score: 0,
            active: false,
            meta: HoldMeta::default(),
        }
    }
}

impl Reading for HoldUpdate {
    fn metric(&self) -> Option<f64> {
        self.angle
            .map(|a| a.degrees)
            .or(Some(self.hold_seconds as f64))
    }

    fn active(&self) -> Option<bool> {
        Some(self.active)
    }

    fn feedback(&self) -> &str {
        &self.feedback
    }

    fn score(&self) -> Option<u8> {
        Some(self.score)
    }

    fn show(&mut self, feedback: String, score: Option<u8>) {
        self.feedback = feedback;
        self.score = score.unwrap_or(0);
    }
}

/// Result of any exercise detector, tagged by family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum DetectorOutput {
    Rep(RepUpdate),
    Hold(HoldUpdate),
}

impl DetectorOutput {
    /// Rep count, or hold seconds for hold exercises
    pub fn count(&self) -> u64 {
        match self {
            DetectorOutput::Rep(r) => u64::from(r.reps),
            DetectorOutput::Hold(h) => h.hold_seconds,
        }
    }

    pub fn completed_rep(&self) -> Option<&RepRecord> {
        match self {
            DetectorOutput::Rep(r) => r.completed.as_ref(),
            DetectorOutput::Hold(_) => None,
        }
    }
}

impl Reading for DetectorOutput {
    fn metric(&self) -> Option<f64> {
        match self {
            DetectorOutput::Rep(r) => r.metric(),
            DetectorOutput::Hold(h) => h.metric(),
        }
    }

    fn active(&self) -> Option<bool> {
        match self {
            DetectorOutput::Rep(r) => r.active(),
            DetectorOutput::Hold(h) => h.active(),
        }
    }

    fn feedback(&self) -> &str {
        match self {
            DetectorOutput::Rep(r) => r.feedback(),
            DetectorOutput::Hold(h) => h.feedback(),
        }
    }

    fn score(&self) -> Option<u8> {
        match self {
            DetectorOutput::Rep(r) => r.score(),
            DetectorOutput::Hold(h) => h.score(),
        }
    }

    fn show(&mut self, feedback: String, score: Option<u8>) {
        match self {
            DetectorOutput::Rep(r) => r.show(feedback, score),
            DetectorOutput::Hold(h) => h.show(feedback, score),
        }
    }
}

impl From<RepUpdate> for DetectorOutput {
    fn from(update: RepUpdate) -> Self {
        DetectorOutput::Rep(update)
    }
}

impl From<HoldUpdate> for DetectorOutput {
    fn from(update: HoldUpdate) -> Self {
        DetectorOutput::Hold(update)
    }
}
