//! Session aggregation.
//!
//! [`SessionRecorder`] watches the stabilized output stream and keeps what a
//! finished session needs: the per-rep records, the last displayed score and
//! feedback, and the session's time span.

use chrono::{DateTime, Utc};
use formcheck_core::{ExerciseKind, Result, SessionId, Timestamp};
use formcheck_detect::{DetectorOutput, Reading, RepRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    pub last_feedback: String,
}

/// Finalized payload handed to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: SessionId,
    /// Human-readable exercise name, e.g. "Push-Ups"
    pub exercise: String,
    /// Completed reps, or the last reported hold seconds for holds
    pub reps: u64,
    pub started_at: DateTime<Utc>,
    pub duration_secs: u64,
    /// Mean of per-rep scores, or the last displayed score without reps
    pub score: u8,
    pub per_rep: Vec<RepRecord>,
    pub details: SessionDetails,
}

impl SessionSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct SessionRecorder {
    session_id: SessionId,
    exercise: ExerciseKind,
    started_at: Timestamp,
    count: u64,
    recorded_reps: u64,
    per_rep: Vec<RepRecord>,
    last_score: Option<u8>,
    last_feedback: String,
}

impl SessionRecorder {
    pub fn new(exercise: ExerciseKind, started_at: Timestamp) -> Self {
        Self {
            session_id: SessionId::new(),
            exercise,
            started_at,
            count: 0,
            recorded_reps: 0,
            per_rep: Vec::new(),
            last_score: None,
            last_feedback: String::new(),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    /// Reps so far, or current hold seconds
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_rep(&self) -> &[RepRecord] {
        &self.per_rep
    }

    /// Fold in one displayed detector result
    pub fn observe(&mut self, output: &DetectorOutput) {
        self.count = output.count();

        if let DetectorOutput::Rep(update) = output {
            let reps = u64::from(update.reps);
            if reps > self.recorded_reps {
                if let Some(record) = &update.completed {
                    self.per_rep.push(record.clone());
                }
                self.recorded_reps = reps;
            }
        }

        if let Some(score) = output.score() {
            self.last_score = Some(score);
        }
        if !output.feedback().is_empty() {
            self.last_feedback = output.feedback().to_string();
        }
    }

    /// Surface a message for a frame that never reached the detector
    pub fn note_feedback(&mut self, feedback: &str) {
        self.last_feedback = feedback.to_string();
    }

    pub fn summary(&self, ended_at: Timestamp) -> SessionSummary {
        let score = if self.per_rep.is_empty() {
            self.last_score.unwrap_or(0)
        } else {
            let total: u32 = self.per_rep.iter().map(|r| u32::from(r.score)).sum();
            (f64::from(total) / self.per_rep.len() as f64).round() as u8
        };

        let elapsed_ms = ended_at.millis_since(self.started_at);

        SessionSummary {
            session_id: self.session_id,
            exercise: self.exercise.display_name().to_string(),
            reps: self.count,
            started_at: self.started_at.to_datetime(),
            duration_secs: (elapsed_ms as f64 / 1_000.0).round() as u64,
            score,
            per_rep: self.per_rep.clone(),
            details: SessionDetails {
                last_feedback: self.last_feedback.clone(),
            },
        }
    }
}
