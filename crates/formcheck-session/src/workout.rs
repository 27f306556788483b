//! Per-frame workout pipeline.
//!
//! Frames flow through the stride filter, the frame quality gate, the
//! stabilized detector and finally the session recorder. A frame rejected at
//! any step leaves every detector untouched.

use formcheck_core::{framing_hint, sufficient_for, ExerciseKind, PoseFrame, Result, SessionId, Timestamp};
use formcheck_detect::{DetectorOutput, ExerciseDetector, Stabilized, StabilizedOutput};

use crate::config::WorkoutConfig;
use crate::recorder::{SessionRecorder, SessionSummary};

const NO_POSE: &str = "No pose detected";

/// What happened to one delivered frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameReport {
    /// Dropped by the frame stride
    Skipped,
    /// Failed the quality gate; carries the corrective message
    Rejected { feedback: &'static str },
    /// Reached the detector
    Tracked(StabilizedOutput<DetectorOutput>),
}

#[derive(Debug)]
pub struct Workout {
    config: WorkoutConfig,
    detector: Stabilized<ExerciseDetector>,
    recorder: SessionRecorder,
    delivered: u64,
}

impl Workout {
    /// Start a session at `at`
    pub fn start(config: WorkoutConfig, at: Timestamp) -> Result<Self> {
        config.validate()?;

        let detector = Stabilized::new(ExerciseDetector::new(config.profile())?, config.stability)?;
        let recorder = SessionRecorder::new(config.exercise, at);

        tracing::info!(
            "Started {} session {} (stride {})",
            config.exercise,
            recorder.session_id(),
            config.frame_stride
        );

        Ok(Self {
            config,
            detector,
            recorder,
            delivered: 0,
        })
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.config.exercise
    }

    pub fn session_id(&self) -> SessionId {
        self.recorder.session_id()
    }

    /// Reps so far, or current hold seconds
    pub fn count(&self) -> u64 {
        self.recorder.count()
    }

    /// Feed one delivered frame of a `width` x `height` image
    pub fn process(&mut self, frame: &PoseFrame, width: u32, height: u32) -> FrameReport {
        let index = self.delivered;
        self.delivered += 1;
        if index % u64::from(self.config.frame_stride) != 0 {
            return FrameReport::Skipped;
        }

        if frame.is_empty() {
            return self.reject(NO_POSE);
        }

        let region = self.config.exercise.body_region();
        if !sufficient_for(region, frame, width, height) {
            return self.reject(framing_hint(region));
        }

        let output = self.detector.update(frame);
        self.recorder.observe(&output.output);
        FrameReport::Tracked(output)
    }

    fn reject(&mut self, feedback: &'static str) -> FrameReport {
        tracing::trace!("Frame {} rejected: {}", self.delivered - 1, feedback);
        self.recorder.note_feedback(feedback);
        FrameReport::Rejected { feedback }
    }

    /// Drop all detector and session state and begin a new session at `at`
    pub fn restart(&mut self, at: Timestamp) {
        self.detector.reset();
        self.recorder = SessionRecorder::new(self.config.exercise, at);
        self.delivered = 0;

        tracing::info!(
            "Restarted {} as session {}",
            self.config.exercise,
            self.recorder.session_id()
        );
    }

    /// Finalize the session payload as of `at`
    pub fn finish(&self, at: Timestamp) -> SessionSummary {
        let summary = self.recorder.summary(at);
        tracing::info!(
            "Finished {} session {}: {} reps, score {}, {}s",
            self.config.exercise,
            summary.session_id,
            summary.reps,
            summary.score,
            summary.duration_secs
        );
        summary
    }
}
