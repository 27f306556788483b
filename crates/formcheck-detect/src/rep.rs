//! Rep-counting state machine shared by curls, squats, push-ups and lunges.
//!
//! ## Stages
//!
//! The smoothed joint angle moves between a *baseline* extreme (arm extended,
//! standing, top of a push-up) and an *active* extreme (curled, squatted,
//! chest down). Every monitored angle is small at the active extreme.
//!
//! - Entering active: angle ≤ `active_angle` for `confirm_frames`
//!   consecutive frames.
//! - Completing a rep: angle ≥ `baseline_angle` for `confirm_frames`
//!   consecutive frames while active.
//! - Anything in between resets both counters without changing stage.
//!
//! Counters are in delivered frames, so a decimated stream lengthens the
//! debounce latency proportionally.

use formcheck_core::{Error, ExerciseKind, PoseFrame, Result, Side, Timestamp};
use serde::{Deserialize, Serialize};

use crate::detector::{AngleKind, Detector, JointAngle, RepMeta, RepRecord, RepUpdate};
use crate::measure::{MeasureFn, Measurement};
use crate::scoring::ScoreCurve;
use crate::smoothing::MovingAverage;

/// Tunable thresholds of a rep-counting exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepThresholds {
    /// Minimum visibility of the gating landmarks
    pub visibility_floor: f64,
    /// Trailing moving-average window, in samples
    pub smoothing_window: usize,
    /// Consecutive frames needed to confirm a stage change
    pub confirm_frames: u32,
    /// Smoothed angle at or below which the user is in the active position
    pub active_angle: f64,
    /// Smoothed angle at or above which the user is back at baseline
    pub baseline_angle: f64,
    /// Angle scoring 100
    pub best_angle: f64,
    /// Angle scoring 0
    pub worst_angle: f64,
}

impl RepThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(Error::Config("smoothing_window must be at least 1".into()));
        }
        if self.confirm_frames == 0 {
            return Err(Error::Config("confirm_frames must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.visibility_floor) {
            return Err(Error::Config(format!(
                "visibility_floor {} outside [0, 1]",
                self.visibility_floor
            )));
        }
        if self.active_angle >= self.baseline_angle {
            return Err(Error::Config(format!(
                "active_angle {} must be below baseline_angle {}",
                self.active_angle, self.baseline_angle
            )));
        }
        if self.best_angle == self.worst_angle {
            return Err(Error::Config("best_angle and worst_angle must differ".into()));
        }
        Ok(())
    }

    pub fn curve(&self) -> ScoreCurve {
        ScoreCurve::new(self.best_angle, self.worst_angle)
    }
}

/// Feedback vocabulary of a rep-counting exercise
#[derive(Debug, Clone, Copy)]
pub struct RepPhrases {
    /// Shown on the frame that confirms the active position
    pub entering: &'static str,
    /// Shown while in the active zone otherwise
    pub holding: &'static str,
    /// Shown while in the baseline zone without completing a rep
    pub returning: &'static str,
    /// Built for frames in the dead zone between thresholds
    pub neutral: fn(&Measurement, f64, u8) -> String,
}

/// Everything that specializes the shared state machine to one exercise
#[derive(Debug, Clone, Copy)]
pub struct RepProfile {
    pub exercise: ExerciseKind,
    pub joint: AngleKind,
    pub thresholds: RepThresholds,
    pub measure: MeasureFn,
    pub phrases: RepPhrases,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepStage {
    Baseline,
    Active,
}

/// Tracking for the repetition in progress.
///
/// Armed on the first frame that crosses into the active zone and dropped
/// as a whole when the rep completes or the detector resets.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenRep {
    started_at: Timestamp,
    min_angle: f64,
    max_angle: f64,
    best_score: u8,
}

impl OpenRep {
    fn arm(started_at: Timestamp, angle: f64, score: u8) -> Self {
        Self {
            started_at,
            min_angle: angle,
            max_angle: angle,
            best_score: score,
        }
    }

    fn observe(&mut self, angle: f64, score: u8) {
        self.min_angle = self.min_angle.min(angle);
        self.max_angle = self.max_angle.max(angle);
        self.best_score = self.best_score.max(score);
    }
}

/// Generic hysteresis rep counter
#[derive(Debug, Clone)]
pub struct RepDetector {
    profile: RepProfile,
    curve: ScoreCurve,
    window: MovingAverage,
    stage: RepStage,
    reps: u32,
    active_frames: u32,
    baseline_frames: u32,
    open: Option<OpenRep>,
}

impl RepDetector {
    pub fn new(profile: RepProfile) -> Result<Self> {
        profile.thresholds.validate()?;

        Ok(Self {
            curve: profile.thresholds.curve(),
            window: MovingAverage::new(profile.thresholds.smoothing_window),
            stage: RepStage::Baseline,
            reps: 0,
            active_frames: 0,
            baseline_frames: 0,
            open: None,
            profile,
        })
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.profile.exercise
    }

    pub fn thresholds(&self) -> &RepThresholds {
        &self.profile.thresholds
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn stage(&self) -> RepStage {
        self.stage
    }

    /// True while a repetition is being tracked
    pub fn rep_open(&self) -> bool {
        self.open.is_some()
    }

    fn complete(&mut self, now: Timestamp, angle: f64, score: u8, leg: Option<Side>) -> RepUpdate {
        self.reps += 1;

        let open = self.open.take().unwrap_or_else(|| OpenRep::arm(now, angle, score));
        let rep_score = if open.best_score > 0 { open.best_score } else { score };
        let duration_ms = now.millis_since(open.started_at);

        tracing::debug!(
            "{} rep {} completed: score {}, {}ms",
            self.profile.exercise,
            self.reps,
            rep_score,
            duration_ms
        );

        let meta = RepMeta {
            rep_score,
            joint: self.profile.joint,
            angle_min: open.min_angle.round(),
            angle_max: open.max_angle.round(),
            start_timestamp: open.started_at,
            end_timestamp: now,
            duration_ms,
            leg,
        };

        self.stage = RepStage::Baseline;
        self.active_frames = 0;
        self.baseline_frames = 0;

        RepUpdate {
            reps: self.reps,
            feedback: "Good rep".to_string(),
            angle: Some(JointAngle::new(self.profile.joint, angle)),
            score: Some(rep_score),
            active: false,
            completed: Some(RepRecord {
                timestamp: now,
                score: rep_score,
                meta,
            }),
        }
    }
}

impl Detector for RepDetector {
    type Output = RepUpdate;

    fn update(&mut self, frame: &PoseFrame) -> RepUpdate {
        let thresholds = self.profile.thresholds;

        let measurement = match (self.profile.measure)(frame, thresholds.visibility_floor) {
            Ok(m) => m,
            Err(missing) => return RepUpdate::missing(self.reps, missing),
        };

        let angle = self.window.push(measurement.degrees);
        let score = self.curve.score(angle);
        let now = frame.timestamp;

        if let Some(open) = self.open.as_mut() {
            open.observe(angle, score);
        }

        let phrases = self.profile.phrases;
        let feedback = if angle <= thresholds.active_angle {
            self.active_frames += 1;
            self.baseline_frames = 0;

            if self.open.is_none() {
                self.open = Some(OpenRep::arm(now, angle, score));
            }

            if self.stage == RepStage::Baseline && self.active_frames >= thresholds.confirm_frames {
                self.stage = RepStage::Active;
                tracing::debug!("{} entered active position at {:.0}°", self.profile.exercise, angle);
                phrases.entering.to_string()
            } else {
                phrases.holding.to_string()
            }
        } else if angle >= thresholds.baseline_angle {
            self.baseline_frames += 1;
            self.active_frames = 0;

            if self.stage == RepStage::Active && self.baseline_frames >= thresholds.confirm_frames {
                return self.complete(now, angle, score, measurement.leg);
            }
            phrases.returning.to_string()
        } else {
            self.active_frames = 0;
            self.baseline_frames = 0;
            (phrases.neutral)(&measurement, angle, score)
        };

        RepUpdate {
            reps: self.reps,
            feedback,
            angle: Some(JointAngle::new(self.profile.joint, angle)),
            score: Some(score),
            active: self.stage == RepStage::Active,
            completed: None,
        }
    }

    fn reset(&mut self) {
        self.window.reset();
        self.stage = RepStage::Baseline;
        self.reps = 0;
        self.active_frames = 0;
        self.baseline_frames = 0;
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcheck_core::{Keypoint, Landmark};

    /// Test profile reading the raw angle straight off the right elbow
    fn profile(smoothing_window: usize, confirm_frames: u32) -> RepProfile {
        fn measure(frame: &PoseFrame, floor: f64) -> std::result::Result<Measurement, &'static str> {
            crate::measure::elbow_angle(frame, Side::Right, floor)
                .map(Measurement::new)
                .ok_or("Show your right arm")
        }

        fn neutral(_: &Measurement, angle: f64, _: u8) -> String {
            format!("Angle {}", angle.round())
        }

        RepProfile {
            exercise: ExerciseKind::BicepCurl,
            joint: AngleKind::Elbow,
            thresholds: RepThresholds {
                visibility_floor: 0.4,
                smoothing_window,
                confirm_frames,
                active_angle: 50.0,
                baseline_angle: 150.0,
                best_angle: 50.0,
                worst_angle: 150.0,
            },
            measure,
            phrases: RepPhrases {
                entering: "In",
                holding: "Hold",
                returning: "Out",
                neutral,
            },
        }
    }

    fn arm_frame(t_ms: i64, degrees: f64) -> PoseFrame {
        let elbow = Keypoint::at(300.0, 200.0);
        let shoulder = Keypoint::at(300.0, 100.0);
        let rad = degrees.to_radians();
        let wrist = Keypoint::at(300.0 + 100.0 * rad.sin(), 200.0 - 100.0 * rad.cos());

        PoseFrame::new(Timestamp::from_millis(t_ms))
            .with(Landmark::RightShoulder, shoulder)
            .with(Landmark::RightElbow, elbow)
            .with(Landmark::RightWrist, wrist)
    }

    fn feed(detector: &mut RepDetector, angles: &[f64]) -> Vec<RepUpdate> {
        angles
            .iter()
            .enumerate()
            .map(|(i, &a)| detector.update(&arm_frame(i as i64 * 100, a)))
            .collect()
    }

    #[test]
    fn test_dwell_counts_exactly_one_rep() {
        let mut detector = RepDetector::new(profile(1, 3)).unwrap();
        let mut angles = vec![160.0; 3];
        angles.extend([40.0; 3]);
        angles.extend([160.0; 3]);

        let out = feed(&mut detector, &angles);
        let records: Vec<_> = out.iter().filter_map(|u| u.completed.as_ref()).collect();

        assert_eq!(detector.reps(), 1);
        assert_eq!(records.len(), 1);
        assert_eq!(out.last().unwrap().reps, 1);
        assert_eq!(out.last().unwrap().feedback, "Good rep");
        assert!(!out.last().unwrap().active);
        assert!(!detector.rep_open());
    }

    #[test]
    fn test_oscillation_never_counts() {
        let mut detector = RepDetector::new(profile(1, 3)).unwrap();
        let pattern = [40.0, 40.0, 160.0, 160.0, 100.0];
        let angles: Vec<f64> = pattern.iter().cycle().take(60).copied().collect();

        let out = feed(&mut detector, &angles);

        assert_eq!(detector.reps(), 0);
        assert!(out.iter().all(|u| u.completed.is_none()));
        assert_eq!(detector.stage(), RepStage::Baseline);
    }

    #[test]
    fn test_dead_zone_resets_confirmation() {
        let mut detector = RepDetector::new(profile(1, 3)).unwrap();
        let out = feed(&mut detector, &[40.0, 40.0, 100.0, 40.0, 40.0]);
        assert!(out.iter().all(|u| !u.active));

        let out = detector.update(&arm_frame(600, 40.0));
        assert!(out.active);
        assert_eq!(out.feedback, "In");
    }

    #[test]
    fn test_open_rep_armed_on_first_motion() {
        let mut detector = RepDetector::new(profile(1, 3)).unwrap();
        feed(&mut detector, &[160.0, 160.0]);
        assert!(!detector.rep_open());

        detector.update(&arm_frame(300, 45.0));
        assert!(detector.rep_open());
        assert_eq!(detector.stage(), RepStage::Baseline);
    }

    #[test]
    fn test_rep_meta_tracks_extrema_and_duration() {
        let mut detector = RepDetector::new(profile(1, 2)).unwrap();
        let out = feed(&mut detector, &[160.0, 48.0, 30.0, 100.0, 155.0, 170.0]);

        let record = out[5].completed.as_ref().expect("rep completed on last frame");
        assert_eq!(record.meta.angle_min, 30.0);
        assert_eq!(record.meta.angle_max, 170.0);
        assert_eq!(record.meta.rep_score, 100);
        assert_eq!(record.score, 100);
        assert_eq!(record.meta.start_timestamp, Timestamp::from_millis(100));
        assert_eq!(record.meta.end_timestamp, Timestamp::from_millis(500));
        assert_eq!(record.meta.duration_ms, 400);
        assert_eq!(record.meta.joint, AngleKind::Elbow);
    }

    #[test]
    fn test_missing_geometry_does_not_mutate() {
        let mut detector = RepDetector::new(profile(1, 2)).unwrap();
        feed(&mut detector, &[40.0]);

        let empty = PoseFrame::new(Timestamp::from_millis(1_000));
        let out = detector.update(&empty);
        assert_eq!(out.feedback, "Show your right arm");
        assert!(!out.active);
        assert!(out.score.is_none());

        // The pending active frame still counts toward confirmation
        let out = detector.update(&arm_frame(1_100, 40.0));
        assert!(out.active);
    }

    #[test]
    fn test_reset_matches_fresh_detector() {
        let script = [160.0, 40.0, 40.0, 40.0, 120.0, 160.0, 160.0, 160.0, 30.0];

        let mut used = RepDetector::new(profile(3, 2)).unwrap();
        feed(&mut used, &[40.0, 40.0, 40.0, 100.0, 160.0]);
        used.reset();

        let mut fresh = RepDetector::new(profile(3, 2)).unwrap();
        assert_eq!(feed(&mut used, &script), feed(&mut fresh, &script));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let mut p = profile(0, 3);
        assert!(matches!(RepDetector::new(p), Err(Error::Config(_))));

        p = profile(3, 0);
        assert!(RepDetector::new(p).is_err());

        p = profile(3, 3);
        p.thresholds.active_angle = 160.0;
        assert!(RepDetector::new(p).is_err());
    }
}
