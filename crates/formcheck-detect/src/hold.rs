//! Hold timer shared by plank and tree pose.
//!
//! A hold runs while the smoothed pose scores at or above `hold_score`. The
//! first frame that drops below it, or that loses the measured geometry,
//! zeroes the timer and clears the smoothing window: partial holds are never
//! carried over.

use formcheck_core::{Error, ExerciseKind, PoseFrame, Result, Side, Timestamp};
use serde::{Deserialize, Serialize};

use crate::detector::{AngleKind, Detector, HoldMeta, HoldUpdate, JointAngle};
use crate::measure::MeasureFn;
use crate::scoring::ScoreCurve;
use crate::smoothing::MovingAverage;

/// Tunable thresholds of a hold exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldThresholds {
    pub visibility_floor: f64,
    pub smoothing_window: usize,
    /// Angle scoring 100
    pub best_angle: f64,
    /// Angle scoring 0
    pub worst_angle: f64,
    /// Minimum instantaneous score that keeps the hold running
    pub hold_score: u8,
}

impl HoldThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(Error::Config("smoothing_window must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.visibility_floor) {
            return Err(Error::Config(format!(
                "visibility_floor {} outside [0, 1]",
                self.visibility_floor
            )));
        }
        if self.best_angle == self.worst_angle {
            return Err(Error::Config("best_angle and worst_angle must differ".into()));
        }
        if self.hold_score > 100 {
            return Err(Error::Config(format!("hold_score {} above 100", self.hold_score)));
        }
        Ok(())
    }
}

/// Feedback vocabulary of a hold exercise
#[derive(Debug, Clone, Copy)]
pub struct HoldPhrases {
    /// Built every frame the hold is running, from the elapsed seconds and leg
    pub holding: fn(u64, Option<Side>) -> String,
    /// Shown when the pose scores below the hold threshold
    pub unsteady: &'static str,
}

/// Everything that specializes the hold timer to one exercise
#[derive(Debug, Clone, Copy)]
pub struct HoldProfile {
    pub exercise: ExerciseKind,
    pub joint: AngleKind,
    pub thresholds: HoldThresholds,
    pub measure: MeasureFn,
    pub phrases: HoldPhrases,
}

#[derive(Debug, Clone)]
pub struct HoldDetector {
    profile: HoldProfile,
    curve: ScoreCurve,
    window: MovingAverage,
    started_at: Option<Timestamp>,
    held_seconds: u64,
}

impl HoldDetector {
    pub fn new(profile: HoldProfile) -> Result<Self> {
        profile.thresholds.validate()?;

        Ok(Self {
            curve: ScoreCurve::new(profile.thresholds.best_angle, profile.thresholds.worst_angle),
            window: MovingAverage::new(profile.thresholds.smoothing_window),
            started_at: None,
            held_seconds: 0,
            profile,
        })
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.profile.exercise
    }

    pub fn thresholds(&self) -> &HoldThresholds {
        &self.profile.thresholds
    }

    pub fn holding(&self) -> bool {
        self.started_at.is_some()
    }

    fn break_hold(&mut self) {
        if self.started_at.take().is_some() {
            tracing::debug!(
                "{} hold broken after {}s",
                self.profile.exercise,
                self.held_seconds
            );
        }
        self.held_seconds = 0;
        self.window.reset();
    }
}

impl Detector for HoldDetector {
    type Output = HoldUpdate;

    fn update(&mut self, frame: &PoseFrame) -> HoldUpdate {
        let thresholds = self.profile.thresholds;

        let measurement = match (self.profile.measure)(frame, thresholds.visibility_floor) {
            Ok(m) => m,
            Err(missing) => {
                self.break_hold();
                return HoldUpdate::idle(missing, None);
            }
        };

        let angle = self.window.push(measurement.degrees);
        let score = self.curve.score(angle);
        let reported = Some(JointAngle::new(self.profile.joint, angle));

        if score < thresholds.hold_score {
            self.break_hold();
            return HoldUpdate::idle(self.profile.phrases.unsteady, reported);
        }

        let now = frame.timestamp;
        let start = *self.started_at.get_or_insert_with(|| {
            tracing::debug!("{} hold started", self.profile.exercise);
            now
        });
        let hold_seconds = (now.millis_since(start) / 1_000) as u64;
        self.held_seconds = hold_seconds;

        HoldUpdate {
            hold_seconds,
            feedback: (self.profile.phrases.holding)(hold_seconds, measurement.leg),
            angle: reported,
            score,
            active: true,
            meta: HoldMeta {
                hold_start: Some(start),
                leg: measurement.leg,
            },
        }
    }

    fn reset(&mut self) {
        self.window.reset();
        self.started_at = None;
        self.held_seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{torso_angle, Measurement};
    use formcheck_core::{Keypoint, Landmark};

    fn profile(hold_score: u8) -> HoldProfile {
        fn measure(frame: &PoseFrame, floor: f64) -> std::result::Result<Measurement, &'static str> {
            torso_angle(frame, Side::Left, floor)
                .map(Measurement::new)
                .ok_or("Show torso")
        }

        fn holding(seconds: u64, _: Option<Side>) -> String {
            format!("{seconds}s")
        }

        HoldProfile {
            exercise: ExerciseKind::Plank,
            joint: AngleKind::Body,
            thresholds: HoldThresholds {
                visibility_floor: 0.35,
                smoothing_window: 6,
                best_angle: 180.0,
                worst_angle: 160.0,
                hold_score,
            },
            measure,
            phrases: HoldPhrases {
                holding,
                unsteady: "Wobbly",
            },
        }
    }

    /// Side-on plank with the body bent `180 - degrees` at the hip
    fn plank_frame(t_ms: i64, degrees: f64) -> PoseFrame {
        let hip = Keypoint::at(300.0, 300.0);
        let shoulder = Keypoint::at(150.0, 300.0);
        let rad = (180.0 - degrees).to_radians();
        let ankle = Keypoint::at(300.0 + 150.0 * rad.cos(), 300.0 + 150.0 * rad.sin());

        PoseFrame::new(Timestamp::from_millis(t_ms))
            .with(Landmark::LeftShoulder, shoulder)
            .with(Landmark::LeftHip, hip)
            .with(Landmark::LeftAnkle, ankle)
    }

    #[test]
    fn test_hold_seconds_follow_frame_time() {
        let mut detector = HoldDetector::new(profile(40)).unwrap();

        let first = detector.update(&plank_frame(10_000, 178.0));
        assert!(first.active);
        assert_eq!(first.hold_seconds, 0);
        assert_eq!(first.meta.hold_start, Some(Timestamp::from_millis(10_000)));

        let later = detector.update(&plank_frame(12_500, 179.0));
        assert_eq!(later.hold_seconds, 2);
        assert_eq!(later.feedback, "2s");
        assert!(detector.holding());
    }

    #[test]
    fn test_single_dip_zeroes_the_hold() {
        let mut detector = HoldDetector::new(profile(40)).unwrap();
        for i in 0..6 {
            let out = detector.update(&plank_frame(i * 1_000, 180.0));
            assert_eq!(out.hold_seconds, i as u64);
        }

        // Window mean drops to 165, scoring 25
        let dip = detector.update(&plank_frame(6_000, 90.0));
        assert_eq!(dip.hold_seconds, 0);
        assert!(!dip.active);
        assert_eq!(dip.feedback, "Wobbly");
        assert!(!detector.holding());

        // The window was cleared, so the next straight frame restarts at 0
        let again = detector.update(&plank_frame(7_000, 180.0));
        assert_eq!(again.hold_seconds, 0);
        assert_eq!(again.meta.hold_start, Some(Timestamp::from_millis(7_000)));
    }

    #[test]
    fn test_missing_torso_breaks_hold() {
        let mut detector = HoldDetector::new(profile(40)).unwrap();
        detector.update(&plank_frame(0, 180.0));
        detector.update(&plank_frame(3_000, 180.0));

        let lost = detector.update(&PoseFrame::new(Timestamp::from_millis(4_000)));
        assert_eq!(lost.feedback, "Show torso");
        assert_eq!(lost.hold_seconds, 0);
        assert!(lost.angle.is_none());
        assert!(!detector.holding());
    }

    #[test]
    fn test_reset_matches_fresh_detector() {
        let script: Vec<PoseFrame> = [180.0, 175.0, 150.0, 180.0, 179.0]
            .iter()
            .enumerate()
            .map(|(i, &a)| plank_frame(i as i64 * 700, a))
            .collect();

        let mut used = HoldDetector::new(profile(40)).unwrap();
        used.update(&plank_frame(0, 180.0));
        used.update(&plank_frame(5_000, 180.0));
        used.reset();

        let mut fresh = HoldDetector::new(profile(40)).unwrap();
        for frame in &script {
            assert_eq!(used.update(frame), fresh.update(frame));
        }
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        assert!(HoldDetector::new(profile(101)).is_err());

        let mut p = profile(40);
        p.thresholds.smoothing_window = 0;
        assert!(matches!(HoldDetector::new(p), Err(Error::Config(_))));
    }
}
