//! Tree pose, timed on the straighter (supporting) leg.

use formcheck_core::{ExerciseKind, PoseFrame, Side};

use crate::detector::AngleKind;
use crate::hold::{HoldPhrases, HoldProfile, HoldThresholds};
use crate::measure::{knee_angle, Measurement};

fn measure(frame: &PoseFrame, floor: f64) -> Result<Measurement, &'static str> {
    let left = knee_angle(frame, Side::Left, floor);
    let right = knee_angle(frame, Side::Right, floor);

    let (degrees, leg) = match (left, right) {
        (Some(l), Some(r)) if l > r => (l, Side::Left),
        (_, Some(r)) => (r, Side::Right),
        (Some(l), None) => (l, Side::Left),
        (None, None) => return Err("Show legs"),
    };

    Ok(Measurement::on_leg(degrees, leg))
}

fn holding(_: u64, leg: Option<Side>) -> String {
    match leg {
        Some(leg) => format!("Holding {leg}"),
        None => "Holding".to_string(),
    }
}

pub fn profile() -> HoldProfile {
    HoldProfile {
        exercise: ExerciseKind::TreePose,
        joint: AngleKind::Knee,
        thresholds: HoldThresholds {
            visibility_floor: 0.35,
            smoothing_window: 6,
            best_angle: 165.0,
            worst_angle: 120.0,
            hold_score: 50,
        },
        measure,
        phrases: HoldPhrases {
            holding,
            unsteady: "Not steady",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detector;
    use crate::exercises::fixtures::{at, leg};
    use crate::hold::HoldDetector;

    fn stance(t_ms: i64, left: f64, right: f64) -> PoseFrame {
        leg(leg(at(t_ms), Side::Left, left), Side::Right, right)
    }

    #[test]
    fn test_supporting_leg_is_the_straighter_one() {
        let m = measure(&stance(0, 175.0, 60.0), 0.35).unwrap();
        assert_eq!(m.leg, Some(Side::Left));
        let m = measure(&stance(0, 140.0, 140.0), 0.35).unwrap();
        assert_eq!(m.leg, Some(Side::Right));
    }

    #[test]
    fn test_hold_reports_leg() {
        let mut detector = HoldDetector::new(profile()).unwrap();
        detector.update(&stance(0, 70.0, 172.0));
        let out = detector.update(&stance(2_000, 70.0, 172.0));

        assert!(out.active);
        assert_eq!(out.hold_seconds, 2);
        assert_eq!(out.feedback, "Holding right");
        assert_eq!(out.meta.leg, Some(Side::Right));
        assert_eq!(out.score, 100);
    }

    #[test]
    fn test_bent_support_leg_breaks_hold() {
        let mut detector = HoldDetector::new(profile()).unwrap();
        detector.update(&stance(0, 70.0, 172.0));
        let out = detector.update(&stance(1_000, 70.0, 60.0));

        // Mean of 172 and 70 is 121, well below the hold threshold
        assert_eq!(out.feedback, "Not steady");
        assert_eq!(out.hold_seconds, 0);
        assert!(out.meta.leg.is_none());
    }

    #[test]
    fn test_no_legs() {
        assert_eq!(measure(&at(0), 0.35), Err("Show legs"));
    }
}
