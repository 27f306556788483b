//! Right-arm bicep curl.

use formcheck_core::{angle_at, ExerciseKind, Landmark, PoseFrame};

use crate::detector::AngleKind;
use crate::measure::Measurement;
use crate::rep::{RepPhrases, RepProfile, RepThresholds};

fn measure(frame: &PoseFrame, floor: f64) -> Result<Measurement, &'static str> {
    let (Some(shoulder), Some(elbow), Some(wrist)) = (
        frame.get(Landmark::RightShoulder),
        frame.get(Landmark::RightElbow),
        frame.get(Landmark::RightWrist),
    ) else {
        return Err("Show your right arm fully");
    };

    if shoulder.visibility < floor || elbow.visibility < floor {
        return Err("Bring right arm closer to camera");
    }

    Ok(Measurement::new(angle_at(shoulder, elbow, wrist)))
}

fn neutral(_: &Measurement, angle: f64, score: u8) -> String {
    format!("Elbow {}° - score {}", angle.round(), score)
}

pub fn profile() -> RepProfile {
    RepProfile {
        exercise: ExerciseKind::BicepCurl,
        joint: AngleKind::Elbow,
        thresholds: RepThresholds {
            visibility_floor: 0.4,
            smoothing_window: 6,
            confirm_frames: 4,
            active_angle: 50.0,
            baseline_angle: 150.0,
            best_angle: 50.0,
            worst_angle: 150.0,
        },
        measure,
        phrases: RepPhrases {
            entering: "Curl up",
            holding: "Holding up",
            returning: "Extending",
            neutral,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detector;
    use crate::exercises::fixtures::{arm, at};
    use crate::rep::RepDetector;
    use formcheck_core::{Keypoint, Side};

    #[test]
    fn test_curl_counts_one_rep() {
        let mut detector = RepDetector::new(profile()).unwrap();
        let mut angles = vec![150.0; 6];
        angles.extend([45.0; 10]);
        angles.extend([155.0; 10]);

        let mut records = Vec::new();
        let mut last = None;
        for (i, &a) in angles.iter().enumerate() {
            let out = detector.update(&arm(at(i as i64 * 33), Side::Right, a));
            if let Some(record) = out.completed.clone() {
                records.push(record);
            }
            last = Some(out);
        }

        assert_eq!(last.unwrap().reps, 1);
        assert_eq!(records.len(), 1);
        let meta = &records[0].meta;
        assert!((meta.angle_min - 45.0).abs() <= 1.0);
        assert!(meta.angle_max >= 150.0 && meta.angle_max <= 155.0);
        assert_eq!(records[0].score, 100);
    }

    #[test]
    fn test_missing_and_faint_arm_messages() {
        let mut detector = RepDetector::new(profile()).unwrap();
        let out = detector.update(&arm(at(0), Side::Left, 90.0));
        assert_eq!(out.feedback, "Show your right arm fully");

        let faint = arm(at(0), Side::Right, 90.0)
            .with(Landmark::RightElbow, Keypoint::new(400.0, 200.0, 0.0, 0.3));
        let out = detector.update(&faint);
        assert_eq!(out.feedback, "Bring right arm closer to camera");
        assert_eq!(detector.reps(), 0);
    }

    #[test]
    fn test_neutral_feedback_reports_angle_and_score() {
        let mut detector = RepDetector::new(profile()).unwrap();
        let out = detector.update(&arm(at(0), Side::Right, 100.0));
        assert_eq!(out.feedback, "Elbow 100° - score 50");
    }
}
