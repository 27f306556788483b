//! Forward lunge, tracked on the deeper (front) knee.

use formcheck_core::{ExerciseKind, PoseFrame, Side};

use crate::detector::AngleKind;
use crate::measure::{knee_angle, Measurement};
use crate::rep::{RepPhrases, RepProfile, RepThresholds};

fn measure(frame: &PoseFrame, floor: f64) -> Result<Measurement, &'static str> {
    let left = knee_angle(frame, Side::Left, floor);
    let right = knee_angle(frame, Side::Right, floor);

    let (degrees, leg) = match (left, right) {
        (Some(l), Some(r)) if l < r => (l, Side::Left),
        (_, Some(r)) => (r, Side::Right),
        (Some(l), None) => (l, Side::Left),
        (None, None) => return Err("Show legs"),
    };

    Ok(Measurement::on_leg(degrees, leg))
}

fn neutral(m: &Measurement, angle: f64, _: u8) -> String {
    match m.leg {
        Some(leg) => format!("{} knee {}°", leg, angle.round()),
        None => format!("Knee {}°", angle.round()),
    }
}

pub fn profile() -> RepProfile {
    RepProfile {
        exercise: ExerciseKind::Lunge,
        joint: AngleKind::Knee,
        thresholds: RepThresholds {
            visibility_floor: 0.35,
            smoothing_window: 6,
            confirm_frames: 4,
            active_angle: 110.0,
            baseline_angle: 170.0,
            best_angle: 100.0,
            worst_angle: 170.0,
        },
        measure,
        phrases: RepPhrases {
            entering: "Lunge down",
            holding: "Holding down",
            returning: "Returning",
            neutral,
        },
    }
}
