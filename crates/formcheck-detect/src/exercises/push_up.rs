//! Push-up, both elbows averaged.

use formcheck_core::{ExerciseKind, PoseFrame, Side};

use crate::detector::AngleKind;
use crate::measure::{average_sides, elbow_angle, Measurement};
use crate::rep::{RepPhrases, RepProfile, RepThresholds};

fn measure(frame: &PoseFrame, floor: f64) -> Result<Measurement, &'static str> {
    average_sides(
        elbow_angle(frame, Side::Left, floor),
        elbow_angle(frame, Side::Right, floor),
    )
    .map(Measurement::new)
    .ok_or("Show arms/torso")
}

fn neutral(_: &Measurement, angle: f64, _: u8) -> String {
    format!("Elbow {}°", angle.round())
}

pub fn profile() -> RepProfile {
    RepProfile {
        exercise: ExerciseKind::PushUp,
        joint: AngleKind::Elbow,
        thresholds: RepThresholds {
            visibility_floor: 0.35,
            smoothing_window: 6,
            confirm_frames: 3,
            active_angle: 90.0,
            baseline_angle: 160.0,
            best_angle: 65.0,
            worst_angle: 165.0,
        },
        measure,
        phrases: RepPhrases {
            entering: "Bottom",
            holding: "Lowering",
            returning: "Rising",
            neutral,
        },
    }
}
