//! Bodyweight squat, both knees averaged.

use formcheck_core::{ExerciseKind, Landmark, PoseFrame, Side};

use crate::detector::AngleKind;
use crate::measure::{average_sides, limb_angle, Measurement};
use crate::rep::{RepPhrases, RepProfile, RepThresholds};

fn measure(frame: &PoseFrame, floor: f64) -> Result<Measurement, &'static str> {
    let hips_visible = [Side::Left, Side::Right]
        .iter()
        .any(|&side| frame.visible(Landmark::hip(side), floor).is_some());
    if !hips_visible {
        return Err("Show hips/legs");
    }

    // Knee points carry no visibility requirement once a hip is trusted
    let knee = |side| {
        limb_angle(
            frame,
            [Landmark::hip(side), Landmark::knee(side), Landmark::ankle(side)],
            Landmark::knee(side),
            0.0,
        )
    };

    average_sides(knee(Side::Left), knee(Side::Right))
        .map(Measurement::new)
        .ok_or("Show knees/ankles")
}

fn neutral(_: &Measurement, angle: f64, _: u8) -> String {
    format!("Knee {}°", angle.round())
}

pub fn profile() -> RepProfile {
    RepProfile {
        exercise: ExerciseKind::Squat,
        joint: AngleKind::Knee,
        thresholds: RepThresholds {
            visibility_floor: 0.35,
            smoothing_window: 6,
            confirm_frames: 4,
            active_angle: 110.0,
            baseline_angle: 165.0,
            best_angle: 95.0,
            worst_angle: 170.0,
        },
        measure,
        phrases: RepPhrases {
            entering: "Squat down",
            holding: "Holding down",
            returning: "Standing",
            neutral,
        },
    }
}
