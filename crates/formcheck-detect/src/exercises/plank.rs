//! Forearm or high plank, held on a straight shoulder-hip-ankle line.

use formcheck_core::{ExerciseKind, PoseFrame, Side};

use crate::detector::AngleKind;
use crate::hold::{HoldPhrases, HoldProfile, HoldThresholds};
use crate::measure::{average_sides, torso_angle, Measurement};

fn measure(frame: &PoseFrame, floor: f64) -> Result<Measurement, &'static str> {
    average_sides(
        torso_angle(frame, Side::Left, floor),
        torso_angle(frame, Side::Right, floor),
    )
    .map(Measurement::new)
    .ok_or("Show torso")
}

fn holding(seconds: u64, _: Option<Side>) -> String {
    format!("Holding - {seconds}s")
}

/// A perfectly straight body scores 100; a 20° sag or pike scores 0.
pub fn profile() -> HoldProfile {
    HoldProfile {
        exercise: ExerciseKind::Plank,
        joint: AngleKind::Body,
        thresholds: HoldThresholds {
            visibility_floor: 0.35,
            smoothing_window: 6,
            best_angle: 180.0,
            worst_angle: 160.0,
            hold_score: 40,
        },
        measure,
        phrases: HoldPhrases {
            holding,
            unsteady: "Plank not steady",
        },
    }
}
