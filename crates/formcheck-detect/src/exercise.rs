//! Exercise selection.
//!
//! [`ExerciseDetector`] owns exactly one per-exercise state machine and
//! dispatches frames to it. Unknown exercise names are rejected at
//! construction instead of falling back to any default.

use formcheck_core::{BodyRegion, ExerciseKind, PoseFrame, Result};

use crate::detector::{Detector, DetectorOutput};
use crate::exercises;
use crate::hold::{HoldDetector, HoldProfile};
use crate::rep::{RepDetector, RepProfile};

/// Profile of either detector family
#[derive(Debug, Clone, Copy)]
pub enum Profile {
    Rep(RepProfile),
    Hold(HoldProfile),
}

impl Profile {
    pub fn for_exercise(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::BicepCurl => Profile::Rep(exercises::bicep_curl::profile()),
            ExerciseKind::Squat => Profile::Rep(exercises::squat::profile()),
            ExerciseKind::PushUp => Profile::Rep(exercises::push_up::profile()),
            ExerciseKind::Lunge => Profile::Rep(exercises::lunge::profile()),
            ExerciseKind::Plank => Profile::Hold(exercises::plank::profile()),
            ExerciseKind::TreePose => Profile::Hold(exercises::tree_pose::profile()),
        }
    }

    /// Replace the trailing smoothing window, e.g. with the fast 3-sample setting
    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        match &mut self {
            Profile::Rep(p) => p.thresholds.smoothing_window = window,
            Profile::Hold(p) => p.thresholds.smoothing_window = window,
        }
        self
    }
}

#[derive(Debug, Clone)]
pub enum ExerciseDetector {
    Rep(RepDetector),
    Hold(HoldDetector),
}

impl ExerciseDetector {
    pub fn new(profile: Profile) -> Result<Self> {
        Ok(match profile {
            Profile::Rep(p) => ExerciseDetector::Rep(RepDetector::new(p)?),
            Profile::Hold(p) => ExerciseDetector::Hold(HoldDetector::new(p)?),
        })
    }

    pub fn for_exercise(kind: ExerciseKind) -> Result<Self> {
        Self::new(Profile::for_exercise(kind))
    }

    /// Build from a UI identifier such as `"bicep"` or `"tree_pose"`
    pub fn from_name(name: &str) -> Result<Self> {
        Self::for_exercise(name.parse()?)
    }

    pub fn exercise(&self) -> ExerciseKind {
        match self {
            ExerciseDetector::Rep(d) => d.exercise(),
            ExerciseDetector::Hold(d) => d.exercise(),
        }
    }

    pub fn body_region(&self) -> BodyRegion {
        self.exercise().body_region()
    }
}

impl Detector for ExerciseDetector {
    type Output = DetectorOutput;

    fn update(&mut self, frame: &PoseFrame) -> DetectorOutput {
        match self {
            ExerciseDetector::Rep(d) => d.update(frame).into(),
            ExerciseDetector::Hold(d) => d.update(frame).into(),
        }
    }

    fn reset(&mut self) {
        match self {
            ExerciseDetector::Rep(d) => d.reset(),
            ExerciseDetector::Hold(d) => d.reset(),
        }
    }
}
