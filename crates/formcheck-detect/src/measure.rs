//! Raw angle measurement from pose frames.
//!
//! Each exercise supplies a [`MeasureFn`] that turns a frame into one raw
//! joint angle, or names the body part it could not see.

use formcheck_core::{angle_at, Landmark, PoseFrame, Side};

/// One raw (unsmoothed) angle observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub degrees: f64,
    /// Leg the angle was taken from, when an exercise picks one side
    pub leg: Option<Side>,
}

impl Measurement {
    pub fn new(degrees: f64) -> Self {
        Self { degrees, leg: None }
    }

    pub fn on_leg(degrees: f64, leg: Side) -> Self {
        Self {
            degrees,
            leg: Some(leg),
        }
    }
}

/// Extracts a measurement given the exercise's visibility floor.
///
/// `Err` carries the corrective message for the missing body part.
pub type MeasureFn = fn(&PoseFrame, f64) -> Result<Measurement, &'static str>;

/// Angle at `joint[1]` if all three landmarks are present and `gate` clears
/// the visibility floor
pub(crate) fn limb_angle(
    frame: &PoseFrame,
    joint: [Landmark; 3],
    gate: Landmark,
    floor: f64,
) -> Option<f64> {
    frame.visible(gate, floor)?;
    let a = frame.get(joint[0])?;
    let b = frame.get(joint[1])?;
    let c = frame.get(joint[2])?;
    Some(angle_at(a, b, c))
}

/// Elbow angle (shoulder-elbow-wrist) gated on shoulder visibility
pub(crate) fn elbow_angle(frame: &PoseFrame, side: Side, floor: f64) -> Option<f64> {
    limb_angle(
        frame,
        [Landmark::shoulder(side), Landmark::elbow(side), Landmark::wrist(side)],
        Landmark::shoulder(side),
        floor,
    )
}

/// Knee angle (hip-knee-ankle) gated on hip visibility
pub(crate) fn knee_angle(frame: &PoseFrame, side: Side, floor: f64) -> Option<f64> {
    limb_angle(
        frame,
        [Landmark::hip(side), Landmark::knee(side), Landmark::ankle(side)],
        Landmark::hip(side),
        floor,
    )
}

/// Torso line (shoulder-hip-ankle) gated on shoulder visibility
pub(crate) fn torso_angle(frame: &PoseFrame, side: Side, floor: f64) -> Option<f64> {
    limb_angle(
        frame,
        [Landmark::shoulder(side), Landmark::hip(side), Landmark::ankle(side)],
        Landmark::shoulder(side),
        floor,
    )
}

/// Mean of whichever sides are available
pub(crate) fn average_sides(left: Option<f64>, right: Option<f64>) -> Option<f64> {
    match (left, right) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        (l, r) => l.or(r),
    }
}
