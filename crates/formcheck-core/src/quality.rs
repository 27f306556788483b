//! Frame quality gate.
//!
//! Decides whether a pose frame shows enough of the body, large enough in the
//! image, for a detector to trust it. Callers must not advance any exercise
//! state for a frame that fails the gate.

use crate::geometry::BoundingBox2D;
use crate::types::{BodyRegion, Keypoint, Landmark, PoseFrame};

/// Torso landmarks every full-body frame must contain
const TORSO: [Landmark; 4] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftHip,
    Landmark::RightHip,
];

const LEGS: [Landmark; 4] = [
    Landmark::LeftKnee,
    Landmark::RightKnee,
    Landmark::LeftAnkle,
    Landmark::RightAnkle,
];

const ARMS: [Landmark; 6] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
    Landmark::LeftWrist,
    Landmark::RightWrist,
];

const FULL_BODY_VISIBILITY: f64 = 0.4;
const FULL_BODY_MIN_LANDMARKS: usize = 6;
const FULL_BODY_MIN_AREA_RATIO: f64 = 0.025;

const UPPER_BODY_VISIBILITY: f64 = 0.45;
const UPPER_BODY_BOX_VISIBILITY: f64 = 0.3;
const UPPER_BODY_MIN_LANDMARKS: usize = 4;
const UPPER_BODY_MIN_AREA_RATIO: f64 = 0.01;

/// Full-body check: torso, at least one leg point, enough landmarks, and a
/// person covering more than 2.5% of the frame.
pub fn sufficient_full_body(frame: &PoseFrame, width: u32, height: u32) -> bool {
    let torso_ok = TORSO
        .iter()
        .all(|&lm| frame.visible(lm, FULL_BODY_VISIBILITY).is_some());
    if !torso_ok {
        return false;
    }

    let leg_visible = LEGS
        .iter()
        .filter_map(|&lm| frame.get(lm))
        .any(|kp| kp.visibility > FULL_BODY_VISIBILITY);
    if !leg_visible {
        return false;
    }

    let visible: Vec<&Keypoint> = frame
        .present()
        .filter(|kp| kp.visibility > FULL_BODY_VISIBILITY)
        .collect();
    if visible.len() < FULL_BODY_MIN_LANDMARKS {
        return false;
    }

    area_ratio(visible, width, height).is_some_and(|r| r > FULL_BODY_MIN_AREA_RATIO)
}

/// Upper-body check: four of the six arm landmarks, covering more than 1% of
/// the frame.
pub fn sufficient_upper_body(frame: &PoseFrame, width: u32, height: u32) -> bool {
    let arm_points: Vec<&Keypoint> = ARMS.iter().filter_map(|&lm| frame.get(lm)).collect();

    let confident = arm_points
        .iter()
        .filter(|kp| kp.visibility > UPPER_BODY_VISIBILITY)
        .count();
    if confident < UPPER_BODY_MIN_LANDMARKS {
        return false;
    }

    let boxed = arm_points
        .into_iter()
        .filter(|kp| kp.visibility > UPPER_BODY_BOX_VISIBILITY);

    area_ratio(boxed, width, height).is_some_and(|r| r > UPPER_BODY_MIN_AREA_RATIO)
}

/// Dispatch to the predicate for `region`
pub fn sufficient_for(region: BodyRegion, frame: &PoseFrame, width: u32, height: u32) -> bool {
    match region {
        BodyRegion::UpperBody => sufficient_upper_body(frame, width, height),
        BodyRegion::FullBody => sufficient_full_body(frame, width, height),
    }
}

/// Corrective message shown when a frame fails the gate for `region`
pub fn framing_hint(region: BodyRegion) -> &'static str {
    match region {
        BodyRegion::UpperBody => "Bring your upper body into frame",
        BodyRegion::FullBody => "Move whole body into frame",
    }
}

fn area_ratio<'a, I>(points: I, width: u32, height: u32) -> Option<f64>
where
    I: IntoIterator<Item = &'a Keypoint>,
{
    let frame_area = f64::from(width) * f64::from(height);
    if frame_area <= 0.0 {
        return None;
    }
    BoundingBox2D::from_points(points).map(|bbox| bbox.area() / frame_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timestamp;

    const W: u32 = 640;
    const H: u32 = 480;

    fn standing_person(visibility: f64) -> PoseFrame {
        let pts = [
            (Landmark::Nose, 320.0, 60.0),
            (Landmark::LeftShoulder, 280.0, 120.0),
            (Landmark::RightShoulder, 360.0, 120.0),
            (Landmark::LeftElbow, 270.0, 190.0),
            (Landmark::RightElbow, 370.0, 190.0),
            (Landmark::LeftWrist, 265.0, 250.0),
            (Landmark::RightWrist, 375.0, 250.0),
            (Landmark::LeftHip, 290.0, 260.0),
            (Landmark::RightHip, 350.0, 260.0),
            (Landmark::LeftKnee, 290.0, 350.0),
            (Landmark::RightKnee, 350.0, 350.0),
            (Landmark::LeftAnkle, 290.0, 440.0),
            (Landmark::RightAnkle, 350.0, 440.0),
        ];

        let mut frame = PoseFrame::new(Timestamp::from_millis(0));
        for (lm, x, y) in pts {
            frame.set(lm, Keypoint::new(x, y, 0.0, visibility));
        }
        frame
    }

    #[test]
    fn test_full_body_passes() {
        assert!(sufficient_full_body(&standing_person(0.9), W, H));
    }

    #[test]
    fn test_full_body_requires_torso() {
        let mut frame = standing_person(0.9);
        frame.keypoints[Landmark::RightHip.index()] = None;
        assert!(!sufficient_full_body(&frame, W, H));

        let mut frame = standing_person(0.9);
        frame.set(Landmark::LeftShoulder, Keypoint::new(280.0, 120.0, 0.0, 0.39));
        assert!(!sufficient_full_body(&frame, W, H));
    }

    #[test]
    fn test_full_body_torso_visibility_boundary_inclusive() {
        let mut frame = standing_person(0.9);
        frame.set(Landmark::LeftShoulder, Keypoint::new(280.0, 120.0, 0.0, 0.4));
        assert!(sufficient_full_body(&frame, W, H));
    }

    #[test]
    fn test_full_body_requires_a_leg() {
        let mut frame = standing_person(0.9);
        for lm in LEGS {
            frame.set(lm, Keypoint::new(300.0, 400.0, 0.0, 0.4));
        }
        assert!(!sufficient_full_body(&frame, W, H));
    }

    #[test]
    fn test_full_body_rejects_tiny_person() {
        let mut frame = PoseFrame::new(Timestamp::from_millis(0));
        for (i, lm) in [
            Landmark::LeftShoulder,
            Landmark::RightShoulder,
            Landmark::LeftHip,
            Landmark::RightHip,
            Landmark::LeftKnee,
            Landmark::RightKnee,
        ]
        .into_iter()
        .enumerate()
        {
            let offset = i as f64 * 5.0;
            frame.set(lm, Keypoint::new(100.0 + offset, 100.0 + offset, 0.0, 0.9));
        }
        // 25x25 box: ~0.2% of a 640x480 frame
        assert!(!sufficient_full_body(&frame, W, H));
    }

    #[test]
    fn test_upper_body_passes_with_four_arm_points() {
        let mut frame = standing_person(0.9);
        frame.keypoints[Landmark::LeftWrist.index()] = None;
        frame.set(Landmark::RightWrist, Keypoint::new(375.0, 250.0, 0.0, 0.2));
        assert!(sufficient_upper_body(&frame, W, H));
    }

    #[test]
    fn test_upper_body_needs_four_confident_points() {
        let frame = standing_person(0.45);
        assert!(!sufficient_upper_body(&frame, W, H));
    }

    #[test]
    fn test_upper_body_rejects_tiny_arms() {
        let mut frame = PoseFrame::new(Timestamp::from_millis(0));
        for (i, lm) in ARMS.into_iter().enumerate() {
            let offset = (i % 3) as f64 * 10.0;
            frame.set(lm, Keypoint::new(300.0 + offset, 200.0 + offset, 0.0, 0.9));
        }
        // 20x20 box: ~0.13% of a 640x480 frame
        assert!(!sufficient_upper_body(&frame, W, H));

        // Same points on a small frame clear the 1% floor
        assert!(sufficient_upper_body(&frame, 160, 120));
    }

    #[test]
    fn test_zero_sized_frame_rejected() {
        let frame = standing_person(0.9);
        assert!(!sufficient_full_body(&frame, 0, H));
        assert!(!sufficient_upper_body(&frame, W, 0));
    }

    #[test]
    fn test_region_dispatch() {
        let frame = standing_person(0.9);
        assert!(sufficient_for(BodyRegion::FullBody, &frame, W, H));
        assert!(sufficient_for(BodyRegion::UpperBody, &frame, W, H));
        assert_eq!(framing_hint(BodyRegion::UpperBody), "Bring your upper body into frame");
    }
}
