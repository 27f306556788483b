//! Fundamental types for the formcheck system.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Identifier for one recorded workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Timestamp wrapper with nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    /// Milliseconds elapsed since `earlier`, floored at zero
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0).max(0) / 1_000_000
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }

    /// ISO-8601 representation, as stored in per-rep records
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime().to_rfc3339()
    }

    pub fn parse_rfc3339(s: &str) -> crate::Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(s)
            .map_err(|e| Error::InvalidInput(format!("bad timestamp {s:?}: {e}")))?;
        parsed
            .timestamp_nanos_opt()
            .map(Self)
            .ok_or_else(|| Error::InvalidInput(format!("timestamp {s:?} out of range")))
    }
}

/// Serde adapter writing a [`Timestamp`] as an RFC 3339 string.
///
/// Use with `#[serde(with = "formcheck_core::rfc3339")]`.
pub mod rfc3339 {
    use super::Timestamp;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse_rfc3339(&s).map_err(de::Error::custom)
    }

    /// Same as the parent module, for `Option<Timestamp>`
    pub mod option {
        use super::Timestamp;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<Timestamp>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Timestamp>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| Timestamp::parse_rfc3339(&s).map_err(de::Error::custom))
                .transpose()
        }
    }
}

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 33-point body landmark index scheme (BlazePose topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Landmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Landmark {
    pub const COUNT: usize = 33;

    pub const ALL: [Landmark; Landmark::COUNT] = [
        Landmark::Nose,
        Landmark::LeftEyeInner,
        Landmark::LeftEye,
        Landmark::LeftEyeOuter,
        Landmark::RightEyeInner,
        Landmark::RightEye,
        Landmark::RightEyeOuter,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::MouthLeft,
        Landmark::MouthRight,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftPinky,
        Landmark::RightPinky,
        Landmark::LeftIndex,
        Landmark::RightIndex,
        Landmark::LeftThumb,
        Landmark::RightThumb,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
        Landmark::LeftHeel,
        Landmark::RightHeel,
        Landmark::LeftFootIndex,
        Landmark::RightFootIndex,
    ];

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftShoulder,
            Side::Right => Landmark::RightShoulder,
        }
    }

    pub fn elbow(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftElbow,
            Side::Right => Landmark::RightElbow,
        }
    }

    pub fn wrist(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftWrist,
            Side::Right => Landmark::RightWrist,
        }
    }

    pub fn hip(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftHip,
            Side::Right => Landmark::RightHip,
        }
    }

    pub fn knee(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftKnee,
            Side::Right => Landmark::RightKnee,
        }
    }

    pub fn ankle(side: Side) -> Self {
        match side {
            Side::Left => Landmark::LeftAnkle,
            Side::Right => Landmark::RightAnkle,
        }
    }
}

/// A single estimated joint position with its detection confidence.
///
/// `x`/`y` are in the pixel space of the frame the gate is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Confidence in [0, 1]
    pub visibility: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    /// 2D keypoint with full confidence
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }
}

/// One frame of pose estimates: 33 optional keypoints plus capture time
#[derive(Debug, Clone, PartialEq)]
pub struct PoseFrame {
    pub timestamp: Timestamp,
    pub keypoints: [Option<Keypoint>; Landmark::COUNT],
}

impl PoseFrame {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            keypoints: [None; Landmark::COUNT],
        }
    }

    /// Build a frame from an index-ordered slice; entries past 33 are rejected
    pub fn from_slice(timestamp: Timestamp, keypoints: &[Option<Keypoint>]) -> crate::Result<Self> {
        if keypoints.len() > Landmark::COUNT {
            return Err(Error::InvalidInput(format!(
                "expected at most {} keypoints, got {}",
                Landmark::COUNT,
                keypoints.len()
            )));
        }

        let mut frame = Self::new(timestamp);
        frame.keypoints[..keypoints.len()].copy_from_slice(keypoints);
        Ok(frame)
    }

    pub fn with(mut self, landmark: Landmark, keypoint: Keypoint) -> Self {
        self.set(landmark, keypoint);
        self
    }

    pub fn set(&mut self, landmark: Landmark, keypoint: Keypoint) {
        self.keypoints[landmark.index()] = Some(keypoint);
    }

    pub fn get(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.keypoints[landmark.index()].as_ref()
    }

    /// Keypoint if present with visibility at or above `floor`
    pub fn visible(&self, landmark: Landmark, floor: f64) -> Option<&Keypoint> {
        self.get(landmark).filter(|kp| kp.visibility >= floor)
    }

    /// True when the pose source reported no landmarks at all
    pub fn is_empty(&self) -> bool {
        self.keypoints.iter().all(Option::is_none)
    }

    pub fn present(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.iter().flatten()
    }
}

/// Portion of the body a frame must show for an exercise to be tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyRegion {
    UpperBody,
    FullBody,
}

/// Exercise selected by the user; never inferred from motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    #[serde(alias = "bicep")]
    BicepCurl,
    Squat,
    #[serde(alias = "pushup")]
    PushUp,
    Lunge,
    Plank,
    #[serde(alias = "tree")]
    TreePose,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 6] = [
        ExerciseKind::BicepCurl,
        ExerciseKind::Squat,
        ExerciseKind::PushUp,
        ExerciseKind::Lunge,
        ExerciseKind::Plank,
        ExerciseKind::TreePose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::BicepCurl => "bicep_curl",
            ExerciseKind::Squat => "squat",
            ExerciseKind::PushUp => "push_up",
            ExerciseKind::Lunge => "lunge",
            ExerciseKind::Plank => "plank",
            ExerciseKind::TreePose => "tree_pose",
        }
    }

    /// Human-readable name stored with saved sessions
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseKind::BicepCurl => "Bicep Curl",
            ExerciseKind::Squat => "Squat",
            ExerciseKind::PushUp => "Push-Ups",
            ExerciseKind::Lunge => "Lunges",
            ExerciseKind::Plank => "Plank",
            ExerciseKind::TreePose => "Tree Pose",
        }
    }

    pub fn body_region(&self) -> BodyRegion {
        match self {
            ExerciseKind::BicepCurl => BodyRegion::UpperBody,
            _ => BodyRegion::FullBody,
        }
    }

    /// Hold exercises are timed instead of counted
    pub fn is_hold(&self) -> bool {
        matches!(self, ExerciseKind::Plank | ExerciseKind::TreePose)
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bicep" | "bicep_curl" => Ok(ExerciseKind::BicepCurl),
            "squat" => Ok(ExerciseKind::Squat),
            "pushup" | "push_up" => Ok(ExerciseKind::PushUp),
            "lunge" => Ok(ExerciseKind::Lunge),
            "plank" => Ok(ExerciseKind::Plank),
            "tree" | "tree_pose" => Ok(ExerciseKind::TreePose),
            _ => Err(Error::UnknownExercise(s.to_string())),
        }
    }
}
