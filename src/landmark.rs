// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose landmark data types.
//!
//! The landmark model always emits [`LANDMARK_COUNT`] points in a fixed
//! anatomical order. [`PoseLandmark`] names each position, and
//! [`LandmarkSequence`] guarantees the count so that positional lookups
//! (zone classification, skeleton indexing) can never go out of range.

use std::fmt;
use std::ops::Deref;

use crate::error::{PoseError, Result};
use crate::zone::{Zone, zone_for_index};

/// Number of landmarks produced for one detected person.
pub const LANDMARK_COUNT: usize = 33;

/// A single detected body point.
///
/// `x` and `y` are normalized to `[0, 1]` by image width and height. `z` is
/// depth relative to the hips on roughly the same scale as `x`. `visibility`
/// is the model's confidence that the point is visible and is not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// Normalized horizontal position.
    pub x: f32,
    /// Normalized vertical position.
    pub y: f32,
    /// Normalized depth.
    pub z: f32,
    /// Visibility confidence.
    pub visibility: f32,
}

impl Landmark {
    /// Create a new landmark.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    /// Whether `x` and `y` fall inside the image.
    #[must_use]
    pub fn is_in_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Named identity of each landmark position, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl PoseLandmark {
    /// Every landmark identity, indexed by position.
    pub const ALL: [Self; LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Position of this landmark in the model output.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Identity at a given position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Anatomical zone this landmark belongs to.
    #[must_use]
    pub fn zone(self) -> Zone {
        // ALL only holds indices 0..LANDMARK_COUNT, each of which classifies.
        zone_for_index(self.index()).unwrap_or(Zone::Feet)
    }

    /// Snake-case name, e.g. `left_shoulder`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for PoseLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The full, ordered set of landmarks for one detected person.
///
/// Always holds exactly [`LANDMARK_COUNT`] entries. There is no way to
/// reorder or resize it after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSequence {
    landmarks: Vec<Landmark>,
}

impl LandmarkSequence {
    /// Build a sequence, rejecting anything but exactly 33 landmarks.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidLandmarkCount`] on a length mismatch.
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self> {
        if landmarks.len() != LANDMARK_COUNT {
            return Err(PoseError::InvalidLandmarkCount {
                expected: LANDMARK_COUNT,
                actual: landmarks.len(),
            });
        }
        Ok(Self { landmarks })
    }

    /// Landmark for a named identity.
    #[must_use]
    pub fn get(&self, landmark: PoseLandmark) -> &Landmark {
        &self.landmarks[landmark.index()]
    }

    /// Iterate `(identity, landmark)` pairs in sequence order.
    pub fn iter_named(&self) -> impl Iterator<Item = (PoseLandmark, &Landmark)> {
        PoseLandmark::ALL.into_iter().zip(self.landmarks.iter())
    }

    /// Landmarks belonging to one zone, in sequence order.
    pub fn zone(&self, zone: Zone) -> impl Iterator<Item = &Landmark> {
        self.landmarks[zone.index_range()].iter()
    }

    /// Borrow as a plain slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Consume into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Landmark> {
        self.landmarks
    }
}

impl Deref for LandmarkSequence {
    type Target = [Landmark];

    fn deref(&self) -> &Self::Target {
        &self.landmarks
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSequence {
    type Error = PoseError;

    fn try_from(landmarks: Vec<Landmark>) -> Result<Self> {
        Self::new(landmarks)
    }
}

impl<'a> IntoIterator for &'a LandmarkSequence {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.landmarks.iter()
    }
}
