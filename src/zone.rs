// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Anatomical zones of the 33-point pose landmark layout.
//!
//! Zone membership is purely positional: the detection model always emits
//! landmarks in the same order, so the index of a landmark in its sequence
//! decides which part of the body it belongs to.

use std::fmt;
use std::ops::RangeInclusive;

use crate::visualizer::Color;

/// Anatomical zone of a pose landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Face landmarks: nose, eyes, ears, mouth (indices 0–10).
    Head,
    /// Shoulders, arms and hands (indices 11–22).
    MidBody,
    /// Hips, knees and ankles (indices 23–28).
    LowerBody,
    /// Heels and foot tips (indices 29–32).
    Feet,
}

impl Zone {
    /// All zones in landmark order.
    pub const ALL: [Self; 4] = [Self::Head, Self::MidBody, Self::LowerBody, Self::Feet];

    /// Inclusive landmark index range covered by this zone.
    #[must_use]
    pub const fn index_range(&self) -> RangeInclusive<usize> {
        match self {
            Self::Head => 0..=10,
            Self::MidBody => 11..=22,
            Self::LowerBody => 23..=28,
            Self::Feet => 29..=32,
        }
    }

    /// Marker color used when drawing landmarks of this zone.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self {
            Self::Head => Color::RED,
            Self::MidBody => Color::GREEN,
            Self::LowerBody => Color::BLUE,
            Self::Feet => Color::MAGENTA,
        }
    }

    /// Returns the string representation used in logs and summaries.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::MidBody => "mid_body",
            Self::LowerBody => "lower_body",
            Self::Feet => "feet",
        }
    }

    /// Number of landmarks belonging to this zone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index_range().count()
    }

    /// Whether the zone covers no landmarks. Always `false` for the 33-point layout.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify a landmark by its position in the sequence.
///
/// Returns `None` for indices past the last landmark (32), which callers
/// holding a full [`LandmarkSequence`](crate::LandmarkSequence) never produce.
#[must_use]
pub fn zone_for_index(index: usize) -> Option<Zone> {
    match index {
        0..=10 => Some(Zone::Head),
        11..=22 => Some(Zone::MidBody),
        23..=28 => Some(Zone::LowerBody),
        29..=32 => Some(Zone::Feet),
        _ => None,
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
