// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Model complexity selection.
//!
//! The pose landmark model ships in three sizes that trade inference cost for
//! accuracy. The selector maps the conventional `0 | 1 | 2` setting onto the
//! model file to load.

use std::fmt;
use std::str::FromStr;

/// Pose landmark model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelComplexity {
    /// Smallest and fastest model (`0`).
    Lite,
    /// Balanced model (`1`).
    #[default]
    Full,
    /// Largest and most accurate model (`2`).
    Heavy,
}

impl ModelComplexity {
    /// Returns the string representation used in file names and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lite => "lite",
            Self::Full => "full",
            Self::Heavy => "heavy",
        }
    }

    /// Numeric level (0, 1 or 2).
    #[must_use]
    pub const fn level(&self) -> u8 {
        match self {
            Self::Lite => 0,
            Self::Full => 1,
            Self::Heavy => 2,
        }
    }

    /// File name of the ONNX model for this variant.
    #[must_use]
    pub fn model_file(&self) -> String {
        format!("pose_landmark_{}.onnx", self.as_str())
    }
}

impl fmt::Display for ModelComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for ModelComplexity {
    type Error = ComplexityParseError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Lite),
            1 => Ok(Self::Full),
            2 => Ok(Self::Heavy),
            other => Err(ComplexityParseError(other.to_string())),
        }
    }
}

impl FromStr for ModelComplexity {
    type Err = ComplexityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "lite" => Ok(Self::Lite),
            "1" | "full" => Ok(Self::Full),
            "2" | "heavy" => Ok(Self::Heavy),
            _ => Err(ComplexityParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid complexity value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityParseError(String);

impl fmt::Display for ComplexityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid model complexity '{}', expected one of: 0, 1, 2 (lite, full, heavy)",
            self.0
        )
    }
}

impl std::error::Error for ComplexityParseError {}
