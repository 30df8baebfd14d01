// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Detection configuration.
//!
//! This module defines the [`DetectionConfig`] struct, which carries the
//! parameters handed to the landmark source: confidence thresholds, model
//! complexity, where model files live and how many threads ONNX Runtime may use.

use std::path::{Path, PathBuf};

use crate::complexity::ModelComplexity;
use crate::error::{PoseError, Result};

/// Default directory searched for `pose_landmark_*.onnx` files.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Configuration for pose landmark detection.
///
/// # Example
///
/// ```rust
/// use pose_landmarks::{DetectionConfig, ModelComplexity};
///
/// let config = DetectionConfig::new()
///     .with_min_detection_confidence(0.6)
///     .with_min_tracking_confidence(0.5)
///     .with_model_complexity(ModelComplexity::Heavy);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Minimum pose-presence score (0.0 to 1.0) for a person to count as detected.
    pub min_detection_confidence: f32,
    /// Minimum tracking score (0.0 to 1.0).
    /// Only meaningful across consecutive frames; a single image never tracks.
    pub min_tracking_confidence: f32,
    /// Which landmark model variant to load.
    pub model_complexity: ModelComplexity,
    /// Directory holding the ONNX model files.
    pub model_dir: PathBuf,
    /// Number of intra-op threads for ONNX Runtime.
    /// Setting this to `0` allows ONNX Runtime to choose the optimal number.
    pub num_threads: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            model_complexity: ModelComplexity::Full,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            num_threads: 0,
        }
    }
}

impl DetectionConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum detection confidence.
    #[must_use]
    pub const fn with_min_detection_confidence(mut self, threshold: f32) -> Self {
        self.min_detection_confidence = threshold;
        self
    }

    /// Set the minimum tracking confidence.
    #[must_use]
    pub const fn with_min_tracking_confidence(mut self, threshold: f32) -> Self {
        self.min_tracking_confidence = threshold;
        self
    }

    /// Select the model variant.
    #[must_use]
    pub const fn with_model_complexity(mut self, complexity: ModelComplexity) -> Self {
        self.model_complexity = complexity;
        self
    }

    /// Set the directory containing the model files.
    #[must_use]
    pub fn with_model_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.model_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the number of threads for inference.
    ///
    /// # Arguments
    ///
    /// * `threads` - The number of intra-op threads. Set to `0` for auto-configuration.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Full path of the model file selected by `model_complexity`.
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(self.model_complexity.model_file())
    }

    /// Check that both confidence thresholds are finite and inside `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] naming the offending parameter.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("min_detection_confidence", self.min_detection_confidence)?;
        check_unit_interval("min_tracking_confidence", self.min_tracking_confidence)
    }
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PoseError::ConfigError(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = DetectionConfig::default();
        assert!((config.min_detection_confidence - 0.5).abs() < f32::EPSILON);
        assert!((config.min_tracking_confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.model_complexity, ModelComplexity::Full);
        assert_eq!(config.num_threads, 0);
        assert_eq!(
            config.model_path(),
            Path::new("models").join("pose_landmark_full.onnx")
        );
    }

    #[test]
    fn test_config_builder() {
        let config = DetectionConfig::new()
            .with_min_detection_confidence(0.7)
            .with_min_tracking_confidence(0.2)
            .with_model_complexity(ModelComplexity::Lite)
            .with_model_dir("/opt/pose")
            .with_threads(4);

        assert!((config.min_detection_confidence - 0.7).abs() < f32::EPSILON);
        assert!((config.min_tracking_confidence - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.num_threads, 4);
        assert_eq!(
            config.model_path(),
            Path::new("/opt/pose").join("pose_landmark_lite.onnx")
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(DetectionConfig::new().validate().is_ok());
        assert!(
            DetectionConfig::new()
                .with_min_detection_confidence(0.0)
                .with_min_tracking_confidence(1.0)
                .validate()
                .is_ok()
        );

        let err = DetectionConfig::new()
            .with_min_detection_confidence(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PoseError::ConfigError(ref m) if m.contains("min_detection_confidence")));

        let err = DetectionConfig::new()
            .with_min_tracking_confidence(f32::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PoseError::ConfigError(ref m) if m.contains("min_tracking_confidence")));
    }
}
