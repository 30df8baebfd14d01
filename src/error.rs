// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose landmark library.

use std::fmt;

/// Result type alias for pose landmark operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Coarse failure category, used by callers that only need to know why an
/// extraction or export did not produce output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The input image could not be found or opened.
    NotFound,
    /// The landmark source ran but found no person in the image.
    NoSubject,
    /// Decoding, model or annotation fault.
    ProcessingFault,
    /// Writing results to disk failed.
    Export,
}

impl FailureKind {
    /// Returns the short name used in log output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::NoSubject => "no-subject",
            Self::ProcessingFault => "processing-fault",
            Self::Export => "export-fault",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the pose landmark library.
#[derive(Debug)]
pub enum PoseError {
    /// Input image path does not resolve to a readable file.
    ImageNotFound(String),
    /// The landmark source found no person in the image.
    NoSubjectDetected,
    /// Error decoding or converting images.
    ImageError(String),
    /// Error loading the ONNX model.
    ModelLoadError(String),
    /// Error during model inference.
    InferenceError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// A landmark sequence was built from the wrong number of points.
    InvalidLandmarkCount {
        /// Number of landmarks required.
        expected: usize,
        /// Number of landmarks supplied.
        actual: usize,
    },
    /// IO error while writing results (directory creation, file write).
    IoError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
    /// Malformed exported data.
    ExportError(String),
}

impl PoseError {
    /// Classify this error into a [`FailureKind`].
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ImageNotFound(_) => FailureKind::NotFound,
            Self::NoSubjectDetected => FailureKind::NoSubject,
            Self::ImageError(_)
            | Self::ModelLoadError(_)
            | Self::InferenceError(_)
            | Self::ConfigError(_)
            | Self::InvalidLandmarkCount { .. } => FailureKind::ProcessingFault,
            Self::IoError(_) | Self::Io(_) | Self::ExportError(_) => FailureKind::Export,
        }
    }
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageNotFound(path) => write!(f, "Image not found: {path}"),
            Self::NoSubjectDetected => write!(f, "No pose detected in image"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::InvalidLandmarkCount { expected, actual } => {
                write!(f, "Expected {expected} landmarks, got {actual}")
            }
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::ExportError(msg) => write!(f, "Export error: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for PoseError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::ModelLoadError("test".to_string());
        assert_eq!(err.to_string(), "Model load error: test");

        let err = PoseError::InvalidLandmarkCount {
            expected: 33,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Expected 33 landmarks, got 2");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            PoseError::ImageNotFound("a.jpg".into()).kind(),
            FailureKind::NotFound
        );
        assert_eq!(PoseError::NoSubjectDetected.kind(), FailureKind::NoSubject);
        assert_eq!(
            PoseError::InferenceError("boom".into()).kind(),
            FailureKind::ProcessingFault
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(PoseError::from(io).kind(), FailureKind::Export);
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err = PoseError::from(io);
        assert!(err.source().is_some());
        assert!(PoseError::NoSubjectDetected.source().is_none());
    }
}
