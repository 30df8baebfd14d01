// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Input handling: decoding the source image and the landmark source boundary.
//!
//! A [`LandmarkSource`] is anything that turns an RGB image into the 33-point
//! landmark layout. [`PoseModel`](crate::PoseModel) is the ONNX-backed
//! implementation; tests substitute fixed or failing sources.

use std::io::ErrorKind;
use std::path::Path;

use image::RgbImage;

use crate::error::{PoseError, Result};
use crate::landmark::LandmarkSequence;

/// Image extensions accepted as input.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "webp", "tiff"];

/// Produces landmarks for the single person in an image.
pub trait LandmarkSource {
    /// Detect the landmarks of one person.
    ///
    /// Returns `Ok(None)` when the image holds no detectable person.
    ///
    /// # Errors
    ///
    /// Returns an error when detection itself fails (model fault, bad tensor).
    fn detect(&mut self, image: &RgbImage) -> Result<Option<LandmarkSequence>>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for &mut S {
    fn detect(&mut self, image: &RgbImage) -> Result<Option<LandmarkSequence>> {
        (**self).detect(image)
    }
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn detect(&mut self, image: &RgbImage) -> Result<Option<LandmarkSequence>> {
        (**self).detect(image)
    }
}

/// Check if a path has a supported image extension.
#[must_use]
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Load an image file as 8-bit RGB.
///
/// # Errors
///
/// * [`PoseError::ImageNotFound`] if the path does not exist or cannot be opened.
/// * [`PoseError::ImageError`] if the file exists but cannot be decoded.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PoseError::ImageNotFound(path.display().to_string()));
    }

    let img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => {
            PoseError::ImageNotFound(path.display().to_string())
        }
        image::ImageError::IoError(io) if io.kind() == ErrorKind::PermissionDenied => {
            PoseError::ImageNotFound(format!("{} ({io})", path.display()))
        }
        other => PoseError::ImageError(format!("Failed to load image {}: {other}", path.display())),
    })?;

    Ok(img.to_rgb8())
}

/// Landmark source that always returns the same result. Useful for replaying
/// stored landmarks (e.g. read back from CSV) through the annotator.
#[derive(Debug, Clone)]
pub struct FixedSource {
    landmarks: Option<LandmarkSequence>,
}

impl FixedSource {
    /// Source that reports these landmarks for every image.
    #[must_use]
    pub const fn new(landmarks: LandmarkSequence) -> Self {
        Self {
            landmarks: Some(landmarks),
        }
    }

    /// Source that never finds anyone.
    #[must_use]
    pub const fn empty() -> Self {
        Self { landmarks: None }
    }
}

impl LandmarkSource for FixedSource {
    fn detect(&mut self, _image: &RgbImage) -> Result<Option<LandmarkSequence>> {
        Ok(self.landmarks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::landmark::{LANDMARK_COUNT, Landmark};

    #[test]
    fn test_missing_image_is_not_found() {
        let err = load_rgb_image("does/not/exist.jpg").unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotFound);
    }

    #[test]
    fn test_corrupt_image_is_processing_fault() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load_rgb_image(&path).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ProcessingFault);
    }

    #[test]
    fn test_load_png_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbaImage::from_pixel(4, 3, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let img = load_rgb_image(&path).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(*img.get_pixel(0, 0), image::Rgb([1, 2, 3]));
    }

    #[test]
    fn test_image_extensions() {
        assert!(is_image_path(Path::new("a/b/person.JPG")));
        assert!(is_image_path(Path::new("person.png")));
        assert!(!is_image_path(Path::new("person.csv")));
        assert!(!is_image_path(Path::new("person")));
    }

    #[test]
    fn test_fixed_source() {
        let seq = LandmarkSequence::new(vec![Landmark::default(); LANDMARK_COUNT]).unwrap();
        let img = RgbImage::new(2, 2);

        let mut source = FixedSource::new(seq.clone());
        assert_eq!(source.detect(&img).unwrap(), Some(seq));

        let mut empty = FixedSource::empty();
        assert!(empty.detect(&img).unwrap().is_none());
    }
}
