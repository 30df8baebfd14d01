// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Static-image pose extraction.
//!
//! [`PoseExtractor`] ties the pieces together: decode the image, run a
//! [`LandmarkSource`], annotate. Every failure comes back as a [`PoseError`]
//! and is reported to the injected log sink with the image path attached;
//! nothing panics and no partial result is ever returned.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;

use crate::annotate::{AnnotationStyle, annotate_pose_with};
use crate::complexity::ModelComplexity;
use crate::error::{PoseError, Result};
use crate::inference::DetectionConfig;
use crate::landmark::LandmarkSequence;
use crate::logging::{ConsoleLog, LogSink};
use crate::model::PoseModel;
use crate::source::{LandmarkSource, load_rgb_image};
use crate::zone::Zone;
use crate::{error, verbose, warn};

/// Landmarks and the annotated image for one successfully processed image.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseOutput {
    /// The 33 detected landmarks, in model order.
    pub landmarks: LandmarkSequence,
    /// Copy of the input image with one marker per landmark.
    pub annotated: RgbImage,
}

impl PoseOutput {
    /// Number of landmarks per zone whose position falls inside the image.
    #[must_use]
    pub fn in_frame_counts(&self) -> [(Zone, usize); 4] {
        Zone::ALL.map(|zone| {
            let count = self.landmarks.zone(zone).filter(|lm| lm.is_in_frame()).count();
            (zone, count)
        })
    }
}

/// Runs the decode → detect → annotate pipeline for single images.
#[derive(Clone)]
pub struct PoseExtractor {
    config: DetectionConfig,
    style: AnnotationStyle,
    log: Arc<dyn LogSink>,
}

impl PoseExtractor {
    /// Create an extractor logging to the console.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            style: AnnotationStyle::default(),
            log: ConsoleLog::shared(false),
        }
    }

    /// Replace the log sink.
    #[must_use]
    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    /// Replace the marker style.
    #[must_use]
    pub fn with_style(mut self, style: AnnotationStyle) -> Self {
        self.style = style;
        self
    }

    /// Get the detection configuration.
    #[must_use]
    pub const fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Process one image with the ONNX landmark model.
    ///
    /// The model is loaded for this call only and released before returning,
    /// whether or not extraction succeeds.
    ///
    /// # Errors
    ///
    /// See [`PoseError::kind`] for how failures are classified.
    pub fn extract<P: AsRef<Path>>(&self, image_path: P) -> Result<PoseOutput> {
        let image_path = image_path.as_ref();
        // Decode first so a bad path never pays for model loading.
        let image = self.load(image_path)?;

        let mut model = PoseModel::load(&self.config).map_err(|e| self.report(image_path, e))?;
        verbose!(
            self.log,
            "Loaded {} landmark model from {}",
            self.config.model_complexity,
            self.config.model_path().display()
        );

        self.run(&mut model, &image)
            .map_err(|e| self.report(image_path, e))
    }

    /// Process one image file with a caller-supplied landmark source.
    ///
    /// # Errors
    ///
    /// See [`PoseError::kind`] for how failures are classified.
    pub fn extract_with<S, P>(&self, source: &mut S, image_path: P) -> Result<PoseOutput>
    where
        S: LandmarkSource + ?Sized,
        P: AsRef<Path>,
    {
        let image_path = image_path.as_ref();
        let image = self.load(image_path)?;
        self.run(source, &image)
            .map_err(|e| self.report(image_path, e))
    }

    /// Process an already decoded image with a caller-supplied landmark source.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::NoSubjectDetected`] or the source's own error.
    pub fn extract_image_with<S>(&self, source: &mut S, image: &RgbImage) -> Result<PoseOutput>
    where
        S: LandmarkSource + ?Sized,
    {
        self.run(source, image)
            .map_err(|e| self.report(Path::new("<memory>"), e))
    }

    fn load(&self, image_path: &Path) -> Result<RgbImage> {
        if let Err(e) = self.config.validate() {
            return Err(self.report(image_path, e));
        }
        let image = load_rgb_image(image_path).map_err(|e| self.report(image_path, e))?;
        verbose!(
            self.log,
            "image {}: {}x{}",
            image_path.display(),
            image.width(),
            image.height()
        );
        Ok(image)
    }

    fn run<S>(&self, source: &mut S, image: &RgbImage) -> Result<PoseOutput>
    where
        S: LandmarkSource + ?Sized,
    {
        let start = Instant::now();
        let landmarks = source.detect(image)?.ok_or(PoseError::NoSubjectDetected)?;
        let detect_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let annotated = annotate_pose_with(&landmarks, image, &self.style);
        let annotate_ms = start.elapsed().as_secs_f64() * 1000.0;

        let off_frame = landmarks.iter().filter(|lm| !lm.is_in_frame()).count();
        if off_frame > 0 {
            verbose!(self.log, "{off_frame} landmarks fall outside the image");
        }
        verbose!(
            self.log,
            "Speed: {detect_ms:.1}ms detect, {annotate_ms:.1}ms annotate"
        );

        Ok(PoseOutput {
            landmarks,
            annotated,
        })
    }

    /// Log a failure with context and hand the error back.
    fn report(&self, image_path: &Path, err: PoseError) -> PoseError {
        match &err {
            PoseError::NoSubjectDetected => {
                warn!(self.log, "{}: no pose detected", image_path.display());
            }
            _ => {
                error!(
                    self.log,
                    "{} ({}): {err}",
                    image_path.display(),
                    err.kind()
                );
            }
        }
        err
    }
}

impl std::fmt::Debug for PoseExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseExtractor")
            .field("config", &self.config)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

/// Extract the pose of the single person in an image.
///
/// Loads the landmark model variant selected by `model_complexity` (0, 1 or 2)
/// from the default `models` directory, runs it once and annotates the image.
/// Failures are logged to the console and returned as errors.
///
/// # Errors
///
/// * `ConfigError` for thresholds outside `[0, 1]` or an unknown complexity.
/// * `ImageNotFound` if the path is not a readable file.
/// * `NoSubjectDetected` if no person is found.
/// * Any other [`PoseError`] for model or decode faults.
pub fn extract_static_pose<P: AsRef<Path>>(
    image_path: P,
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
    model_complexity: u8,
) -> Result<PoseOutput> {
    let log = ConsoleLog::shared(false);
    let complexity = ModelComplexity::try_from(model_complexity).map_err(|e| {
        let err = PoseError::ConfigError(e.to_string());
        error!(log, "{}: {err}", image_path.as_ref().display());
        err
    })?;

    let config = DetectionConfig::new()
        .with_min_detection_confidence(min_detection_confidence)
        .with_min_tracking_confidence(min_tracking_confidence)
        .with_model_complexity(complexity);

    PoseExtractor::new(config).with_log(log).extract(image_path)
}
