// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose landmark model loading and inference.
//!
//! [`PoseModel`] wraps an ONNX Runtime session for one of the three BlazePose
//! landmark model variants and implements [`LandmarkSource`].

use std::path::Path;

use image::RgbImage;
use ndarray::Array4;
#[cfg(feature = "coreml")]
use ort::execution_providers::CoreMLExecutionProvider;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use crate::error::{PoseError, Result};
use crate::inference::DetectionConfig;
use crate::landmark::LandmarkSequence;
use crate::postprocessing::{postprocess_pose, select_outputs};
use crate::preprocessing::{INPUT_SIZE, preprocess_image};
use crate::source::LandmarkSource;

/// Pose landmark model for inference.
///
/// # Example
///
/// ```no_run
/// use pose_landmarks::{DetectionConfig, LandmarkSource, PoseModel, load_rgb_image};
///
/// let config = DetectionConfig::new().with_model_dir("models");
/// let mut model = PoseModel::load(&config)?;
/// let image = load_rgb_image("person.jpg")?;
/// if let Some(landmarks) = model.detect(&image)? {
///     println!("nose at {:?}", landmarks[0]);
/// }
/// # Ok::<(), pose_landmarks::PoseError>(())
/// ```
pub struct PoseModel {
    /// ONNX Runtime session.
    session: Session,
    /// Input tensor name.
    input_name: String,
    /// Output tensor names.
    output_names: Vec<String>,
    /// Detection configuration.
    config: DetectionConfig,
}

impl PoseModel {
    /// Load the model variant selected by `config.model_complexity` from
    /// `config.model_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] for invalid thresholds and
    /// [`PoseError::ModelLoadError`] if the model file is missing or invalid.
    pub fn load(config: &DetectionConfig) -> Result<Self> {
        Self::load_from(config.model_path(), config)
    }

    /// Load a landmark model from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the model can't be loaded.
    pub fn load_from<P: AsRef<Path>>(path: P, config: &DetectionConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();

        if !path.exists() {
            return Err(PoseError::ModelLoadError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        #[allow(unused_mut)]
        let mut builder = Session::builder().map_err(|e| {
            PoseError::ModelLoadError(format!("Failed to create session builder: {e}"))
        })?;

        #[cfg(feature = "coreml")]
        {
            builder = builder
                .with_execution_providers([CoreMLExecutionProvider::default().build()])
                .map_err(|e| {
                    PoseError::ModelLoadError(format!("Failed to register CoreML EP: {e}"))
                })?;
        }

        let session = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to set optimization level: {e}"))
            })?
            .with_intra_threads(config.num_threads)
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to set intra-thread count: {e}"))
            })?
            .commit_from_file(path)
            .map_err(|e| PoseError::ModelLoadError(format!("Failed to load model: {e}")))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input_1".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        Ok(Self {
            session,
            input_name,
            output_names,
            config: config.clone(),
        })
    }

    /// Run landmark detection on an RGB image.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing, inference or decoding fails.
    pub fn predict(&mut self, image: &RgbImage) -> Result<Option<LandmarkSequence>> {
        let preprocess = preprocess_image(image, (INPUT_SIZE, INPUT_SIZE))?;
        let outputs = self.run_inference(&preprocess.tensor)?;
        let raw = select_outputs(&outputs)?;
        postprocess_pose(&raw, &preprocess, self.config.min_detection_confidence)
    }

    /// Run the ONNX model inference, returning every f32 output as (data, shape).
    fn run_inference(&mut self, input: &Array4<f32>) -> Result<Vec<(Vec<f32>, Vec<usize>)>> {
        let input_contiguous = input.as_standard_layout();

        let input_tensor = TensorRef::from_array_view(&input_contiguous).map_err(|e| {
            PoseError::InferenceError(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| PoseError::InferenceError(format!("Inference failed: {e}")))?;

        let mut extracted = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let Some(output) = outputs.get(name.as_str()) else {
                continue;
            };
            // Non-f32 outputs are not used for decoding.
            let Ok((shape, data)) = output.try_extract_tensor::<f32>() else {
                continue;
            };
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let shape_vec: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
            extracted.push((data.to_vec(), shape_vec));
        }

        Ok(extracted)
    }
}

impl LandmarkSource for PoseModel {
    fn detect(&mut self, image: &RgbImage) -> Result<Option<LandmarkSequence>> {
        self.predict(image)
    }
}

impl std::fmt::Debug for PoseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseModel")
            .field("complexity", &self.config.model_complexity)
            .field("input", &self.input_name)
            .field("outputs", &self.output_names)
            .finish_non_exhaustive()
    }
}
