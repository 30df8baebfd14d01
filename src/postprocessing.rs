// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Post-processing for pose landmark model outputs.
//!
//! The landmark model returns two tensors of interest:
//!
//! * a flat landmark tensor of `39 x 5` values (`x`, `y`, `z`, visibility
//!   logit, presence logit) in model input pixels, of which the first 33 are
//!   body landmarks and the rest are auxiliary alignment points;
//! * a single pose-presence score in `[0, 1]`.
//!
//! Output tensor names differ between conversions, so outputs are told
//! apart by element count.

use crate::error::{PoseError, Result};
use crate::landmark::{LANDMARK_COUNT, Landmark, LandmarkSequence};
use crate::preprocessing::PreprocessResult;

/// Landmarks emitted by the model, including auxiliary points.
pub const RAW_LANDMARK_COUNT: usize = 39;

/// Values per raw landmark.
pub const VALUES_PER_LANDMARK: usize = 5;

/// Logistic function.
#[must_use]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// The raw tensors needed for decoding.
#[derive(Debug, Clone, Copy)]
pub struct RawPoseOutput<'a> {
    /// Flat landmark tensor (`39 * 5` values).
    pub landmarks: &'a [f32],
    /// Pose presence score.
    pub presence: f32,
}

/// Pick the landmark and presence tensors from the model outputs.
///
/// # Errors
///
/// Returns [`PoseError::InferenceError`] if either tensor is missing.
pub fn select_outputs(outputs: &[(Vec<f32>, Vec<usize>)]) -> Result<RawPoseOutput<'_>> {
    let landmark_len = RAW_LANDMARK_COUNT * VALUES_PER_LANDMARK;

    let landmarks = outputs
        .iter()
        .find(|(data, _)| data.len() == landmark_len)
        .map(|(data, _)| data.as_slice())
        .ok_or_else(|| {
            PoseError::InferenceError(format!(
                "No landmark output with {landmark_len} values (got shapes {:?})",
                outputs.iter().map(|(_, s)| s).collect::<Vec<_>>()
            ))
        })?;

    let presence = outputs
        .iter()
        .find(|(data, _)| data.len() == 1)
        .and_then(|(data, _)| data.first().copied())
        .ok_or_else(|| PoseError::InferenceError("No pose presence output".to_string()))?;

    Ok(RawPoseOutput {
        landmarks,
        presence,
    })
}

/// Decode raw outputs into a landmark sequence.
///
/// Returns `Ok(None)` when the presence score is below `min_detection_confidence`
/// or is not a number.
///
/// # Errors
///
/// Returns [`PoseError::InferenceError`] if the landmark tensor is too short.
pub fn postprocess_pose(
    raw: &RawPoseOutput<'_>,
    preprocess: &PreprocessResult,
    min_detection_confidence: f32,
) -> Result<Option<LandmarkSequence>> {
    if raw.presence.is_nan() || raw.presence < min_detection_confidence {
        return Ok(None);
    }

    let needed = LANDMARK_COUNT * VALUES_PER_LANDMARK;
    if raw.landmarks.len() < needed {
        return Err(PoseError::InferenceError(format!(
            "Landmark tensor has {} values, need {needed}",
            raw.landmarks.len()
        )));
    }

    let landmarks = raw.landmarks[..needed]
        .chunks_exact(VALUES_PER_LANDMARK)
        .map(|v| {
            let (x, y) = preprocess.to_normalized(v[0], v[1]);
            Landmark::new(x, y, preprocess.depth_to_normalized(v[2]), sigmoid(v[3]))
        })
        .collect();

    LandmarkSequence::new(landmarks).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{INPUT_SIZE, preprocess_image};
    use image::RgbImage;

    fn letterbox_512x256() -> PreprocessResult {
        preprocess_image(&RgbImage::new(512, 256), (INPUT_SIZE, INPUT_SIZE)).unwrap()
    }

    fn raw_tensor() -> Vec<f32> {
        let mut data = vec![0.0; RAW_LANDMARK_COUNT * VALUES_PER_LANDMARK];
        // Landmark 0 at the centre of the letterboxed content, fully visible.
        data[0] = 128.0;
        data[1] = 128.0;
        data[2] = -25.6;
        data[3] = 10.0;
        // Landmark 32 on the top-left content corner, logit 0.
        let base = 32 * VALUES_PER_LANDMARK;
        data[base] = 0.0;
        data[base + 1] = 64.0;
        data
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.9999);
        assert!(sigmoid(-10.0) < 0.0001);
    }

    #[test]
    fn test_select_outputs_by_size() {
        let outputs = vec![
            (vec![0.0; 256 * 256], vec![1, 256, 256, 1]),
            (vec![0.9], vec![1, 1]),
            (raw_tensor(), vec![1, 195]),
        ];
        let raw = select_outputs(&outputs).unwrap();
        assert_eq!(raw.landmarks.len(), 195);
        assert!((raw.presence - 0.9).abs() < 1e-6);

        let missing = vec![(vec![0.9], vec![1, 1])];
        assert!(select_outputs(&missing).is_err());
    }

    #[test]
    fn test_decode_maps_back_to_original() {
        let data = raw_tensor();
        let raw = RawPoseOutput {
            landmarks: &data,
            presence: 0.95,
        };
        let seq = postprocess_pose(&raw, &letterbox_512x256(), 0.5)
            .unwrap()
            .expect("presence above threshold");

        assert_eq!(seq.len(), LANDMARK_COUNT);
        assert!((seq[0].x - 0.5).abs() < 1e-6);
        assert!((seq[0].y - 0.5).abs() < 1e-6);
        assert!((seq[0].z + 0.1).abs() < 1e-6);
        assert!(seq[0].visibility > 0.999);

        assert!(seq[32].x.abs() < 1e-6);
        assert!(seq[32].y.abs() < 1e-6);
        assert!((seq[32].visibility - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_low_presence_is_no_subject() {
        let data = raw_tensor();
        let preprocess = letterbox_512x256();

        let raw = RawPoseOutput {
            landmarks: &data,
            presence: 0.3,
        };
        assert!(postprocess_pose(&raw, &preprocess, 0.5).unwrap().is_none());

        let raw = RawPoseOutput {
            landmarks: &data,
            presence: f32::NAN,
        };
        assert!(postprocess_pose(&raw, &preprocess, 0.0).unwrap().is_none());
    }

    #[test]
    fn test_short_tensor_is_error() {
        let data = vec![0.0; 10];
        let raw = RawPoseOutput {
            landmarks: &data,
            presence: 1.0,
        };
        assert!(postprocess_pose(&raw, &letterbox_512x256(), 0.5).is_err());
    }
}
