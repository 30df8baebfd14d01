// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Image preprocessing for the pose landmark model.
//!
//! The landmark model takes a square RGB tensor in NHWC layout with values in
//! `[0, 1]`. Images are letterboxed into that square (aspect ratio kept,
//! centred, black padding) and the transform is recorded so model outputs can
//! be mapped back onto the original image.

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use ndarray::Array4;

use crate::error::{PoseError, Result};

/// Side length of the landmark model input.
pub const INPUT_SIZE: u32 = 256;

/// Reciprocal of 255 for normalization.
const INV_255: f32 = 1.0 / 255.0;

/// Result of preprocessing an image, containing the tensor and transform info.
#[derive(Debug, Clone)]
pub struct PreprocessResult {
    /// Preprocessed image tensor in NHWC format, normalized to [0, 1].
    pub tensor: Array4<f32>,
    /// Original image dimensions (height, width).
    pub orig_shape: (u32, u32),
    /// Scale factors applied (`scale_y`, `scale_x`).
    pub scale: (f32, f32),
    /// Padding applied (`pad_top`, `pad_left`).
    pub padding: (f32, f32),
}

impl PreprocessResult {
    /// Map a point from model input pixels back to normalized original-image coordinates.
    #[must_use]
    pub fn to_normalized(&self, x: f32, y: f32) -> (f32, f32) {
        let (scale_y, scale_x) = self.scale;
        let (pad_top, pad_left) = self.padding;
        let (orig_h, orig_w) = self.orig_shape;
        (
            (x - pad_left) / scale_x / orig_w as f32,
            (y - pad_top) / scale_y / orig_h as f32,
        )
    }

    /// Map a depth value from model input pixels to the normalized scale used for `x`.
    #[must_use]
    pub fn depth_to_normalized(&self, z: f32) -> f32 {
        let (_, scale_x) = self.scale;
        z / scale_x / self.orig_shape.1 as f32
    }
}

/// Preprocess an image for the landmark model.
///
/// # Arguments
///
/// * `image` - Input RGB image.
/// * `target_size` - Target size as (height, width).
///
/// # Errors
///
/// Returns [`PoseError::ImageError`] for empty images or resize failures.
pub fn preprocess_image(image: &RgbImage, target_size: (u32, u32)) -> Result<PreprocessResult> {
    let (orig_width, orig_height) = image.dimensions();
    if orig_width == 0 || orig_height == 0 {
        return Err(PoseError::ImageError("Image has zero width or height".to_string()));
    }

    let (new_width, new_height, pad_left, pad_top, scale) =
        calculate_letterbox_params(orig_width, orig_height, target_size);

    let resized = resize_rgb(image, new_width, new_height)?;

    let (target_h, target_w) = target_size;
    let mut canvas = RgbImage::new(target_w, target_h);
    image::imageops::replace(&mut canvas, &resized, i64::from(pad_left), i64::from(pad_top));

    Ok(PreprocessResult {
        tensor: image_to_tensor(&canvas)?,
        orig_shape: (orig_height, orig_width),
        scale,
        padding: (pad_top as f32, pad_left as f32),
    })
}

/// Calculate letterbox parameters.
///
/// # Returns
///
/// Tuple containing:
/// 1. `new_width`: Scaled width.
/// 2. `new_height`: Scaled height.
/// 3. `pad_left`: Left padding.
/// 4. `pad_top`: Top padding.
/// 5. `(scale_y, scale_x)`: Scale factors.
#[must_use]
pub fn calculate_letterbox_params(
    orig_width: u32,
    orig_height: u32,
    target_size: (u32, u32),
) -> (u32, u32, u32, u32, (f32, f32)) {
    let (target_h, target_w) = (target_size.0 as f32, target_size.1 as f32);
    let (orig_h, orig_w) = (orig_height as f32, orig_width as f32);

    // Fit inside the target while keeping aspect ratio
    let scale = (target_h / orig_h).min(target_w / orig_w);

    let new_w = ((orig_w * scale).round() as u32).clamp(1, target_size.1);
    let new_h = ((orig_h * scale).round() as u32).clamp(1, target_size.0);

    let pad_left = (target_size.1 - new_w) / 2;
    let pad_top = (target_size.0 - new_h) / 2;

    let scale_x = new_w as f32 / orig_w;
    let scale_y = new_h as f32 / orig_h;

    (new_w, new_h, pad_left, pad_top, (scale_y, scale_x))
}

/// Bilinear resize through `fast_image_resize`.
fn resize_rgb(image: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let (src_w, src_h) = image.dimensions();
    let src_image = Image::from_vec_u8(src_w, src_h, image.as_raw().clone(), PixelType::U8x3)
        .map_err(|e| PoseError::ImageError(format!("Failed to wrap source image: {e}")))?;
    let mut dst_image = Image::new(width, height, PixelType::U8x3);

    let options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    Resizer::new()
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PoseError::ImageError(format!("Failed to resize image: {e}")))?;

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| PoseError::ImageError("Failed to create resized buffer".to_string()))
}

/// Convert an RGB image to a normalized NHWC tensor.
///
/// # Returns
///
/// Array4 with shape (1, H, W, 3) and values in [0, 1].
fn image_to_tensor(image: &RgbImage) -> Result<Array4<f32>> {
    let (width, height) = image.dimensions();
    let data: Vec<f32> = image.as_raw().iter().map(|&p| f32::from(p) * INV_255).collect();

    Array4::from_shape_vec((1, height as usize, width as usize, 3), data)
        .map_err(|e| PoseError::ImageError(format!("Failed to build input tensor: {e}")))
}
