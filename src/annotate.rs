// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::landmark::{Landmark, LandmarkSequence};
use crate::zone::{Zone, zone_for_index};
use image::RgbImage;
use imageproc::drawing::draw_filled_circle_mut;

/// Default marker radius in pixels.
pub const MARKER_RADIUS: i32 = 5;

/// Largest marker radius that will be drawn.
pub const MAX_MARKER_RADIUS: i32 = 1024;

/// Drawing options for landmark markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationStyle {
    /// Filled circle radius in pixels.
    pub radius: i32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            radius: MARKER_RADIUS,
        }
    }
}

impl AnnotationStyle {
    /// Set the marker radius, clamped to `0..=MAX_MARKER_RADIUS`.
    #[must_use]
    pub const fn with_radius(mut self, radius: i32) -> Self {
        self.radius = if radius < 0 {
            0
        } else if radius > MAX_MARKER_RADIUS {
            MAX_MARKER_RADIUS
        } else {
            radius
        };
        self
    }
}

/// Convert a landmark's normalized position to pixel coordinates.
///
/// Truncates toward zero, so `(0.5, 0.5)` on a 100x100 image is `(50, 50)`
/// and `0.999` lands on the last column. Values outside `[0, 1]` give
/// coordinates outside the image. Non-finite coordinates yield `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn landmark_to_pixel(landmark: &Landmark, width: u32, height: u32) -> Option<(i32, i32)> {
    // Widen before multiplying; an f32 product can round up to the next integer.
    let px = f64::from(landmark.x) * f64::from(width);
    let py = f64::from(landmark.y) * f64::from(height);
    if !px.is_finite() || !py.is_finite() {
        return None;
    }
    // `as` saturates at the i32 bounds.
    Some((px as i32, py as i32))
}

/// Whether a circle at `center` with `radius` touches the image at all.
#[allow(clippy::cast_possible_wrap)]
fn marker_overlaps(center: (i32, i32), radius: i32, width: u32, height: u32) -> bool {
    let (x, y) = (i64::from(center.0), i64::from(center.1));
    let r = i64::from(radius);
    x + r >= 0 && y + r >= 0 && x - r < i64::from(width) && y - r < i64::from(height)
}

fn draw_marker(img: &mut RgbImage, landmark: &Landmark, zone: Zone, style: &AnnotationStyle) {
    let (width, height) = img.dimensions();
    let Some(center) = landmark_to_pixel(landmark, width, height) else {
        return;
    };
    // `radius` is a public field, so bound it here as well as in `with_radius`.
    let radius = style.radius.clamp(0, MAX_MARKER_RADIUS);
    // Markers entirely off-canvas are skipped; partial ones are clipped by imageproc.
    if !marker_overlaps(center, radius, width, height) {
        return;
    }
    draw_filled_circle_mut(img, center, radius, zone.color().to_rgb());
}

/// Annotate an image with one zone-colored marker per landmark.
///
/// The source image is left untouched; markers are drawn into a copy of the
/// same dimensions, which is returned.
#[must_use]
pub fn annotate_pose(landmarks: &LandmarkSequence, image: &RgbImage) -> RgbImage {
    annotate_pose_with(landmarks, image, &AnnotationStyle::default())
}

/// Same as [`annotate_pose`] with a custom [`AnnotationStyle`].
#[must_use]
pub fn annotate_pose_with(
    landmarks: &LandmarkSequence,
    image: &RgbImage,
    style: &AnnotationStyle,
) -> RgbImage {
    let mut img = image.clone();
    for (id, landmark) in landmarks.iter_named() {
        draw_marker(&mut img, landmark, id.zone(), style);
    }
    img
}

/// Annotate from a raw slice of landmarks, classified by position.
///
/// Positions past the 33-point layout have no zone and get no marker.
#[must_use]
pub fn annotate_landmarks(
    landmarks: &[Landmark],
    image: &RgbImage,
    style: &AnnotationStyle,
) -> RgbImage {
    let mut img = image.clone();
    for (i, landmark) in landmarks.iter().enumerate() {
        if let Some(zone) = zone_for_index(i) {
            draw_marker(&mut img, landmark, zone, style);
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::LANDMARK_COUNT;
    use crate::visualizer::Color;
    use image::Rgb;

    const BACKGROUND: Rgb<u8> = Rgb([10, 20, 30]);

    fn canvas(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, BACKGROUND)
    }

    /// 33 landmarks, all parked far outside the image so they draw nothing.
    fn hidden_points() -> Vec<Landmark> {
        vec![Landmark::new(-10.0, -10.0, 0.0, 1.0); LANDMARK_COUNT]
    }

    #[test]
    fn test_pixel_conversion_truncates() {
        let lm = Landmark::new(0.5, 0.5, 0.0, 1.0);
        assert_eq!(landmark_to_pixel(&lm, 100, 100), Some((50, 50)));

        let lm = Landmark::new(0.999, 0.129, 0.0, 1.0);
        assert_eq!(landmark_to_pixel(&lm, 100, 100), Some((99, 12)));

        let lm = Landmark::new(-0.015, 1.5, 0.0, 1.0);
        assert_eq!(landmark_to_pixel(&lm, 100, 100), Some((-1, 150)));

        let lm = Landmark::new(f32::NAN, 0.5, 0.0, 1.0);
        assert_eq!(landmark_to_pixel(&lm, 100, 100), None);
    }

    #[test]
    fn test_pixel_conversion_matches_floor() {
        // Each of these products rounds up to an integer when taken in f32.
        let lm = Landmark::new(0.29, 0.57, 0.0, 1.0);
        assert_eq!(landmark_to_pixel(&lm, 100, 100), Some((28, 56)));

        let lm = Landmark::new(0.7, 0.35, 0.0, 1.0);
        assert_eq!(landmark_to_pixel(&lm, 10, 20), Some((6, 6)));

        // The drawn marker follows the same mapping.
        let mut points = hidden_points();
        points[0] = Landmark::new(0.29, 0.5, 0.0, 1.0);
        let seq = LandmarkSequence::new(points).unwrap();
        let style = AnnotationStyle::default().with_radius(1);
        let out = annotate_pose_with(&seq, &canvas(100, 10), &style);
        assert_eq!(*out.get_pixel(27, 5), Color::RED.to_rgb());
        assert_eq!(*out.get_pixel(30, 5), BACKGROUND);
    }

    #[test]
    fn test_marker_centered_on_pixel() {
        let mut points = hidden_points();
        points[0] = Landmark::new(0.5, 0.5, 0.0, 1.0);
        let seq = LandmarkSequence::new(points).unwrap();

        let out = annotate_pose(&seq, &canvas(100, 100));
        assert_eq!(*out.get_pixel(50, 50), Color::RED.to_rgb());
        assert_eq!(*out.get_pixel(55, 50), Color::RED.to_rgb());
        assert_eq!(*out.get_pixel(45, 50), Color::RED.to_rgb());
        assert_eq!(*out.get_pixel(50, 44), BACKGROUND);
        assert_eq!(*out.get_pixel(57, 50), BACKGROUND);
    }

    #[test]
    fn test_zone_boundary_colors() {
        let mut points = hidden_points();
        points[0] = Landmark::new(0.1, 0.5, 0.0, 1.0);
        points[11] = Landmark::new(0.3, 0.5, 0.0, 1.0);
        points[23] = Landmark::new(0.5, 0.5, 0.0, 1.0);
        points[29] = Landmark::new(0.7, 0.5, 0.0, 1.0);
        let seq = LandmarkSequence::new(points).unwrap();

        let out = annotate_pose(&seq, &canvas(200, 100));
        assert_eq!(*out.get_pixel(20, 50), Rgb([255, 0, 0]));
        assert_eq!(*out.get_pixel(60, 50), Rgb([0, 255, 0]));
        assert_eq!(*out.get_pixel(100, 50), Rgb([0, 0, 255]));
        assert_eq!(*out.get_pixel(140, 50), Rgb([255, 0, 255]));
    }

    #[test]
    fn test_source_untouched_and_dimensions_kept() {
        let seq = LandmarkSequence::new(vec![Landmark::new(0.5, 0.5, 0.0, 1.0); LANDMARK_COUNT])
            .unwrap();
        let src = canvas(64, 48);
        let before = src.clone();

        let out = annotate_pose(&seq, &src);
        assert_eq!(out.dimensions(), src.dimensions());
        assert_eq!(src, before);
        assert_ne!(out, src);
    }

    #[test]
    fn test_out_of_range_does_not_fail() {
        let mut points = hidden_points();
        points[5] = Landmark::new(1.5, 0.5, 0.0, 1.0);
        points[6] = Landmark::new(1.02, 0.5, 0.0, 1.0);
        points[7] = Landmark::new(-0.01, -0.01, 0.0, 1.0);
        points[8] = Landmark::new(f32::MAX, f32::MIN, 0.0, 1.0);
        points[9] = Landmark::new(f32::INFINITY, 0.5, 0.0, 1.0);
        let seq = LandmarkSequence::new(points).unwrap();

        let out = annotate_pose(&seq, &canvas(100, 100));
        assert_eq!(out.dimensions(), (100, 100));
        // Partially visible marker just past the right edge is clipped, not dropped.
        assert_eq!(*out.get_pixel(99, 50), Color::RED.to_rgb());
        // Marker just past the top-left corner still paints the corner.
        assert_eq!(*out.get_pixel(0, 0), Color::RED.to_rgb());
    }

    #[test]
    fn test_custom_radius() {
        let mut points = hidden_points();
        points[30] = Landmark::new(0.5, 0.5, 0.0, 1.0);
        let seq = LandmarkSequence::new(points).unwrap();
        let style = AnnotationStyle::default().with_radius(1);

        let out = annotate_pose_with(&seq, &canvas(20, 20), &style);
        assert_eq!(*out.get_pixel(10, 10), Color::MAGENTA.to_rgb());
        assert_eq!(*out.get_pixel(13, 10), BACKGROUND);
        assert_eq!(AnnotationStyle::default().with_radius(-3).radius, 0);
        assert_eq!(
            AnnotationStyle::default().with_radius(i32::MAX).radius,
            MAX_MARKER_RADIUS
        );
    }

    #[test]
    fn test_huge_radius_fills_small_canvas() {
        let mut points = hidden_points();
        points[0] = Landmark::new(0.5, 0.5, 0.0, 1.0);
        let seq = LandmarkSequence::new(points).unwrap();
        let style = AnnotationStyle { radius: i32::MAX };

        let out = annotate_pose_with(&seq, &canvas(10, 10), &style);
        assert!(out.pixels().all(|p| *p == Color::RED.to_rgb()));
    }

    #[test]
    fn test_partial_slice() {
        let points = [
            Landmark::new(0.1, 0.2, 0.3, 0.9),
            Landmark::new(0.4, 0.5, 0.6, 0.8),
        ];
        let out = annotate_landmarks(&points, &canvas(100, 100), &AnnotationStyle::default());
        assert_eq!(*out.get_pixel(10, 20), Color::RED.to_rgb());
        assert_eq!(*out.get_pixel(40, 50), Color::RED.to_rgb());

        let many = vec![Landmark::new(0.5, 0.5, 0.0, 1.0); 40];
        let out = annotate_landmarks(&many, &canvas(10, 10), &AnnotationStyle::default());
        assert_eq!(out.dimensions(), (10, 10));
    }
}
