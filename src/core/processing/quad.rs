use crate::types::{Landmarks, Point};

/// Oriented square crop selected from landmark geometry.
///
/// Corners are stored NW, SW, SE, NE relative to the face: `c - x - y`,
/// `c - x + y`, `c + x + y`, `c + x - y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Point; 4],
    /// Side length of the square, `2 * |x|`
    pub size: f64,
}

/// Integer pixel bounds of a quad: floor of the minimum, ceil of the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

/// Axis-aligned crop rectangle in pixel units, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Per-side pad amounts in pixels: left, top, right, bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Padding {
    pub fn max_side(&self) -> usize {
        self.left.max(self.top).max(self.right).max(self.bottom)
    }

    /// Raise every side to at least `floor`.
    pub fn at_least(self, floor: usize) -> Self {
        Self {
            left: self.left.max(floor),
            top: self.top.max(floor),
            right: self.right.max(floor),
            bottom: self.bottom.max(floor),
        }
    }
}

impl PixelBounds {
    /// Longer side of the bounds.
    pub fn extent(&self) -> i64 {
        self.right
            .saturating_sub(self.left)
            .max(self.bottom.saturating_sub(self.top))
    }
}

impl Quad {
    /// Build the crop square from eye and mouth positions.
    pub fn from_landmarks(landmarks: &Landmarks) -> Self {
        let eye_avg = landmarks.eye_left.midpoint(landmarks.eye_right);
        let eye_to_eye = landmarks.eye_right - landmarks.eye_left;
        let mouth_avg = landmarks.mouth_left.midpoint(landmarks.mouth_right);
        let eye_to_mouth = mouth_avg - eye_avg;

        let mut x = eye_to_eye - eye_to_mouth.rotate90();
        x = x / x.norm();
        x = x * (eye_to_eye.norm() * 2.0).max(eye_to_mouth.norm() * 1.8);
        let y = x.rotate90();
        let c = eye_avg + eye_to_mouth * 0.1;

        Self {
            corners: [c - x - y, c - x + y, c + x + y, c + x - y],
            size: x.norm() * 2.0,
        }
    }

    pub fn center(&self) -> Point {
        self.corners[0].midpoint(self.corners[2])
    }

    /// Half-width vector pointing from the left edge to the right edge.
    pub fn x_axis(&self) -> Point {
        (self.corners[3] - self.corners[0]) * 0.5
    }

    pub fn scaled_down(&self, factor: f64) -> Self {
        Self {
            corners: self.corners.map(|p| p / factor),
            size: self.size / factor,
        }
    }

    pub fn translated(&self, offset: Point) -> Self {
        Self {
            corners: self.corners.map(|p| p + offset),
            size: self.size,
        }
    }

    pub fn pixel_bounds(&self) -> PixelBounds {
        let first = self.corners[0];
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        // Plain comparisons keep a NaN quad NaN; `as` then maps it to 0.
        for p in &self.corners[1..] {
            if p.x < min_x {
                min_x = p.x;
            }
            if p.y < min_y {
                min_y = p.y;
            }
            if p.x > max_x {
                max_x = p.x;
            }
            if p.y > max_y {
                max_y = p.y;
            }
        }
        PixelBounds {
            left: min_x.floor() as i64,
            top: min_y.floor() as i64,
            right: max_x.ceil() as i64,
            bottom: max_y.ceil() as i64,
        }
    }
}

/// Integer pre-shrink factor; 1 means no shrink.
pub fn shrink_factor(quad_size: f64, output_size: usize) -> u32 {
    let shrink = (quad_size / output_size as f64 * 0.5).floor();
    if shrink > 1.0 { shrink as u32 } else { 1 }
}

/// Context margin kept around the quad when cropping.
pub fn crop_border(quad_size: f64) -> i64 {
    ((quad_size * 0.1).round_ties_even() as i64).max(3)
}

/// Minimum pad applied on every side once padding triggers.
pub fn min_padding(quad_size: f64) -> usize {
    (quad_size * 0.3).round_ties_even().max(0.0) as usize
}

/// Bounding box of the quad grown by `border`, clamped to the image.
///
/// Returns `None` when the clamped box covers the whole image or is empty (the
/// quad lies entirely off-image), in which case the image is left uncropped.
pub fn crop_box(quad: &Quad, border: i64, width: u32, height: u32) -> Option<CropBox> {
    let b = quad.pixel_bounds();
    let left = b.left.saturating_sub(border).max(0);
    let top = b.top.saturating_sub(border).max(0);
    let right = b.right.saturating_add(border).min(width as i64);
    let bottom = b.bottom.saturating_add(border).min(height as i64);

    if right <= left || bottom <= top {
        return None;
    }
    if right - left < width as i64 || bottom - top < height as i64 {
        Some(CropBox {
            left: left as u32,
            top: top as u32,
            right: right as u32,
            bottom: bottom as u32,
        })
    } else {
        None
    }
}

/// Whether the quad's bounds grown by `border` overlap a `width x height` image.
pub fn overlaps_image(quad: &Quad, border: i64, width: u32, height: u32) -> bool {
    let b = quad.pixel_bounds();
    b.left.saturating_sub(border) < width as i64
        && b.top.saturating_sub(border) < height as i64
        && b.right.saturating_add(border) > 0
        && b.bottom.saturating_add(border) > 0
}

/// How far the quad (plus `border`) reaches outside a `width x height` image.
///
/// No side exceeds the quad's extent plus a border on either end: past that
/// the quad cannot sample.
pub fn required_padding(quad: &Quad, border: i64, width: u32, height: u32) -> Padding {
    let b = quad.pixel_bounds();
    let limit = b.extent().saturating_add(border.saturating_mul(2));
    let side = |v: i64| v.clamp(0, limit.max(0)) as usize;
    Padding {
        left: side(border.saturating_sub(b.left)),
        top: side(border.saturating_sub(b.top)),
        right: side(b.right.saturating_sub(width as i64).saturating_add(border)),
        bottom: side(b.bottom.saturating_sub(height as i64).saturating_add(border)),
    }
}

/// Padding kicks in once any side needs more than `border - 4` pixels.
pub fn needs_padding(pad: &Padding, border: i64) -> bool {
    pad.max_side() as i64 > border - 4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontal() -> Landmarks {
        Landmarks {
            eye_left: Point::new(700.0, 800.0),
            eye_right: Point::new(1300.0, 800.0),
            mouth_left: Point::new(750.0, 1300.0),
            mouth_right: Point::new(1250.0, 1300.0),
        }
    }

    fn square(left: f64, top: f64, side: f64) -> Quad {
        Quad {
            corners: [
                Point::new(left, top),
                Point::new(left, top + side),
                Point::new(left + side, top + side),
                Point::new(left + side, top),
            ],
            size: side,
        }
    }

    #[test]
    fn frontal_face_gives_axis_aligned_square() {
        let q = Quad::from_landmarks(&frontal());
        // x = (600, 0) - rot((0, 500)) = (1100, 0), scaled to max(1200, 900)
        assert_eq!(q.x_axis(), Point::new(1200.0, 0.0));
        assert_eq!(q.size, 2400.0);
        assert_eq!(q.center(), Point::new(1000.0, 850.0));
        assert_eq!(q.corners[0], Point::new(-200.0, -350.0));
        assert_eq!(q.corners[1], Point::new(-200.0, 2050.0));
        assert_eq!(q.corners[2], Point::new(2200.0, 2050.0));
        assert_eq!(q.corners[3], Point::new(2200.0, -350.0));
    }

    // Holds while the eyes are further apart than the eye-to-mouth distance:
    // the eye line then fixes the sign of the horizontal axis.
    #[test]
    fn frontal_swap_reverses_the_horizontal_axis() {
        let q = Quad::from_landmarks(&frontal());
        let s = Quad::from_landmarks(&frontal().swapped_sides());

        assert_eq!(s.center(), q.center());
        assert_eq!(s.size, q.size);
        assert_eq!(s.x_axis(), -q.x_axis());
        // Same square, traversed from the opposite corner.
        for i in 0..4 {
            assert_eq!(s.corners[i], q.corners[(i + 2) % 4]);
        }
    }

    #[test]
    fn swap_is_a_no_op_when_the_mouth_dominates() {
        // Eyes 141px apart, mouth 283px from their midpoint, 45 degree tilt.
        let lm = Landmarks {
            eye_left: Point::new(100.0, 100.0),
            eye_right: Point::new(200.0, 200.0),
            mouth_left: Point::new(-75.0, 325.0),
            mouth_right: Point::new(-25.0, 375.0),
        };
        let q = Quad::from_landmarks(&lm);
        let s = Quad::from_landmarks(&lm.swapped_sides());

        // x = e2e - rot(e2m) points along (1, 1) either way round.
        assert!((s.size - q.size).abs() < 1e-9);
        for (a, b) in s.corners.iter().zip(&q.corners) {
            assert!((*a - *b).norm() < 1e-6, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn tilted_face_rotates_the_crop() {
        let lm = Landmarks {
            eye_left: Point::new(100.0, 100.0),
            eye_right: Point::new(200.0, 200.0),
            mouth_left: Point::new(25.0, 225.0),
            mouth_right: Point::new(75.0, 275.0),
        };
        let q = Quad::from_landmarks(&lm);
        let x = q.x_axis();
        // Axis follows the eye line (45 degrees down-right).
        assert!((x.x - x.y).abs() < 1e-9);
        assert!(x.x > 0.0);
        let side = (q.corners[1] - q.corners[0]).norm();
        assert!((side - q.size).abs() < 1e-9);
    }

    #[test]
    fn shrink_stays_off_around_twice_the_output() {
        let out = 1024;
        assert_eq!(shrink_factor(1024.0, out), 1);
        assert_eq!(shrink_factor(2047.9, out), 1);
        assert_eq!(shrink_factor(2048.0, out), 1);
        assert_eq!(shrink_factor(2048.1, out), 1);
        assert_eq!(shrink_factor(4095.9, out), 1);
        assert_eq!(shrink_factor(4096.0, out), 2);
        assert_eq!(shrink_factor(6200.0, out), 3);
    }

    #[test]
    fn border_has_a_floor_of_three() {
        assert_eq!(crop_border(10.0), 3);
        assert_eq!(crop_border(2400.0), 240);
        // 0.1 * 45 = 4.5 rounds to even
        assert_eq!(crop_border(45.0), 4);
        assert_eq!(crop_border(f64::NAN), 3);
    }

    #[test]
    fn crop_skipped_when_box_spans_image() {
        let q = Quad::from_landmarks(&frontal());
        assert_eq!(crop_box(&q, crop_border(q.size), 2000, 2000), None);
    }

    #[test]
    fn crop_clamps_to_image() {
        let q = square(100.0, 200.0, 50.0);
        let b = crop_box(&q, 10, 1000, 400).unwrap();
        assert_eq!(b, CropBox { left: 90, top: 190, right: 160, bottom: 260 });
        assert_eq!((b.width(), b.height()), (70, 70));

        let q = square(-20.0, 380.0, 50.0);
        let b = crop_box(&q, 10, 1000, 400).unwrap();
        assert_eq!(b, CropBox { left: 0, top: 370, right: 40, bottom: 400 });
    }

    #[test]
    fn crop_skipped_for_offimage_quad() {
        let q = square(5000.0, 5000.0, 10.0);
        assert_eq!(crop_box(&q, 3, 100, 100), None);
    }

    #[test]
    fn padding_triggers_one_pixel_past_border_minus_four() {
        let border = 10;
        let (w, h) = (200, 200);

        // Left edge at x=4: required pad = 10 - 4 = border - 4 on the left,
        // every other side well inside the image.
        let inside = square(4.0, 50.0, 100.0);
        let pad = required_padding(&inside, border, w, h);
        assert_eq!(pad, Padding { left: 6, top: 0, right: 0, bottom: 0 });
        assert!(!needs_padding(&pad, border));

        // One pixel further out: border - 3.
        let outside = square(3.0, 50.0, 100.0);
        let pad = required_padding(&outside, border, w, h);
        assert_eq!(pad.left, 7);
        assert!(needs_padding(&pad, border));
    }

    #[test]
    fn far_offimage_quad_needs_bounded_padding() {
        let q = square(1e10, 1e10, 100.0);
        assert!(!overlaps_image(&q, 10, 50, 50));
        let pad = required_padding(&q, 10, 50, 50);
        assert_eq!(pad, Padding { left: 0, top: 0, right: 120, bottom: 120 });

        let q = square(-20_000.0, 0.0, 100.0);
        assert!(!overlaps_image(&q, 10, 2000, 2000));
        assert!(required_padding(&q, 10, 2000, 2000).max_side() <= 120);

        assert!(overlaps_image(&square(-105.0, 0.0, 100.0), 10, 50, 50));
        assert!(!overlaps_image(&square(-110.0, 0.0, 100.0), 10, 50, 50));
    }

    #[test]
    fn padding_measures_every_side() {
        let q = square(-30.0, -5.0, 250.0);
        let pad = required_padding(&q, 10, 200, 200);
        assert_eq!(pad, Padding { left: 40, top: 15, right: 30, bottom: 55 });
        assert_eq!(pad.at_least(50), Padding { left: 50, top: 50, right: 50, bottom: 55 });
    }

    #[test]
    fn coincident_landmarks_do_not_panic() {
        let p = Point::new(10.0, 10.0);
        let lm = Landmarks { eye_left: p, eye_right: p, mouth_left: p, mouth_right: p };
        let q = Quad::from_landmarks(&lm);
        assert!(q.size.is_nan());
        let b = q.pixel_bounds();
        assert_eq!((b.left, b.top, b.right, b.bottom), (0, 0, 0, 0));
        assert_eq!(shrink_factor(q.size, 1024), 1);
        assert_eq!(min_padding(q.size), 0);
    }
}
