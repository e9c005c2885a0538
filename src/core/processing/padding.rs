use image::RgbImage;
use ndarray::{Array3, Zip};
use tracing::debug;

use crate::core::processing::filters::{channel_median, gaussian_filter, mirror_index};
use crate::core::processing::quad::Padding;
use crate::error::{Error, Result};

/// Mirror-reflect `img` outward by `pad` into an `(h, w, 3)` float buffer.
pub fn reflect_pad(img: &RgbImage, pad: &Padding) -> Array3<f32> {
    let (cols, rows) = (img.width() as usize, img.height() as usize);
    let new_rows = rows + pad.top + pad.bottom;
    let new_cols = cols + pad.left + pad.right;
    let raw = img.as_raw();

    Array3::from_shape_fn((new_rows, new_cols, 3), |(y, x, c)| {
        let sy = mirror_index(y as isize - pad.top as isize, rows);
        let sx = mirror_index(x as isize - pad.left as isize, cols);
        raw[(sy * cols + sx) * 3 + c] as f32
    })
}

/// Distance-into-margin ramp along one axis: 1 at the outer edge, 0 where the
/// margin meets the source frame, negative further inside.
fn edge_ramp(len: usize, before: usize, after: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let from_start = i as f32 / before as f32;
            let from_end = (len - 1 - i) as f32 / after as f32;
            1.0 - from_start.min(from_end)
        })
        .collect()
}

/// Pad `img` by reflection and fade the new margins into a blurred, then
/// median-coloured, version of themselves.
pub fn pad_with_vignette(img: &RgbImage, pad: &Padding, quad_size: f64) -> Result<RgbImage> {
    debug!(
        "Padding {}x{} by l={} t={} r={} b={}",
        img.width(),
        img.height(),
        pad.left,
        pad.top,
        pad.right,
        pad.bottom
    );

    let mut padded = reflect_pad(img, pad);
    let (rows, cols, _) = padded.dim();

    let col_ramp = edge_ramp(cols, pad.left, pad.right);
    let row_ramp = edge_ramp(rows, pad.top, pad.bottom);
    let mask = |y: usize, x: usize| col_ramp[x].max(row_ramp[y]);

    let mut blurred = padded.clone();
    gaussian_filter(&mut blurred, quad_size * 0.02);

    Zip::indexed(&mut padded)
        .and(&blurred)
        .par_for_each(|(y, x, _), v, &b| {
            *v += (b - *v) * (mask(y, x) * 3.0 + 1.0).clamp(0.0, 1.0);
        });
    drop(blurred);

    let median = channel_median(&padded);
    Zip::indexed(&mut padded).par_for_each(|(y, x, c), v| {
        *v += (median[c] - *v) * mask(y, x).clamp(0.0, 1.0);
    });

    let data: Vec<u8> = padded
        .iter()
        .map(|v| v.round_ties_even().clamp(0.0, 255.0) as u8)
        .collect();
    RgbImage::from_raw(cols as u32, rows as u32, data).ok_or_else(|| {
        Error::Processing(format!("padded buffer does not fit {}x{} RGB", cols, rows))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 7]))
    }

    #[test]
    fn reflect_pad_mirrors_without_repeating_edge() {
        let img = gradient(4, 3);
        let pad = Padding { left: 2, top: 1, right: 3, bottom: 0 };
        let out = reflect_pad(&img, &pad);
        assert_eq!(out.dim(), (4, 9, 3));
        // Row 0 mirrors source row 1; column 0 mirrors source column 2.
        assert_eq!(out[[0, 0, 0]], 20.0);
        assert_eq!(out[[0, 0, 1]], 10.0);
        // Original frame is untouched.
        assert_eq!(out[[1, 2, 0]], 0.0);
        assert_eq!(out[[3, 5, 0]], 30.0);
        // Right margin: columns 3, 2, 1 of the source (x = 30, 20, 10).
        assert_eq!(out[[1, 6, 0]], 20.0);
        assert_eq!(out[[1, 7, 0]], 10.0);
        assert_eq!(out[[1, 8, 0]], 0.0);
    }

    #[test]
    fn edge_ramp_peaks_at_outer_edges() {
        let ramp = edge_ramp(10, 2, 4);
        assert_eq!(ramp[0], 1.0);
        assert_eq!(ramp[2], 0.0);
        assert_eq!(ramp[9], 1.0);
        assert_eq!(ramp[5], 0.0);
        assert!(ramp[4] < 0.0);
    }

    #[test]
    fn vignette_keeps_interior_and_grows_image() {
        let img = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 128]));
        let pad = Padding { left: 12, top: 12, right: 12, bottom: 12 };
        let out = pad_with_vignette(&img, &pad, 40.0).unwrap();
        assert_eq!(out.dimensions(), (64, 54));
        // Deep inside the original frame the mask is far below zero.
        assert_eq!(out.get_pixel(12 + 20, 12 + 15), img.get_pixel(20, 15));
        // Outer corner is pulled all the way to the channel median.
        assert_eq!(out.get_pixel(0, 0)[2], 128);
    }

    #[test]
    fn flat_image_stays_flat() {
        let img = RgbImage::from_pixel(16, 16, Rgb([90, 90, 90]));
        let pad = Padding { left: 5, top: 5, right: 5, bottom: 5 };
        let out = pad_with_vignette(&img, &pad, 20.0).unwrap();
        assert!(out.pixels().all(|p| p.0 == [90, 90, 90]));
    }
}
