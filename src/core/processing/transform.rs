use image::RgbImage;
use rayon::prelude::*;

use crate::core::processing::quad::Quad;
use crate::error::{Error, Result};
use crate::types::Point;

/// Coefficients of the bilinear map from output pixel space onto the quad:
/// `src = a0 + a1 * u + a2 * v + a3 * u * v`, one set per coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadMapping {
    pub x: [f64; 4],
    pub y: [f64; 4],
}

impl QuadMapping {
    /// Map a `size x size` square onto `quad` so that its NW, SW, SE and NE
    /// corners land on the quad's corners in that order.
    pub fn new(quad: &Quad, size: usize) -> Self {
        let [nw, sw, se, ne] = quad.corners.map(|p| p + Point::new(0.5, 0.5));
        let step = 1.0 / size as f64;
        let coeffs = |nw: f64, sw: f64, se: f64, ne: f64| {
            [
                nw,
                (ne - nw) * step,
                (sw - nw) * step,
                (se - sw - ne + nw) * step * step,
            ]
        };
        Self {
            x: coeffs(nw.x, sw.x, se.x, ne.x),
            y: coeffs(nw.y, sw.y, se.y, ne.y),
        }
    }

    pub fn apply(&self, u: f64, v: f64) -> Point {
        let eval = |a: &[f64; 4]| a[0] + a[1] * u + a[2] * v + a[3] * u * v;
        Point::new(eval(&self.x), eval(&self.y))
    }
}

/// Bilinear sample at a continuous source position using pixel-centre
/// coordinates. Positions outside the image (or NaN) yield `None`.
fn sample_bilinear(img: &RgbImage, at: Point) -> Option<[u8; 3]> {
    let (w, h) = (img.width() as i64, img.height() as i64);
    if !(at.x >= 0.0 && at.x < w as f64 && at.y >= 0.0 && at.y < h as f64) {
        return None;
    }
    let xin = at.x - 0.5;
    let yin = at.y - 0.5;
    let x = xin.floor();
    let y = yin.floor();
    let dx = xin - x;
    let dy = yin - y;
    let (x, y) = (x as i64, y as i64);

    let clip_x = |v: i64| v.clamp(0, w - 1) as u32;
    let x0 = clip_x(x);
    let x1 = clip_x(x + 1);
    let y0 = y.clamp(0, h - 1) as u32;
    let y1 = (y + 1 < h).then_some((y + 1) as u32);

    let mut out = [0u8; 3];
    for (b, slot) in out.iter_mut().enumerate() {
        let lerp = |a: f64, c: f64, d: f64| a + (c - a) * d;
        let top = lerp(
            img.get_pixel(x0, y0)[b] as f64,
            img.get_pixel(x1, y0)[b] as f64,
            dx,
        );
        let bottom = match y1 {
            Some(y1) => lerp(
                img.get_pixel(x0, y1)[b] as f64,
                img.get_pixel(x1, y1)[b] as f64,
                dx,
            ),
            None => top,
        };
        *slot = lerp(top, bottom, dy) as u8;
    }
    Some(out)
}

/// Warp the quad region of `img` into a `size x size` square. Pixels whose
/// source falls outside the image are black.
pub fn quad_transform(img: &RgbImage, quad: &Quad, size: usize) -> Result<RgbImage> {
    if size == 0 {
        return Err(Error::ZeroSize { size });
    }
    let mapping = QuadMapping::new(quad, size);
    let mut data = vec![0u8; size * size * 3];

    data.par_chunks_mut(size * 3)
        .enumerate()
        .for_each(|(row, line)| {
            let v = row as f64 + 0.5;
            for (col, px) in line.chunks_exact_mut(3).enumerate() {
                let at = mapping.apply(col as f64 + 0.5, v);
                if let Some(rgb) = sample_bilinear(img, at) {
                    px.copy_from_slice(&rgb);
                }
            }
        });

    RgbImage::from_raw(size as u32, size as u32, data)
        .ok_or_else(|| Error::Processing(format!("transform buffer does not fit {0}x{0} RGB", size)))
}
