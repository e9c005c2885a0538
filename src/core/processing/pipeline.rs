use std::borrow::Cow;

use image::{RgbImage, imageops};
use tracing::debug;

use crate::core::params::AlignParams;
use crate::core::processing::padding::pad_with_vignette;
use crate::core::processing::quad::{
    Quad, crop_border, crop_box, min_padding, needs_padding, overlaps_image, required_padding,
    shrink_factor,
};
use crate::core::processing::resize::{resize_rgb_image, shrunk_dimensions};
use crate::core::processing::transform::quad_transform;
use crate::error::Result;
use crate::types::{Landmarks, Point};

/// Align a face to a canonical `output_size` square using its landmarks.
///
/// Steps: orient a square crop from the eye and mouth positions, pre-shrink
/// the source when the crop is much larger than the output, crop to the quad
/// plus a border, mirror-pad with a soft vignette when the quad runs off the
/// image, warp the quad into a `transform_size` square and finally resample to
/// `output_size`.
///
/// The output is always `output_size x output_size` RGB. Degenerate landmarks
/// are not rejected and produce a meaningless (usually black) crop.
pub fn align_image(image: &RgbImage, landmarks: &Landmarks, params: &AlignParams) -> Result<RgbImage> {
    params.validate()?;

    let mut quad = Quad::from_landmarks(landmarks);
    let mut img: Cow<'_, RgbImage> = Cow::Borrowed(image);
    debug!("Quad size {:.1} on {}x{} source", quad.size, img.width(), img.height());

    // Shrink.
    let shrink = shrink_factor(quad.size, params.output_size);
    if shrink > 1 {
        let (cols, rows) = shrunk_dimensions(img.width(), img.height(), shrink);
        debug!("Pre-shrinking by {} to {}x{}", shrink, cols, rows);
        img = Cow::Owned(resize_rgb_image(&img, cols, rows)?);
        quad = quad.scaled_down(shrink as f64);
    }

    let border = crop_border(quad.size);
    if !overlaps_image(&quad, border, img.width(), img.height()) {
        debug!("Quad lies entirely off the {}x{} source", img.width(), img.height());
        let side = params.output_size as u32;
        return Ok(RgbImage::new(side, side));
    }

    // Crop.
    if let Some(b) = crop_box(&quad, border, img.width(), img.height()) {
        debug!("Cropping to ({}, {})..({}, {})", b.left, b.top, b.right, b.bottom);
        img = Cow::Owned(imageops::crop_imm(&*img, b.left, b.top, b.width(), b.height()).to_image());
        quad = quad.translated(-Point::new(b.left as f64, b.top as f64));
    }

    // Pad.
    let pad = required_padding(&quad, border, img.width(), img.height());
    // Only a saturated shrink factor leaves the quad this large.
    let bounded = quad.size < 4.0 * params.output_size as f64;
    if params.enable_padding && bounded && needs_padding(&pad, border) {
        let pad = pad.at_least(min_padding(quad.size));
        img = Cow::Owned(pad_with_vignette(&img, &pad, quad.size)?);
        quad = quad.translated(Point::new(pad.left as f64, pad.top as f64));
    }

    // Transform.
    let warped = quad_transform(&img, &quad, params.transform_size)?;
    if params.output_size != params.transform_size {
        let side = params.output_size as u32;
        return resize_rgb_image(&warped, side, side);
    }
    Ok(warped)
}
