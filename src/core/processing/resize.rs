use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbImage;
use tracing::debug;

use crate::error::{Error, Result};

/// Dimensions after dividing by an integer shrink factor, rounded half-to-even
/// and kept at least one pixel.
pub fn shrunk_dimensions(width: u32, height: u32, shrink: u32) -> (u32, u32) {
    let div = |v: u32| ((v as f64 / shrink as f64).round_ties_even() as u32).max(1);
    (div(width), div(height))
}

/// Lanczos3 convolution resize of an RGB8 raster.
pub fn resize_rgb_image(src: &RgbImage, target_cols: u32, target_rows: u32) -> Result<RgbImage> {
    let (cols, rows) = src.dimensions();
    if (cols, rows) == (target_cols, target_rows) {
        return Ok(src.clone());
    }
    debug!(
        "Resizing {}x{} -> {}x{} (lanczos3)",
        cols, rows, target_cols, target_rows
    );

    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(cols, rows, src.as_raw().clone(), PixelType::U8x3)?;
    let mut dst_image = Image::new(target_cols, target_rows, PixelType::U8x3);
    resizer.resize(&src_image, &mut dst_image, &resize_options)?;

    RgbImage::from_raw(target_cols, target_rows, dst_image.into_vec()).ok_or_else(|| {
        Error::Processing(format!(
            "resized buffer does not fit {}x{} RGB",
            target_cols, target_rows
        ))
    })
}
