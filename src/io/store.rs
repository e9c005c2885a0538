//! Raw-store naming and decoding.
use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::error::Result;

/// Raw-store file name for a source URL: its last five `/`-separated segments
/// joined with underscores.
pub fn raw_name_from_url(url: &str) -> String {
    let mut tail: Vec<&str> = url.rsplit('/').take(5).collect();
    tail.reverse();
    tail.join("_")
}

/// Decode a raw image of any supported format into RGB8.
///
/// Decoder allocation limits are lifted: raw dataset images can be far larger
/// than the default limits allow. Truncated files are an error rather than a
/// partially grey image; re-fetching them is the remedy.
pub fn open_rgb_image(path: &Path) -> Result<RgbImage> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.no_limits();
    Ok(reader.decode()?.into_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn raw_name_uses_last_five_segments() {
        assert_eq!(
            raw_name_from_url("https://cdn.example.org/images/2021/07/15/abc/face.jpg"),
            "2021_07_15_abc_face.jpg"
        );
    }

    #[test]
    fn raw_name_of_short_url_keeps_all_segments() {
        assert_eq!(raw_name_from_url("http://h/a.png"), "http:__h_a.png");
        assert_eq!(raw_name_from_url("a.png"), "a.png");
    }

    #[test]
    fn grayscale_sources_decode_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(3, 2, Luma([77])).save(&path).unwrap();

        let img = open_rgb_image(&path).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 1).0, [77, 77, 77]);
    }

    #[test]
    fn truncated_download_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.png");
        RgbImage::from_fn(64, 64, |x, y| image::Rgb([(x * 7 + y * 13) as u8, (x ^ y) as u8, 9]))
            .save(&path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(open_rgb_image(&path).is_err());
    }

    #[test]
    fn content_sniffing_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("face.png");
        RgbImage::new(2, 2).save(&png).unwrap();
        let renamed = dir.path().join("face.bin");
        std::fs::rename(&png, &renamed).unwrap();
        assert!(open_rgb_image(&renamed).is_ok());
    }
}
