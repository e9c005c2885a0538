use std::io::Write;
use std::path::Path;

use image::{ImageFormat, RgbImage};

use super::persist_atomically;
use crate::error::Result;

/// Encode an aligned image in the format implied by the file extension.
pub fn write_aligned_image(output: &Path, img: &RgbImage) -> Result<()> {
    let format = ImageFormat::from_path(output)?;
    persist_atomically(output, |writer| {
        img.write_to(writer, format)?;
        Ok(())
    })
}

/// Store a downloaded body verbatim.
pub fn write_raw_bytes(output: &Path, bytes: &[u8]) -> Result<()> {
    persist_atomically(output, |writer| {
        writer.write_all(bytes)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn png_round_trips_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        let img = RgbImage::from_fn(6, 4, |x, y| Rgb([x as u8, y as u8, 3]));

        write_aligned_image(&path, &img).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back, img);
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("face.png")]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbImage::new(2, 2);
        assert!(write_aligned_image(&dir.path().join("face.unknown"), &img).is_err());
        assert!(!dir.path().join("face.unknown").exists());
    }

    #[test]
    fn raw_bytes_are_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.jpg");
        write_raw_bytes(&path, b"\xff\xd8payload").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\xff\xd8payload");
    }
}
