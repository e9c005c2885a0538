//! Writers for the raw and aligned stores.
//!
//! Every file is written to a hidden temporary file in the destination
//! directory and renamed into place, so an interrupted run never leaves a
//! partial image under a final name (which would otherwise be skipped as
//! already done on the next run).
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

pub mod raster;

pub use raster::{write_aligned_image, write_raw_bytes};

pub(crate) fn persist_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
