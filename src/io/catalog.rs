//! Dataset catalog: maps each canonical aligned-image name to its source URL,
//! raw-store file name and facial landmarks.
//!
//! ```json
//! {
//!   "00001.png": {
//!     "image_url": "https://example.org/a/b/c/d/face.jpg",
//!     "raw_name": "a_b_c_d_face.jpg",
//!     "landmarks": {
//!       "eye_left": [700.0, 800.0],
//!       "eye_right": [1300.0, 800.0],
//!       "mouth_left": [750.0, 1300.0],
//!       "mouth_right": [1250.0, 1300.0]
//!     }
//!   }
//! }
//! ```
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::Landmarks;

/// One catalog record as stored in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub image_url: String,
    pub raw_name: String,
    pub landmarks: Landmarks,
}

/// A catalog record together with its canonical output name.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub image_url: String,
    pub raw_name: String,
    pub landmarks: Landmarks,
}

/// Loaded catalog, ordered by output name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_records(records: BTreeMap<String, CatalogRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|(name, r)| CatalogEntry {
                name,
                image_url: r.image_url,
                raw_name: r.raw_name,
                landmarks: r.landmarks,
            })
            .collect();
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: BTreeMap<String, CatalogRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read and parse a catalog file. Any failure here aborts a run before work starts.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path).map_err(|e| Error::catalog(path, e))?;
    let records: BTreeMap<String, CatalogRecord> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::catalog(path, e))?;
    let catalog = Catalog::from_records(records);
    info!("Loaded catalog {:?} with {} entries", path, catalog.len());
    Ok(catalog)
}
