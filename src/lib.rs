#![doc = r#"
faceprep: build an aligned face-image dataset from a landmark catalog.

The crate covers two stages. `fetch` downloads every source image listed in a
JSON catalog into a raw store, retrying each URL a bounded number of times
with a random pause before every attempt. `align` warps each raw image so the
eyes and mouth land at canonical positions, and writes a square RGB image per
catalog entry into the aligned store. Both stages skip work that is already on
disk, so an interrupted run is resumed by running it again.

Catalog format
--------------
```json
{
  "00001.png": {
    "image_url": "https://example.org/a/b/c/d/face.jpg",
    "raw_name": "a_b_c_d_face.jpg",
    "landmarks": {
      "eye_left": [700.0, 800.0], "eye_right": [1300.0, 800.0],
      "mouth_left": [750.0, 1300.0], "mouth_right": [1250.0, 1300.0]
    }
  }
}
```

Align one image in memory
-------------------------
```rust,no_run
use faceprep::{AlignParams, Landmarks, Point, align_image};

fn main() -> faceprep::Result<()> {
    let img = image::open("face.jpg")?.into_rgb8();
    let landmarks = Landmarks {
        eye_left: Point::new(700.0, 800.0),
        eye_right: Point::new(1300.0, 800.0),
        mouth_left: Point::new(750.0, 1300.0),
        mouth_right: Point::new(1250.0, 1300.0),
    };
    let aligned = align_image(&img, &landmarks, &AlignParams::default())?;
    assert_eq!(aligned.dimensions(), (1024, 1024));
    Ok(())
}
```

Align a whole catalog
---------------------
```rust,no_run
use std::path::Path;
use faceprep::{AlignmentTask, dispatch_alignment, load_catalog};

fn main() -> faceprep::Result<()> {
    let catalog = load_catalog(Path::new("dataset.json"))?;
    let task = AlignmentTask::new("raw", "aligned");
    let report = dispatch_alignment(catalog.entries(), &task, 8)?;
    println!("saved={} missing={} failed={}", report.saved(), report.missing_source, report.failed);
    Ok(())
}
```

Fetch raw images
----------------
```rust,no_run
use std::path::Path;
use faceprep::{FetchParams, load_catalog};
use faceprep::io::{BlockingHttpClient, RandomBackoff, fetch_catalog};

fn main() -> faceprep::Result<()> {
    let catalog = load_catalog(Path::new("dataset.json"))?;
    let client = BlockingHttpClient::new()?;
    let mut backoff = RandomBackoff::new();
    let report = fetch_catalog(&catalog, Path::new("raw"), &FetchParams::default(), &client, &mut backoff)?;
    for url in &report.not_found {
        eprintln!("not found: {url}");
    }
    Ok(())
}
```

Error handling
--------------
All public functions return `faceprep::Result<T>`. Only catalog loading and
argument validation are fatal for a batch; per-entry failures are counted in
the returned report.

Useful modules
--------------
- [`api`]: alignment task and batch dispatcher.
- [`core`]: alignment parameters and the image-processing pipeline.
- [`io`]: catalog, fetcher, raw-store decoding and atomic writers.
- [`types`]: points, landmarks and per-entry outcomes.
- [`error`]: crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::params::{AlignParams, FetchParams};
pub use crate::core::processing::pipeline::align_image;
pub use error::{Error, Result};
pub use types::{AlignmentOutcome, Landmarks, Point};

pub use io::catalog::{Catalog, CatalogEntry, load_catalog};
pub use io::fetch::{FetchReport, fetch_catalog};

pub use api::{AlignmentTask, BatchReport, dispatch_alignment};
