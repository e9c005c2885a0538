//! I/O layer: the dataset catalog, the raw-image fetcher, raw-store naming and
//! decoding, and atomic `writers` for the raw and aligned stores.
pub mod catalog;
pub use catalog::{Catalog, CatalogEntry, CatalogRecord, load_catalog};

pub mod fetch;
pub use fetch::{
    Backoff, BlockingHttpClient, FetchReport, HttpClient, HttpResponse, RandomBackoff,
    download_with_retry, fetch_catalog,
};

pub mod store;
pub use store::{open_rgb_image, raw_name_from_url};

pub mod writers;
