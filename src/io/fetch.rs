//! Sequential raw-image downloader with bounded, jittered retries.
//!
//! The HTTP client and the delay source are traits so the retry loop can be
//! driven without a network or real sleeps.
use std::path::Path;
use std::thread;
use std::time::Duration;

use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{debug, info, warn};

use crate::core::params::FetchParams;
use crate::error::Result;
use crate::io::catalog::Catalog;
use crate::io::store::raw_name_from_url;
use crate::io::writers::write_raw_bytes;

/// Status and body of a GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// `reqwest` blocking client. The body is only read for 200 responses.
pub struct BlockingHttpClient {
    client: reqwest::blocking::Client,
}

impl BlockingHttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("faceprep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpClient for BlockingHttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = if status == 200 {
            response.bytes()?.to_vec()
        } else {
            Vec::new()
        };
        Ok(HttpResponse { status, body })
    }
}

/// Pause taken before every download attempt.
pub trait Backoff {
    fn wait(&mut self, min: Duration, max: Duration);
}

/// Sleeps for a uniformly random duration in `[min, max]`.
pub struct RandomBackoff<R = ThreadRng> {
    rng: R,
}

impl RandomBackoff<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomBackoff<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomBackoff<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn pick(&mut self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        Duration::from_secs_f64(self.rng.gen_range(min.as_secs_f64()..=max.as_secs_f64()))
    }
}

impl<R: Rng> Backoff for RandomBackoff<R> {
    fn wait(&mut self, min: Duration, max: Duration) {
        let delay = self.pick(min, max);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Result of a fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub downloaded: usize,
    pub existing: usize,
    /// URLs that never answered 200, one entry per failed item
    pub not_found: Vec<String>,
    /// URLs whose body was received but could not be stored
    pub failed_writes: Vec<String>,
}

/// GET `url` up to `params.retries` times, pausing before every attempt.
/// Returns the body of the first 200 response.
pub fn download_with_retry(
    url: &str,
    params: &FetchParams,
    client: &impl HttpClient,
    backoff: &mut impl Backoff,
) -> Option<Vec<u8>> {
    let (min, max) = params.delay_bounds();
    for attempt in 1..=params.retries {
        backoff.wait(min, max);
        match client.get(url) {
            Ok(response) if response.status == 200 => {
                if attempt > 1 {
                    debug!(attempt, url, "Download succeeded after retry");
                }
                return Some(response.body);
            }
            Ok(response) => {
                debug!(status = response.status, attempt, url, "Download attempt failed");
            }
            Err(e) => {
                debug!(error = %e, attempt, url, "Download attempt failed");
            }
        }
    }
    None
}

/// Download every catalog URL into `raw_dir`, skipping files already present.
pub fn fetch_catalog(
    catalog: &Catalog,
    raw_dir: &Path,
    params: &FetchParams,
    client: &impl HttpClient,
    backoff: &mut impl Backoff,
) -> Result<FetchReport> {
    params.validate()?;
    std::fs::create_dir_all(raw_dir)?;

    let total = catalog.len();
    let mut report = FetchReport::default();

    for (idx, entry) in catalog.entries().iter().enumerate() {
        let url = &entry.image_url;
        let raw_name = raw_name_from_url(url);
        let raw_path = raw_dir.join(&raw_name);

        if raw_path.exists() {
            info!("exists [{}/{}] {}", idx, total, raw_name);
            report.existing += 1;
            continue;
        }

        match download_with_retry(url, params, client, backoff) {
            Some(body) => match write_raw_bytes(&raw_path, &body) {
                Ok(()) => {
                    info!("[{}/{}] {}", idx, total, raw_name);
                    report.downloaded += 1;
                }
                Err(e) => {
                    warn!("Failed to store [{}/{}] {}: {}", idx, total, raw_name, e);
                    report.failed_writes.push(url.clone());
                }
            },
            None => {
                warn!("Not found [{}/{}] {}", idx, total, raw_name);
                report.not_found.push(url.clone());
            }
        }
    }

    Ok(report)
}
