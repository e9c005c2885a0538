//! High-level library API: align single catalog entries against the raw and
//! aligned stores, and dispatch a whole catalog over a fixed worker pool.
//! Prefer these entrypoints over the low-level processing modules when
//! integrating faceprep.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::params::AlignParams;
use crate::core::processing::pipeline::align_image;
use crate::error::{Error, Result};
use crate::io::catalog::CatalogEntry;
use crate::io::store::open_rgb_image;
use crate::io::writers::write_aligned_image;
use crate::types::AlignmentOutcome;

/// Aligns one catalog entry from the raw store into the aligned store.
#[derive(Debug, Clone)]
pub struct AlignmentTask {
    raw_dir: PathBuf,
    aligned_dir: PathBuf,
    params: AlignParams,
}

impl AlignmentTask {
    pub fn new(raw_dir: impl Into<PathBuf>, aligned_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            aligned_dir: aligned_dir.into(),
            params: AlignParams::default(),
        }
    }

    pub fn with_params(mut self, params: AlignParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &AlignParams {
        &self.params
    }

    pub fn aligned_dir(&self) -> &Path {
        &self.aligned_dir
    }

    pub fn output_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.aligned_dir.join(&entry.name)
    }

    pub fn source_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.raw_dir.join(&entry.raw_name)
    }

    /// Produce the aligned image for `entry` unless it already exists.
    ///
    /// An existing output short-circuits before the raw store is touched, so
    /// re-running a batch resumes where it stopped.
    pub fn process(&self, entry: &CatalogEntry) -> Result<AlignmentOutcome> {
        let target = self.output_path(entry);
        if target.exists() {
            debug!("Aligned image exists: {:?}", target);
            return Ok(AlignmentOutcome::Skipped);
        }

        let source = self.source_path(entry);
        if !source.exists() {
            warn!("Source image not found: {:?}", source);
            return Ok(AlignmentOutcome::MissingSource);
        }

        let img = open_rgb_image(&source)?;
        let aligned = align_image(&img, &entry.landmarks, &self.params)?;
        write_aligned_image(&target, &aligned)?;
        Ok(AlignmentOutcome::Produced)
    }
}

/// Summary of an alignment batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub produced: usize,
    pub skipped: usize,
    pub missing_source: usize,
    pub failed: usize,
}

impl BatchReport {
    /// Aligned images present after the run, new or pre-existing.
    pub fn saved(&self) -> usize {
        self.produced + self.skipped
    }

    pub fn total(&self) -> usize {
        self.produced + self.skipped + self.missing_source + self.failed
    }

    fn record(&mut self, result: &Result<AlignmentOutcome>) {
        match result {
            Ok(AlignmentOutcome::Produced) => self.produced += 1,
            Ok(AlignmentOutcome::Skipped) => self.skipped += 1,
            Ok(AlignmentOutcome::MissingSource) => self.missing_source += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Run `task` for every entry on a pool of `workers` threads.
///
/// Results are tallied as they arrive, in completion order. A failing or
/// panicking entry is logged and counted; it never stops the others.
pub fn dispatch_alignment(
    entries: &[CatalogEntry],
    task: &AlignmentTask,
    workers: usize,
) -> Result<BatchReport> {
    dispatch_with(entries, workers, |entry| task.process(entry))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn dispatch_with<F>(entries: &[CatalogEntry], workers: usize, process: F) -> Result<BatchReport>
where
    F: Fn(&CatalogEntry) -> Result<AlignmentOutcome> + Sync,
{
    if workers == 0 {
        return Err(Error::InvalidArgument {
            arg: "workers",
            value: workers.to_string(),
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("align-{i}"))
        .build()?;

    let total = entries.len();
    info!("Aligning {} entries with {} workers", total, workers);

    let (tx, rx) = mpsc::channel();
    let mut report = BatchReport::default();
    let process = &process;

    std::thread::scope(|scope| {
        scope.spawn(move || {
            pool.install(|| {
                entries.par_iter().for_each_with(tx, |tx, entry| {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| process(entry)))
                        .unwrap_or_else(|payload| {
                            Err(Error::Processing(format!(
                                "panicked: {}",
                                panic_message(payload.as_ref())
                            )))
                        });
                    // The receiver outlives every sender.
                    let _ = tx.send((entry, result));
                });
            });
        });

        for (done, (entry, result)) in rx.iter().enumerate() {
            report.record(&result);
            match &result {
                Ok(outcome) => info!("{} [{}/{}] {}", outcome, done + 1, total, entry.name),
                Err(e) => warn!("failed [{}/{}] {}: {}", done + 1, total, entry.name, e),
            }
        }
    });

    info!(
        "Alignment complete: produced={} skipped={} missing={} failed={}",
        report.produced, report.skipped, report.missing_source, report.failed
    );
    Ok(report)
}
