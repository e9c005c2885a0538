//! Command Line Interface (CLI) layer for faceprep.
//!
//! Defines argument parsing (`args`), error types (`errors`) and the
//! orchestration of the `fetch` and `align` stages (`runner`). Embedders
//! should call `faceprep::api` and `faceprep::io` directly instead.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
