use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faceprep", version, about = "Face dataset fetcher and aligner")]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download every catalog image into the raw store
    Fetch(FetchArgs),
    /// Align every downloaded image into the aligned store
    Align(AlignArgs),
}

#[derive(Args)]
pub struct FetchArgs {
    /// Catalog JSON file
    #[arg(long, default_value = "./dataset.json")]
    pub catalog: PathBuf,

    /// Directory for downloaded raw images
    #[arg(long, default_value = "./raw")]
    pub raw_dir: PathBuf,

    /// GET attempts per URL
    #[arg(long, default_value_t = 4)]
    pub retries: u32,

    /// Lower bound of the random pause before each attempt, in seconds
    #[arg(long, default_value_t = 0.0)]
    pub min_delay: f64,

    /// Upper bound of the random pause before each attempt, in seconds
    #[arg(long, default_value_t = 2.0)]
    pub max_delay: f64,
}

#[derive(Args)]
pub struct AlignArgs {
    /// Catalog JSON file
    #[arg(long, default_value = "./dataset.json")]
    pub catalog: PathBuf,

    /// Directory holding the downloaded raw images
    #[arg(long, default_value = "./raw")]
    pub raw_dir: PathBuf,

    /// Directory for aligned output images
    #[arg(long, default_value = "./aligned")]
    pub aligned_dir: PathBuf,

    /// Worker threads
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Side of the aligned output image
    #[arg(long, default_value_t = 1024)]
    pub output_size: usize,

    /// Side of the intermediate transform square
    #[arg(long, default_value_t = 4096)]
    pub transform_size: usize,

    /// Leave off-image regions black instead of mirror-padding them
    #[arg(long, default_value_t = false)]
    pub no_padding: bool,
}
