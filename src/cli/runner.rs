use std::fs;

use tracing::info;
use tracing_subscriber::EnvFilter;

use faceprep::io::{BlockingHttpClient, RandomBackoff, fetch_catalog, load_catalog};
use faceprep::{AlignParams, AlignmentTask, FetchParams, dispatch_alignment};

use super::args::{AlignArgs, CliArgs, Command, FetchArgs};
use super::errors::AppError;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn fetch_params(args: &FetchArgs) -> Result<FetchParams, AppError> {
    let params = FetchParams {
        retries: args.retries,
        min_delay: args.min_delay,
        max_delay: args.max_delay,
    };
    if params.validate().is_err() {
        return Err(AppError::InvalidDelay {
            min: args.min_delay,
            max: args.max_delay,
        });
    }
    Ok(params)
}

fn align_params(args: &AlignArgs) -> Result<AlignParams, AppError> {
    if args.workers == 0 {
        return Err(AppError::ZeroWorkers {
            workers: args.workers,
        });
    }
    for size in [args.output_size, args.transform_size] {
        if size == 0 {
            return Err(AppError::ZeroSize { size });
        }
    }
    Ok(AlignParams {
        output_size: args.output_size,
        transform_size: args.transform_size,
        enable_padding: !args.no_padding,
    })
}

fn run_fetch(args: FetchArgs) -> Result<(), AppError> {
    let params = fetch_params(&args)?;
    let catalog = load_catalog(&args.catalog)?;

    fs::create_dir_all(&args.raw_dir)?;
    info!("Raw directory: {:?}", args.raw_dir);

    let client = BlockingHttpClient::new()?;
    let mut backoff = RandomBackoff::new();
    let report = fetch_catalog(&catalog, &args.raw_dir, &params, &client, &mut backoff)?;

    info!(
        "Fetch complete: downloaded={} existing={} not_found={}",
        report.downloaded,
        report.existing,
        report.not_found.len()
    );
    println!("URLs Not Found:");
    for url in &report.not_found {
        println!("{url}");
    }
    if !report.failed_writes.is_empty() {
        println!("URLs Not Stored:");
        for url in &report.failed_writes {
            println!("{url}");
        }
    }
    Ok(())
}

fn run_align(args: AlignArgs) -> Result<(), AppError> {
    let params = align_params(&args)?;
    let catalog = load_catalog(&args.catalog)?;

    fs::create_dir_all(&args.aligned_dir)?;
    info!("Raw directory: {:?}", args.raw_dir);
    info!("Aligned directory: {:?}", args.aligned_dir);

    let task = AlignmentTask::new(&args.raw_dir, &args.aligned_dir).with_params(params);
    let report = dispatch_alignment(catalog.entries(), &task, args.workers)?;

    println!("num of saved images: {}", report.saved());
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    match args.command {
        Command::Fetch(fetch) => run_fetch(fetch)?,
        Command::Align(align) => run_align(align)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn align_defaults() {
        let args = CliArgs::try_parse_from(["faceprep", "align"]).unwrap();
        let Command::Align(align) = args.command else {
            panic!("expected align");
        };
        assert_eq!(align.workers, 8);
        assert_eq!(align_params(&align).unwrap(), AlignParams::default());
    }

    #[test]
    fn no_padding_and_sizes_are_forwarded() {
        let args = CliArgs::try_parse_from([
            "faceprep",
            "--log",
            "align",
            "--output-size",
            "256",
            "--transform-size",
            "512",
            "--no-padding",
        ])
        .unwrap();
        assert!(args.log);
        let Command::Align(align) = args.command else {
            panic!("expected align");
        };
        let params = align_params(&align).unwrap();
        assert_eq!(params.output_size, 256);
        assert_eq!(params.transform_size, 512);
        assert!(!params.enable_padding);
    }

    #[test]
    fn zero_workers_rejected_before_work() {
        let args = CliArgs::try_parse_from(["faceprep", "align", "--workers", "0"]).unwrap();
        let Command::Align(align) = args.command else {
            panic!("expected align");
        };
        assert!(matches!(
            align_params(&align),
            Err(AppError::ZeroWorkers { workers: 0 })
        ));
    }

    #[test]
    fn fetch_defaults_and_delay_validation() {
        let args = CliArgs::try_parse_from(["faceprep", "fetch"]).unwrap();
        let Command::Fetch(fetch) = args.command else {
            panic!("expected fetch");
        };
        assert_eq!(fetch_params(&fetch).unwrap(), FetchParams::default());

        let args =
            CliArgs::try_parse_from(["faceprep", "fetch", "--min-delay", "3", "--max-delay", "1"])
                .unwrap();
        let Command::Fetch(fetch) = args.command else {
            panic!("expected fetch");
        };
        assert!(matches!(
            fetch_params(&fetch),
            Err(AppError::InvalidDelay { .. })
        ));
    }
}
