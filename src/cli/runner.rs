use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use rasterdiff::{DiffParams, api};

use super::args::CliArgs;

/// Where log lines go; stdout stays clean for the JSON report when one is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    Stdout,
    Stderr,
}

impl LogTarget {
    fn for_args(args: &CliArgs) -> Self {
        if args.json {
            LogTarget::Stderr
        } else {
            LogTarget::Stdout
        }
    }
}

fn init_logging(verbose: bool, target: LogTarget) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let writer = match target {
        LogTarget::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();
}

fn params_from_args(args: &CliArgs) -> DiffParams {
    DiffParams {
        mode: args.mode,
        primary_dir: args.primary_dir.clone(),
        secondary_dir: args.secondary_dir.clone(),
        output_dir: args.output_dir.clone(),
        primary_ext: args.primary_ext.clone(),
        secondary_ext: args.secondary_ext.clone(),
        bins: args.bins,
        dpi: args.dpi,
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.verbose, LogTarget::for_args(&args));

    let params = params_from_args(&args);
    info!("Primary directory: {:?}", params.primary_dir);
    info!("Secondary directory: {:?}", params.secondary_dir);
    info!("Output directory: {:?}", params.output_dir);

    let report = api::run(&params)?;

    info!("Comparison complete!");
    info!("Pairs: {}", report.pairs);
    info!("With data: {}", report.with_data);
    info!("Empty: {}", report.empty);
    info!("Failed: {}", report.failed);
    for output in &report.outputs {
        info!("Wrote: {:?}", output);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
