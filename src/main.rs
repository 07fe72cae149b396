use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;

use taxi_percentile::{
    filter_by_percentile, load_with, write_parquet, LoadOptions, Percentile,
    DEFAULT_DISTANCE_COLUMN,
};

#[derive(Parser, Debug)]
#[command(name = "taxi-percentile")]
#[command(about = "Return NYC Yellow Taxi trips over a given distance percentile.")]
#[command(version)]
struct Args {
    /// Path or URL to Parquet file
    input_file: String,

    /// Output Parquet file (optional)
    output_file: Option<PathBuf>,

    /// Percentile, strictly between 0 and 1
    #[arg(long, default_value_t = 0.9, allow_negative_numbers = true)]
    percentile: f64,

    /// Distance column to rank trips by
    #[arg(long, default_value = DEFAULT_DISTANCE_COLUMN)]
    column: String,

    /// Download timeout for URL inputs, in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Directory URL inputs are staged in before decoding (system temp dir by default)
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Rows previewed when no output file is given
    #[arg(long, default_value_t = 5)]
    head: usize,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(&args, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load, filter and report on one input, writing the report to `out`.
fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    // Validate before touching the network or disk.
    let percentile = Percentile::new(args.percentile).context("invalid --percentile")?;
    let options = LoadOptions {
        timeout: Duration::from_secs(args.timeout_secs),
        download_dir: args.download_dir.clone(),
        ..LoadOptions::default()
    };

    let trips = load_with(&args.input_file, &options)?;
    let (over, threshold) = filter_by_percentile(&trips, percentile, &args.column)?;

    writeln!(out, "Total trips: {}", trips.num_rows())?;
    let Some(threshold) = threshold else {
        if trips.is_empty() {
            writeln!(out, "Input file is empty.")?;
        } else {
            writeln!(out, "No usable values in '{}'.", args.column)?;
        }
        return Ok(());
    };

    writeln!(out, "{percentile} percentile: {threshold:.4} miles")?;
    writeln!(out, "Trips over percentile: {}", over.num_rows())?;

    if let Some(output) = &args.output_file {
        write_parquet(&over, output)?;
        writeln!(out, "Output written to: {}", output.display())?;
    } else if !over.is_empty() {
        let head = over.batch().slice(0, args.head.min(over.num_rows()));
        let preview = pretty_format_batches(&[head]).context("formatting preview")?;
        writeln!(out, "\nFirst trips over percentile:")?;
        writeln!(out, "{preview}")?;
    }

    Ok(())
}
