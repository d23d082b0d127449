//! Zip dataset builder
//!
//! Converts a zip CSV (zip,city,state,latitude,longitude,population) into the
//! two files the search loads: `full.json` with every record and `quick.json`
//! with the most populous subset.
//!
//! Usage:
//!   cargo run --release --bin build_zip_datasets -- [OPTIONS]
//!
//! Options:
//!   --input <PATH>       Input CSV (default: raw-data/us-zips.csv)
//!   --out-dir <PATH>     Output directory (default: data)
//!   --quick-size <N>     Records in quick.json (default: 1000)

use anyhow::{Context, Result};
use clap::Parser;
use shutterspot::dataset_builder::{read_zip_csv, write_datasets, DEFAULT_QUICK_SIZE};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "build_zip_datasets")]
#[command(about = "Build quick.json and full.json from a zip CSV")]
struct Args {
    /// Input CSV path
    #[arg(long, default_value = "raw-data/us-zips.csv")]
    input: PathBuf,

    /// Output directory
    #[arg(long, env = "SHUTTERSPOT_DATA_DIR", default_value = "data")]
    out_dir: PathBuf,

    /// Number of records in the quick dataset
    #[arg(long, default_value_t = DEFAULT_QUICK_SIZE)]
    quick_size: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();

    info!("Reading CSV from {:?}", args.input);
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let records = read_zip_csv(file)?;

    let (quick, full) = write_datasets(&args.out_dir, &records, args.quick_size)
        .with_context(|| format!("Failed to write datasets to {}", args.out_dir.display()))?;

    info!("Wrote {:?}:", args.out_dir);
    info!("  quick.json: {} records", quick);
    info!("  full.json:  {} records", full);

    Ok(())
}
