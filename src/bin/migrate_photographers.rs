//! Photographer CSV -> JSON + SQL migration
//!
//! Reads the photographer contact spreadsheet, derives state and specialty
//! fields from the tag column, and writes a JSON array for review plus SQL
//! upserts for the `photographer_profiles` table.
//!
//! Usage:
//!   cargo run --release --bin migrate_photographers -- [OPTIONS]
//!
//! Options:
//!   --input <PATH>      Input CSV (default: raw-data/photographers.csv)
//!   --json-out <PATH>   JSON output (default: data/photographers.json)
//!   --sql-out <PATH>    SQL output (default: data/photographers.sql)

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shutterspot::migrate::{read_photographers, to_json, to_sql};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "migrate_photographers")]
#[command(about = "Convert the photographer CSV into JSON and SQL upserts")]
struct Args {
    /// Input CSV path
    #[arg(long, default_value = "raw-data/photographers.csv")]
    input: PathBuf,

    /// JSON output path
    #[arg(long, default_value = "data/photographers.json")]
    json_out: PathBuf,

    /// SQL output path
    #[arg(long, default_value = "data/photographers.sql")]
    sql_out: PathBuf,
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let args = Args::parse();

    info!("Reading CSV from {:?}", args.input);
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let report = read_photographers(file)?;

    let now = Utc::now();
    write_output(&args.json_out, &to_json(&report.imported, now)?)?;
    write_output(&args.sql_out, &to_sql(&report.imported, now))?;

    info!(
        "Migration complete: {} photographers, {} skipped, {} duplicate emails",
        report.imported.len(),
        report.skipped.len(),
        report.duplicates
    );
    info!("  JSON: {:?}", args.json_out);
    info!("  SQL:  {:?}", args.sql_out);

    for (row, reason) in report.skipped.iter().skip(5) {
        info!("  also skipped row {}: {}", row, reason);
    }

    Ok(())
}
