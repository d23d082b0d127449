//! Build `quick.json` / `full.json` from a zip CSV
//!
//! Expected columns: zip,city,state,latitude,longitude,population

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::models::ZipRecord;
use crate::zip_dataset::{normalize, DatasetTier};

pub const DEFAULT_QUICK_SIZE: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSV row; blank or unparseable numeric cells become `None`
#[derive(Debug, Deserialize)]
struct ZipCsvRow {
    zip: String,
    city: String,
    state: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    population: Option<u64>,
}

impl From<ZipCsvRow> for ZipRecord {
    fn from(row: ZipCsvRow) -> Self {
        ZipRecord {
            zip: pad_zip(&row.zip),
            city: row.city,
            state: row.state,
            latitude: row.latitude.unwrap_or_default(),
            longitude: row.longitude.unwrap_or_default(),
            population: row.population.unwrap_or_default(),
        }
    }
}

/// Restore leading zeros lost by spreadsheet tools ("2134" -> "02134")
pub fn pad_zip(zip: &str) -> String {
    let zip = zip.trim();
    if !zip.is_empty() && zip.len() < 5 && zip.bytes().all(|b| b.is_ascii_digit()) {
        format!("{:0>5}", zip)
    } else {
        zip.to_string()
    }
}

/// Parse and normalize a zip CSV; unparseable rows are skipped.
pub fn read_zip_csv<R: Read>(reader: R) -> Result<Vec<ZipRecord>, BuildError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut error_count = 0;
    for (i, row) in rdr.deserialize::<ZipCsvRow>().enumerate() {
        match row {
            Ok(row) => records.push(ZipRecord::from(row)),
            Err(e) => {
                if error_count < 5 {
                    warn!("Failed to parse row {}: {}", i + 1, e);
                }
                error_count += 1;
            }
        }
    }

    info!("Parsed {} zip records ({} errors)", records.len(), error_count);
    Ok(normalize(records))
}

/// Top `size` records by population, re-sorted by zip
pub fn quick_subset(records: &[ZipRecord], size: usize) -> Vec<ZipRecord> {
    let mut ranked: Vec<&ZipRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.population.cmp(&a.population).then_with(|| a.zip.cmp(&b.zip)));
    ranked.truncate(size);

    let mut quick: Vec<ZipRecord> = ranked.into_iter().cloned().collect();
    quick.sort_by(|a, b| a.zip.cmp(&b.zip));
    quick
}

/// Write both tier files into `dir`
pub fn write_datasets(dir: &Path, full: &[ZipRecord], quick_size: usize) -> Result<(usize, usize), BuildError> {
    std::fs::create_dir_all(dir)?;

    let quick = quick_subset(full, quick_size);
    std::fs::write(dir.join(DatasetTier::Full.file_name()), serde_json::to_vec(full)?)?;
    std::fs::write(dir.join(DatasetTier::Quick.file_name()), serde_json::to_vec(&quick)?)?;

    Ok((quick.len(), full.len()))
}
