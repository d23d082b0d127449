//! Runtime configuration
//!
//! Search tuning lives in [`SearchConfig`]; binaries assemble an [`AppConfig`]
//! from their clap arguments (which fall back to `SHUTTERSPOT_*` env vars).

use std::path::PathBuf;

use crate::zip_dataset::{ConfiguredSource, DirSource, HttpSource};

/// Tuning knobs for [`crate::ZipSearch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Queries up to this many characters try the quick dataset first
    pub quick_query_max_len: usize,
    /// Result cap when answering from the quick dataset
    pub quick_limit: usize,
    /// Result cap when answering from the full dataset
    pub full_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            quick_query_max_len: 3,
            quick_limit: 10,
            full_limit: 15,
        }
    }
}

/// Where the server gets its data from
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory holding `quick.json` / `full.json`
    pub data_dir: PathBuf,
    /// Remote base URL; when set, datasets are fetched over HTTP instead of `data_dir`
    pub data_url: Option<String>,
    /// JSON array of profiles; mock profiles are generated when absent
    pub profiles_path: Option<PathBuf>,
    pub mock_profiles: usize,
    pub seed: u64,
    pub search: SearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("data"),
            data_url: None,
            profiles_path: None,
            mock_profiles: 48,
            seed: 42,
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn dataset_source(&self) -> ConfiguredSource {
        match &self.data_url {
            Some(url) => ConfiguredSource::Http(HttpSource::new(url)),
            None => ConfiguredSource::Dir(DirSource::new(&self.data_dir)),
        }
    }
}
