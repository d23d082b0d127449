//! Two-tier zip dataset loader
//!
//! The quick dataset (a population-ranked subset) is fetched at startup; the
//! full dataset is fetched lazily on first use. Each tier sits behind a
//! `tokio::sync::OnceCell`, so concurrent callers share one in-flight fetch and
//! then the cached `Arc`. Fetch failures never reach the caller: they are logged,
//! stored as the loader's error state, and answered with an empty dataset.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};

use crate::models::{is_valid_zip, ZipRecord};

/// Which of the two dataset files to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetTier {
    Quick,
    Full,
}

impl DatasetTier {
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetTier::Quick => "quick.json",
            DatasetTier::Full => "full.json",
        }
    }
}

impl fmt::Display for DatasetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetTier::Quick => write!(f, "quick"),
            DatasetTier::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("dataset file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can produce the raw records of a dataset tier.
pub trait DatasetSource: Send + Sync {
    fn fetch(
        &self,
        tier: DatasetTier,
    ) -> impl Future<Output = Result<Vec<ZipRecord>, DatasetError>> + Send;
}

/// Fetches `<base_url>/data/<tier>.json` over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, tier: DatasetTier) -> String {
        format!("{}/data/{}", self.base_url, tier.file_name())
    }
}

impl DatasetSource for HttpSource {
    async fn fetch(&self, tier: DatasetTier) -> Result<Vec<ZipRecord>, DatasetError> {
        let url = self.url_for(tier);
        let http_err = |source: reqwest::Error| DatasetError::Http {
            url: url.clone(),
            source,
        };

        let records = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .json::<Vec<ZipRecord>>()
            .await
            .map_err(http_err)?;

        Ok(records)
    }
}

/// Reads `<dir>/<tier>.json` from the local filesystem
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, tier: DatasetTier) -> PathBuf {
        self.dir.join(tier.file_name())
    }
}

impl DatasetSource for DirSource {
    async fn fetch(&self, tier: DatasetTier) -> Result<Vec<ZipRecord>, DatasetError> {
        let path = self.path_for(tier);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DatasetError::NotFound(path))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Datasets held in memory, e.g. embedded fixtures
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub quick: Vec<ZipRecord>,
    pub full: Vec<ZipRecord>,
}

impl DatasetSource for MemorySource {
    async fn fetch(&self, tier: DatasetTier) -> Result<Vec<ZipRecord>, DatasetError> {
        Ok(match tier {
            DatasetTier::Quick => self.quick.clone(),
            DatasetTier::Full => self.full.clone(),
        })
    }
}

/// Source picked at runtime from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Http(HttpSource),
    Dir(DirSource),
}

impl DatasetSource for ConfiguredSource {
    async fn fetch(&self, tier: DatasetTier) -> Result<Vec<ZipRecord>, DatasetError> {
        match self {
            ConfiguredSource::Http(source) => source.fetch(tier).await,
            ConfiguredSource::Dir(source) => source.fetch(tier).await,
        }
    }
}

/// Enforce the dataset invariant: valid 5-digit zips, unique, ascending.
///
/// Malformed zips are dropped; for duplicate zips the first occurrence wins.
pub fn normalize(mut records: Vec<ZipRecord>) -> Vec<ZipRecord> {
    let before = records.len();
    records.retain(|r| is_valid_zip(&r.zip));
    let malformed = before - records.len();

    records.sort_by(|a, b| a.zip.cmp(&b.zip));
    let sorted = records.len();
    records.dedup_by(|later, earlier| later.zip == earlier.zip);
    let duplicates = sorted - records.len();

    if malformed > 0 || duplicates > 0 {
        warn!(malformed, duplicates, "Dropped invalid zip records");
    }

    records
}

/// Lazily populated quick/full dataset cache.
pub struct ZipDataset<S> {
    source: S,
    quick: OnceCell<Arc<Vec<ZipRecord>>>,
    full: OnceCell<Arc<Vec<ZipRecord>>>,
    errors: RwLock<HashMap<DatasetTier, String>>,
    fetches: AtomicUsize,
}

impl<S: DatasetSource> ZipDataset<S> {
    /// Create a loader without fetching anything yet.
    pub fn new(source: S) -> Self {
        Self {
            source,
            quick: OnceCell::new(),
            full: OnceCell::new(),
            errors: RwLock::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Create a loader and fetch the quick dataset.
    pub async fn init(source: S) -> Self {
        let dataset = Self::new(source);
        dataset.load_quick().await;
        dataset
    }

    pub async fn load_quick(&self) -> Arc<Vec<ZipRecord>> {
        self.load(DatasetTier::Quick).await
    }

    /// Fetch the full dataset once and return the cached copy afterwards.
    ///
    /// Callers arriving while the first fetch is in flight wait for it rather
    /// than issuing their own request.
    pub async fn ensure_full_loaded(&self) -> Arc<Vec<ZipRecord>> {
        self.load(DatasetTier::Full).await
    }

    pub fn quick(&self) -> Option<Arc<Vec<ZipRecord>>> {
        self.quick.get().cloned()
    }

    pub fn full(&self) -> Option<Arc<Vec<ZipRecord>>> {
        self.full.get().cloned()
    }

    pub fn is_quick_ready(&self) -> bool {
        self.quick.initialized()
    }

    pub fn is_full_loaded(&self) -> bool {
        self.full.initialized()
    }

    /// Number of fetches issued against the source so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Errors of tiers whose latest fetch failed, quick first
    pub async fn last_error(&self) -> Option<String> {
        let errors = self.errors.read().await;
        let messages: Vec<&str> = [DatasetTier::Quick, DatasetTier::Full]
            .iter()
            .filter_map(|tier| errors.get(tier).map(String::as_str))
            .collect();
        (!messages.is_empty()).then(|| messages.join("; "))
    }

    /// Error of one tier, cleared once that tier loads
    pub async fn tier_error(&self, tier: DatasetTier) -> Option<String> {
        self.errors.read().await.get(&tier).cloned()
    }

    fn cell(&self, tier: DatasetTier) -> &OnceCell<Arc<Vec<ZipRecord>>> {
        match tier {
            DatasetTier::Quick => &self.quick,
            DatasetTier::Full => &self.full,
        }
    }

    async fn load(&self, tier: DatasetTier) -> Arc<Vec<ZipRecord>> {
        match self.cell(tier).get_or_try_init(|| self.fetch_tier(tier)).await {
            Ok(records) => Arc::clone(records),
            Err(e) => {
                warn!(tier = %tier, error = %e, "Failed to load zip dataset");
                self.errors
                    .write()
                    .await
                    .insert(tier, format!("{} dataset: {}", tier, e));
                Arc::new(Vec::new())
            }
        }
    }

    async fn fetch_tier(&self, tier: DatasetTier) -> Result<Arc<Vec<ZipRecord>>, DatasetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        debug!(tier = %tier, "Fetching zip dataset");

        let records = normalize(self.source.fetch(tier).await?);
        info!(tier = %tier, count = records.len(), "Loaded zip dataset");

        self.errors.write().await.remove(&tier);
        Ok(Arc::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(zip: &str, city: &str, state: &str, population: u64) -> ZipRecord {
        ZipRecord {
            zip: zip.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            population,
        }
    }

    /// Slow source so concurrent callers overlap with the first fetch
    struct SlowSource {
        inner: MemorySource,
    }

    impl DatasetSource for SlowSource {
        async fn fetch(&self, tier: DatasetTier) -> Result<Vec<ZipRecord>, DatasetError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.inner.fetch(tier).await
        }
    }

    struct FailingSource;

    impl DatasetSource for FailingSource {
        async fn fetch(&self, tier: DatasetTier) -> Result<Vec<ZipRecord>, DatasetError> {
            Err(DatasetError::NotFound(PathBuf::from(tier.file_name())))
        }
    }

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let records = vec![
            record("90002", "Los Angeles", "CA", 30000),
            record("1234", "Broken", "ZZ", 1),
            record("90001", "Los Angeles", "CA", 50000),
            record("90002", "Duplicate", "CA", 1),
        ];
        let normalized = normalize(records);
        let zips: Vec<&str> = normalized.iter().map(|r| r.zip.as_str()).collect();
        assert_eq!(zips, vec!["90001", "90002"]);
        assert_eq!(normalized[1].city, "Los Angeles");
    }

    #[tokio::test]
    async fn test_init_loads_quick_only() {
        let source = MemorySource {
            quick: vec![record("10001", "New York", "NY", 21000)],
            full: vec![],
        };
        let dataset = ZipDataset::init(source).await;
        assert!(dataset.is_quick_ready());
        assert!(!dataset.is_full_loaded());
        assert_eq!(dataset.fetch_count(), 1);
        assert_eq!(dataset.quick().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_full_loads_share_one_fetch() {
        let source = SlowSource {
            inner: MemorySource {
                quick: vec![],
                full: vec![record("90001", "Los Angeles", "CA", 50000)],
            },
        };
        let dataset = ZipDataset::new(source);

        let (a, b) = tokio::join!(dataset.ensure_full_loaded(), dataset.ensure_full_loaded());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(dataset.fetch_count(), 1);

        let c = dataset.ensure_full_loaded().await;
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(dataset.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_across_tasks() {
        let source = SlowSource {
            inner: MemorySource {
                quick: vec![],
                full: vec![record("60601", "Chicago", "IL", 12000)],
            },
        };
        let dataset = Arc::new(ZipDataset::new(source));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dataset = Arc::clone(&dataset);
                tokio::spawn(async move { dataset.ensure_full_loaded().await })
            })
            .collect();

        let mut loaded = Vec::new();
        for handle in handles {
            loaded.push(handle.await.unwrap());
        }
        assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(dataset.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_returns_empty_and_records_error() {
        let dataset = ZipDataset::new(FailingSource);

        let full = dataset.ensure_full_loaded().await;
        assert!(full.is_empty());
        assert!(!dataset.is_full_loaded());
        let error = dataset.last_error().await.unwrap();
        assert!(error.contains("full dataset"));

        // Unloaded tier retries on the next call
        dataset.ensure_full_loaded().await;
        assert_eq!(dataset.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_dir_source_reads_tier_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            record("73301", "Austin", "TX", 100),
            record("10001", "New York", "NY", 21000),
        ];
        std::fs::write(
            dir.path().join("full.json"),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();

        let dataset = ZipDataset::new(DirSource::new(dir.path()));
        let full = dataset.ensure_full_loaded().await;
        assert_eq!(full.len(), 2);
        assert_eq!(full[0].zip, "10001");

        // quick.json is missing
        let quick = dataset.load_quick().await;
        assert!(quick.is_empty());
        assert!(!dataset.is_quick_ready());
        assert!(dataset.last_error().await.unwrap().contains("quick.json"));
    }

    #[tokio::test]
    async fn test_tier_errors_cleared_independently() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("10001", "New York", "NY", 21000)];
        std::fs::write(
            dir.path().join("full.json"),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();

        let dataset = ZipDataset::new(DirSource::new(dir.path()));
        assert!(dataset.load_quick().await.is_empty());
        assert_eq!(dataset.ensure_full_loaded().await.len(), 1);

        // Full succeeding must not hide the quick failure
        assert!(dataset.tier_error(DatasetTier::Full).await.is_none());
        assert!(dataset.tier_error(DatasetTier::Quick).await.is_some());
        assert!(dataset.last_error().await.unwrap().contains("quick dataset"));

        std::fs::write(
            dir.path().join("quick.json"),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();
        assert_eq!(dataset.load_quick().await.len(), 1);
        assert!(dataset.last_error().await.is_none());
    }

    #[test]
    fn test_http_source_url() {
        let source = HttpSource::new("http://localhost:8080/");
        assert_eq!(
            source.url_for(DatasetTier::Quick),
            "http://localhost:8080/data/quick.json"
        );
    }
}
