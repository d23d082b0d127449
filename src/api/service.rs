//! Shared business logic for the marketplace API
//!
//! Handlers stay thin; everything they answer goes through this service.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::filters::ProfileFilter;
use crate::models::{ProfileRecord, SearchHit, ZipRecord};
use crate::zip_dataset::DatasetSource;
use crate::zip_search::ZipSearch;

pub struct MarketplaceService<S> {
    zips: ZipSearch<S>,
    profiles: Vec<ProfileRecord>,
}

impl<S: DatasetSource> MarketplaceService<S> {
    pub fn new(zips: ZipSearch<S>, profiles: Vec<ProfileRecord>) -> Self {
        Self { zips, profiles }
    }

    pub fn zips(&self) -> &ZipSearch<S> {
        &self.zips
    }

    pub async fn search_zips(&self, query: &str) -> Vec<SearchHit> {
        self.zips.search(query).await
    }

    pub async fn validate_zip(&self, zip: &str) -> Option<ZipRecord> {
        self.zips.validate(zip).await
    }

    /// Matching profiles, always filtered from the full listing
    pub fn find_photographers(&self, filter: &ProfileFilter) -> Vec<&ProfileRecord> {
        filter.apply(&self.profiles)
    }

    pub fn photographer(&self, id: &str) -> Option<&ProfileRecord> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// Kick off the full dataset fetch without waiting for it
    pub fn prefetch_full(self: Arc<Self>)
    where
        S: 'static,
    {
        tokio::spawn(async move {
            self.zips.ensure_full_loaded().await;
        });
    }
}

/// Read a JSON array of profiles from disk
pub fn load_profiles(path: &Path) -> Result<Vec<ProfileRecord>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read profiles from {}", path.display()))?;
    let profiles: Vec<ProfileRecord> = serde_json::from_slice(&bytes)
        .with_context(|| format!("Malformed profiles file {}", path.display()))?;
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::mock_profiles::mock_profiles;
    use crate::zip_dataset::MemorySource;

    #[tokio::test]
    async fn test_photographer_lookup() {
        let zips = ZipSearch::init(MemorySource::default(), SearchConfig::default()).await;
        let service = MarketplaceService::new(zips, mock_profiles(10, 42));

        assert_eq!(service.profile_count(), 10);
        assert!(service.photographer("pg-0003").is_some());
        assert!(service.photographer("missing").is_none());
        assert_eq!(service.find_photographers(&ProfileFilter::new()).len(), 10);
    }

    #[test]
    fn test_load_profiles_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let profiles = mock_profiles(5, 1);
        std::fs::write(&path, serde_json::to_vec(&profiles).unwrap()).unwrap();

        assert_eq!(load_profiles(&path).unwrap(), profiles);
        assert!(load_profiles(&dir.path().join("nope.json")).is_err());
    }
}
