//! Zip-code search and validation over the two-tier dataset
//!
//! Numeric queries are treated as zip prefixes and answered with raw records in
//! dataset order. Anything else is a case-insensitive city match, answered with
//! one [`CityAggregate`] per city+state: cities starting with the query rank
//! above substring-only matches, then by population.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::SearchConfig;
use crate::models::{is_valid_zip, CityAggregate, SearchHit, ZipRecord};
use crate::zip_dataset::{DatasetSource, ZipDataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    ZipPrefix,
    CityName,
}

pub fn classify(query: &str) -> QueryKind {
    if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
        QueryKind::ZipPrefix
    } else {
        QueryKind::CityName
    }
}

/// Linear scan for records matching a trimmed, non-empty query.
pub fn match_records<'a>(records: &'a [ZipRecord], query: &str) -> Vec<&'a ZipRecord> {
    match classify(query) {
        QueryKind::ZipPrefix => records.iter().filter(|r| r.zip.starts_with(query)).collect(),
        QueryKind::CityName => {
            let needle = query.to_lowercase();
            records
                .iter()
                .filter(|r| r.city.to_lowercase().contains(&needle))
                .collect()
        }
    }
}

struct CityGroup {
    aggregate: CityAggregate,
    prefix_match: bool,
}

/// Merge city matches sharing an exact city+state into ranked aggregates.
pub fn aggregate_cities(matches: &[&ZipRecord], query: &str) -> Vec<CityAggregate> {
    let needle = query.to_lowercase();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<CityGroup> = Vec::new();

    for record in matches {
        let key = (record.city.as_str(), record.state.as_str());
        match index.get(&key) {
            Some(&i) => {
                let agg = &mut groups[i].aggregate;
                if !agg.all_zips.contains(&record.zip) {
                    agg.all_zips.push(record.zip.clone());
                }
                if record.population > agg.representative_population {
                    agg.representative_population = record.population;
                    agg.primary_zip = record.zip.clone();
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(CityGroup {
                    aggregate: CityAggregate {
                        display_name: format!("{}, {}", record.city, record.state),
                        city: record.city.clone(),
                        state: record.state.clone(),
                        representative_population: record.population,
                        primary_zip: record.zip.clone(),
                        all_zips: vec![record.zip.clone()],
                    },
                    prefix_match: record.city.to_lowercase().starts_with(&needle),
                });
            }
        }
    }

    // Stable sort keeps first-seen order between equal keys
    groups.sort_by_key(|g| (!g.prefix_match, Reverse(g.aggregate.representative_population)));
    groups.into_iter().map(|g| g.aggregate).collect()
}

/// Run one query against one dataset and cap the result count.
pub fn search_records(records: &[ZipRecord], query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matches = match_records(records, query);
    match classify(query) {
        QueryKind::ZipPrefix => matches
            .into_iter()
            .take(limit)
            .map(|r| SearchHit::Zip(r.clone()))
            .collect(),
        QueryKind::CityName => aggregate_cities(&matches, query)
            .into_iter()
            .take(limit)
            .map(SearchHit::City)
            .collect(),
    }
}

/// Binary search over a zip-sorted dataset
pub fn find_zip<'a>(records: &'a [ZipRecord], zip: &str) -> Option<&'a ZipRecord> {
    records
        .binary_search_by(|r| r.zip.as_str().cmp(zip))
        .ok()
        .map(|i| &records[i])
}

/// Search/validate facade over a [`ZipDataset`]
pub struct ZipSearch<S> {
    dataset: ZipDataset<S>,
    config: SearchConfig,
}

impl<S: DatasetSource> ZipSearch<S> {
    pub fn new(dataset: ZipDataset<S>, config: SearchConfig) -> Self {
        Self { dataset, config }
    }

    /// Build a search over `source` with the quick dataset already fetched.
    pub async fn init(source: S, config: SearchConfig) -> Self {
        Self::new(ZipDataset::init(source).await, config)
    }

    pub fn dataset(&self) -> &ZipDataset<S> {
        &self.dataset
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub async fn ensure_full_loaded(&self) -> Arc<Vec<ZipRecord>> {
        self.dataset.ensure_full_loaded().await
    }

    /// Autocomplete lookup.
    ///
    /// Short queries are answered from the quick dataset when it has matches;
    /// everything else waits for the full dataset.
    pub async fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        if query.chars().count() <= self.config.quick_query_max_len {
            if let Some(quick) = self.dataset.quick() {
                let hits = search_records(&quick, query, self.config.quick_limit);
                if !hits.is_empty() {
                    debug!(query, hits = hits.len(), "Answered from quick dataset");
                    return hits;
                }
            }
        }

        let full = self.dataset.ensure_full_loaded().await;
        let hits = search_records(&full, query, self.config.full_limit);
        debug!(query, hits = hits.len(), "Answered from full dataset");
        hits
    }

    /// Exact lookup of a 5-digit zip, quick dataset first.
    pub async fn validate(&self, zip: &str) -> Option<ZipRecord> {
        if !is_valid_zip(zip) {
            return None;
        }

        if let Some(quick) = self.dataset.quick() {
            if let Some(record) = find_zip(&quick, zip) {
                return Some(record.clone());
            }
        }

        let full = self.dataset.ensure_full_loaded().await;
        find_zip(&full, zip).cloned()
    }
}
