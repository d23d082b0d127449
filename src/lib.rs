pub mod api;
pub mod config;
pub mod dataset_builder;
pub mod filters;
pub mod migrate;
pub mod mock_profiles;
pub mod models;
pub mod state_names;
pub mod zip_dataset;
pub mod zip_search;

pub use config::SearchConfig;
pub use filters::{FilterParams, PriceRange, ProfileFilter};
pub use models::{CityAggregate, ProfileRecord, SearchHit, ZipRecord};
pub use zip_dataset::{DatasetSource, DatasetTier, DirSource, HttpSource, ZipDataset};
pub use zip_search::ZipSearch;
