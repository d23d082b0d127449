//! Photographer filter pipeline
//!
//! A [`ProfileFilter`] narrows a listing with AND across dimensions and OR
//! within the multi-value ones. Unset dimensions pass everything. Filtering
//! borrows from the source slice and keeps its order, so the caller re-runs
//! the pipeline over the untouched source whenever a dimension changes.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::models::ProfileRecord;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("invalid price range '{0}' (expected e.g. \"100-200\" or \"500+\")")]
    InvalidPriceRange(String),
    #[error("invalid minimum rating '{0}'")]
    InvalidRating(String),
}

/// Hourly-rate bracket; `max: None` is open-ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, rate: f64) -> bool {
        rate >= self.min && self.max.map_or(true, |max| rate <= max)
    }
}

impl FromStr for PriceRange {
    type Err = FilterError;

    /// Parses UI range tags: `"100-200"`, `"500+"`, `"200-500+"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterError::InvalidPriceRange(s.to_string());
        let edge = |token: &str| -> Result<(f64, bool), FilterError> {
            let token = token.trim();
            let (number, open) = match token.strip_suffix('+') {
                Some(number) => (number, true),
                None => (token, false),
            };
            let value: f64 = number.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            Ok((value, open))
        };

        let parts: Vec<&str> = s.split('-').collect();
        match parts[..] {
            [single] => match edge(single)? {
                (min, true) => Ok(PriceRange::at_least(min)),
                (_, false) => Err(invalid()),
            },
            [lower, upper] => {
                let (min, lower_open) = edge(lower)?;
                let (max, upper_open) = edge(upper)?;
                if lower_open {
                    return Err(invalid());
                }
                if upper_open {
                    Ok(PriceRange::at_least(min))
                } else if min <= max {
                    Ok(PriceRange::between(min, max))
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFilter {
    pub min_rating: Option<f64>,
    pub price: Option<PriceRange>,
    /// Matches profiles offering any of these
    pub specialties: BTreeSet<String>,
    /// Matches profiles speaking any of these
    pub languages: BTreeSet<String>,
    /// Case-insensitive substring of city or state
    pub location: Option<String>,
}

impl ProfileFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_price(mut self, range: PriceRange) -> Self {
        self.price = Some(range);
        self
    }

    pub fn with_specialties<I, T>(mut self, specialties: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.specialties = specialties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_languages<I, T>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// True when no dimension is configured
    pub fn is_empty(&self) -> bool {
        self.min_rating.is_none()
            && self.price.is_none()
            && self.specialties.is_empty()
            && self.languages.is_empty()
            && self.location.is_none()
    }

    pub fn matches(&self, profile: &ProfileRecord) -> bool {
        if let Some(min) = self.min_rating {
            if profile.average_rating < min {
                return false;
            }
        }

        if let Some(range) = &self.price {
            if !range.contains(profile.hourly_rate) {
                return false;
            }
        }

        if !any_shared(&self.specialties, &profile.specialties)
            || !any_shared(&self.languages, &profile.languages)
        {
            return false;
        }

        match &self.location {
            Some(location) => {
                let needle = location.to_lowercase();
                profile.location_city.to_lowercase().contains(&needle)
                    || profile.location_state.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Matching profiles in source order
    pub fn apply<'a>(&self, profiles: &'a [ProfileRecord]) -> Vec<&'a ProfileRecord> {
        profiles.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Empty `wanted` passes everything
fn any_shared(wanted: &BTreeSet<String>, offered: &BTreeSet<String>) -> bool {
    wanted.is_empty()
        || wanted
            .iter()
            .any(|w| offered.iter().any(|o| o.eq_ignore_ascii_case(w)))
}

/// Filter settings as they arrive from a query string.
///
/// Carries the UI's sentinel values (`"all"`, `0`, empty strings); converting
/// into [`ProfileFilter`] turns those into unset dimensions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default, alias = "priceRange")]
    pub price: Option<String>,
    /// Comma separated
    #[serde(default)]
    pub specialties: Option<String>,
    /// Comma separated
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default, alias = "zip")]
    pub location: Option<String>,
}

/// Empty or "all" (any case) leaves a dimension unconstrained
fn is_unset(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

fn split_list(value: Option<&str>) -> BTreeSet<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !is_unset(s))
        .map(str::to_string)
        .collect()
}

impl TryFrom<FilterParams> for ProfileFilter {
    type Error = FilterError;

    fn try_from(params: FilterParams) -> Result<Self, Self::Error> {
        let min_rating = match params.rating.as_deref().map(str::trim) {
            None => None,
            Some(raw) if is_unset(raw) => None,
            Some(raw) => {
                let rating: f64 = raw
                    .parse()
                    .map_err(|_| FilterError::InvalidRating(raw.to_string()))?;
                if !rating.is_finite() || rating < 0.0 {
                    return Err(FilterError::InvalidRating(raw.to_string()));
                }
                (rating > 0.0).then_some(rating)
            }
        };

        let price = match params.price.as_deref().map(str::trim) {
            None => None,
            Some(raw) if is_unset(raw) => None,
            Some(raw) => Some(raw.parse::<PriceRange>()?),
        };

        let location = params
            .location
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ProfileFilter {
            min_rating,
            price,
            specialties: split_list(params.specialties.as_deref()),
            languages: split_list(params.languages.as_deref()),
            location,
        })
    }
}
