//! Mock photographer listings for development
//!
//! Seeded so a given (count, seed) pair always yields the same listing.

use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::BTreeSet;

use crate::models::ProfileRecord;

const SPECIALTIES: &[&str] = &[
    "Wedding",
    "Portrait",
    "Event",
    "Family",
    "Newborn",
    "Headshots",
    "Real Estate",
    "Product",
    "Fashion",
    "Sports",
    "Pet",
    "Engagement",
];

const LANGUAGES: &[&str] = &[
    "Spanish",
    "French",
    "Mandarin",
    "Portuguese",
    "German",
    "Korean",
    "Vietnamese",
    "Arabic",
];

const CITIES: &[(&str, &str)] = &[
    ("Austin", "TX"),
    ("Dallas", "TX"),
    ("Los Angeles", "CA"),
    ("San Diego", "CA"),
    ("New York", "NY"),
    ("Chicago", "IL"),
    ("Miami", "FL"),
    ("Seattle", "WA"),
    ("Denver", "CO"),
    ("Atlanta", "GA"),
    ("Portland", "OR"),
    ("Nashville", "TN"),
];

const BIO_STYLES: &[&str] = &[
    "Natural-light storyteller",
    "Documentary-style shooter",
    "Bold, editorial look",
    "Candid moments over posed shots",
    "Fine-art approach",
];

/// Deterministic [`ProfileRecord`] generator
pub struct ProfileGenerator {
    rng: StdRng,
    next_id: usize,
}

impl ProfileGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: 1,
        }
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.rng.gen_range(0..items.len())]
    }

    pub fn generate(&mut self) -> ProfileRecord {
        let id = format!("pg-{:04}", self.next_id);
        self.next_id += 1;

        let specialty_count = self.rng.gen_range(1..=3);
        let specialties: BTreeSet<String> = SPECIALTIES
            .choose_multiple(&mut self.rng, specialty_count)
            .map(|s| s.to_string())
            .collect();

        // Everyone speaks English; some listings add one more language
        let mut languages: BTreeSet<String> = BTreeSet::new();
        languages.insert("English".to_string());
        if self.rng.gen_bool(0.4) {
            languages.insert(self.pick(LANGUAGES).to_string());
        }

        let (city, state) = CITIES[self.rng.gen_range(0..CITIES.len())];
        let years_experience = self.rng.gen_range(1..=25);
        let hourly_rate = self.rng.gen_range(3..=30) as f64 * 25.0;
        let average_rating = self.rng.gen_range(30..=50) as f64 / 10.0;
        let total_reviews = self.rng.gen_range(0..=240);
        let total_bookings = total_reviews + self.rng.gen_range(0..=120);

        let lead = specialties.iter().next().map(String::as_str).unwrap_or("Portrait");
        let bio = format!(
            "{} based in {}, {}. {} years of {} photography.",
            self.pick(BIO_STYLES),
            city,
            state,
            years_experience,
            lead.to_lowercase()
        );

        let image_count = self.rng.gen_range(3..=6);
        let portfolio_images = (1..=image_count)
            .map(|i| format!("https://images.shutterspot.dev/{}/{}.jpg", id, i))
            .collect();

        ProfileRecord {
            id,
            bio,
            specialties,
            languages,
            years_experience,
            hourly_rate,
            location_city: city.to_string(),
            location_state: state.to_string(),
            average_rating,
            total_reviews,
            total_bookings,
            portfolio_images,
        }
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<ProfileRecord> {
        (0..count).map(|_| self.generate()).collect()
    }
}

/// Convenience wrapper for a one-shot listing
pub fn mock_profiles(count: usize, seed: u64) -> Vec<ProfileRecord> {
    ProfileGenerator::new(seed).generate_many(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(mock_profiles(20, 42), mock_profiles(20, 42));
        assert_ne!(mock_profiles(20, 42), mock_profiles(20, 43));
    }

    #[test]
    fn test_profile_shape() {
        for profile in mock_profiles(100, 1) {
            assert!(!profile.specialties.is_empty() && profile.specialties.len() <= 3);
            assert!(profile.languages.contains("English"));
            assert!((3.0..=5.0).contains(&profile.average_rating));
            assert!((75.0..=750.0).contains(&profile.hourly_rate));
            assert!(profile.total_bookings >= profile.total_reviews);
            assert!((3..=6).contains(&profile.portfolio_images.len()));
        }
    }

    #[test]
    fn test_unique_ids() {
        let profiles = mock_profiles(50, 9);
        let ids: BTreeSet<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
    }
}
