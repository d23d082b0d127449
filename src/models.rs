use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Postal record as served in `quick.json` / `full.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipRecord {
    pub zip: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub population: u64,
}

/// True for exactly five ASCII digits
pub fn is_valid_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

/// City-level search result merging every zip that shares a city+state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityAggregate {
    pub display_name: String,
    pub city: String,
    pub state: String,
    pub representative_population: u64,
    /// Zip of the most populous member
    pub primary_zip: String,
    pub all_zips: Vec<String>,
}

/// One row of a search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchHit {
    Zip(ZipRecord),
    City(CityAggregate),
}

impl SearchHit {
    /// Every zip this hit covers
    pub fn zips(&self) -> Vec<&str> {
        match self {
            SearchHit::Zip(record) => vec![record.zip.as_str()],
            SearchHit::City(agg) => agg.all_zips.iter().map(String::as_str).collect(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            SearchHit::Zip(record) => format!("{} - {}, {}", record.zip, record.city, record.state),
            SearchHit::City(agg) => agg.display_name.clone(),
        }
    }
}

/// Photographer listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub id: String,
    pub bio: String,
    pub specialties: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub years_experience: u32,
    pub hourly_rate: f64,
    pub location_city: String,
    pub location_state: String,
    pub average_rating: f64,
    pub total_reviews: u32,
    pub total_bookings: u32,
    #[serde(default)]
    pub portfolio_images: Vec<String>,
}

/// Raw row from the photographer contact CSV
#[derive(Debug, Clone, Deserialize)]
pub struct PhotographerCsvRecord {
    #[serde(alias = "Business Name", alias = "business")]
    pub business_name: String,
    #[serde(default, alias = "Name", alias = "contact")]
    pub contact_name: Option<String>,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Phone")]
    pub phone: Option<String>,
    #[serde(default, alias = "Website")]
    pub website: Option<String>,
    #[serde(default, alias = "Instagram")]
    pub instagram: Option<String>,
    #[serde(default, alias = "City")]
    pub city: Option<String>,
    #[serde(default, alias = "Tags")]
    pub tags: Option<String>,
    #[serde(default, alias = "Notes")]
    pub notes: Option<String>,
}

/// Photographer row ready for the profile table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotographerImport {
    pub business_name: String,
    pub contact_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub instagram_handle: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub specialties: Vec<String>,
    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_format() {
        assert!(is_valid_zip("90001"));
        assert!(is_valid_zip("02134"));
        assert!(!is_valid_zip("1234"));
        assert!(!is_valid_zip("123456"));
        assert!(!is_valid_zip("9000a"));
        assert!(!is_valid_zip(" 9000"));
    }

    #[test]
    fn test_zip_record_json_shape() {
        let json = r#"{"zip":"90001","city":"Los Angeles","state":"CA","latitude":33.97,"longitude":-118.24,"population":57110}"#;
        let record: ZipRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.zip, "90001");
        assert_eq!(record.population, 57110);
    }

    #[test]
    fn test_search_hit_tagging() {
        let hit = SearchHit::City(CityAggregate {
            display_name: "Austin, TX".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            representative_population: 10,
            primary_zip: "78701".to_string(),
            all_zips: vec!["78701".to_string(), "78702".to_string()],
        });
        let value = serde_json::to_value(&hit).unwrap();
        assert_eq!(value["kind"], "city");
        assert_eq!(value["displayName"], "Austin, TX");
        assert_eq!(hit.zips(), vec!["78701", "78702"]);
    }
}
