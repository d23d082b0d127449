//! Photographer CSV migration
//!
//! Turns the contact spreadsheet into `PhotographerImport` rows, a JSON array
//! for review, and SQL upserts keyed on the unique email column.

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use tracing::{info, warn};

use crate::models::{PhotographerCsvRecord, PhotographerImport};
use crate::state_names::resolve_state_tag;

pub const PROFILE_TABLE: &str = "photographer_profiles";

const COLUMNS: &[&str] = &[
    "business_name",
    "contact_name",
    "email",
    "phone",
    "website",
    "instagram_handle",
    "location_city",
    "location_state",
    "specialties",
    "bio",
];

#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid email '{0}'")]
    InvalidEmail(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

/// Outcome of reading one CSV
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub imported: Vec<PhotographerImport>,
    /// (1-based data row, reason)
    pub skipped: Vec<(usize, String)>,
    /// Rows replaced by a later row with the same email
    pub duplicates: usize,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Split a tag cell on `,` `;` or `|`
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split([',', ';', '|'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `"real-estate"` -> `"Real Estate"`
pub fn title_case(tag: &str) -> String {
    tag.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Reduce an Instagram URL or `@handle` to the bare handle
pub fn instagram_handle(raw: &str) -> Option<String> {
    let mut handle = raw.trim();
    for prefix in ["https://", "http://", "www.", "instagram.com/"] {
        handle = handle.strip_prefix(prefix).unwrap_or(handle);
    }
    let handle = handle.split('?').next().unwrap_or_default();
    let handle = handle.trim_start_matches('@').trim_end_matches('/');

    (!handle.is_empty()).then(|| handle.to_string())
}

fn normalize_website(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

impl PhotographerCsvRecord {
    pub fn to_import(&self) -> Result<PhotographerImport, MigrateError> {
        let email = self.email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(MigrateError::InvalidEmail(self.email.clone()));
        }

        let business_name =
            non_empty(Some(self.business_name.as_str())).ok_or(MigrateError::MissingField("business_name"))?;

        let mut location_state = None;
        let mut specialties: Vec<String> = Vec::new();
        for tag in split_tags(self.tags.as_deref().unwrap_or_default()) {
            if let Some(state) = resolve_state_tag(&tag) {
                // First state tag wins
                location_state.get_or_insert_with(|| state.to_string());
                continue;
            }
            let specialty = title_case(&tag);
            if !specialty.is_empty() && !specialties.contains(&specialty) {
                specialties.push(specialty);
            }
        }

        Ok(PhotographerImport {
            business_name,
            contact_name: non_empty(self.contact_name.as_deref()),
            email,
            phone: non_empty(self.phone.as_deref()),
            website: non_empty(self.website.as_deref()).map(|w| normalize_website(&w)),
            instagram_handle: self.instagram.as_deref().and_then(instagram_handle),
            location_city: non_empty(self.city.as_deref()),
            location_state,
            specialties,
            bio: non_empty(self.notes.as_deref()),
        })
    }
}

/// Parse a photographer CSV, skipping rows that cannot be imported.
///
/// Duplicate emails keep the last row, in the position of the first.
pub fn read_photographers<R: Read>(reader: R) -> Result<MigrationReport, MigrateError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut report = MigrationReport::default();
    let mut by_email: HashMap<String, usize> = HashMap::new();

    for (i, row) in rdr.deserialize::<PhotographerCsvRecord>().enumerate() {
        let row_number = i + 1;
        let import = match row.map_err(MigrateError::from).and_then(|r| r.to_import()) {
            Ok(import) => import,
            Err(e) => {
                if report.skipped.len() < 5 {
                    warn!("Skipping row {}: {}", row_number, e);
                }
                report.skipped.push((row_number, e.to_string()));
                continue;
            }
        };

        match by_email.get(&import.email) {
            Some(&idx) => {
                report.imported[idx] = import;
                report.duplicates += 1;
            }
            None => {
                by_email.insert(import.email.clone(), report.imported.len());
                report.imported.push(import);
            }
        }
    }

    info!(
        "Parsed {} photographers ({} skipped, {} duplicate emails)",
        report.imported.len(),
        report.skipped.len(),
        report.duplicates
    );

    Ok(report)
}

#[derive(Serialize)]
struct ImportedPhotographer<'a> {
    #[serde(flatten)]
    record: &'a PhotographerImport,
    imported_at: DateTime<Utc>,
}

/// Pretty JSON array of the imports, stamped with `imported_at`
pub fn to_json(imports: &[PhotographerImport], imported_at: DateTime<Utc>) -> Result<String, MigrateError> {
    let rows: Vec<ImportedPhotographer> = imports
        .iter()
        .map(|record| ImportedPhotographer { record, imported_at })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

fn sql_text(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", v.replace('\'', "''")),
        None => "NULL".to_string(),
    }
}

fn sql_array(values: &[String]) -> String {
    if values.is_empty() {
        return "'{}'".to_string();
    }
    let items: Vec<String> = values.iter().map(|v| sql_text(Some(v.as_str()))).collect();
    format!("ARRAY[{}]::text[]", items.join(", "))
}

/// One `INSERT ... ON CONFLICT (email) DO UPDATE` statement
pub fn upsert_statement(import: &PhotographerImport) -> String {
    let values = [
        sql_text(Some(import.business_name.as_str())),
        sql_text(import.contact_name.as_deref()),
        sql_text(Some(import.email.as_str())),
        sql_text(import.phone.as_deref()),
        sql_text(import.website.as_deref()),
        sql_text(import.instagram_handle.as_deref()),
        sql_text(import.location_city.as_deref()),
        sql_text(import.location_state.as_deref()),
        sql_array(&import.specialties),
        sql_text(import.bio.as_deref()),
    ];

    let updates: Vec<String> = COLUMNS
        .iter()
        .filter(|&&c| c != "email")
        .map(|c| format!("{c} = EXCLUDED.{c}"))
        .collect();

    format!(
        "INSERT INTO {} ({})\nVALUES ({})\nON CONFLICT (email) DO UPDATE SET {};",
        PROFILE_TABLE,
        COLUMNS.join(", "),
        values.join(", "),
        updates.join(", ")
    )
}

/// Full SQL script for a batch of imports
pub fn to_sql(imports: &[PhotographerImport], generated_at: DateTime<Utc>) -> String {
    let mut sql = format!(
        "-- {} photographers, generated {}\nBEGIN;\n\n",
        imports.len(),
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for import in imports {
        sql.push_str(&upsert_statement(import));
        sql.push_str("\n\n");
    }
    sql.push_str("COMMIT;\n");
    sql
}
