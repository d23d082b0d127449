//! US state lookup tables
//! Maps 2-letter postal codes to state names and resolves free-form tags

use std::collections::HashMap;
use std::sync::LazyLock;

/// (postal code, state name)
const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Postal code -> state name
pub static STATE_NAMES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STATES.iter().copied().collect());

/// Lower-cased state name -> postal code
static STATE_CODES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    STATES
        .iter()
        .map(|&(code, name)| (name.to_lowercase(), code))
        .collect()
});

/// Get the state name for a postal code (case-insensitive)
pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_NAMES.get(code.trim().to_uppercase().as_str()).copied()
}

/// Get the postal code for a state name (case-insensitive)
pub fn state_code(name: &str) -> Option<&'static str> {
    STATE_CODES.get(&name.trim().to_lowercase()).copied()
}

/// Resolve a tag such as `"TX"`, `"texas"` or `"new-york"` to a state name
pub fn resolve_state_tag(tag: &str) -> Option<&'static str> {
    let tag = tag.trim();
    if tag.len() == 2 {
        return state_name(tag);
    }

    let normalized = tag.replace(['-', '_'], " ");
    state_code(&normalized).and_then(state_name)
}
