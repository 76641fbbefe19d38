//! Tennessee address validation and legislative district extraction.
//!
//! This crate holds the network-free parts of the legislator lookup:
//! checking user-entered addresses, pulling district numbers out of
//! geography payloads and directory labels, and normalizing them so that
//! districts from different sources compare equal as plain strings.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

mod address;
pub use address::{is_tennessee_zip, validate_address, AddressInput, ValidationError};

mod extract;
pub use extract::{
    containing_county, extract_districts, find_layer, layer_keys, strategies, DistrictInfo,
    ExtractionStrategy,
};

/// One of the two chambers of the Tennessee General Assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    /// The upper chamber.
    Senate,
    /// The lower chamber.
    House,
}

impl Chamber {
    /// Both chambers, senate first.
    pub const ALL: [Self; 2] = [Self::Senate, Self::House];

    /// Lowercase identifier used in record ids and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Senate => "senate",
            Self::House => "house",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static DISTRICT_LABEL: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"(?i)District\s*(\d+)").unwrap()
});

/// Normalize a raw district identifier.
///
/// Keeps the first run of ASCII digits and strips its leading zeros, so
/// `"006"`, `"SD-6"` and `"6th"` all become `"6"`. A run made only of zeros
/// normalizes to `"0"`. Returns `None` when the input has no digits.
#[must_use]
pub fn normalize_district(raw: &str) -> Option<String> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let run: &str = raw[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    let trimmed = run.trim_start_matches('0');
    if trimmed.is_empty() {
        Some("0".to_string())
    } else {
        Some(trimmed.to_string())
    }
}

/// Pull a district number out of human-readable text such as
/// `"State Senate District 06"` or `"Republican - District 19"`.
#[must_use]
pub fn district_from_label(text: &str) -> Option<String> {
    DISTRICT_LABEL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| normalize_district(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_strips_leading_zeros() {
        assert_eq!(normalize_district("006").as_deref(), Some("6"));
        assert_eq!(normalize_district("19").as_deref(), Some("19"));
        assert_eq!(normalize_district("100").as_deref(), Some("100"));
    }

    #[test]
    fn normalize_keeps_first_digit_run_only() {
        assert_eq!(normalize_district("SD-06 (2022)").as_deref(), Some("6"));
        assert_eq!(normalize_district("6th").as_deref(), Some("6"));
    }

    #[test]
    fn normalize_all_zeros_is_zero() {
        assert_eq!(normalize_district("000").as_deref(), Some("0"));
    }

    #[test]
    fn normalize_rejects_text_without_digits() {
        assert_eq!(normalize_district(""), None);
        assert_eq!(normalize_district("ZZZ"), None);
    }

    #[test]
    fn label_pattern_is_case_insensitive() {
        assert_eq!(
            district_from_label("State Senate District 6").as_deref(),
            Some("6")
        );
        assert_eq!(district_from_label("DISTRICT 019").as_deref(), Some("19"));
        assert_eq!(district_from_label("district19").as_deref(), Some("19"));
        assert_eq!(district_from_label("At large"), None);
    }

    #[test]
    fn chamber_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Chamber::Senate).expect("serialize"),
            "\"senate\""
        );
        assert_eq!(Chamber::House.to_string(), "house");
    }

    proptest! {
        #[test]
        fn normalized_districts_are_canonical_digits(raw in ".{0,24}") {
            if let Some(district) = normalize_district(&raw) {
                prop_assert!(!district.is_empty());
                prop_assert!(district.bytes().all(|b| b.is_ascii_digit()));
                prop_assert!(district == "0" || !district.starts_with('0'));
            }
        }

        #[test]
        fn normalize_is_idempotent(raw in "[A-Za-z -]{0,6}[0-9]{1,4}[A-Za-z -]{0,6}") {
            let once = normalize_district(&raw);
            prop_assert!(once.is_some());
            let once = once.unwrap_or_default();
            prop_assert_eq!(normalize_district(&once), Some(once.clone()));
        }
    }
}
