//! Street address and ZIP code validation.
//!
//! Validation runs before any network call. A rejected address never
//! reaches the geocoder.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TENNESSEE_ZIP: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"^(37|38)[0-9]{3}$").unwrap()
});

/// A validated street address inside a Tennessee ZIP code.
///
/// Field names on the wire match the entry form (`streetAddress`, `zipCode`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    #[serde(rename = "streetAddress")]
    pub street: String,
    #[serde(rename = "zipCode")]
    pub zip: String,
}

/// Reasons an address is rejected before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter both street address and ZIP code")]
    MissingField {
        /// Wire name of the first empty field.
        field: &'static str,
    },
    #[error("Please enter a valid Tennessee ZIP code (starts with 37 or 38)")]
    InvalidZip,
}

impl ValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
            Self::InvalidZip => "zipCode",
        }
    }
}

/// Returns true when `zip` is a five-digit ZIP in the 37xxx/38xxx range.
#[must_use]
pub fn is_tennessee_zip(zip: &str) -> bool {
    TENNESSEE_ZIP.is_match(zip)
}

/// Validate raw form input.
///
/// The street is trimmed. The ZIP is only trimmed for the blank check and
/// must otherwise match the pattern exactly, so surrounding whitespace is
/// rejected.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] if either value is blank and
/// [`ValidationError::InvalidZip`] if the ZIP is not a Tennessee ZIP.
pub fn validate_address(street: &str, zip: &str) -> Result<AddressInput, ValidationError> {
    let street = street.trim();

    if street.is_empty() {
        return Err(ValidationError::MissingField {
            field: "streetAddress",
        });
    }
    if zip.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "zipCode" });
    }
    if !is_tennessee_zip(zip) {
        return Err(ValidationError::InvalidZip);
    }

    Ok(AddressInput {
        street: street.to_string(),
        zip: zip.to_string(),
    })
}
