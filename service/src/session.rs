//! Handoff from address entry to the results view.
//!
//! The entry step owns a [`LookupContext`]: it calls [`LookupContext::begin`]
//! (dropping anything from a previous lookup), then records the validated
//! address and its geocoding result. The results step consumes the context
//! with [`LookupContext::take`]; a context missing either half means the
//! results step was reached without going through entry.
//!
//! Serialized, the context is two JSON blobs under `addressFormData` and
//! `geocodingResult`, the same keys a client keeps in per-tab storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tn_districts::AddressInput;
use utoipa::ToSchema;

use crate::geocoding::GeocodingResult;

/// Storage key for the validated address.
pub const ADDRESS_KEY: &str = "addressFormData";
/// Storage key for the geocoding result.
pub const GEOCODING_KEY: &str = "geocodingResult";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Results were requested without a completed address entry.
    #[error("Please enter your address first")]
    InvalidNavigation,

    /// A stored blob was not valid JSON for its key.
    #[error("stored {key} is unreadable: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Request-scoped state carried from address entry to results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupContext {
    /// Validated street address and ZIP.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub address_form_data: Option<AddressInput>,

    /// Coordinates, formatted address, and districts.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub geocoding_result: Option<GeocodingResult>,
}

impl LookupContext {
    /// Start a new lookup with no prior state.
    #[must_use]
    pub fn begin() -> Self {
        Self::default()
    }

    /// Drop any recorded state.
    pub fn clear(&mut self) {
        self.address_form_data = None;
        self.geocoding_result = None;
    }

    /// Record a completed address entry.
    pub fn record(&mut self, address: AddressInput, geocoding: GeocodingResult) {
        self.address_form_data = Some(address);
        self.geocoding_result = Some(geocoding);
    }

    /// True when both halves are present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.address_form_data.is_some() && self.geocoding_result.is_some()
    }

    /// Consume the context for the results step.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidNavigation`] if either half is missing.
    pub fn take(self) -> Result<(AddressInput, GeocodingResult), SessionError> {
        match (self.address_form_data, self.geocoding_result) {
            (Some(address), Some(geocoding)) => Ok((address, geocoding)),
            _ => Err(SessionError::InvalidNavigation),
        }
    }

    /// Serialize to key/JSON pairs. Absent halves are omitted.
    ///
    /// # Errors
    /// Returns an error if a value cannot be serialized.
    pub fn to_storage(&self) -> Result<BTreeMap<String, String>, serde_json::Error> {
        let mut storage = BTreeMap::new();
        if let Some(address) = &self.address_form_data {
            storage.insert(ADDRESS_KEY.to_string(), serde_json::to_string(address)?);
        }
        if let Some(geocoding) = &self.geocoding_result {
            storage.insert(GEOCODING_KEY.to_string(), serde_json::to_string(geocoding)?);
        }
        Ok(storage)
    }

    /// Rebuild a context from key/JSON pairs. Missing keys stay empty.
    ///
    /// # Errors
    /// Returns [`SessionError::Corrupt`] if a present blob fails to parse.
    pub fn from_storage(storage: &BTreeMap<String, String>) -> Result<Self, SessionError> {
        let address_form_data = storage
            .get(ADDRESS_KEY)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(|source| SessionError::Corrupt {
                key: ADDRESS_KEY,
                source,
            })?;
        let geocoding_result = storage
            .get(GEOCODING_KEY)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(|source| SessionError::Corrupt {
                key: GEOCODING_KEY,
                source,
            })?;

        Ok(Self {
            address_form_data,
            geocoding_result,
        })
    }
}
