//! Address geocoding with pluggable providers.
//!
//! [`GeocodingClient`] turns a validated [`AddressInput`] into a
//! [`GeocodingResult`]: it formats the query, asks one
//! [`GeocodingBackend`] for its first match, checks the match is in
//! Tennessee, and then resolves legislative districts for the point.
//!
//! # Backends
//!
//! - [`CensusGeocoder`] - US Census Bureau `onelineaddress` (default)
//! - [`NominatimGeocoder`] - OpenStreetMap Nominatim
//! - [`OpenCageGeocoder`] - OpenCage (API key)
//! - [`DemoGeocoder`] - fixed coordinates, no network, no districts
//!
//! Only the first candidate is ever used; there is no ranking.

mod census;
mod demo;
mod nominatim;
mod opencage;

pub use census::CensusGeocoder;
pub use demo::DemoGeocoder;
pub use nominatim::NominatimGeocoder;
pub use opencage::OpenCageGeocoder;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tn_districts::{AddressInput, DistrictInfo};

use crate::districts::DistrictLookup;
use crate::error::{LookupError, NetworkError, NoMatchReason};

/// A geocoded address, optionally with its legislative districts.
///
/// Serialized with the field names the results view reads back
/// (`lat`, `lng`, `formattedAddress`, `district`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    #[serde(
        rename = "formattedAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<DistrictInfo>,
}

/// First match reported by a provider, before any Tennessee check.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: Option<String>,
    /// State name or code, when the provider reports one.
    pub state: Option<String>,
}

/// A geocoding provider.
#[async_trait]
pub trait GeocodingBackend: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Return the provider's first match for `query`, or `None` if it has none.
    async fn first_match(&self, query: &str) -> Result<Option<GeocodeCandidate>, NetworkError>;

    /// Whether results from this backend should go through district resolution.
    fn resolves_districts(&self) -> bool {
        true
    }
}

/// Build the free-text query sent to every provider.
#[must_use]
pub fn format_query(address: &AddressInput) -> String {
    format!("{}, {}, Tennessee, USA", address.street, address.zip)
}

fn is_tennessee(state: &str) -> bool {
    let state = state.trim();
    state.eq_ignore_ascii_case("Tennessee") || state.eq_ignore_ascii_case("TN")
}

/// Geocoder that chains provider lookup and district resolution.
#[derive(Clone)]
pub struct GeocodingClient {
    backend: Arc<dyn GeocodingBackend>,
    districts: Option<Arc<dyn DistrictLookup>>,
}

impl GeocodingClient {
    /// Create a client. Pass `None` for `districts` to skip district resolution.
    pub fn new(
        backend: Arc<dyn GeocodingBackend>,
        districts: Option<Arc<dyn DistrictLookup>>,
    ) -> Self {
        Self { backend, districts }
    }

    /// Geocode an address and resolve its districts.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Network`] if a provider call fails
    /// - [`LookupError::NoMatch`] with [`NoMatchReason::AddressNotFound`] when
    ///   the provider has no candidates, [`NoMatchReason::OutsideTennessee`]
    ///   when the match is in another state, or
    ///   [`NoMatchReason::DistrictsUndetermined`] when neither chamber resolves
    pub async fn geocode(&self, address: &AddressInput) -> Result<GeocodingResult, LookupError> {
        let query = format_query(address);
        tracing::debug!(backend = self.backend.name(), %query, "geocoding address");

        let candidate = self
            .backend
            .first_match(&query)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "geocoding request failed"
                );
            })?
            .ok_or(NoMatchReason::AddressNotFound)?;

        if let Some(state) = candidate.state.as_deref() {
            if !is_tennessee(state) {
                tracing::info!(%state, "geocoded address is outside Tennessee");
                return Err(NoMatchReason::OutsideTennessee {
                    state: state.to_string(),
                }
                .into());
            }
        }

        let district = match &self.districts {
            Some(resolver) if self.backend.resolves_districts() => Some(
                resolver
                    .resolve_districts(candidate.latitude, candidate.longitude)
                    .await?,
            ),
            _ => None,
        };

        tracing::info!(
            lat = candidate.latitude,
            lng = candidate.longitude,
            senate = ?district.as_ref().and_then(|d| d.senate.as_deref()),
            house = ?district.as_ref().and_then(|d| d.house.as_deref()),
            "address geocoded"
        );

        Ok(GeocodingResult {
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            formatted_address: candidate.formatted_address,
            district,
        })
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{GeocodeCandidate, GeocodingBackend, NetworkError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock provider returning a preset candidate.
    ///
    /// Configure with `set_result` and inspect `queries()` to verify calls.
    /// With no result set, every lookup finds nothing.
    pub struct MockGeocodingBackend {
        result: Mutex<Option<Result<Option<GeocodeCandidate>, NetworkError>>>,
        queries: Mutex<Vec<String>>,
        resolves_districts: bool,
    }

    impl MockGeocodingBackend {
        pub fn new() -> Self {
            Self {
                result: Mutex::new(None),
                queries: Mutex::new(Vec::new()),
                resolves_districts: true,
            }
        }

        /// A backend that skips district resolution, like the demo provider.
        pub fn without_districts() -> Self {
            Self {
                resolves_districts: false,
                ..Self::new()
            }
        }

        /// Set the result for the next `first_match` call.
        pub fn set_result(&self, result: Result<Option<GeocodeCandidate>, NetworkError>) {
            *self.result.lock().unwrap() = Some(result);
        }

        /// All queries passed to `first_match`.
        pub fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl Default for MockGeocodingBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl GeocodingBackend for MockGeocodingBackend {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn first_match(&self, query: &str) -> Result<Option<GeocodeCandidate>, NetworkError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.lock().unwrap().take().unwrap_or(Ok(None))
        }

        fn resolves_districts(&self) -> bool {
            self.resolves_districts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockGeocodingBackend;
    use super::*;
    use crate::districts::mock::MockDistrictLookup;

    fn address() -> AddressInput {
        AddressInput {
            street: "123 Main St".into(),
            zip: "37203".into(),
        }
    }

    fn nashville(state: Option<&str>) -> GeocodeCandidate {
        GeocodeCandidate {
            latitude: 36.16,
            longitude: -86.78,
            formatted_address: Some("123 MAIN ST, NASHVILLE, TN, 37203".into()),
            state: state.map(String::from),
        }
    }

    #[test]
    fn query_includes_state_and_country() {
        assert_eq!(format_query(&address()), "123 Main St, 37203, Tennessee, USA");
    }

    #[test]
    fn tennessee_check_accepts_name_and_code() {
        assert!(is_tennessee("Tennessee"));
        assert!(is_tennessee("TN"));
        assert!(is_tennessee(" tn "));
        assert!(!is_tennessee("Kentucky"));
    }

    #[tokio::test]
    async fn geocode_chains_district_resolution() {
        let backend = Arc::new(MockGeocodingBackend::new());
        backend.set_result(Ok(Some(nashville(Some("TN")))));
        let districts = Arc::new(MockDistrictLookup::new());
        districts.set_result(Ok(DistrictInfo {
            senate: Some("19".into()),
            house: Some("54".into()),
        }));

        let client = GeocodingClient::new(backend.clone(), Some(districts.clone()));
        let result = client.geocode(&address()).await.expect("should geocode");

        assert_eq!(result.latitude, 36.16);
        assert_eq!(
            result.district.and_then(|d| d.senate).as_deref(),
            Some("19")
        );
        assert_eq!(backend.queries(), vec!["123 Main St, 37203, Tennessee, USA"]);
        assert_eq!(districts.calls(), vec![(36.16, -86.78)]);
    }

    #[tokio::test]
    async fn zero_candidates_is_address_not_found() {
        let backend = Arc::new(MockGeocodingBackend::new());
        let client = GeocodingClient::new(backend, None);

        let result = client.geocode(&address()).await;

        assert!(matches!(
            result,
            Err(LookupError::NoMatch(NoMatchReason::AddressNotFound))
        ));
    }

    #[tokio::test]
    async fn other_state_is_rejected_before_district_lookup() {
        let backend = Arc::new(MockGeocodingBackend::new());
        backend.set_result(Ok(Some(nashville(Some("Kentucky")))));
        let districts = Arc::new(MockDistrictLookup::new());
        let client = GeocodingClient::new(backend, Some(districts.clone()));

        let result = client.geocode(&address()).await;

        assert!(matches!(
            result,
            Err(LookupError::NoMatch(NoMatchReason::OutsideTennessee { state }))
                if state == "Kentucky"
        ));
        assert!(districts.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_state_is_not_rejected() {
        let backend = Arc::new(MockGeocodingBackend::new());
        backend.set_result(Ok(Some(nashville(None))));
        let client = GeocodingClient::new(backend, None);

        let result = client.geocode(&address()).await.expect("should geocode");
        assert!(result.district.is_none());
    }

    #[tokio::test]
    async fn backend_without_districts_skips_resolver() {
        let backend = Arc::new(MockGeocodingBackend::without_districts());
        backend.set_result(Ok(Some(nashville(Some("Tennessee")))));
        let districts = Arc::new(MockDistrictLookup::new());
        let client = GeocodingClient::new(backend, Some(districts.clone()));

        let result = client.geocode(&address()).await.expect("should geocode");

        assert!(result.district.is_none());
        assert!(districts.calls().is_empty());
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let backend = Arc::new(MockGeocodingBackend::new());
        backend.set_result(Err(NetworkError::Status {
            status: 503,
            message: "down".into(),
        }));
        let client = GeocodingClient::new(backend, None);

        let result = client.geocode(&address()).await;
        assert!(matches!(
            result,
            Err(LookupError::Network(NetworkError::Status { status: 503, .. }))
        ));
    }

    #[test]
    fn result_round_trips_through_json() {
        let result = GeocodingResult {
            latitude: 36.162_664,
            longitude: -86.781_602,
            formatted_address: Some("123 MAIN ST, NASHVILLE, TN, 37203".into()),
            district: Some(DistrictInfo {
                senate: Some("6".into()),
                house: Some("19".into()),
            }),
        };
        let json = serde_json::to_string(&result).expect("serialize");
        assert!(json.contains("\"lat\":"));
        assert!(json.contains("\"formattedAddress\":"));
        let back: GeocodingResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, result);
    }
}
