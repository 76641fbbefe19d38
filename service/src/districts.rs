//! Legislative district resolution for a geocoded point.
//!
//! All spatial work is delegated to the Census geographies endpoint; this
//! module only fetches the layer listing and hands it to
//! [`tn_districts::extract_districts`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tn_districts::{containing_county, extract_districts, DistrictInfo};

use crate::error::{LookupError, NoMatchReason};
use crate::http::{get_checked, relay_url};

/// Resolves senate and house districts for coordinates.
#[async_trait]
pub trait DistrictLookup: Send + Sync {
    /// Resolve districts for a point.
    ///
    /// Succeeds when at least one chamber resolves.
    async fn resolve_districts(&self, lat: f64, lng: f64) -> Result<DistrictInfo, LookupError>;
}

#[derive(Debug, Deserialize)]
struct GeographiesResponse {
    result: GeographiesResult,
}

#[derive(Debug, Deserialize)]
struct GeographiesResult {
    #[serde(default)]
    geographies: Map<String, Value>,
}

/// District lookup backed by `geocoder/geographies/coordinates`.
pub struct CensusDistrictResolver {
    client: reqwest::Client,
    base_url: String,
    benchmark: String,
    vintage: String,
    relay: Option<String>,
}

impl CensusDistrictResolver {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        benchmark: impl Into<String>,
        vintage: impl Into<String>,
        relay: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            benchmark: benchmark.into(),
            vintage: vintage.into(),
            relay,
        }
    }

    fn request_url(&self, lat: f64, lng: f64) -> String {
        let target = format!(
            "{}/geocoder/geographies/coordinates?x={lng}&y={lat}&benchmark={}&vintage={}&layers=all&format=json",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.benchmark),
            urlencoding::encode(&self.vintage),
        );
        relay_url(self.relay.as_deref(), &target)
    }
}

/// Turn a `geographies` object into districts, or explain why it can't.
///
/// # Errors
/// Returns [`NoMatchReason::DistrictsUndetermined`] (carrying the county,
/// if known) when neither chamber resolves.
pub fn districts_from_geographies(
    geographies: &Map<String, Value>,
) -> Result<DistrictInfo, NoMatchReason> {
    let info = extract_districts(geographies);
    if info.is_empty() {
        let county = containing_county(geographies);
        tracing::info!(
            county = county.as_deref().unwrap_or("unknown"),
            layers = geographies.len(),
            "no legislative district layers resolved"
        );
        return Err(NoMatchReason::DistrictsUndetermined { county });
    }
    Ok(info)
}

#[async_trait]
impl DistrictLookup for CensusDistrictResolver {
    async fn resolve_districts(&self, lat: f64, lng: f64) -> Result<DistrictInfo, LookupError> {
        let response = get_checked(&self.client, &self.request_url(lat, lng))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "geographies request failed"))?;
        let body: GeographiesResponse = response.json().await?;

        Ok(districts_from_geographies(&body.result.geographies)?)
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

    use super::{DistrictInfo, DistrictLookup, LookupError, NoMatchReason};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock lookup returning a preset result and recording coordinates.
    pub struct MockDistrictLookup {
        result: Mutex<Option<Result<DistrictInfo, LookupError>>>,
        calls: Mutex<Vec<(f64, f64)>>,
    }

    impl MockDistrictLookup {
        pub fn new() -> Self {
            Self {
                result: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Set the result for the next `resolve_districts` call.
        pub fn set_result(&self, result: Result<DistrictInfo, LookupError>) {
            *self.result.lock().unwrap() = Some(result);
        }

        /// All `(lat, lng)` pairs passed to `resolve_districts`.
        pub fn calls(&self) -> Vec<(f64, f64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Default for MockDistrictLookup {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl DistrictLookup for MockDistrictLookup {
        async fn resolve_districts(&self, lat: f64, lng: f64) -> Result<DistrictInfo, LookupError> {
            self.calls.lock().unwrap().push((lat, lng));
            self.result.lock().unwrap().take().unwrap_or_else(|| {
                Err(NoMatchReason::DistrictsUndetermined { county: None }.into())
            })
        }
    }
}
