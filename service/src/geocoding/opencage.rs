//! OpenCage forward geocoder.

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeocodeCandidate, GeocodingBackend};
use crate::error::NetworkError;
use crate::http::{get_checked, relay_url};

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: Geometry,
    formatted: Option<String>,
    #[serde(default)]
    components: Option<Components>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Components {
    state: Option<String>,
    state_code: Option<String>,
}

/// Geocoder backed by OpenCage `/geocode/v1/json`.
pub struct OpenCageGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    relay: Option<String>,
}

impl OpenCageGeocoder {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        relay: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            relay,
        }
    }

    fn request_url(&self, query: &str) -> String {
        let target = format!(
            "{}/geocode/v1/json?q={}&key={}&countrycode=us&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key),
        );
        relay_url(self.relay.as_deref(), &target)
    }
}

#[async_trait]
impl GeocodingBackend for OpenCageGeocoder {
    fn name(&self) -> &'static str {
        "opencage"
    }

    async fn first_match(&self, query: &str) -> Result<Option<GeocodeCandidate>, NetworkError> {
        let response = get_checked(&self.client, &self.request_url(query)).await?;
        let body: OpenCageResponse = response.json().await?;

        Ok(body.results.into_iter().next().map(|r| {
            let state = r.components.and_then(|c| c.state_code.or(c.state));
            GeocodeCandidate {
                latitude: r.geometry.lat,
                longitude: r.geometry.lng,
                formatted_address: r.formatted,
                state,
            }
        }))
    }
}
