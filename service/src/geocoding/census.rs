//! US Census Bureau `onelineaddress` geocoder.

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeocodeCandidate, GeocodingBackend};
use crate::error::NetworkError;
use crate::http::{get_checked, relay_url};

#[derive(Debug, Deserialize)]
struct CensusResponse {
    result: CensusResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CensusResult {
    #[serde(default)]
    address_matches: Vec<AddressMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressMatch {
    coordinates: Coordinates,
    matched_address: Option<String>,
    #[serde(default)]
    address_components: Option<AddressComponents>,
}

/// Census coordinates: `x` is longitude, `y` is latitude.
#[derive(Debug, Deserialize)]
struct Coordinates {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponents {
    state: Option<String>,
}

/// Geocoder backed by `geocoder/locations/onelineaddress`.
pub struct CensusGeocoder {
    client: reqwest::Client,
    base_url: String,
    benchmark: String,
    relay: Option<String>,
}

impl CensusGeocoder {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        benchmark: impl Into<String>,
        relay: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            benchmark: benchmark.into(),
            relay,
        }
    }

    fn request_url(&self, query: &str) -> String {
        let target = format!(
            "{}/geocoder/locations/onelineaddress?address={}&benchmark={}&format=json",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            urlencoding::encode(&self.benchmark),
        );
        relay_url(self.relay.as_deref(), &target)
    }
}

#[async_trait]
impl GeocodingBackend for CensusGeocoder {
    fn name(&self) -> &'static str {
        "census"
    }

    async fn first_match(&self, query: &str) -> Result<Option<GeocodeCandidate>, NetworkError> {
        let response = get_checked(&self.client, &self.request_url(query)).await?;
        let body: CensusResponse = response.json().await?;

        Ok(body
            .result
            .address_matches
            .into_iter()
            .next()
            .map(|m| GeocodeCandidate {
                latitude: m.coordinates.y,
                longitude: m.coordinates.x,
                formatted_address: m.matched_address,
                state: m.address_components.and_then(|c| c.state),
            }))
    }
}
