//! OpenStreetMap Nominatim geocoder.

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeocodeCandidate, GeocodingBackend};
use crate::error::NetworkError;
use crate::http::{get_checked, relay_url};

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(default)]
    address: Option<PlaceAddress>,
}

#[derive(Debug, Deserialize)]
struct PlaceAddress {
    state: Option<String>,
}

/// Geocoder backed by Nominatim `/search`.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    relay: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        relay: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            relay,
        }
    }

    fn request_url(&self, query: &str) -> String {
        let target = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
        );
        relay_url(self.relay.as_deref(), &target)
    }
}

fn parse_coordinate(name: &str, value: &str) -> Result<f64, NetworkError> {
    value
        .trim()
        .parse()
        .map_err(|_| NetworkError::Decode(format!("invalid {name} '{value}'")))
}

#[async_trait]
impl GeocodingBackend for NominatimGeocoder {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn first_match(&self, query: &str) -> Result<Option<GeocodeCandidate>, NetworkError> {
        let response = get_checked(&self.client, &self.request_url(query)).await?;
        let places: Vec<Place> = response.json().await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(GeocodeCandidate {
            latitude: parse_coordinate("lat", &place.lat)?,
            longitude: parse_coordinate("lon", &place.lon)?,
            formatted_address: place.display_name,
            state: place.address.and_then(|a| a.state),
        }))
    }
}
