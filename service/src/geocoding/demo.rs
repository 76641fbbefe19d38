//! Offline geocoder for demos and local development.

use async_trait::async_trait;

use super::{GeocodeCandidate, GeocodingBackend};
use crate::error::NetworkError;

/// Returns the same Tennessee point for every query.
///
/// The formatted address echoes the query. Districts are never resolved,
/// so matching falls through to address text (and the random fallback,
/// when enabled).
pub struct DemoGeocoder {
    latitude: f64,
    longitude: f64,
}

impl DemoGeocoder {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[async_trait]
impl GeocodingBackend for DemoGeocoder {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn first_match(&self, query: &str) -> Result<Option<GeocodeCandidate>, NetworkError> {
        Ok(Some(GeocodeCandidate {
            latitude: self.latitude,
            longitude: self.longitude,
            formatted_address: Some(query.to_string()),
            state: Some("Tennessee".to_string()),
        }))
    }

    fn resolves_districts(&self) -> bool {
        false
    }
}
