//! Legislator lookup service.
//!
//! Orchestrates the two user-facing steps:
//!
//! 1. [`LegislatorLookup::submit_address`] - validate, geocode, resolve
//!    districts, and hand back a [`LookupContext`]
//! 2. [`LegislatorLookup::find_legislators`] - consume the context, fetch
//!    the directory, match, and build the contact card

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tn_districts::{validate_address, AddressInput, DistrictInfo};
use utoipa::ToSchema;

use crate::config::{Config, GeocoderBackend, QrConfig};
use crate::contact::{contact_card, ContactCard};
use crate::directory::{
    DirectoryError, HttpDirectorySource, LegislatorDirectory, LegislatorRecord,
};
use crate::districts::{CensusDistrictResolver, DistrictLookup};
use crate::error::LookupError;
use crate::geocoding::{
    CensusGeocoder, DemoGeocoder, GeocodingBackend, GeocodingClient, NominatimGeocoder,
    OpenCageGeocoder,
};
use crate::http::build_client;
use crate::matcher::{LegislatorMatcher, MatchResult};
use crate::session::{LookupContext, SessionError};

/// Errors wiring the service from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Everything the results view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupOutcome {
    /// Address as entered.
    #[schema(value_type = Object)]
    pub address: AddressInput,

    /// Address as the geocoder normalized it.
    pub formatted_address: Option<String>,

    /// Districts resolved for the address, if any.
    #[schema(value_type = Object)]
    pub districts: Option<DistrictInfo>,

    /// Matched senator and representative (`null` when not found).
    #[schema(value_type = Object)]
    pub legislators: MatchResult,

    /// Present when at least one legislator matched.
    pub contact_card: Option<ContactCard>,
}

/// The address-to-legislators pipeline.
pub struct LegislatorLookup {
    geocoder: GeocodingClient,
    directory: LegislatorDirectory,
    matcher: LegislatorMatcher,
    qr: QrConfig,
}

impl LegislatorLookup {
    pub fn new(
        geocoder: GeocodingClient,
        directory: LegislatorDirectory,
        matcher: LegislatorMatcher,
        qr: QrConfig,
    ) -> Self {
        Self {
            geocoder,
            directory,
            matcher,
            qr,
        }
    }

    /// Wire the real HTTP clients described by `config`.
    ///
    /// # Errors
    /// Returns [`SetupError`] if the HTTP client or directory parsers cannot
    /// be built.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let client = build_client(&config.http)?;
        let geo = &config.geocoder;

        let backend: Arc<dyn GeocodingBackend> = match geo.backend {
            GeocoderBackend::Census => Arc::new(CensusGeocoder::new(
                client.clone(),
                geo.effective_base_url(),
                geo.benchmark.clone(),
                geo.relay.clone(),
            )),
            GeocoderBackend::Nominatim => Arc::new(NominatimGeocoder::new(
                client.clone(),
                geo.effective_base_url(),
                geo.relay.clone(),
            )),
            GeocoderBackend::OpenCage => Arc::new(OpenCageGeocoder::new(
                client.clone(),
                geo.effective_base_url(),
                geo.api_key.clone(),
                geo.relay.clone(),
            )),
            GeocoderBackend::Demo => {
                Arc::new(DemoGeocoder::new(geo.demo_latitude, geo.demo_longitude))
            }
        };

        let districts: Option<Arc<dyn DistrictLookup>> = if config.geographies.enabled {
            let g = &config.geographies;
            Some(Arc::new(CensusDistrictResolver::new(
                client.clone(),
                g.base_url.clone(),
                g.benchmark.clone(),
                g.vintage.clone(),
                g.relay.clone(),
            )))
        } else {
            None
        };

        let d = &config.directory;
        let source = Arc::new(HttpDirectorySource::new(
            client,
            d.senate_url.clone(),
            d.house_url.clone(),
            d.relay.clone(),
        ));

        tracing::info!(
            backend = ?geo.backend,
            districts = config.geographies.enabled,
            demo_random_fallback = config.matching.demo_random_fallback,
            "legislator lookup configured"
        );

        Ok(Self::new(
            GeocodingClient::new(backend, districts),
            LegislatorDirectory::new(source, &d.site_base_url)?,
            LegislatorMatcher::new(config.matching.demo_random_fallback),
            config.qr.clone(),
        ))
    }

    /// Address entry: validate and geocode, returning the handoff context.
    ///
    /// # Errors
    /// Returns [`LookupError::Validation`] before any network call if the
    /// input is invalid, otherwise whatever geocoding returns.
    pub async fn submit_address(
        &self,
        street: &str,
        zip: &str,
    ) -> Result<LookupContext, LookupError> {
        let mut context = LookupContext::begin();
        let address = validate_address(street, zip)?;
        let geocoding = self.geocoder.geocode(&address).await?;
        context.record(address, geocoding);
        Ok(context)
    }

    /// Results: consume the context and find legislators.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidNavigation`] if the context is incomplete.
    pub async fn find_legislators(
        &self,
        context: LookupContext,
    ) -> Result<LookupOutcome, SessionError> {
        let (address, geocoding) = context.take()?;

        let directory = self.directory.fetch_all().await;
        let formatted = geocoding.formatted_address.clone().unwrap_or_default();
        let legislators =
            self.matcher
                .match_legislators(&directory, &formatted, geocoding.district.as_ref());

        let card = contact_card(&self.qr, &legislators, &formatted);

        tracing::info!(
            senator = legislators.senator.as_ref().map(|r| r.name.as_str()),
            representative = legislators.representative.as_ref().map(|r| r.name.as_str()),
            "legislator lookup complete"
        );

        Ok(LookupOutcome {
            address,
            formatted_address: geocoding.formatted_address,
            districts: geocoding.district,
            legislators,
            contact_card: card,
        })
    }

    /// A single directory record by id (e.g. `"house-12"`), fetched fresh.
    pub async fn legislator_by_id(&self, id: &str) -> Option<LegislatorRecord> {
        let record = self.directory.find_by_id(id).await;
        if record.is_none() {
            tracing::debug!(id, "no legislator with this id");
        }
        record
    }
}
