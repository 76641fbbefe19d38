//! REST API handlers and `OpenAPI` documentation.
//!
//! The API is stateless: `/lookup` returns the [`LookupContext`] and the
//! client posts it back to `/legislators`. Every failure kind is turned into
//! a user-facing message here and nowhere else.

// The OpenApi derive macro generates code that triggers this lint
#![allow(clippy::needless_for_each)]

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::{OpenApi, ToSchema};

use crate::contact::{ContactCard, ContactLinks};
use crate::directory::LegislatorRecord;
use crate::error::{LookupError, NoMatchReason};
use crate::lookup::{LegislatorLookup, LookupOutcome};
use crate::session::{LookupContext, SessionError};

/// Serialize a `StatusCode` as its `u16` representation.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires `&T` signature
fn serialize_status_code<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

/// RFC 7807 Problem Details error response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// URI reference identifying the problem type
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short human-readable summary
    pub title: String,
    /// HTTP status code
    #[serde(serialize_with = "serialize_status_code")]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    /// Message suitable for showing to the user
    pub detail: String,
    /// Machine-readable error code and offending field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ProblemExtensions>,
}

/// Extended error information.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemExtensions {
    /// Stable error code, e.g. `ADDRESS_NOT_FOUND`
    pub code: String,
    /// Field that caused the error (for validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ProblemDetails {
    fn new(
        status: StatusCode,
        slug: &str,
        title: &str,
        code: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            problem_type: format!("https://tnlegis.org/errors/{slug}"),
            title: title.to_string(),
            status,
            detail: detail.into(),
            extensions: Some(ProblemExtensions {
                code: code.to_string(),
                field: None,
            }),
        }
    }

    fn with_field(mut self, field: &str) -> Self {
        if let Some(ext) = self.extensions.as_mut() {
            ext.field = Some(field.to_string());
        }
        self
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<LookupError> for ProblemDetails {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Validation(e) => Self::new(
                StatusCode::BAD_REQUEST,
                "validation",
                "Invalid address",
                "VALIDATION_ERROR",
                e.to_string(),
            )
            .with_field(e.field()),
            LookupError::NoMatch(reason) => {
                let (code, detail) = match reason {
                    NoMatchReason::AddressNotFound => (
                        "ADDRESS_NOT_FOUND",
                        "Address not found. Please check your address and ZIP code.".to_string(),
                    ),
                    NoMatchReason::OutsideTennessee { .. } => (
                        "OUTSIDE_TENNESSEE",
                        "The address must be in Tennessee.".to_string(),
                    ),
                    NoMatchReason::DistrictsUndetermined { county } => (
                        "DISTRICTS_UNDETERMINED",
                        county.map_or_else(
                            || {
                                "Error finding your legislative district. Please try again."
                                    .to_string()
                            },
                            |county| {
                                format!(
                                    "Error finding your legislative district in {county}. \
                                     Please try again."
                                )
                            },
                        ),
                    ),
                };
                Self::new(StatusCode::NOT_FOUND, "no-match", "No match", code, detail)
            }
            LookupError::Network(e) => {
                tracing::error!(error = %e, "upstream request failed");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "upstream",
                    "Upstream Error",
                    "UPSTREAM_ERROR",
                    "Error finding your address. Please try again.",
                )
            }
        }
    }
}

impl From<SessionError> for ProblemDetails {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidNavigation => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid-navigation",
                "Invalid navigation",
                "INVALID_NAVIGATION",
                err.to_string(),
            ),
            SessionError::Corrupt { key, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid-navigation",
                "Invalid navigation",
                "INVALID_NAVIGATION",
                "Please enter your address first",
            )
            .with_field(key),
        }
    }
}

/// Address form submission.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressFormRequest {
    pub street_address: String,
    pub zip_code: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `OpenAPI` documentation for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tennessee Legislator Lookup API",
        version = "1.0.0",
        description = "Find the state senator and representative for a Tennessee address",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "REST API v1")
    ),
    paths(lookup_address, find_legislators, get_legislator),
    components(schemas(
        AddressFormRequest,
        LookupContext,
        LookupOutcome,
        ContactCard,
        ContactLinks,
        ProblemDetails,
        ProblemExtensions
    ))
)]
pub struct ApiDoc;

/// Validate and geocode an address
///
/// Returns the context to post to `/legislators`.
///
/// # Errors
///
/// Returns `ProblemDetails` for invalid input, unmatched addresses, and
/// upstream failures.
#[utoipa::path(
    post,
    path = "/lookup",
    tag = "Lookup",
    request_body = AddressFormRequest,
    responses(
        (status = 200, description = "Address geocoded", body = LookupContext),
        (status = 400, description = "Invalid street address or ZIP code", body = ProblemDetails),
        (status = 404, description = "Address not found, outside Tennessee, or districts undetermined", body = ProblemDetails),
        (status = 502, description = "Upstream service failed", body = ProblemDetails)
    )
)]
pub async fn lookup_address(
    Extension(lookup): Extension<Arc<LegislatorLookup>>,
    Json(form): Json<AddressFormRequest>,
) -> Result<Json<LookupContext>, ProblemDetails> {
    let context = lookup
        .submit_address(&form.street_address, &form.zip_code)
        .await?;
    Ok(Json(context))
}

/// Find legislators for a geocoded address
///
/// # Errors
///
/// Returns `ProblemDetails` if the context is incomplete.
#[utoipa::path(
    post,
    path = "/legislators",
    tag = "Lookup",
    request_body = LookupContext,
    responses(
        (status = 200, description = "Matched legislators (null when not found)", body = LookupOutcome),
        (status = 400, description = "Address entry was skipped", body = ProblemDetails)
    )
)]
pub async fn find_legislators(
    Extension(lookup): Extension<Arc<LegislatorLookup>>,
    Json(context): Json<LookupContext>,
) -> Result<Json<LookupOutcome>, ProblemDetails> {
    Ok(Json(lookup.find_legislators(context).await?))
}

/// Get one legislator by directory id
///
/// Ids follow directory order per chamber, e.g. `senate-0` or `house-12`.
///
/// # Errors
///
/// Returns `ProblemDetails` (404) if no current record has the id.
#[utoipa::path(
    get,
    path = "/legislators/{id}",
    tag = "Lookup",
    params(
        ("id" = String, Path, description = "Directory record id, e.g. `house-12`")
    ),
    responses(
        (status = 200, description = "Legislator record"),
        (status = 404, description = "No legislator with this id", body = ProblemDetails)
    )
)]
pub async fn get_legislator(
    Extension(lookup): Extension<Arc<LegislatorLookup>>,
    Path(id): Path<String>,
) -> Result<Json<LegislatorRecord>, ProblemDetails> {
    let Some(record) = lookup.legislator_by_id(&id).await else {
        return Err(ProblemDetails::new(
            StatusCode::NOT_FOUND,
            "legislator-not-found",
            "Legislator not found",
            "LEGISLATOR_NOT_FOUND",
            format!("No legislator found with id {id}"),
        ));
    };
    Ok(Json(record))
}

#[allow(clippy::unused_async)] // Required for Axum handler signature
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Router with `/health` and the `/api/v1` lookup and legislator endpoints.
pub fn router(lookup: Arc<LegislatorLookup>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/lookup", post(lookup_address))
        .route("/api/v1/legislators", post(find_legislators))
        .route("/api/v1/legislators/{id}", get(get_legislator))
        .layer(Extension(lookup))
}
