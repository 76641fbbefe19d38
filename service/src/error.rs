//! Failure kinds shared by the lookup pipeline.
//!
//! Each stage returns one of these instead of surfacing messages itself.
//! Turning a failure into user-facing text is the caller's job (see
//! [`crate::rest`]).

use thiserror::Error;

pub use tn_districts::ValidationError;

/// An upstream service could not be reached or answered badly.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream returned a non-success status
    #[error("upstream error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Upstream body did not have the expected shape
    #[error("unexpected upstream response: {0}")]
    Decode(String),
}

/// Why an address produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoMatchReason {
    #[error("address not found")]
    AddressNotFound,

    #[error("address resolved to {state}, not Tennessee")]
    OutsideTennessee { state: String },

    #[error("legislative districts could not be determined")]
    DistrictsUndetermined { county: Option<String> },
}

/// Error from geocoding or district resolution.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    NoMatch(#[from] NoMatchReason),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(NetworkError::Request(err))
    }
}
