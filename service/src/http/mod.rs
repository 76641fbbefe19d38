//! Outbound HTTP utilities.
//!
//! Every upstream call (geocoders, the geographies endpoint, directory
//! pages) goes through the helpers here so that status handling and CORS
//! relay prefixing behave the same everywhere.

use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::NetworkError;

/// Build the shared `reqwest::Client` from configuration.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// Prefix `target` with a CORS relay, if one is configured.
///
/// Relays such as `https://corsproxy.io/?` take the full upstream URL
/// verbatim after the prefix.
#[must_use]
pub fn relay_url(relay: Option<&str>, target: &str) -> String {
    match relay {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}{target}"),
        _ => target.to_string(),
    }
}

/// Send a GET and reject non-success statuses.
///
/// # Errors
/// Returns [`NetworkError::Request`] on transport failure and
/// [`NetworkError::Status`] for any non-2xx response.
pub async fn get_checked(
    client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, NetworkError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(NetworkError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}
