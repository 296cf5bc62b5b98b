// Public IP discovery
//
// One blocking HTTP request at startup to learn the host's own public
// address. Any failure here is fatal for the caller.

use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PublicIpError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response is not an IPv4 address: {0:?}")]
    Parse(String),
}

/// Fetch the public IPv4 address from a plain-text echo service
pub fn discover_public_ip(url: &str, timeout: Duration) -> Result<Ipv4Addr, PublicIpError> {
    let request_error = |source| PublicIpError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(request_error)?;

    let body = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(request_error)?;

    let address = parse_public_ip(&body)?;
    info!(%address, %url, "Retrieved public IP");
    Ok(address)
}

/// Parse the body returned by the echo service
pub fn parse_public_ip(body: &str) -> Result<Ipv4Addr, PublicIpError> {
    let trimmed = body.trim();
    trimmed
        .parse()
        .map_err(|_| PublicIpError::Parse(trimmed.to_string()))
}
