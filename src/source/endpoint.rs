//! Feed endpoint derivation.

use thiserror::Error;
use url::Url;

/// Path of the metrics feed on the site's own host.
pub const METRICS_PATH: &str = "/__metrics__/ws";

#[derive(Debug, Error, PartialEq)]
pub enum EndpointError {
    #[error("invalid site URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("site URL has no host: {0}")]
    MissingHost(String),

    #[error("unsupported site scheme '{0}' (expected http or https)")]
    Scheme(String),
}

/// Derive the feed URL for a site.
///
/// The feed lives on the site's host and port; `https` sites get `wss`,
/// `http` sites get `ws`.
pub fn endpoint_for_site(site: &str) -> Result<Url, EndpointError> {
    let site_url = Url::parse(site)?;

    let scheme = match site_url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => return Err(EndpointError::Scheme(other.to_string())),
    };

    let host = site_url
        .host_str()
        .ok_or_else(|| EndpointError::MissingHost(site.to_string()))?;

    let authority = match site_url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok(Url::parse(&format!("{}://{}{}", scheme, authority, METRICS_PATH))?)
}
