use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use tracing::warn;

use crate::error::{LookupError, Upstream};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the client shared by every upstream call.
///
/// The timeout covers the whole exchange, body included; expiry surfaces as
/// [`LookupError::UpstreamUnavailable`].
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url` and return the body of a 200 response.
///
/// The response is consumed inside this call on every path, so no
/// connection is left holding an unread body.
pub(crate) async fn fetch_body(
    http: &Client,
    url: Url,
    upstream: Upstream,
) -> Result<(StatusCode, String), LookupError> {
    // Error text must not carry the URL: its query holds the API key.
    let res = http.get(url).send().await.map_err(|e| {
        let e = e.without_url();
        warn!(%upstream, timeout = e.is_timeout(), error = %e, "upstream request failed");
        LookupError::unavailable(upstream, describe(&e))
    })?;

    let status = res.status();
    let body = res.text().await.map_err(|e| {
        let e = e.without_url();
        warn!(%upstream, %status, error = %e, "failed to read upstream body");
        LookupError::UpstreamUnavailable {
            upstream,
            status: Some(status),
            reason: describe(&e),
        }
    })?;

    Ok((status, body))
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
