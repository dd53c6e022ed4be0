use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Which external service a lookup failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Locality,
    Weather,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Locality => "locality",
            Upstream::Weather => "weather",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures produced by the locality resolver and the weather provider.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("CEP not found in the locality directory")]
    NotFound,

    #[error("{upstream} upstream unavailable: {reason}")]
    UpstreamUnavailable {
        upstream: Upstream,
        status: Option<StatusCode>,
        reason: String,
    },

    #[error("{upstream} upstream returned a malformed body: {reason}")]
    UpstreamMalformed { upstream: Upstream, reason: String },

    #[error("weather API key is not configured")]
    Misconfigured,
}

impl LookupError {
    pub(crate) fn unavailable(upstream: Upstream, reason: impl Into<String>) -> Self {
        LookupError::UpstreamUnavailable { upstream, status: None, reason: reason.into() }
    }

    pub(crate) fn malformed(upstream: Upstream, reason: impl fmt::Display) -> Self {
        LookupError::UpstreamMalformed { upstream, reason: reason.to_string() }
    }

    /// HTTP status the upstream answered with, when it answered at all.
    pub fn upstream_status(&self) -> Option<StatusCode> {
        match self {
            LookupError::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }
}
