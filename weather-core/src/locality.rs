use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument, warn};

use crate::{
    cep::Cep,
    error::{LookupError, Upstream},
    http::{fetch_body, truncate_body},
    model::Locality,
};

pub const VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

#[async_trait]
pub trait LocalityResolver: Send + Sync + Debug {
    async fn resolve(&self, cep: &Cep) -> Result<Locality, LookupError>;
}

/// Resolves CEPs against the ViaCEP directory.
#[derive(Debug, Clone)]
pub struct ViaCepResolver {
    base_url: String,
    http: Client,
}

impl ViaCepResolver {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }

    /// `{base}/{CEP}/json/`
    pub fn lookup_url(&self, cep: &Cep) -> Result<Url, LookupError> {
        let raw = format!("{}/{}/json/", self.base_url.trim_end_matches('/'), cep);
        Url::parse(&raw).map_err(|e| {
            let reason = format!("invalid directory URL {raw}: {e}");
            LookupError::unavailable(Upstream::Locality, reason)
        })
    }
}

#[async_trait]
impl LocalityResolver for ViaCepResolver {
    #[instrument(skip(self, cep), fields(cep = %cep))]
    async fn resolve(&self, cep: &Cep) -> Result<Locality, LookupError> {
        let url = self.lookup_url(cep)?;
        let (status, body) = fetch_body(&self.http, url, Upstream::Locality).await?;

        if status != StatusCode::OK {
            warn!(
                %status,
                body = %truncate_body(&body),
                "locality directory returned an error status"
            );
            return Err(LookupError::UpstreamUnavailable {
                upstream: Upstream::Locality,
                status: Some(status),
                reason: format!("status {status}"),
            });
        }

        let locality = parse_locality(&body)?;
        debug!(city = %locality.city, state = %locality.state, "resolved locality");
        Ok(locality)
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    localidade: Option<String>,
    uf: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    erro: bool,
}

/// The directory has emitted `erro` both as a boolean and as a string.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Flag::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        Flag::Text(s) => Err(serde::de::Error::custom(format!("unexpected erro flag {s:?}"))),
    }
}

fn parse_locality(body: &str) -> Result<Locality, LookupError> {
    let parsed: ViaCepResponse = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, body = %truncate_body(body), "failed to decode locality response");
        LookupError::malformed(Upstream::Locality, e)
    })?;

    if parsed.erro {
        return Err(LookupError::NotFound);
    }

    match parsed.localidade {
        Some(city) if !city.trim().is_empty() => Ok(Locality {
            city,
            state: parsed.uf.unwrap_or_default(),
        }),
        _ => Err(LookupError::malformed(Upstream::Locality, "response has no localidade")),
    }
}
