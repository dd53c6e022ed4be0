use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    error::{LookupError, Upstream},
    http::{fetch_body, truncate_body},
    model::WeatherReading,
};

use super::WeatherProvider;

pub const WEATHERAPI_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// WeatherAPI.com `current.json` client.
#[derive(Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

// Hand-written so the key never lands in logs.
impl std::fmt::Debug for WeatherApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WeatherApiProvider {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, http: Client) -> Self {
        Self { api_key, base_url: base_url.into(), http }
    }

    fn api_key(&self) -> Result<&str, LookupError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LookupError::Misconfigured),
        }
    }

    /// `{base}/current.json?key=..&q=..` with both values form-urlencoded.
    pub fn current_url(&self, key: &str, city: &str) -> Result<Url, LookupError> {
        let endpoint = format!("{}/current.json", self.base_url.trim_end_matches('/'));
        Url::parse_with_params(&endpoint, &[("key", key), ("q", city)]).map_err(|e| {
            let reason = format!("invalid weather URL {endpoint}: {e}");
            LookupError::unavailable(Upstream::Weather, reason)
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorDetail,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<WeatherReading, LookupError> {
        let key = self.api_key().inspect_err(|_| warn!("no WeatherAPI key configured"))?;
        let url = self.current_url(key, city)?;

        let (status, body) = fetch_body(&self.http, url, Upstream::Weather).await?;

        if status != StatusCode::OK {
            let reason = serde_json::from_str::<WaErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| truncate_body(&body));
            warn!(%status, %reason, "WeatherAPI current request failed");
            return Err(LookupError::UpstreamUnavailable {
                upstream: Upstream::Weather,
                status: Some(status),
                reason: format!("status {status}: {reason}"),
            });
        }

        let reading = parse_current(&body)?;
        debug!(temp_c = reading.temp_c, temp_f = reading.temp_f, "fetched current weather");
        Ok(reading)
    }
}

fn parse_current(body: &str) -> Result<WeatherReading, LookupError> {
    let parsed: WaResponse = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, body = %truncate_body(body), "failed to decode WeatherAPI current JSON");
        LookupError::malformed(Upstream::Weather, e)
    })?;

    let WaCurrent { temp_c, temp_f } = parsed.current;
    if !temp_c.is_finite() || !temp_f.is_finite() {
        return Err(LookupError::malformed(Upstream::Weather, "non-finite temperature"));
    }

    Ok(WeatherReading { temp_c, temp_f })
}
