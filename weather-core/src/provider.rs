use crate::{Config, LookupError, WeatherReading, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a free-text location, usually a city name.
    async fn current(&self, city: &str) -> Result<WeatherReading, LookupError>;
}

/// Construct the weather provider described by `config`.
///
/// A missing key is not an error here: the provider reports
/// [`LookupError::Misconfigured`] per call, so the service can still start
/// and answer validation and locality errors.
pub fn provider_from_config(config: &Config, http: Client) -> Box<dyn WeatherProvider> {
    Box::new(WeatherApiProvider::new(
        config.weather.api_key.clone(),
        config.weather.base_url.clone(),
        http,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{DEFAULT_REQUEST_TIMEOUT, http_client};

    #[tokio::test]
    async fn provider_from_config_without_key_is_misconfigured() {
        let cfg = Config::default();
        let provider = provider_from_config(&cfg, http_client(DEFAULT_REQUEST_TIMEOUT).unwrap());

        let err = provider.current("Recife").await.unwrap_err();
        assert!(matches!(err, LookupError::Misconfigured));
    }
}
