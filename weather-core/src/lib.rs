//! Core library for the CEP weather service.
//!
//! This crate defines:
//! - CEP validation
//! - Locality resolution against the ViaCEP directory
//! - Current weather lookup against WeatherAPI.com
//! - Temperature conversion and the shared domain models
//! - Configuration loading
//!
//! It is used by `weather-server`, but holds no HTTP-server code of its own.

pub mod cep;
pub mod config;
pub mod error;
pub mod http;
pub mod locality;
pub mod model;
pub mod provider;

pub use cep::{Cep, is_valid_cep};
pub use config::{Config, StatusPolicy};
pub use error::{LookupError, Upstream};
pub use http::http_client;
pub use locality::{LocalityResolver, ViaCepResolver};
pub use model::{Locality, TemperatureResult, WeatherReading, celsius_to_kelvin};
pub use provider::{WeatherProvider, provider_from_config, weatherapi::WeatherApiProvider};
