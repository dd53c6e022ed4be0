use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    http::DEFAULT_REQUEST_TIMEOUT, locality::VIACEP_BASE_URL,
    provider::weatherapi::WEATHERAPI_BASE_URL,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TEMPLATE: &str = "temperatura.html";

/// Environment variable holding the TCP port to bind.
pub const PORT_ENV: &str = "PORT";
/// Environment variable holding the WeatherAPI.com key.
pub const WEATHER_KEY_ENV: &str = "WEATHER_KEY";

/// How application-level failures are reported over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Every failure past request validation answers 200 with a JSON message.
    #[default]
    Legacy,
    /// 422 for a malformed CEP, 404 for an unknown one, 502 for upstream failures.
    Semantic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalityConfig {
    pub base_url: String,
}

impl Default for LocalityConfig {
    fn default() -> Self {
        Self { base_url: VIACEP_BASE_URL.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: WEATHERAPI_BASE_URL.to_string() }
    }
}

/// Service configuration.
///
/// Example TOML:
/// ```toml
/// port = 8080
/// status_codes = "semantic"
///
/// [weather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub template_path: PathBuf,
    pub request_timeout_secs: u64,
    pub status_codes: StatusPolicy,
    pub locality: LocalityConfig,
    pub weather: WeatherConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            status_codes: StatusPolicy::default(),
            locality: LocalityConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then the config file, then `PORT` / `WEATHER_KEY` from the environment.
    ///
    /// An explicit `path` must exist; the platform default may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Self::config_file_path()?;
                if path.exists() { Self::load_from(&path)? } else { Self::default() }
            }
        };

        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Overlay environment values read through `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} must be a TCP port number, got {port:?}"))?;
        }

        if let Some(key) = lookup(WEATHER_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.weather.api_key = Some(key);
        }

        Ok(())
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the platform config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("br", "cep-weather", "cep-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn has_weather_key(&self) -> bool {
        self.weather.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_public_services() {
        let cfg = Config::default();

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.template_path, PathBuf::from("temperatura.html"));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.status_codes, StatusPolicy::Legacy);
        assert_eq!(cfg.locality.base_url, "https://viacep.com.br/ws");
        assert_eq!(cfg.weather.base_url, "http://api.weatherapi.com/v1");
        assert!(!cfg.has_weather_key());
    }

    #[test]
    fn env_overrides_port_and_key() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[("PORT", "9090"), ("WEATHER_KEY", "abc123")])).unwrap();

        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.weather.api_key.as_deref(), Some("abc123"));
        assert!(cfg.has_weather_key());
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.weather.api_key = Some("from-file".into());
        cfg.apply_env(env(&[("PORT", ""), ("WEATHER_KEY", " ")])).unwrap();

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.weather.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT must be a TCP port number"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            status_codes = "semantic"

            [weather]
            api_key = "KEY"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.status_codes, StatusPolicy::Semantic);
        assert_eq!(cfg.weather.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.weather.base_url, WEATHERAPI_BASE_URL);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.port = 7000;
        cfg.weather.api_key = Some("KEY".into());
        cfg.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.port, 7000);
        assert_eq!(loaded.weather.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
