//! Response rendering: the HTML success page and JSON error bodies.

use std::path::Path;

use anyhow::{Context, Result};
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tera::Tera;
use weather_core::TemperatureResult;

pub const TEMPLATE_NAME: &str = "temperatura.html";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// The success template, parsed once and shared read-only across requests.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_template_file(path, Some(TEMPLATE_NAME))
            .with_context(|| format!("Failed to load template: {}", path.display()))?;
        Ok(Self { tera })
    }

    pub fn from_source(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)
            .context("Failed to parse template")?;
        Ok(Self { tera })
    }

    /// Renders with `TempC`, `TempF`, `TempK` and `Cidade` in scope.
    pub fn render(&self, result: &TemperatureResult) -> tera::Result<String> {
        let ctx = tera::Context::from_serialize(result)?;
        self.tera.render(TEMPLATE_NAME, &ctx)
    }
}

pub fn html(body: String) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response()
}

/// `{"message": "..."}` with an explicit JSON content type.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "message": message }).to_string();
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::WeatherReading;

    fn result() -> TemperatureResult {
        TemperatureResult::new(WeatherReading { temp_c: 25.0, temp_f: 77.0 }, "São Paulo")
    }

    #[test]
    fn binds_all_four_values() {
        let renderer =
            Renderer::from_source("{{ Cidade }}|{{ TempC }}|{{ TempF }}|{{ TempK }}").unwrap();
        let out = renderer.render(&result()).unwrap();

        assert!(out.starts_with("São Paulo|25"));
        assert!(out.contains("|77"));
        assert!(out.ends_with("|298.15"));
    }

    #[test]
    fn html_autoescapes_city() {
        let renderer = Renderer::from_source("<p>{{ Cidade }}</p>").unwrap();
        let mut r = result();
        r.city = "<script>".into();

        assert_eq!(renderer.render(&r).unwrap(), "<p>&lt;script&gt;</p>");
    }

    #[test]
    fn missing_template_file_reports_path() {
        let err = Renderer::from_file(Path::new("does/not/exist.html")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.html"));
    }

    #[test]
    fn error_body_sets_json_content_type() {
        let res = json_error(StatusCode::OK, "CEP inválido");
        assert_eq!(res.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
    }
}
