use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
    routing::any,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, instrument, warn};
use weather_core::{
    Cep, Config, LocalityResolver, StatusPolicy, TemperatureResult, ViaCepResolver, WeatherProvider,
    http_client, provider_from_config,
};

use crate::{
    error::AppError,
    render::{self, Renderer},
};

/// Everything a request needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct AppState {
    pub locality: Arc<dyn LocalityResolver>,
    pub weather: Arc<dyn WeatherProvider>,
    pub renderer: Arc<Renderer>,
    pub status_policy: StatusPolicy,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = http_client(config.request_timeout())?;
        let renderer = Renderer::from_file(&config.template_path)?;

        if !config.has_weather_key() {
            warn!("no WeatherAPI key configured; weather lookups fail until WEATHER_KEY is set");
        }

        Ok(Self {
            locality: Arc::new(ViaCepResolver::new(
                config.locality.base_url.clone(),
                http.clone(),
            )),
            weather: Arc::from(provider_from_config(config, http)),
            renderer: Arc::new(renderer),
            status_policy: config.status_codes,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(temperature))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// First value of `name` in query order; later repetitions are ignored.
fn first_param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

async fn not_found() -> Response {
    AppError::NotFoundPath.into_response()
}

async fn temperature(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let cep = match first_param(&pairs, "cep") {
        Some(cep) if !cep.is_empty() => cep,
        _ => return AppError::MissingParam.into_response_with(state.status_policy),
    };

    let result = match lookup_temperature(&state, cep).await {
        Ok(result) => result,
        Err(err) => return err.into_response_with(state.status_policy),
    };

    match state.renderer.render(&result) {
        Ok(body) => render::html(body),
        Err(e) => {
            error!(error = ?e, "failed to render temperature template");
            AppError::RenderFail.into_response_with(state.status_policy)
        }
    }
}

/// Validate, resolve the city, then fetch its weather. Strictly in that order.
#[instrument(skip(state))]
pub async fn lookup_temperature(
    state: &AppState,
    raw_cep: &str,
) -> Result<TemperatureResult, AppError> {
    let cep = Cep::parse(raw_cep).ok_or_else(|| {
        debug!("rejected malformed CEP");
        AppError::InvalidCep
    })?;

    let locality = state.locality.resolve(&cep).await.map_err(|e| {
        info!(error = %e, "locality lookup failed");
        AppError::from_locality(&e)
    })?;

    let reading = state.weather.current(&locality.city).await.map_err(|e| {
        info!(city = %locality.city, error = %e, "weather lookup failed");
        AppError::from_weather(&e)
    })?;

    Ok(TemperatureResult::new(reading, locality.city))
}

/// Bind and serve until SIGINT or SIGTERM.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, status_codes = ?config.status_codes, "cep-weather listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
