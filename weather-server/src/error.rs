use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use weather_core::{LookupError, StatusPolicy};

use crate::render::json_error;

/// Every way a request can fail, as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    NotFoundPath,
    MissingParam,
    InvalidCep,
    CepNotFound,
    LocalityUpstreamFail,
    WeatherUpstreamFail,
    RenderFail,
}

impl AppError {
    /// Locality failures keep "not found" apart from everything else.
    pub fn from_locality(err: &LookupError) -> Self {
        match err {
            LookupError::NotFound => AppError::CepNotFound,
            _ => AppError::LocalityUpstreamFail,
        }
    }

    pub fn from_weather(_err: &LookupError) -> Self {
        AppError::WeatherUpstreamFail
    }

    /// User-facing message; `None` for the kinds answered with an empty body.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AppError::NotFoundPath | AppError::MissingParam => None,
            AppError::InvalidCep => Some("CEP inválido"),
            AppError::CepNotFound => Some("CEP não encontrado"),
            AppError::LocalityUpstreamFail => Some("Erro ao buscar localização"),
            AppError::WeatherUpstreamFail => Some("Erro ao buscar clima atual"),
            AppError::RenderFail => Some("Erro ao renderizar resposta"),
        }
    }

    pub fn status(&self, policy: StatusPolicy) -> StatusCode {
        match (self, policy) {
            (AppError::NotFoundPath, _) => StatusCode::NOT_FOUND,
            (AppError::MissingParam, _) => StatusCode::BAD_REQUEST,
            (AppError::RenderFail, _) => StatusCode::INTERNAL_SERVER_ERROR,
            (_, StatusPolicy::Legacy) => StatusCode::OK,
            (AppError::InvalidCep, StatusPolicy::Semantic) => StatusCode::UNPROCESSABLE_ENTITY,
            (AppError::CepNotFound, StatusPolicy::Semantic) => StatusCode::NOT_FOUND,
            (
                AppError::LocalityUpstreamFail | AppError::WeatherUpstreamFail,
                StatusPolicy::Semantic,
            ) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn into_response_with(self, policy: StatusPolicy) -> Response {
        let status = self.status(policy);
        match self.message() {
            Some(message) => json_error(status, message),
            None => status.into_response(),
        }
    }
}

impl IntoResponse for AppError {
    /// Status codes under [`StatusPolicy::Legacy`]; handlers holding state use
    /// [`AppError::into_response_with`].
    fn into_response(self) -> Response {
        self.into_response_with(StatusPolicy::Legacy)
    }
}
