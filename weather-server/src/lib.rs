//! HTTP surface of the CEP weather service.
//!
//! `GET /?cep=01001000` validates the CEP, resolves its city through the
//! locality directory, fetches the current weather for that city and renders
//! `temperatura.html`. Failures are answered as `{"message": "..."}`.

pub mod cli;
pub mod error;
pub mod logging;
pub mod render;
pub mod server;

pub use error::AppError;
pub use render::Renderer;
pub use server::{AppState, lookup_temperature, router, serve};
