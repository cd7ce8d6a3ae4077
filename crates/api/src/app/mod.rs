//! HTTP API application wiring (Axum router + store injection).
//!
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and body decoding
//! - `errors.rs`: the error envelope

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use students_infra::StudentStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// The one store instance every handler shares.
pub type SharedStore = Arc<dyn StudentStore>;

/// Build the full HTTP router around `store`.
pub fn build_app(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(store))
        .layer(axum::middleware::from_fn(middleware::request_logging))
}
