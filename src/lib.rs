//! Replenish API Library
//!
//! Reorder recommendations from per-SKU sales/inventory history: parse and
//! validate uploaded rows, aggregate daily demand, forecast over a horizon,
//! size orders under safety-stock and MOQ constraints, and classify stock
//! risk with a plain-language justification.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod models;
pub mod openapi;
pub mod services;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
}

/// Build the application router: banner, health, versioned API, docs.
///
/// CORS and compression layers are applied by the binary, which owns the
/// deployment-facing configuration.
pub fn app(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(|| async { "replenish-api up" }))
        .merge(health::router())
        .nest("/api/v1", handlers::api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
