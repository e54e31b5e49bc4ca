pub mod recommendations;

use axum::Router;

use crate::AppState;

/// Versioned API routes.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new().nest("/recommendations", recommendations::router())
}
