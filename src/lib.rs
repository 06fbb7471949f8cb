pub mod config;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use handlers::AppState;

/// Builds the application router. Non-POST methods on the mutating routes
/// get a 405 from axum's method routing.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/responder", post(handlers::responder))
        .route("/update-token", post(handlers::update_token))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
