//! Evaluation API service for Leadscope.
//!
//! A thin HTTP surface over the evaluation engine: run benchmark passes and
//! fetch the comparative report or a variant's stored results.

pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the service router over the given state.
pub fn app(state: Arc<AppState>) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
