//! HTTP route modules.

pub mod evaluation;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// All service routes.
pub fn routes() -> Router<Arc<AppState>> {
    evaluation::routes()
}
