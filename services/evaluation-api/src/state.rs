//! Shared application state.

use leadscope_evaluation::EvaluationEngine;

/// State shared across request handlers.
pub struct AppState {
    /// The evaluation engine the service fronts.
    pub engine: EvaluationEngine,
}

impl AppState {
    /// Create state over the given engine.
    pub fn new(engine: EvaluationEngine) -> Self {
        Self { engine }
    }
}
