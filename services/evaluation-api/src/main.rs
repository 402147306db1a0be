//! Evaluation API service entry point.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use evaluation_api::state::AppState;
use leadscope_adapters::{LlmQualifier, ProviderClient, ProviderConfig};
use leadscope_evaluation::{EvaluationEngine, InMemoryResultStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ProviderConfig::from_env().context("provider configuration")?;
    let client = Arc::new(ProviderClient::new(config));
    let qualifier = Arc::new(LlmQualifier::new(client));
    let store = Arc::new(InMemoryResultStore::new());
    let state = Arc::new(AppState::new(EvaluationEngine::new(qualifier, store)));

    let addr =
        std::env::var("EVALUATION_API_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, "Evaluation API listening");
    axum::serve(listener, evaluation_api::app(state)).await?;

    Ok(())
}
