use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use leadscope_core::ModelVariant;
use leadscope_evaluation::{EvaluationResult, RunSummary};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunEvaluationRequest {
    /// Restrict the pass to one variant; all variants when omitted.
    pub model: Option<String>,
    /// Persist results to the store (default true).
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl Default for RunEvaluationRequest {
    fn default() -> Self {
        Self {
            model: None,
            persist: default_persist(),
        }
    }
}

fn default_persist() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct EvaluationQuery {
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunEvaluationData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelVariant>,
    pub results: Vec<EvaluationResult>,
    pub summary: RunSummary,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct VariantResultsData {
    pub model: ModelVariant,
    pub results: Vec<EvaluationResult>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            data,
        }),
    )
        .into_response()
}

fn fail(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/v1/evaluation",
        post(run_evaluation).get(get_evaluation),
    )
}

/// POST /api/v1/evaluation - run a benchmark pass.
async fn run_evaluation(
    State(state): State<Arc<AppState>>,
    body: Option<Json<RunEvaluationRequest>>,
) -> Response {
    let Json(request) = body.unwrap_or_default();

    // An unknown variant is a configuration error: fail the whole call
    // before anything runs.
    let variant = match &request.model {
        Some(name) => match ModelVariant::from_str(name) {
            Ok(variant) => Some(variant),
            Err(err) => return fail(StatusCode::BAD_REQUEST, err.to_string()),
        },
        None => None,
    };

    info!(
        model = variant.map(|v| v.as_str()).unwrap_or("all"),
        persist = request.persist,
        "Running evaluation"
    );

    let run = state.engine.run_benchmark(variant, request.persist).await;

    ok(RunEvaluationData {
        model: variant,
        results: run.results,
        summary: run.summary,
        completed_at: Utc::now(),
    })
}

/// GET /api/v1/evaluation - the aggregate report, or one variant's stored
/// results when `?model=` is given.
async fn get_evaluation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EvaluationQuery>,
) -> Response {
    match query.model {
        Some(name) => {
            let variant = match ModelVariant::from_str(&name) {
                Ok(variant) => variant,
                Err(err) => return fail(StatusCode::BAD_REQUEST, err.to_string()),
            };
            match state.engine.stored_results(variant).await {
                Ok(results) => ok(VariantResultsData {
                    model: variant,
                    count: results.len(),
                    results,
                }),
                Err(err) => {
                    error!(error = %err, "Failed to query stored results");
                    fail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            }
        }
        None => match state.engine.report().await {
            Ok(report) => ok(report),
            Err(err) => {
                error!(error = %err, "Failed to compute evaluation report");
                fail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use leadscope_core::{
        LeadProfile, QualificationFailure, QualificationOutcome, QualificationStatus, Qualifier,
        ScoringCriteria,
    };
    use leadscope_evaluation::{EvaluationEngine, InMemoryResultStore};
    use tower::util::ServiceExt;

    struct FixedQualifier;

    #[async_trait]
    impl Qualifier for FixedQualifier {
        async fn qualify(
            &self,
            _lead: &LeadProfile,
            _criteria: Option<&ScoringCriteria>,
            _variant: ModelVariant,
        ) -> Result<QualificationOutcome, QualificationFailure> {
            Ok(QualificationOutcome {
                score: 60.0,
                reasoning: "fixed".to_string(),
                qualification_status: QualificationStatus::Maybe,
                breakdown: None,
            })
        }
    }

    fn test_app() -> axum::Router {
        let engine = EvaluationEngine::new(
            Arc::new(FixedQualifier),
            Arc::new(InMemoryResultStore::new()),
        );
        crate::app(Arc::new(AppState::new(engine)))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_run_single_variant() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/evaluation")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"model": "grok-3"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["model"], "grok-3");
        assert_eq!(json["data"]["summary"]["failed_tests"], 0);
        assert_eq!(json["data"]["results"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_unknown_variant_is_bad_request() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/evaluation")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"model": "grok-9"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_empty_body_runs_all_variants() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/evaluation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["summary"]["total_tests"], 30);
    }

    #[tokio::test]
    async fn test_get_report() {
        let app = test_app();
        // Seed the store with one persisted pass.
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/evaluation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/evaluation")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["models"].as_array().unwrap().len(), 3);
        assert!(json["data"]["recommendations"].as_array().is_some());
    }

    #[tokio::test]
    async fn test_get_variant_results() {
        let app = test_app();
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/evaluation")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"model": "grok-3"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/evaluation?model=grok-3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["count"], 10);
        assert_eq!(json["data"]["model"], "grok-3");
    }
}
