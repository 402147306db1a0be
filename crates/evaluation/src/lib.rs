//! Multi-model evaluation and consistency-scoring engine for Leadscope.
//!
//! This crate runs a fixed benchmark of synthetic leads against every
//! supported model variant, measures latency and output quality, and derives
//! comparative statistics: variance, consistency, accuracy against expected
//! score bands, and actionable recommendations.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use leadscope_evaluation::{EvaluationEngine, InMemoryResultStore};
//! # use leadscope_core::Qualifier;
//! # async fn example(qualifier: Arc<dyn Qualifier>) {
//! let store = Arc::new(InMemoryResultStore::new());
//! let engine = EvaluationEngine::new(qualifier, store);
//!
//! // Run the full benchmark and persist results.
//! let run = engine.run_benchmark(None, true).await;
//! println!("{} attempts, {} failed", run.summary.total_tests, run.summary.failed_tests);
//!
//! // Recompute the comparative report on demand.
//! let report = engine.report().await.unwrap();
//! for recommendation in &report.recommendations {
//!     println!("{recommendation}");
//! }
//! # }
//! ```
//!
//! # Modules
//!
//! - [`dataset`] - The fixed benchmark dataset and expected-score bands
//! - [`result`] - Evaluation result and run-summary types
//! - [`store`] - The result-store boundary and in-memory implementation
//! - [`runner`] - The benchmark pass driver
//! - [`metrics`] - Statistics and the aggregate report
//! - [`markdown`] - Markdown rendering of reports

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod dataset;
pub mod markdown;
pub mod metrics;
pub mod result;
pub mod runner;
pub mod store;

pub use metrics::{EvaluationReport, MetricsCalculator, ModelMetrics};
pub use result::{EvaluationResult, EvaluationRun, EvaluationStatus, RunSummary};
pub use runner::EvaluationRunner;
pub use store::{InMemoryResultStore, LeadResolver, ResultStore, StoreError};

use std::sync::Arc;

use leadscope_core::{ModelVariant, Qualifier};

/// The engine facade: one runner and one calculator over a shared store.
///
/// This is the surface the CLI and the HTTP layer consume; it owns nothing
/// beyond the wiring between the injected collaborators.
pub struct EvaluationEngine {
    runner: EvaluationRunner,
    calculator: MetricsCalculator,
    store: Arc<dyn ResultStore>,
}

impl EvaluationEngine {
    /// Create an engine over the given qualifier and result store.
    pub fn new(qualifier: Arc<dyn Qualifier>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            runner: EvaluationRunner::new(qualifier, store.clone()),
            calculator: MetricsCalculator::new(store.clone()),
            store,
        }
    }

    /// Create an engine whose runner links results to persisted leads.
    pub fn with_lead_resolver(
        qualifier: Arc<dyn Qualifier>,
        store: Arc<dyn ResultStore>,
        resolver: Arc<dyn LeadResolver>,
    ) -> Self {
        Self {
            runner: EvaluationRunner::new(qualifier, store.clone()).with_lead_resolver(resolver),
            calculator: MetricsCalculator::new(store.clone()),
            store,
        }
    }

    /// Run the benchmark for one variant, or all variants when `None`.
    pub async fn run_benchmark(
        &self,
        variant: Option<ModelVariant>,
        persist: bool,
    ) -> EvaluationRun {
        self.runner.run_benchmark(variant, persist).await
    }

    /// Recompute the aggregate report from the store.
    pub async fn report(&self) -> Result<EvaluationReport, StoreError> {
        self.calculator.report().await
    }

    /// Recompute the aggregate report for a subset of variants.
    pub async fn report_for(
        &self,
        variants: &[ModelVariant],
    ) -> Result<EvaluationReport, StoreError> {
        self.calculator.aggregate_report(variants).await
    }

    /// Per-variant statistics over the full persisted history.
    pub async fn model_metrics(&self, variant: ModelVariant) -> Result<ModelMetrics, StoreError> {
        self.calculator.model_metrics(variant).await
    }

    /// Every stored result for `variant`, newest first.
    pub async fn stored_results(
        &self,
        variant: ModelVariant,
    ) -> Result<Vec<EvaluationResult>, StoreError> {
        self.store.query(variant).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use leadscope_core::{
        LeadProfile, QualificationFailure, QualificationOutcome, QualificationStatus,
        ScoringCriteria,
    };

    /// Scores strong leads 90 and everything else 20, so accuracy lines up
    /// with the dataset's clearly-strong and clearly-weak bands.
    struct BandedQualifier;

    #[async_trait]
    impl Qualifier for BandedQualifier {
        async fn qualify(
            &self,
            lead: &LeadProfile,
            _criteria: Option<&ScoringCriteria>,
            _variant: ModelVariant,
        ) -> Result<QualificationOutcome, QualificationFailure> {
            let strong = lead
                .attributes
                .as_ref()
                .map(|a| matches!(a.budget.as_deref(), Some("Very High") | Some("High")))
                .unwrap_or(false);
            let score = if strong { 90.0 } else { 20.0 };
            Ok(QualificationOutcome {
                score,
                reasoning: "banded".to_string(),
                qualification_status: if strong {
                    QualificationStatus::Qualified
                } else {
                    QualificationStatus::NotQualified
                },
                breakdown: None,
            })
        }
    }

    #[tokio::test]
    async fn test_engine_run_then_report_round_trip() {
        let store = Arc::new(InMemoryResultStore::new());
        let engine = EvaluationEngine::new(Arc::new(BandedQualifier), store);

        let run = engine.run_benchmark(None, true).await;
        assert_eq!(
            run.summary.total_tests,
            dataset::dataset().len() * ModelVariant::ALL.len()
        );
        assert_eq!(run.summary.failed_tests, 0);

        let report = engine.report().await.unwrap();
        assert_eq!(report.models.len(), ModelVariant::ALL.len());
        for metrics in &report.models {
            assert_eq!(metrics.total_evaluations, dataset::dataset().len());
            assert_eq!(metrics.failed_evaluations, 0);
        }
        assert!(!report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_report_reflects_only_persisted_runs() {
        let store = Arc::new(InMemoryResultStore::new());
        let engine = EvaluationEngine::new(Arc::new(BandedQualifier), store);

        engine.run_benchmark(Some(ModelVariant::Grok3), false).await;
        let report = engine.report().await.unwrap();
        assert!(report.models.iter().all(|m| m.total_evaluations == 0));

        engine.run_benchmark(Some(ModelVariant::Grok3), true).await;
        let stored = engine.stored_results(ModelVariant::Grok3).await.unwrap();
        assert_eq!(stored.len(), dataset::dataset().len());
    }
}
