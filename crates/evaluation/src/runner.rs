//! The evaluation runner: one full benchmark pass over the dataset.
//!
//! The runner drives the injected [`Qualifier`] over every benchmark lead,
//! times each call, and degrades per-entry failures into failure results
//! instead of aborting the pass. One outcome is emitted per (variant, lead)
//! pair, success or failure, never silently dropped.

use std::sync::Arc;
use std::time::Instant;

use leadscope_core::{ModelVariant, Qualifier};
use tracing::{debug, info, warn};

use crate::dataset;
use crate::result::{EvaluationResult, EvaluationRun};
use crate::store::{LeadResolver, ResultStore};

/// Drives benchmark passes against the qualifier and records outcomes.
///
/// All collaborators are injected at construction; the runner holds no
/// global state and every pass is independent.
pub struct EvaluationRunner {
    qualifier: Arc<dyn Qualifier>,
    store: Arc<dyn ResultStore>,
    resolver: Option<Arc<dyn LeadResolver>>,
}

impl EvaluationRunner {
    /// Create a runner over the given qualifier and result store.
    pub fn new(qualifier: Arc<dyn Qualifier>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            qualifier,
            store,
            resolver: None,
        }
    }

    /// Attach a lead resolver so results can link back to persisted lead
    /// records.
    pub fn with_lead_resolver(mut self, resolver: Arc<dyn LeadResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Run the full dataset against one model variant.
    ///
    /// Returns exactly one result per dataset entry. An adapter failure for
    /// one entry degrades that entry to a failure result and the pass
    /// continues. When `persist` is set each result is also appended to the
    /// store; append failures are logged and do not fail the run.
    pub async fn run_for_variant(
        &self,
        variant: ModelVariant,
        persist: bool,
    ) -> Vec<EvaluationResult> {
        let leads = dataset::dataset();
        let mut results = Vec::with_capacity(leads.len());

        info!(variant = %variant, leads = leads.len(), "Starting benchmark pass");

        for entry in leads {
            let lead_id = if persist {
                self.resolve_lead_id(&entry.profile.email).await
            } else {
                None
            };

            let started = Instant::now();
            let result = match self
                .qualifier
                .qualify(&entry.profile, None, variant)
                .await
            {
                Ok(outcome) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    EvaluationResult::success(
                        variant,
                        entry.index,
                        lead_id,
                        elapsed_ms,
                        outcome.score,
                        outcome.qualification_status,
                        outcome.reasoning,
                    )
                }
                Err(failure) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    debug!(
                        variant = %variant,
                        lead_index = entry.index,
                        error = %failure,
                        "Qualification attempt failed"
                    );
                    EvaluationResult::failure(
                        variant,
                        entry.index,
                        lead_id,
                        elapsed_ms,
                        failure.to_string(),
                    )
                }
            };

            if persist {
                if let Err(err) = self.store.append(result.clone()).await {
                    warn!(
                        variant = %variant,
                        lead_index = entry.index,
                        error = %err,
                        "Failed to persist evaluation result"
                    );
                }
            }

            results.push(result);
        }

        results
    }

    /// Run every supported variant over the full dataset.
    pub async fn run_all(&self, persist: bool) -> EvaluationRun {
        let mut results = Vec::new();
        for variant in ModelVariant::ALL {
            results.extend(self.run_for_variant(variant, persist).await);
        }
        EvaluationRun::from_results(results, dataset::dataset().len(), ModelVariant::ALL.to_vec())
    }

    /// Run the benchmark for one named variant, or all variants when `None`.
    pub async fn run_benchmark(
        &self,
        variant: Option<ModelVariant>,
        persist: bool,
    ) -> EvaluationRun {
        match variant {
            Some(variant) => {
                let results = self.run_for_variant(variant, persist).await;
                EvaluationRun::from_results(results, dataset::dataset().len(), vec![variant])
            }
            None => self.run_all(persist).await,
        }
    }

    async fn resolve_lead_id(&self, email: &str) -> Option<String> {
        let resolver = self.resolver.as_ref()?;
        match resolver.resolve(email).await {
            Ok(id) => id,
            Err(err) => {
                // The link to a live lead record is cosmetic; a lookup
                // failure must not cost the data point.
                debug!(email, error = %err, "Lead lookup failed, continuing without lead id");
                None
            }
        }
    }
}
