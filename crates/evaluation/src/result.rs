//! Evaluation result and run-summary types.
//!
//! An [`EvaluationResult`] is created once per (model variant, dataset entry)
//! pair per pass and never mutated afterwards; everything derived from it
//! (metrics, consistency annotations) is recomputed on demand.

use chrono::{DateTime, Utc};
use leadscope_core::{ModelVariant, QualificationStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status label attached to an evaluation outcome.
///
/// Mirrors [`QualificationStatus`] plus the sentinel label used when the
/// qualifier failed for that entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    /// The variant judged the lead qualified.
    Qualified,
    /// The variant judged the lead potentially qualified.
    Maybe,
    /// The variant judged the lead not qualified.
    NotQualified,
    /// The qualifier failed; no score was produced.
    Failed,
}

impl From<QualificationStatus> for EvaluationStatus {
    fn from(status: QualificationStatus) -> Self {
        match status {
            QualificationStatus::Qualified => EvaluationStatus::Qualified,
            QualificationStatus::Maybe => EvaluationStatus::Maybe,
            QualificationStatus::NotQualified => EvaluationStatus::NotQualified,
        }
    }
}

/// The immutable record of one qualification attempt during a benchmark pass.
///
/// Invariant: `score` is present exactly when `error` is absent; the two are
/// mutually exclusive outcomes of the same attempt. The constructors below
/// are the only way this crate builds results, so the invariant holds for
/// every record it emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Unique identifier for this attempt.
    pub result_id: Uuid,
    /// The model variant exercised.
    pub model_variant: ModelVariant,
    /// 0-based position of the benchmark lead in the dataset; the join key
    /// to its expected-range annotation.
    pub lead_index: usize,
    /// Identifier of a persisted lead record, when the benchmark lead exists
    /// in the live store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    /// Wall-clock duration of the attempt in milliseconds.
    pub response_time_ms: u64,
    /// Qualification score in [0, 100]; absent when the attempt failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Status label for the attempt.
    pub status: EvaluationStatus,
    /// Rationale returned by the qualifier; empty on failure.
    pub reasoning: String,
    /// Error message captured from a failed attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the attempt completed.
    pub created_at: DateTime<Utc>,
}

impl EvaluationResult {
    /// Record a successful attempt.
    pub fn success(
        variant: ModelVariant,
        lead_index: usize,
        lead_id: Option<String>,
        response_time_ms: u64,
        score: f64,
        status: QualificationStatus,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            result_id: Uuid::new_v4(),
            model_variant: variant,
            lead_index,
            lead_id,
            response_time_ms,
            score: Some(score),
            status: status.into(),
            reasoning: reasoning.into(),
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Record a failed attempt.
    pub fn failure(
        variant: ModelVariant,
        lead_index: usize,
        lead_id: Option<String>,
        response_time_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            result_id: Uuid::new_v4(),
            model_variant: variant,
            lead_index,
            lead_id,
            response_time_ms,
            score: None,
            status: EvaluationStatus::Failed,
            reasoning: String::new(),
            error: Some(error.into()),
            created_at: Utc::now(),
        }
    }

    /// Whether this attempt produced a score.
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    /// Grouping key for consistency analysis across repeated runs of the
    /// same lead: the persisted lead id when present, the dataset index
    /// otherwise.
    pub fn lead_key(&self) -> String {
        match &self.lead_id {
            Some(id) => id.clone(),
            None => format!("index_{}", self.lead_index),
        }
    }
}

/// Aggregate counts for one benchmark pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of benchmark leads in the dataset.
    pub total_leads: usize,
    /// Attempts made (dataset size x variant count).
    pub total_tests: usize,
    /// Attempts that produced a score.
    pub successful_tests: usize,
    /// Attempts that failed.
    pub failed_tests: usize,
    /// Mean response time in milliseconds over successful attempts only;
    /// 0 when there were no successes.
    pub average_response_time_ms: u64,
    /// Variants exercised by the pass.
    pub models: Vec<ModelVariant>,
}

/// The full output of a benchmark pass: every result plus its summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRun {
    /// One result per (variant, dataset entry) pair.
    pub results: Vec<EvaluationResult>,
    /// Aggregate counts.
    pub summary: RunSummary,
}

impl EvaluationRun {
    /// Build a run from collected results.
    ///
    /// `total_leads` is the dataset size, passed separately because the
    /// result list length is dataset size x variant count.
    pub fn from_results(
        results: Vec<EvaluationResult>,
        total_leads: usize,
        models: Vec<ModelVariant>,
    ) -> Self {
        let successful: Vec<&EvaluationResult> =
            results.iter().filter(|r| r.error.is_none()).collect();
        let failed_tests = results.len() - successful.len();

        let average_response_time_ms = if successful.is_empty() {
            0
        } else {
            let total: u64 = successful.iter().map(|r| r.response_time_ms).sum();
            ((total as f64) / (successful.len() as f64)).round() as u64
        };

        let summary = RunSummary {
            total_leads,
            total_tests: results.len(),
            successful_tests: successful.len(),
            failed_tests,
            average_response_time_ms,
            models,
        };

        Self { results, summary }
    }
}
