//! The result-store boundary and its in-memory reference implementation.
//!
//! The store is an append-only record of every evaluation attempt,
//! partitioned by model variant. Persistence is best-effort from the
//! runner's point of view: append failures are logged and swallowed, and
//! benchmark correctness never depends on a write having landed. The
//! metrics calculator consumes the full per-variant history, most recent
//! first, with no implicit limit.

use async_trait::async_trait;
use dashmap::DashMap;
use leadscope_core::ModelVariant;
use thiserror::Error as ThisError;

use crate::result::EvaluationResult;

/// Errors surfaced by a result-store backend.
#[derive(Debug, Clone, ThisError)]
pub enum StoreError {
    /// The backend rejected or lost the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Durable, append-only record of evaluation attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append one result to the variant's history.
    async fn append(&self, result: EvaluationResult) -> Result<(), StoreError>;

    /// Every stored result for `variant`, ordered by recency (newest first).
    async fn query(&self, variant: ModelVariant) -> Result<Vec<EvaluationResult>, StoreError>;
}

/// Optional capability resolving a benchmark lead's contact email to the id
/// of a persisted lead record, when one exists in the live store.
#[async_trait]
pub trait LeadResolver: Send + Sync {
    /// Look up a persisted lead id by contact email.
    async fn resolve(&self, email: &str) -> Result<Option<String>, StoreError>;
}

/// In-memory [`ResultStore`] keyed by model variant.
///
/// The reference implementation used by the CLI and the evaluation API;
/// results accumulate across passes for as long as the process lives.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    partitions: DashMap<ModelVariant, Vec<EvaluationResult>>,
}

impl InMemoryResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored results across all variants.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|entry| entry.value().len()).sum()
    }

    /// Whether the store holds no results.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn append(&self, result: EvaluationResult) -> Result<(), StoreError> {
        self.partitions
            .entry(result.model_variant)
            .or_default()
            .push(result);
        Ok(())
    }

    async fn query(&self, variant: ModelVariant) -> Result<Vec<EvaluationResult>, StoreError> {
        let mut results = self
            .partitions
            .get(&variant)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        // Stored in insertion order; the contract is newest first.
        results.reverse();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadscope_core::QualificationStatus;

    fn scored(variant: ModelVariant, index: usize, score: f64) -> EvaluationResult {
        EvaluationResult::success(
            variant,
            index,
            None,
            100,
            score,
            QualificationStatus::Maybe,
            "",
        )
    }

    #[tokio::test]
    async fn test_append_and_query_partitioned_by_variant() {
        let store = InMemoryResultStore::new();
        store
            .append(scored(ModelVariant::Grok3, 0, 80.0))
            .await
            .unwrap();
        store
            .append(scored(ModelVariant::Grok4FastReasoning, 0, 60.0))
            .await
            .unwrap();

        let grok3 = store.query(ModelVariant::Grok3).await.unwrap();
        assert_eq!(grok3.len(), 1);
        assert_eq!(grok3[0].score, Some(80.0));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_query_returns_newest_first() {
        let store = InMemoryResultStore::new();
        for index in 0..3 {
            store
                .append(scored(ModelVariant::Grok3, index, index as f64))
                .await
                .unwrap();
        }
        let results = store.query(ModelVariant::Grok3).await.unwrap();
        let indices: Vec<usize> = results.iter().map(|r| r.lead_index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_query_unknown_variant_is_empty() {
        let store = InMemoryResultStore::new();
        assert!(store
            .query(ModelVariant::Grok4FastNonReasoning)
            .await
            .unwrap()
            .is_empty());
        assert!(store.is_empty());
    }
}
