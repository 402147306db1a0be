//! The metrics calculator: comparative statistics over stored results.
//!
//! Turns raw [`EvaluationResult`] collections into per-variant statistics
//! (variance, consistency, accuracy-against-expectation) and an aggregate
//! report with ranked recommendations. Everything here is derived and
//! recomputed on demand; stored results are never mutated.
//!
//! The consistency transform (`100 - variance/10`, floored at 0) and the
//! recommendation thresholds (70% of slowest, 10 percentage points,
//! accuracy 70%, variance 400) are tuned constants and part of the
//! behavioral contract; do not re-derive them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use leadscope_core::ModelVariant;
use serde::{Deserialize, Serialize};

use crate::dataset;
use crate::result::EvaluationResult;
use crate::store::{ResultStore, StoreError};

/// Variance threshold above which a variant gets a tighter-criteria flag.
const HIGH_VARIANCE_THRESHOLD: f64 = 400.0;

/// Accuracy floor below which prompt refinement is recommended instead of a
/// production winner.
const ACCURACY_TARGET: f64 = 70.0;

/// Consistency spread, in percentage points, that makes the most-consistent
/// variant worth recommending.
const CONSISTENCY_SPREAD: f64 = 10.0;

/// Speed ratio: the fastest variant is recommended when its mean latency is
/// at most this fraction of the slowest's.
const SPEED_RATIO: f64 = 0.7;

/// Population variance of a score sequence.
///
/// Divides by N, not N-1; an empty or single-element sequence has no spread
/// and yields 0.
pub fn variance(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n
}

/// Score consistency: `max(0, 100 - variance/10)`, rounded to two decimals.
///
/// A bounded, monotonic transform of variance; a variance of 1000 maps to
/// the floor of 0 and a variance near 0 to consistency near 100. Empty
/// input yields 0.
pub fn consistency(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    round2((100.0 - variance(scores) / 10.0).max(0.0))
}

/// Accuracy against expected score bands, as a percentage.
///
/// Only scored, error-free results with a matching band are comparable;
/// a comparable result counts as correct when its score lies inside the
/// band, inclusive on both ends. With no comparable results the accuracy is
/// 0 - "no evidence of accuracy", not an error.
pub fn accuracy(results: &[EvaluationResult], expected: &HashMap<usize, (f64, f64)>) -> f64 {
    let mut correct = 0usize;
    let mut total = 0usize;

    for result in results {
        let score = match result.score {
            Some(score) if result.error.is_none() => score,
            _ => continue,
        };
        let Some(&(min, max)) = expected.get(&result.lead_index) else {
            continue;
        };
        total += 1;
        if score >= min && score <= max {
            correct += 1;
        }
    }

    if total > 0 {
        (correct as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn expected_table() -> HashMap<usize, (f64, f64)> {
    (0..dataset::dataset().len())
        .filter_map(|i| dataset::expected_range(i).map(|r| (i, (r.min, r.max))))
        .collect()
}

/// Display-rounded statistics for one model variant.
///
/// Response times round to the nearest millisecond and the remaining
/// figures to two decimals. These are presentation values; the
/// recommendation heuristics compare the full-precision internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// The variant these figures describe.
    pub model_variant: ModelVariant,
    /// Mean response time over all attempts, failures included.
    pub average_response_time_ms: u64,
    /// Mean score over scored results.
    pub average_score: f64,
    /// Population variance of scores.
    pub score_variance: f64,
    /// Consistency percentage.
    pub score_consistency: f64,
    /// Accuracy percentage against the expected-range table.
    pub accuracy: f64,
    /// Total recorded attempts.
    pub total_evaluations: usize,
    /// Attempts that produced a score.
    pub successful_evaluations: usize,
    /// Attempts that failed.
    pub failed_evaluations: usize,
}

/// Full-precision per-variant statistics, kept internal so display rounding
/// never leaks into threshold comparisons.
#[derive(Debug, Clone)]
struct VariantStats {
    variant: ModelVariant,
    mean_latency_ms: f64,
    mean_score: f64,
    variance: f64,
    consistency: f64,
    accuracy: f64,
    total: usize,
    successful: usize,
    failed: usize,
}

impl VariantStats {
    fn from_results(variant: ModelVariant, results: &[EvaluationResult]) -> Self {
        let scores: Vec<f64> = results.iter().filter_map(|r| r.score).collect();
        let total = results.len();
        let successful = scores.len();

        // Latency is meaningful even for failures: it reflects provider
        // responsiveness, so the mean runs over every attempt.
        let mean_latency_ms = if total > 0 {
            results.iter().map(|r| r.response_time_ms as f64).sum::<f64>() / total as f64
        } else {
            0.0
        };

        let mean_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        Self {
            variant,
            mean_latency_ms,
            mean_score,
            variance: variance(&scores),
            consistency: consistency(&scores),
            accuracy: accuracy(results, &expected_table()),
            total,
            successful,
            failed: total - successful,
        }
    }

    fn to_metrics(&self) -> ModelMetrics {
        ModelMetrics {
            model_variant: self.variant,
            average_response_time_ms: self.mean_latency_ms.round() as u64,
            average_score: round2(self.mean_score),
            score_variance: round2(self.variance),
            score_consistency: round2(self.consistency),
            accuracy: round2(self.accuracy),
            total_evaluations: self.total,
            successful_evaluations: self.successful,
            failed_evaluations: self.failed,
        }
    }
}

/// The aggregate comparison across model variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Per-variant statistics.
    pub models: Vec<ModelMetrics>,
    /// Unweighted mean of the per-variant mean response times.
    pub overall_average_response_time_ms: u64,
    /// Unweighted mean of the per-variant accuracies.
    pub overall_accuracy: f64,
    /// Actionable recommendations, in rule order.
    pub recommendations: Vec<String>,
    /// When this report was computed.
    pub generated_at: DateTime<Utc>,
}

/// Computes statistics and reports from the result store.
pub struct MetricsCalculator {
    store: Arc<dyn ResultStore>,
}

impl MetricsCalculator {
    /// Create a calculator over the given store.
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }

    /// Display-rounded statistics for one variant, over its full persisted
    /// history.
    pub async fn model_metrics(&self, variant: ModelVariant) -> Result<ModelMetrics, StoreError> {
        Ok(self.variant_stats(variant).await?.to_metrics())
    }

    /// Consistency per lead grouping key across repeated runs of the same
    /// lead, for one variant.
    ///
    /// A derived annotation: stored results stay untouched. Groups with a
    /// single scored attempt carry no repeatability signal and are omitted.
    pub async fn per_lead_consistency(
        &self,
        variant: ModelVariant,
    ) -> Result<HashMap<String, f64>, StoreError> {
        let results = self.store.query(variant).await?;

        let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
        for result in &results {
            if let Some(score) = result.score {
                groups.entry(result.lead_key()).or_default().push(score);
            }
        }

        Ok(groups
            .into_iter()
            .filter(|(_, scores)| scores.len() > 1)
            .map(|(key, scores)| (key, consistency(&scores)))
            .collect())
    }

    /// Aggregate report over the given variants.
    pub async fn aggregate_report(
        &self,
        variants: &[ModelVariant],
    ) -> Result<EvaluationReport, StoreError> {
        let mut stats = Vec::with_capacity(variants.len());
        for &variant in variants {
            stats.push(self.variant_stats(variant).await?);
        }

        let overall_latency = if stats.is_empty() {
            0.0
        } else {
            stats.iter().map(|s| s.mean_latency_ms).sum::<f64>() / stats.len() as f64
        };
        let overall_accuracy = if stats.is_empty() {
            0.0
        } else {
            stats.iter().map(|s| s.accuracy).sum::<f64>() / stats.len() as f64
        };

        Ok(EvaluationReport {
            models: stats.iter().map(VariantStats::to_metrics).collect(),
            overall_average_response_time_ms: overall_latency.round() as u64,
            overall_accuracy: round2(overall_accuracy),
            recommendations: generate_recommendations(&stats),
            generated_at: Utc::now(),
        })
    }

    /// Aggregate report over every supported variant.
    pub async fn report(&self) -> Result<EvaluationReport, StoreError> {
        self.aggregate_report(&ModelVariant::ALL).await
    }

    async fn variant_stats(&self, variant: ModelVariant) -> Result<VariantStats, StoreError> {
        let results = self.store.query(variant).await?;
        Ok(VariantStats::from_results(variant, &results))
    }
}

/// The recommendation rules, evaluated independently and concatenated in
/// fixed order: speed, consistency, accuracy, high-variance flags, failure
/// flags. Each of the first three fires at most once; the flags fire per
/// offending variant.
fn generate_recommendations(stats: &[VariantStats]) -> Vec<String> {
    let mut recommendations = Vec::new();

    // Speed: fastest worth calling out when it is at most 70% of the
    // slowest's mean latency.
    let mut by_speed: Vec<&VariantStats> = stats.iter().collect();
    by_speed.sort_by(|a, b| a.mean_latency_ms.total_cmp(&b.mean_latency_ms));
    if let (Some(fastest), Some(slowest)) = (by_speed.first(), by_speed.last()) {
        if fastest.mean_latency_ms > 0.0
            && fastest.mean_latency_ms <= slowest.mean_latency_ms * SPEED_RATIO
        {
            let speedup = slowest.mean_latency_ms / fastest.mean_latency_ms;
            recommendations.push(format!(
                "Use {} for bulk scoring - {:.1}x faster ({}ms vs {}ms)",
                fastest.variant,
                speedup,
                fastest.mean_latency_ms.round() as u64,
                slowest.mean_latency_ms.round() as u64,
            ));
        }
    }

    // Consistency: spread of more than 10 percentage points.
    let mut by_consistency: Vec<&VariantStats> = stats.iter().collect();
    by_consistency.sort_by(|a, b| b.consistency.total_cmp(&a.consistency));
    if let (Some(most), Some(least)) = (by_consistency.first(), by_consistency.last()) {
        if most.consistency > least.consistency + CONSISTENCY_SPREAD {
            recommendations.push(format!(
                "Use {} for reliable scoring - {}% consistency vs {}%",
                most.variant, most.consistency, least.consistency,
            ));
        }
    }

    // Accuracy: below the target even for the best variant means the prompt
    // needs work; otherwise the best variant is the production pick.
    let mut by_accuracy: Vec<&VariantStats> = stats.iter().collect();
    by_accuracy.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    if let Some(best) = by_accuracy.first() {
        if best.accuracy < ACCURACY_TARGET {
            recommendations.push(format!(
                "Refine prompt - accuracy {:.1}% below target (70%+)",
                best.accuracy,
            ));
        } else {
            recommendations.push(format!(
                "Use {} for production - best accuracy ({:.1}%)",
                best.variant, best.accuracy,
            ));
        }
    }

    for stat in stats {
        if stat.variance > HIGH_VARIANCE_THRESHOLD {
            recommendations.push(format!(
                "Add scoring criteria to {} - variance {:.0} too high",
                stat.variant, stat.variance,
            ));
        }
    }

    for stat in stats {
        if stat.failed > 0 {
            recommendations.push(format!(
                "Fix {} - {} failed evaluation{}",
                stat.variant,
                stat.failed,
                if stat.failed > 1 { "s" } else { "" },
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations
            .push("All models are performing well. Current prompt engineering appears effective.".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadscope_core::QualificationStatus;

    use crate::store::{InMemoryResultStore, MockResultStore};

    fn scored(
        variant: ModelVariant,
        lead_index: usize,
        score: f64,
        latency_ms: u64,
    ) -> EvaluationResult {
        EvaluationResult::success(
            variant,
            lead_index,
            None,
            latency_ms,
            score,
            QualificationStatus::Maybe,
            "",
        )
    }

    fn failed(variant: ModelVariant, lead_index: usize, latency_ms: u64) -> EvaluationResult {
        EvaluationResult::failure(variant, lead_index, None, latency_ms, "provider error")
    }

    fn ranges(entries: &[(usize, f64, f64)]) -> HashMap<usize, (f64, f64)> {
        entries.iter().map(|&(i, min, max)| (i, (min, max))).collect()
    }

    #[test]
    fn test_variance_is_nonnegative_and_zero_without_spread() {
        assert!(variance(&[80.0, 85.0, 90.0, 75.0, 70.0]) > 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[85.0]), 0.0);
        assert_eq!(variance(&[80.0, 80.0, 80.0]), 0.0);
    }

    #[test]
    fn test_variance_known_value() {
        // Mean 5, squared deviations sum 32, population divisor 8.
        let scores = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(variance(&scores), 4.0);
    }

    #[test]
    fn test_consistency_matches_formula() {
        for scores in [
            vec![80.0, 81.0, 79.0, 80.0, 81.0],
            vec![20.0, 80.0, 30.0, 90.0, 50.0],
            vec![55.0, 55.0],
        ] {
            let expected = ((100.0 - variance(&scores) / 10.0).max(0.0) * 100.0).round() / 100.0;
            assert_eq!(consistency(&scores), expected);
        }
    }

    #[test]
    fn test_consistency_edges() {
        assert_eq!(consistency(&[]), 0.0);
        assert_eq!(consistency(&[80.0, 80.0, 80.0, 80.0]), 100.0);
        // Variance 2500 drives the transform past the floor.
        assert_eq!(consistency(&[0.0, 100.0, 0.0, 100.0]), 0.0);
        assert!(consistency(&[80.0, 81.0, 79.0, 80.0, 81.0]) > 90.0);
    }

    #[test]
    fn test_accuracy_in_range_counts() {
        let results = vec![
            scored(ModelVariant::Grok3, 0, 85.0, 100),
            scored(ModelVariant::Grok3, 1, 25.0, 100),
        ];
        let expected = ranges(&[(0, 80.0, 100.0), (1, 0.0, 30.0)]);
        assert_eq!(accuracy(&results, &expected), 100.0);
    }

    #[test]
    fn test_accuracy_out_of_range_and_failure() {
        // Scenario B: one out-of-range score, one failure.
        let results = vec![
            scored(ModelVariant::Grok3, 0, 50.0, 100),
            failed(ModelVariant::Grok3, 1, 100),
        ];
        let expected = ranges(&[(0, 80.0, 100.0), (1, 0.0, 30.0)]);
        assert_eq!(accuracy(&results, &expected), 0.0);
    }

    #[test]
    fn test_accuracy_excludes_errored_results_entirely() {
        // Three errors and two in-range scores: 100, not 40.
        let results = vec![
            failed(ModelVariant::Grok3, 0, 100),
            failed(ModelVariant::Grok3, 1, 100),
            failed(ModelVariant::Grok3, 2, 100),
            scored(ModelVariant::Grok3, 3, 85.0, 100),
            scored(ModelVariant::Grok3, 4, 90.0, 100),
        ];
        let expected = ranges(&[
            (0, 0.0, 100.0),
            (1, 0.0, 100.0),
            (2, 0.0, 100.0),
            (3, 80.0, 100.0),
            (4, 80.0, 100.0),
        ]);
        assert_eq!(accuracy(&results, &expected), 100.0);
    }

    #[test]
    fn test_accuracy_without_evidence_is_zero() {
        assert_eq!(accuracy(&[], &ranges(&[(0, 0.0, 100.0)])), 0.0);
        let results = vec![scored(ModelVariant::Grok3, 0, 85.0, 100)];
        assert_eq!(accuracy(&results, &HashMap::new()), 0.0);
        // Bounds are inclusive on both ends.
        let expected = ranges(&[(0, 85.0, 85.0)]);
        assert_eq!(accuracy(&results, &expected), 100.0);
    }

    #[tokio::test]
    async fn test_model_metrics_means_and_rounding() {
        let store = Arc::new(InMemoryResultStore::new());
        // Index 0 expects [85, 100]: one hit, one miss.
        store.append(scored(ModelVariant::Grok3, 0, 90.0, 100)).await.unwrap();
        store.append(scored(ModelVariant::Grok3, 0, 50.0, 200)).await.unwrap();
        store.append(failed(ModelVariant::Grok3, 1, 600)).await.unwrap();

        let calculator = MetricsCalculator::new(store);
        let metrics = calculator.model_metrics(ModelVariant::Grok3).await.unwrap();

        assert_eq!(metrics.total_evaluations, 3);
        assert_eq!(metrics.successful_evaluations, 2);
        assert_eq!(metrics.failed_evaluations, 1);
        // Mean latency runs over all attempts, failure included.
        assert_eq!(metrics.average_response_time_ms, 300);
        assert_eq!(metrics.average_score, 70.0);
        assert_eq!(metrics.score_variance, 400.0);
        assert_eq!(metrics.score_consistency, 60.0);
        assert_eq!(metrics.accuracy, 50.0);
    }

    #[tokio::test]
    async fn test_per_lead_consistency_is_an_annotation() {
        let store = Arc::new(InMemoryResultStore::new());
        store.append(scored(ModelVariant::Grok3, 0, 80.0, 100)).await.unwrap();
        store.append(scored(ModelVariant::Grok3, 0, 90.0, 100)).await.unwrap();
        store.append(scored(ModelVariant::Grok3, 1, 40.0, 100)).await.unwrap();

        let calculator = MetricsCalculator::new(store.clone());
        let per_lead = calculator
            .per_lead_consistency(ModelVariant::Grok3)
            .await
            .unwrap();

        // Variance of [80, 90] is 25 -> consistency 97.5.
        assert_eq!(per_lead.get("index_0"), Some(&97.5));
        // Single-attempt leads carry no repeatability signal.
        assert!(!per_lead.contains_key("index_1"));
        // Stored results are untouched.
        let stored = store.query(ModelVariant::Grok3).await.unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn test_speed_recommendation_fires_at_four_x() {
        // Scenario C: A at 1000ms x3, B at 4000ms x3.
        let mut mock = MockResultStore::new();
        mock.expect_query().returning(|variant| match variant {
            ModelVariant::Grok3 => Ok(vec![
                scored(ModelVariant::Grok3, 0, 90.0, 1000),
                scored(ModelVariant::Grok3, 1, 20.0, 1000),
                scored(ModelVariant::Grok3, 2, 55.0, 1000),
            ]),
            ModelVariant::Grok4FastReasoning => Ok(vec![
                scored(ModelVariant::Grok4FastReasoning, 0, 90.0, 4000),
                scored(ModelVariant::Grok4FastReasoning, 1, 20.0, 4000),
                scored(ModelVariant::Grok4FastReasoning, 2, 55.0, 4000),
            ]),
            _ => Ok(Vec::new()),
        });

        let calculator = MetricsCalculator::new(Arc::new(mock));
        let report = calculator
            .aggregate_report(&[ModelVariant::Grok3, ModelVariant::Grok4FastReasoning])
            .await
            .unwrap();

        assert!(
            report.recommendations.iter().any(|r| r
                .starts_with("Use grok-3 for bulk scoring - 4.0x faster (1000ms vs 4000ms)")),
            "speed recommendation missing: {:?}",
            report.recommendations
        );
        // Unweighted mean across the two variants.
        assert_eq!(report.overall_average_response_time_ms, 2500);
    }

    #[tokio::test]
    async fn test_variance_and_consistency_recommendations() {
        // Scenario D: one perfectly consistent variant, one scattered.
        let store = Arc::new(InMemoryResultStore::new());
        for score in [80.0, 80.0, 80.0, 80.0] {
            store.append(scored(ModelVariant::Grok3, 0, score, 100)).await.unwrap();
        }
        for score in [20.0, 80.0, 30.0, 90.0] {
            store
                .append(scored(ModelVariant::Grok4FastReasoning, 0, score, 100))
                .await
                .unwrap();
        }

        let calculator = MetricsCalculator::new(store);
        let report = calculator
            .aggregate_report(&[ModelVariant::Grok3, ModelVariant::Grok4FastReasoning])
            .await
            .unwrap();

        let consistent = &report.models[0];
        let scattered = &report.models[1];
        assert_eq!(consistent.score_variance, 0.0);
        assert_eq!(consistent.score_consistency, 100.0);
        assert!(scattered.score_variance > 900.0);

        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Use grok-3 for reliable scoring")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r == "Add scoring criteria to grok-4-fast-reasoning - variance 925 too high"));
    }

    #[tokio::test]
    async fn test_accuracy_and_failure_recommendations() {
        let store = Arc::new(InMemoryResultStore::new());
        // Out of band for index 0 ([85, 100]) and one failure.
        store.append(scored(ModelVariant::Grok3, 0, 50.0, 100)).await.unwrap();
        store.append(failed(ModelVariant::Grok3, 1, 100)).await.unwrap();

        let calculator = MetricsCalculator::new(store);
        let report = calculator.aggregate_report(&[ModelVariant::Grok3]).await.unwrap();

        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Refine prompt - accuracy 0.0% below target")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r == "Fix grok-3 - 1 failed evaluation"));
    }

    #[tokio::test]
    async fn test_production_pick_above_accuracy_target() {
        let store = Arc::new(InMemoryResultStore::new());
        store.append(scored(ModelVariant::Grok3, 0, 90.0, 100)).await.unwrap();

        let calculator = MetricsCalculator::new(store);
        let report = calculator.aggregate_report(&[ModelVariant::Grok3]).await.unwrap();
        assert!(report
            .recommendations
            .iter()
            .any(|r| r == "Use grok-3 for production - best accuracy (100.0%)"));
    }

    #[tokio::test]
    async fn test_empty_report_falls_back_to_neutral_statement() {
        let calculator = MetricsCalculator::new(Arc::new(InMemoryResultStore::new()));
        let report = calculator.aggregate_report(&[]).await.unwrap();
        assert_eq!(
            report.recommendations,
            vec!["All models are performing well. Current prompt engineering appears effective."]
        );
        assert_eq!(report.overall_average_response_time_ms, 0);
        assert_eq!(report.overall_accuracy, 0.0);
    }
}
