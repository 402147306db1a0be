//! Markdown rendering for evaluation reports.

use std::fmt::Write;

use crate::metrics::EvaluationReport;

/// Render an [`EvaluationReport`] as a markdown summary.
pub fn generate_summary(report: &EvaluationReport) -> String {
    let mut output = String::new();

    writeln!(output, "# Model Evaluation Report").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", report.generated_at.to_rfc3339()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "## Model Comparison").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "| Model | Avg Latency (ms) | Avg Score | Variance | Consistency | Accuracy | Runs | Failed |"
    )
    .unwrap();
    writeln!(
        output,
        "|-------|------------------|-----------|----------|-------------|----------|------|--------|"
    )
    .unwrap();

    for metrics in &report.models {
        writeln!(
            output,
            "| {} | {} | {} | {} | {}% | {}% | {} | {} |",
            metrics.model_variant,
            metrics.average_response_time_ms,
            metrics.average_score,
            metrics.score_variance,
            metrics.score_consistency,
            metrics.accuracy,
            metrics.total_evaluations,
            metrics.failed_evaluations,
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Overall: {}ms average latency, {}% accuracy",
        report.overall_average_response_time_ms, report.overall_accuracy
    )
    .unwrap();
    writeln!(output).unwrap();
    writeln!(output, "## Recommendations").unwrap();
    writeln!(output).unwrap();
    for recommendation in &report.recommendations {
        writeln!(output, "- {}", recommendation).unwrap();
    }

    output
}
