//! CLI for Leadscope.
//!
//! This crate provides the command-line interface for the Leadscope
//! evaluation engine: the benchmark `run` subcommand and a `status`
//! overview of the dataset and supported model variants.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use leadscope_adapters::{LlmQualifier, ProviderClient, ProviderConfig};
use leadscope_core::ModelVariant;
use leadscope_evaluation::{
    dataset, markdown, EvaluationEngine, EvaluationRun, InMemoryResultStore,
};

/// Leadscope CLI.
#[derive(Parser, Debug)]
#[command(name = "leadscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the benchmark and print the comparative report.
    ///
    /// Every benchmark lead is scored by every supported model variant
    /// (or one variant when --model is given); results are persisted to
    /// the session store and the aggregate report is printed afterwards.
    Run {
        /// Restrict the pass to one model variant, e.g. "grok-3".
        #[arg(short, long)]
        model: Option<String>,

        /// Skip persisting results (summary only, no report).
        #[arg(long)]
        no_persist: bool,

        /// Report format: text, markdown, or json (default: text).
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Print every individual result.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show dataset and variant configuration.
    Status {
        /// Show each benchmark lead and its expected score band.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Run the CLI with the given arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            model,
            no_persist,
            format,
            verbose,
        } => {
            // Unknown variants fail the whole call before anything runs.
            let variant = match model {
                Some(name) => Some(ModelVariant::from_str(&name)?),
                None => None,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_benchmark(variant, !no_persist, &format, verbose))
        }
        Commands::Status { detailed } => {
            print_status(detailed);
            Ok(())
        }
    }
}

async fn run_benchmark(
    variant: Option<ModelVariant>,
    persist: bool,
    format: &str,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ProviderConfig::from_env()?;
    let client = Arc::new(ProviderClient::new(config));
    let qualifier = Arc::new(LlmQualifier::new(client));
    let store = Arc::new(InMemoryResultStore::new());
    let engine = EvaluationEngine::new(qualifier, store);

    let variants = match variant {
        Some(variant) => vec![variant],
        None => ModelVariant::ALL.to_vec(),
    };

    let bar = ProgressBar::new(variants.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("[{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results = Vec::new();
    for &variant in &variants {
        bar.set_message(variant.to_string());
        let run = engine.run_benchmark(Some(variant), persist).await;
        results.extend(run.results);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let run = EvaluationRun::from_results(results, dataset::dataset().len(), variants.clone());
    print_summary(&run, verbose);

    if persist {
        let report = engine.report_for(&variants).await?;

        match format {
            "markdown" => print!("\n{}", markdown::generate_summary(&report)),
            "json" => println!("{}", serde_json::to_string_pretty(&report)?),
            _ => {
                println!("\n{}", "Model Comparison".bold());
                for metrics in &report.models {
                    println!(
                        "  {}: {}ms avg, score {}, variance {}, consistency {}%, accuracy {}%, {}/{} ok",
                        metrics.model_variant.as_str().cyan(),
                        metrics.average_response_time_ms,
                        metrics.average_score,
                        metrics.score_variance,
                        metrics.score_consistency,
                        metrics.accuracy,
                        metrics.successful_evaluations,
                        metrics.total_evaluations,
                    );
                }

                println!("\n{}", "Recommendations".bold());
                for recommendation in &report.recommendations {
                    println!("  - {}", recommendation);
                }
            }
        }
    }

    Ok(())
}

fn print_summary(run: &EvaluationRun, verbose: bool) {
    println!("{}", "Benchmark Summary".bold());
    println!("  Leads: {}", run.summary.total_leads);
    let failed_count = run.summary.failed_tests.to_string();
    let failed = if run.summary.failed_tests > 0 {
        failed_count.as_str().red().to_string()
    } else {
        failed_count
    };
    println!(
        "  Attempts: {} ({} ok, {} failed)",
        run.summary.total_tests, run.summary.successful_tests, failed,
    );
    println!(
        "  Average latency over successes: {}ms",
        run.summary.average_response_time_ms
    );

    if verbose {
        for result in &run.results {
            match result.score {
                Some(score) => println!(
                    "  [{}] lead {}: {} ({}ms)",
                    result.model_variant, result.lead_index, score, result.response_time_ms,
                ),
                None => println!(
                    "  [{}] lead {}: {} ({}ms)",
                    result.model_variant,
                    result.lead_index,
                    result.error.as_deref().unwrap_or("failed").red(),
                    result.response_time_ms,
                ),
            }
        }
    }
}

fn print_status(detailed: bool) {
    println!("Leadscope Evaluation Engine");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Dataset: {} benchmark leads", dataset::dataset().len());
    println!("Variants:");
    for variant in ModelVariant::ALL {
        println!("  - {}", variant);
    }

    if detailed {
        println!("\nBenchmark leads:");
        for entry in dataset::dataset() {
            let band = dataset::expected_range(entry.index)
                .map(|range| format!("expected {}-{} ({})", range.min, range.max, range.rationale))
                .unwrap_or_else(|| "no expected band".to_string());
            println!(
                "  {}. {} @ {} - {}",
                entry.index, entry.profile.name, entry.profile.company, band,
            );
        }
    }
}
