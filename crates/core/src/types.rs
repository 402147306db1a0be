// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lead, scoring-criteria and qualification types.
//!
//! These types are the shared vocabulary between the evaluation engine, the
//! provider adapters and the HTTP surface. Serialized field names follow the
//! wire conventions of the scoring provider where a type crosses that
//! boundary (camelCase payloads), and snake_case elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// One identifier from the closed set of interchangeable LLM backends
/// evaluated side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelVariant {
    /// The baseline `grok-3` model.
    #[serde(rename = "grok-3")]
    Grok3,
    /// The fast reasoning variant of `grok-4`.
    #[serde(rename = "grok-4-fast-reasoning")]
    Grok4FastReasoning,
    /// The fast non-reasoning variant of `grok-4`.
    #[serde(rename = "grok-4-fast-non-reasoning")]
    Grok4FastNonReasoning,
}

impl ModelVariant {
    /// Every supported variant, in benchmark order.
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::Grok3,
        ModelVariant::Grok4FastReasoning,
        ModelVariant::Grok4FastNonReasoning,
    ];

    /// The provider-facing model name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Grok3 => "grok-3",
            ModelVariant::Grok4FastReasoning => "grok-4-fast-reasoning",
            ModelVariant::Grok4FastNonReasoning => "grok-4-fast-non-reasoning",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grok-3" => Ok(ModelVariant::Grok3),
            "grok-4-fast-reasoning" => Ok(ModelVariant::Grok4FastReasoning),
            "grok-4-fast-non-reasoning" => Ok(ModelVariant::Grok4FastNonReasoning),
            other => Err(Error::UnknownVariant(other.to_string())),
        }
    }
}

/// Structured attributes attached to a lead.
///
/// This is the blob the original intake form captures; all fields are
/// optional because leads frequently arrive with partial information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAttributes {
    /// Company head-count band, e.g. "200-500" or "5000+".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    /// Industry sector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Budget signal, e.g. "Very High" or "None".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    /// Title of the decision maker behind the lead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_maker: Option<String>,
    /// Pain points surfaced during intake.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pain_points: Vec<String>,
    /// Purchase timeline, e.g. "Q1 2025" or "unknown".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

impl LeadAttributes {
    /// Render the attributes as a pretty-printed JSON object for embedding
    /// in a provider prompt.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A sales lead as the scoring provider sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadProfile {
    /// Display name of the contact.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Organization name.
    pub company: String,
    /// Free-text intake notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Structured attributes, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<LeadAttributes>,
}

/// Weights applied to the qualification rubric factors.
///
/// Each weight defaults to 1.0; callers override individual factors to bias
/// the rubric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringCriteria {
    /// Weight of the company-size factor.
    pub company_size_weight: f64,
    /// Weight of the industry-match factor.
    pub industry_match_weight: f64,
    /// Weight of the budget-signals factor.
    pub budget_signals_weight: f64,
    /// Weight of the decision-maker-title factor.
    pub decision_maker_weight: f64,
}

impl Default for ScoringCriteria {
    fn default() -> Self {
        Self {
            company_size_weight: 1.0,
            industry_match_weight: 1.0,
            budget_signals_weight: 1.0,
            decision_maker_weight: 1.0,
        }
    }
}

/// Qualification band assigned by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualificationStatus {
    /// Score 80-100: highly qualified.
    Qualified,
    /// Score 50-79: potentially qualified.
    Maybe,
    /// Score 0-49: not qualified.
    NotQualified,
}

impl QualificationStatus {
    /// The wire label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualificationStatus::Qualified => "qualified",
            QualificationStatus::Maybe => "maybe",
            QualificationStatus::NotQualified => "not_qualified",
        }
    }
}

impl fmt::Display for QualificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-factor sub-scores reported alongside a qualification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Company-size sub-score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<f64>,
    /// Industry-match sub-score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_match: Option<f64>,
    /// Budget-signals sub-score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_signals: Option<f64>,
    /// Decision-maker sub-score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_maker: Option<f64>,
}

/// The outcome of one qualification attempt.
///
/// Field names match the provider's JSON response so the adapter can
/// deserialize it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationOutcome {
    /// Numeric score in [0, 100].
    pub score: f64,
    /// Free-text rationale for the score.
    pub reasoning: String,
    /// Qualification band.
    pub qualification_status: QualificationStatus,
    /// Optional per-factor breakdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl QualificationOutcome {
    /// Validate the documented score range.
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=100.0).contains(&self.score) {
            return Err(Error::invalid_input(format!(
                "qualification score {} outside [0, 100]",
                self.score
            )));
        }
        Ok(())
    }
}
