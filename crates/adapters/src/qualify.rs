// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lead qualification against the scoring provider.
//!
//! Builds the SDR scoring prompt, parses the provider's JSON verdict, and
//! exposes [`LlmQualifier`], the production implementation of the core
//! [`Qualifier`] capability. A lower sampling temperature than the provider
//! default keeps repeated scorings of the same lead comparable.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use leadscope_core::{
    LeadProfile, ModelVariant, QualificationFailure, QualificationOutcome, Qualifier,
    ScoringCriteria,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::provider::{CompletionOptions, ProviderClient, ProviderError};

/// Sampling temperature for qualification calls.
pub const QUALIFY_TEMPERATURE: f64 = 0.3;

/// Token budget for a qualification verdict.
pub const QUALIFY_MAX_TOKENS: u32 = 500;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:json)?\s*|\s*```$").expect("code fence pattern"));

/// Remove a surrounding markdown code fence from a provider response.
pub(crate) fn strip_code_fences(response: &str) -> String {
    CODE_FENCE.replace_all(response.trim(), "").to_string()
}

/// Build the qualification prompt for `lead`, optionally under custom
/// criteria weights.
pub fn build_qualification_prompt(
    lead: &LeadProfile,
    criteria: Option<&ScoringCriteria>,
) -> String {
    let defaults = ScoringCriteria::default();
    let weights = criteria.unwrap_or(&defaults);
    let is_custom = criteria.is_some();

    let mut lead_info = format!(
        "- Name: {}\n- Email: {}\n- Company: {}",
        lead.name, lead.email, lead.company
    );
    if let Some(notes) = &lead.notes {
        let _ = write!(lead_info, "\n- Notes: {notes}");
    }
    if let Some(attributes) = &lead.attributes {
        let _ = write!(
            lead_info,
            "\n- Additional Metadata: {}",
            attributes.to_pretty_json()
        );
    }

    let criteria_note = if is_custom {
        "\nNote: You are using CUSTOM scoring criteria weights provided by the user. \
         Make sure to mention this in your reasoning."
    } else {
        ""
    };

    let custom_reminder = if is_custom {
        format!(
            "IMPORTANT: In your reasoning, explicitly mention that you are using custom scoring \
             criteria with the weights provided above. For example: \"Using your custom criteria \
             (Company Size: {}/5, Budget: {}/5), [lead name] scores [score] because...\"\n\n",
            weights.company_size_weight, weights.budget_signals_weight
        )
    } else {
        String::new()
    };

    let reasoning_hint = if is_custom {
        ", mentioning the custom criteria weights used"
    } else {
        ""
    };

    format!(
        "You are an expert Sales Development Representative (SDR) evaluating a lead for qualification.\n\
         \n\
         Lead Information:\n\
         {lead_info}\n\
         \n\
         Scoring Criteria Weights:\n\
         - Company Size: {company_size}/5\n\
         - Industry Match: {industry_match}/5\n\
         - Budget Signals: {budget_signals}/5\n\
         - Decision Maker Title: {decision_maker}/5\n\
         {criteria_note}\n\
         \n\
         Evaluate this lead based on the following factors:\n\
         \n\
         1. Company Size (weight: {company_size}):\n\
            - Larger companies (1000+ employees) = higher score\n\
            - Mid-size companies (100-1000) = medium score\n\
            - Small companies (<100) = lower score\n\
         \n\
         2. Industry Match (weight: {industry_match}):\n\
            - Technology, SaaS, Enterprise Software = higher score\n\
            - Finance, Healthcare = medium-high score\n\
            - Retail, Manufacturing = medium score\n\
            - Other industries = lower score\n\
         \n\
         3. Budget Signals (weight: {budget_signals}):\n\
            - Explicit budget mentions, \"enterprise\", \"large-scale\" = higher score\n\
            - \"Budget available\", \"Looking to invest\" = medium-high score\n\
            - \"Limited budget\", \"Startup\" = lower score\n\
            - No signals = neutral\n\
         \n\
         4. Decision Maker Title (weight: {decision_maker}):\n\
            - C-level (CEO, CTO, CFO, CMO) = highest score\n\
            - VP, Director = high score\n\
            - Manager = medium score\n\
            - Individual contributor = lower score\n\
         \n\
         Calculate a score from 0-100 where:\n\
         - 80-100: Highly qualified (qualified)\n\
         - 50-79: Potentially qualified (maybe)\n\
         - 0-49: Not qualified (not_qualified)\n\
         \n\
         {custom_reminder}\
         Respond with a JSON object in this exact format:\n\
         {{\n\
           \"score\": <number 0-100>,\n\
           \"reasoning\": \"<detailed explanation of your evaluation, 2-3 sentences{reasoning_hint}>\",\n\
           \"qualificationStatus\": \"<qualified|maybe|not_qualified>\",\n\
           \"breakdown\": {{\n\
             \"companySize\": <number 0-100>,\n\
             \"industryMatch\": <number 0-100>,\n\
             \"budgetSignals\": <number 0-100>,\n\
             \"decisionMaker\": <number 0-100>\n\
           }}\n\
         }}\n\
         \n\
         Only return the JSON object, no other text.",
        lead_info = lead_info,
        company_size = weights.company_size_weight,
        industry_match = weights.industry_match_weight,
        budget_signals = weights.budget_signals_weight,
        decision_maker = weights.decision_maker_weight,
        criteria_note = criteria_note,
        custom_reminder = custom_reminder,
        reasoning_hint = reasoning_hint,
    )
}

/// Parse a provider response into a validated [`QualificationOutcome`].
pub fn parse_qualification(response: &str) -> Result<QualificationOutcome, QualificationFailure> {
    let cleaned = strip_code_fences(response);
    let outcome: QualificationOutcome = serde_json::from_str(&cleaned).map_err(|err| {
        QualificationFailure::MalformedResponse(format!(
            "failed to parse qualification response as JSON: {err}"
        ))
    })?;
    outcome
        .validate()
        .map_err(|err| QualificationFailure::MalformedResponse(err.to_string()))?;
    Ok(outcome)
}

/// Production [`Qualifier`] backed by the provider client.
pub struct LlmQualifier {
    client: Arc<ProviderClient>,
}

impl LlmQualifier {
    /// Create a qualifier over the given client.
    pub fn new(client: Arc<ProviderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Qualifier for LlmQualifier {
    async fn qualify(
        &self,
        lead: &LeadProfile,
        criteria: Option<&ScoringCriteria>,
        variant: ModelVariant,
    ) -> Result<QualificationOutcome, QualificationFailure> {
        let prompt = build_qualification_prompt(lead, criteria);
        let response = self
            .client
            .generate_text(
                &prompt,
                variant,
                CompletionOptions {
                    temperature: QUALIFY_TEMPERATURE,
                    max_tokens: QUALIFY_MAX_TOKENS,
                },
            )
            .await
            .map_err(|err| match err {
                ProviderError::InvalidResponse(message) => {
                    QualificationFailure::MalformedResponse(message)
                }
                other => QualificationFailure::Provider(other.to_string()),
            })?;

        parse_qualification(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadscope_core::LeadAttributes;

    fn lead() -> LeadProfile {
        LeadProfile {
            name: "Robert Chen".to_string(),
            email: "rchen@fortune500.com".to_string(),
            company: "Fortune500 Corp".to_string(),
            notes: Some("Budget approved".to_string()),
            attributes: Some(LeadAttributes {
                company_size: Some("5000+".to_string()),
                industry: Some("Technology".to_string()),
                budget: Some("Very High".to_string()),
                decision_maker: Some("CTO".to_string()),
                pain_points: vec!["scaling infrastructure".to_string()],
                timeline: Some("Q1 2025".to_string()),
            }),
        }
    }

    #[test]
    fn test_default_prompt_contents() {
        let prompt = build_qualification_prompt(&lead(), None);
        assert!(prompt.contains("- Name: Robert Chen"));
        assert!(prompt.contains("- Company: Fortune500 Corp"));
        assert!(prompt.contains("- Notes: Budget approved"));
        assert!(prompt.contains("\"companySize\": \"5000+\""));
        assert!(prompt.contains("- Company Size: 1/5"));
        assert!(!prompt.contains("CUSTOM scoring criteria"));
        assert!(prompt.contains("Only return the JSON object"));
    }

    #[test]
    fn test_custom_criteria_prompt_mentions_weights() {
        let criteria = ScoringCriteria {
            company_size_weight: 2.5,
            industry_match_weight: 1.0,
            budget_signals_weight: 4.0,
            decision_maker_weight: 1.0,
        };
        let prompt = build_qualification_prompt(&lead(), Some(&criteria));
        assert!(prompt.contains("CUSTOM scoring criteria"));
        assert!(prompt.contains("- Company Size: 2.5/5"));
        assert!(prompt.contains("(Company Size: 2.5/5, Budget: 4/5)"));
        assert!(prompt.contains("mentioning the custom criteria weights used"));
    }

    #[test]
    fn test_prompt_without_attributes_skips_metadata() {
        let mut bare = lead();
        bare.notes = None;
        bare.attributes = None;
        let prompt = build_qualification_prompt(&bare, None);
        assert!(!prompt.contains("Additional Metadata"));
        assert!(!prompt.contains("- Notes:"));
    }

    #[test]
    fn test_parse_plain_json_response() {
        let response = r#"{"score": 85, "reasoning": "Enterprise fit.", "qualificationStatus": "qualified"}"#;
        let outcome = parse_qualification(response).unwrap();
        assert_eq!(outcome.score, 85.0);
    }

    #[test]
    fn test_parse_fenced_json_response() {
        let response = "```json\n{\"score\": 42, \"reasoning\": \"Mid-market.\", \"qualificationStatus\": \"not_qualified\"}\n```";
        let outcome = parse_qualification(response).unwrap();
        assert_eq!(outcome.score, 42.0);
        assert_eq!(
            outcome.qualification_status,
            leadscope_core::QualificationStatus::NotQualified
        );
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_qualification("The lead looks strong to me.").unwrap_err();
        assert!(matches!(err, QualificationFailure::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_out_of_range_score() {
        let response = r#"{"score": 150, "reasoning": "x", "qualificationStatus": "qualified"}"#;
        let err = parse_qualification(response).unwrap_err();
        assert!(matches!(err, QualificationFailure::MalformedResponse(_)));
    }
}
