// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Personalized outreach-email generation.
//!
//! Builds the messaging prompt from a lead profile plus optional
//! conversation context and parses the provider's structured email draft.
//! Generation runs at the provider's default temperature - outreach should
//! read fresh, unlike scoring, which runs cold for repeatability.

use std::fmt::Write as _;

use leadscope_core::{LeadProfile, ModelVariant};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::provider::{CompletionOptions, ProviderClient, ProviderError};
use crate::qualify;

/// Sampling temperature for outreach generation.
pub const OUTREACH_TEMPERATURE: f64 = 0.7;

/// Token budget for an outreach draft.
pub const OUTREACH_MAX_TOKENS: u32 = 1000;

/// Errors raised while generating outreach content.
#[derive(Debug, ThisError)]
pub enum OutreachError {
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider responded, but not with a parseable outreach draft.
    #[error("Invalid outreach response format: {0}")]
    Malformed(String),
}

/// Conversation context for personalizing an outreach email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingContext {
    /// Summaries of previous interactions, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previous_interactions: Vec<String>,
    /// Free-text company research.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_info: Option<String>,
    /// Pain points identified so far.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pain_points: Vec<String>,
    /// Goals identified so far.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
}

/// Tone the provider chose for the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Formal, enterprise-appropriate.
    Professional,
    /// Relaxed, startup-appropriate.
    Casual,
    /// Advisory, discovery-oriented.
    Consultative,
    /// Time-sensitive.
    Urgent,
}

/// A structured outreach email draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachMessage {
    /// Email subject line.
    pub subject_line: String,
    /// Full email body, greeting and signature placeholders included.
    pub email_body: String,
    /// Suggested follow-up actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up_suggestions: Vec<String>,
    /// Tone the draft was written in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    /// What was personalized and why.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalization_notes: Option<String>,
}

/// Build the outreach prompt for `lead`.
///
/// `stage` is the lead's current pipeline stage, when known; it shapes
/// urgency and messaging approach.
pub fn build_messaging_prompt(
    lead: &LeadProfile,
    stage: Option<&str>,
    context: Option<&MessagingContext>,
) -> String {
    let mut lead_info = format!(
        "- Name: {}\n- Email: {}\n- Company: {}",
        lead.name, lead.email, lead.company
    );
    if let Some(stage) = stage {
        let _ = write!(lead_info, "\n- Current Stage: {stage}");
    }
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

    let mut context_info = String::new();
    match context.filter(|c| !c.previous_interactions.is_empty()) {
        Some(c) => {
            context_info.push_str("Previous Interactions:");
            for (i, interaction) in c.previous_interactions.iter().enumerate() {
                let _ = write!(context_info, "\n{}. {}", i + 1, interaction);
            }
        }
        None => context_info.push_str("This is the first outreach to this lead."),
    }

    if let Some(c) = context {
        if let Some(company_info) = &c.company_info {
            let _ = write!(context_info, "\n\nCompany Information: {company_info}");
        }
        if !c.pain_points.is_empty() {
            context_info.push_str("\n\nIdentified Pain Points:");
            for pain_point in &c.pain_points {
                let _ = write!(context_info, "\n- {pain_point}");
            }
        }
        if !c.goals.is_empty() {
            context_info.push_str("\n\nIdentified Goals:");
            for goal in &c.goals {
                let _ = write!(context_info, "\n- {goal}");
            }
        }
    }

    format!(
        "You are an expert Sales Development Representative (SDR) crafting personalized outreach emails.\n\
         \n\
         Lead Information:\n\
         {lead_info}\n\
         \n\
         {context_info}\n\
         \n\
         Create a personalized outreach email that:\n\
         1. Addresses the lead by name and demonstrates knowledge of their company\n\
         2. Highlights relevant value propositions based on their industry, company size, and role\n\
         3. Uses appropriate tone based on the lead's profile (professional for enterprise, more casual for startups)\n\
         4. Includes a clear call-to-action\n\
         5. Is concise (3-4 paragraphs maximum)\n\
         6. Feels authentic and not templated\n\
         \n\
         Consider:\n\
         - Their decision-maker title (if available) to tailor the message appropriately\n\
         - Company size to adjust the scale of solutions discussed\n\
         - Industry to reference relevant challenges or opportunities\n\
         - Current pipeline stage to determine urgency and messaging approach\n\
         \n\
         Respond with a JSON object in this exact format:\n\
         {{\n\
           \"subjectLine\": \"<compelling email subject line, 50 characters or less>\",\n\
           \"emailBody\": \"<full email body with proper formatting, including greeting and signature placeholders>\",\n\
           \"followUpSuggestions\": [\"<suggestion 1>\", \"<suggestion 2>\", \"<suggestion 3>\"],\n\
           \"tone\": \"<professional|casual|consultative|urgent>\",\n\
           \"personalizationNotes\": \"<brief explanation of personalization elements used>\"\n\
         }}\n\
         \n\
         Only return the JSON object, no other text.",
    )
}

/// Generate an outreach draft for `lead` using `variant`.
pub async fn generate_outreach(
    client: &ProviderClient,
    lead: &LeadProfile,
    stage: Option<&str>,
    context: Option<&MessagingContext>,
    variant: ModelVariant,
) -> Result<OutreachMessage, OutreachError> {
    let prompt = build_messaging_prompt(lead, stage, context);
    let response = client
        .generate_text(
            &prompt,
            variant,
            CompletionOptions {
                temperature: OUTREACH_TEMPERATURE,
                max_tokens: OUTREACH_MAX_TOKENS,
            },
        )
        .await?;

    parse_outreach(&response)
}

/// Parse a provider response into an [`OutreachMessage`].
pub fn parse_outreach(response: &str) -> Result<OutreachMessage, OutreachError> {
    let cleaned = qualify::strip_code_fences(response);
    serde_json::from_str(&cleaned).map_err(|err| {
        OutreachError::Malformed(format!("failed to parse outreach response as JSON: {err}"))
    })
}
