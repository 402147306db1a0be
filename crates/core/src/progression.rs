// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Rule-based pipeline-stage auto-progression.
//!
//! These rules share no state with the evaluation engine; they operate on a
//! [`LeadSnapshot`] the caller assembles from its persisted lead and activity
//! records, and return a decision the caller applies (or ignores). `now` is
//! passed explicitly so the stale check is deterministic under test.
//!
//! # Rules
//!
//! - A score above 80 moves a `New` lead to `Qualified`.
//! - A sent message moves a `New` or `Qualified` lead to `Contacted`.
//! - Seven days without activity flags any non-`Closed` lead as `Stale`.

use chrono::{DateTime, Utc};

/// Score above which a `New` lead auto-qualifies.
pub const AUTO_QUALIFY_SCORE: f64 = 80.0;

/// Days of inactivity after which a lead is considered stale.
pub const STALE_AFTER_DAYS: i64 = 7;

/// The slice of a persisted lead record the progression rules inspect.
#[derive(Debug, Clone)]
pub struct LeadSnapshot {
    /// Current pipeline stage name.
    pub stage: String,
    /// Latest qualification score, if any.
    pub score: Option<f64>,
    /// When the lead record was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent activity, if any exist.
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// Event that prompts a progression check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionTrigger {
    /// A new qualification score was recorded.
    ScoreUpdate,
    /// An outreach message was sent to the lead.
    MessageSent,
    /// A periodic staleness sweep.
    StaleCheck,
}

/// Outcome of a progression check.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionDecision {
    /// Whether the lead should move stage.
    pub should_progress: bool,
    /// Target stage when progressing.
    pub new_stage: Option<String>,
    /// Human-readable reason for the move.
    pub reason: Option<String>,
}

impl ProgressionDecision {
    /// A decision to leave the lead where it is.
    pub fn hold() -> Self {
        Self {
            should_progress: false,
            new_stage: None,
            reason: None,
        }
    }

    /// A decision to move the lead to `stage`.
    pub fn advance(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            should_progress: true,
            new_stage: Some(stage.into()),
            reason: Some(reason.into()),
        }
    }
}

/// Score rule: `New` leads scoring above [`AUTO_QUALIFY_SCORE`] move to
/// `Qualified`.
pub fn check_score_progression(lead: &LeadSnapshot, score: f64) -> ProgressionDecision {
    if lead.stage == "New" && score > AUTO_QUALIFY_SCORE {
        return ProgressionDecision::advance(
            "Qualified",
            format!("Score {score} exceeds threshold of {AUTO_QUALIFY_SCORE}"),
        );
    }
    ProgressionDecision::hold()
}

/// Message rule: a sent message moves `New` or `Qualified` leads to
/// `Contacted`.
pub fn check_message_progression(lead: &LeadSnapshot) -> ProgressionDecision {
    if lead.stage == "New" || lead.stage == "Qualified" {
        return ProgressionDecision::advance("Contacted", "Message sent to lead");
    }
    ProgressionDecision::hold()
}

/// Staleness rule: leads without activity for [`STALE_AFTER_DAYS`] days are
/// flagged `Stale`. Closed leads are never flagged.
pub fn check_stale(lead: &LeadSnapshot, now: DateTime<Utc>) -> ProgressionDecision {
    if lead.stage == "Closed" {
        return ProgressionDecision::hold();
    }

    match lead.last_activity_at {
        Some(last) => {
            let days = now.signed_duration_since(last).num_days();
            if days >= STALE_AFTER_DAYS {
                ProgressionDecision::advance("Stale", format!("No activity for {days} days"))
            } else {
                ProgressionDecision::hold()
            }
        }
        None => {
            let days = now.signed_duration_since(lead.created_at).num_days();
            if days >= STALE_AFTER_DAYS {
                ProgressionDecision::advance(
                    "Stale",
                    format!("No activity for {days} days since creation"),
                )
            } else {
                ProgressionDecision::hold()
            }
        }
    }
}

/// Evaluate the rule matching `trigger` against `lead`.
///
/// The score rule reads the snapshot's recorded score; a trigger without a
/// matching precondition (e.g. a score update on a scoreless lead) holds.
pub fn evaluate_progression(
    lead: &LeadSnapshot,
    trigger: ProgressionTrigger,
    now: DateTime<Utc>,
) -> ProgressionDecision {
    match trigger {
        ProgressionTrigger::ScoreUpdate => match lead.score {
            Some(score) => check_score_progression(lead, score),
            None => ProgressionDecision::hold(),
        },
        ProgressionTrigger::MessageSent => check_message_progression(lead),
        ProgressionTrigger::StaleCheck => check_stale(lead, now),
    }
}
