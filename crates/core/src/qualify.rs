// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! The qualifier capability boundary.
//!
//! A [`Qualifier`] turns a lead into a [`QualificationOutcome`] by consulting
//! one of the supported model variants. Implementations are constructed
//! explicitly and injected into consumers (the evaluation runner takes one at
//! construction), so tests can substitute a deterministic fake for the
//! network-bound provider adapter.

use async_trait::async_trait;
use thiserror::Error as ThisError;

use crate::types::{LeadProfile, ModelVariant, QualificationOutcome, ScoringCriteria};

/// Failure of a single qualification attempt.
///
/// Carries a human-readable message; callers that tolerate partial failure
/// (the evaluation runner) record it and continue, callers that do not
/// propagate it.
#[derive(Debug, Clone, ThisError)]
pub enum QualificationFailure {
    /// The provider returned an error, timed out, or was unreachable.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider responded, but the payload did not parse as a
    /// qualification.
    #[error("Malformed qualification response: {0}")]
    MalformedResponse(String),
}

/// A capability that scores a lead against a model variant.
#[async_trait]
pub trait Qualifier: Send + Sync {
    /// Qualify `lead` using `variant`, optionally under custom criteria
    /// weights.
    async fn qualify(
        &self,
        lead: &LeadProfile,
        criteria: Option<&ScoringCriteria>,
        variant: ModelVariant,
    ) -> Result<QualificationOutcome, QualificationFailure>;
}
