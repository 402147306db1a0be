// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core domain types and capability traits for Leadscope.
//!
//! This crate defines the vocabulary shared by every other Leadscope crate:
//! lead profiles, model variants, qualification outcomes, the [`Qualifier`]
//! capability trait, and the pipeline-stage progression rules.
//!
//! # Modules
//!
//! - [`error`] - Crate-wide error and result types
//! - [`types`] - Lead, criteria and qualification types
//! - [`qualify`] - The qualifier capability boundary
//! - [`progression`] - Rule-based pipeline-stage auto-progression

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod progression;
pub mod qualify;
pub mod types;

pub use error::{Error, Result};
pub use qualify::{QualificationFailure, Qualifier};
pub use types::{
    LeadAttributes, LeadProfile, ModelVariant, QualificationOutcome, QualificationStatus,
    ScoreBreakdown, ScoringCriteria,
};
