// Copyright 2025 Leadscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! LLM provider client and prompt adapters for Leadscope.
//!
//! This crate owns everything that talks to the scoring provider:
//!
//! - **Provider client**: an OpenAI-compatible chat-completions client over
//!   the x.ai API
//! - **Qualification**: the SDR scoring prompt and the [`LlmQualifier`]
//!   implementation of the core [`Qualifier`](leadscope_core::Qualifier)
//!   capability
//! - **Outreach**: personalized outreach-email generation
//!
//! Clients and qualifiers are constructed explicitly and injected; nothing
//! in this crate reads ambient global state except
//! [`ProviderConfig::from_env`], which callers invoke once at startup.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use leadscope_adapters::{LlmQualifier, ProviderClient, ProviderConfig};
//!
//! let config = ProviderConfig::from_env()?;
//! let client = Arc::new(ProviderClient::new(config));
//! let qualifier = LlmQualifier::new(client);
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod outreach;
pub mod provider;
pub mod qualify;

pub use outreach::{generate_outreach, MessagingContext, OutreachError, OutreachMessage, Tone};
pub use provider::{
    ChatCompletionResponse, ChatMessage, CompletionOptions, ProviderClient, ProviderConfig,
    ProviderError,
};
pub use qualify::LlmQualifier;
