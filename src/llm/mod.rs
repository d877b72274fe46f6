//! Documentation generation through an external text-generation service
//!
//! This module handles:
//! - Rendering exported function snippets into generation prompts
//! - Issuing generation requests under a retry/backoff policy
//! - Classifying responses into success, transient and fatal outcomes

mod client;
mod prompts;

pub use client::{
    backoff_delay, success_body, GenerationClient, GenerationRequest, HttpReply, HttpTransport,
    ScriptedTransport, Transport,
};
pub use prompts::build_prompt;
