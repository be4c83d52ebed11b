//! Generation backend integration
//!
//! HTTP client for the template/chat endpoints and the parser that turns
//! raw artifact text into build steps. Steps are only derived from a
//! complete response; a failed or malformed round never applies partially.

pub mod client;
pub mod parser;

pub use client::{GenerationClient, TemplateResponse};
pub use parser::parse_artifact;

use serde::{Deserialize, Serialize};

/// One chat turn sent to the generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
