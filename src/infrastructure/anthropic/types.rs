//! Request and response types for the Anthropic Messages API
use serde::{Deserialize, Serialize};

/// Message request sent to the Messages API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Model identifier
    pub model: String,

    /// Conversation turns
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// System prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `user` or `assistant`
    pub role: String,
    /// Turn text
    pub content: String,
}

impl Message {
    /// A user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from the Messages API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message id
    pub id: String,

    /// Model identifier
    #[serde(default)]
    pub model: String,

    /// Content blocks; only text blocks are read
    pub content: Vec<ContentBlock>,

    /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,

    /// Token accounting
    #[serde(default)]
    pub usage: Usage,
}

impl MessageResponse {
    /// Concatenated text of every text block.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Content block of a response; only text blocks carry completions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Text output
    #[serde(rename = "text")]
    Text {
        /// Generated text
        text: String,
    },
    /// Any other block type (tool use, thinking)
    #[serde(other)]
    Other,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens billed
    pub input_tokens: u32,
    /// Completion tokens billed
    pub output_tokens: u32,
}
