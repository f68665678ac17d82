//! LLM request/response types for Parley.
//!
//! These types model the data shapes for model backend interactions:
//! the symbolic model identifiers accepted at the boundary, completion and
//! image requests, usage tracking, and error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic identifier of a chat-capable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Gemini,
    Gpt,
    Grok,
}

impl ModelType {
    pub const ALL: [ModelType; 3] = [ModelType::Gemini, ModelType::Gpt, ModelType::Grok];
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Gemini => write!(f, "gemini"),
            ModelType::Gpt => write!(f, "gpt"),
            ModelType::Grok => write!(f, "grok"),
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(ModelType::Gemini),
            "gpt" => Ok(ModelType::Gpt),
            "grok" => Ok(ModelType::Grok),
            other => Err(format!("invalid model type: '{other}'")),
        }
    }
}

/// Symbolic identifier of an image-capable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageModelType {
    #[serde(rename = "dallE")]
    DallE,
}

impl fmt::Display for ImageModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageModelType::DallE => write!(f, "dallE"),
        }
    }
}

impl FromStr for ImageModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dallE" => Ok(ImageModelType::DallE),
            other => Err(format!("invalid image model type: '{other}'")),
        }
    }
}

/// Role of a message in a provider-facing conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl From<crate::session::Role> for MessageRole {
    fn from(role: crate::session::Role) -> Self {
        match role {
            crate::session::Role::System => MessageRole::System,
            crate::session::Role::User => MessageRole::User,
            crate::session::Role::Model => MessageRole::Assistant,
        }
    }
}

/// A single message sent to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Response from an LLM provider.
///
/// `content` is empty when the backend produced no text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Reason why the LLM stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ContentFilter,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::StopSequence => write!(f, "stop_sequence"),
            StopReason::ContentFilter => write!(f, "content_filter"),
        }
    }
}

/// Token usage for a completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// One-shot image generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    /// Output resolution, e.g. "1024x1024".
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Result of an image generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Locator of the first generated image, if the backend returned one.
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Errors from model backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("context length exceeded")]
    ContextLengthExceeded,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn test_model_type_roundtrip() {
        for mt in ModelType::ALL {
            let parsed: ModelType = mt.to_string().parse().unwrap();
            assert_eq!(mt, parsed);
        }
    }

    #[test]
    fn test_model_type_serde_rejects_unknown() {
        let parsed: ModelType = serde_json::from_str("\"grok\"").unwrap();
        assert_eq!(parsed, ModelType::Grok);
        assert!(serde_json::from_str::<ModelType>("\"claude\"").is_err());
        assert!(serde_json::from_str::<ModelType>("\"Gemini\"").is_err());
    }

    #[test]
    fn test_image_model_type_serde() {
        let json = serde_json::to_string(&ImageModelType::DallE).unwrap();
        assert_eq!(json, "\"dallE\"");
        let parsed: ImageModelType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ImageModelType::DallE);
        assert!("dalle".parse::<ImageModelType>().is_err());
    }

    #[test]
    fn test_model_role_maps_to_assistant() {
        assert_eq!(MessageRole::from(Role::Model), MessageRole::Assistant);
        assert_eq!(MessageRole::from(Role::User), MessageRole::User);
        assert_eq!(MessageRole::from(Role::System), MessageRole::System);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Provider {
            message: "HTTP 500".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: HTTP 500");
    }
}
