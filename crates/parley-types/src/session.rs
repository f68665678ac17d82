//! Session, thread, and message types for Parley.
//!
//! A session is the persisted unit of conversation state. It owns a set of
//! named threads; only the `main` thread is used. Each message carries a role
//! and an ordered list of content parts, which may be empty.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the only thread used by the chat layer.
pub const MAIN_THREAD: &str = "main";

/// System instructions applied when the caller does not provide any.
pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "You are friendly and helpful.";

/// Default output token limit per model call.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Default sampling temperature when neither the call nor the model sets one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Opaque, immutable session identifier.
///
/// New identifiers are UUID v7 strings, but any string read back from storage
/// is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Allocate a fresh identifier (UUID v7, time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Role of a message within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "model" => Ok(Role::Model),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// Media attached to a content part (e.g. a generated image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// One piece of message content. Usually just text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            media: None,
        }
    }
}

/// A single message in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    pub role: Role,
    /// Ordered content parts. May be empty in records written by earlier turns.
    #[serde(default)]
    pub content: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl MessageData {
    /// A message with a single text part.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![Part::text(text)],
            metadata: None,
        }
    }

    /// The system message that heads a thread and carries its instructions.
    pub fn preamble(system_instructions: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![Part::text(system_instructions)],
            metadata: Some(serde_json::json!({ "preamble": true })),
        }
    }

    pub fn is_preamble(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("preamble"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Concatenated text of all parts.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// The persisted record for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub id: SessionId,
    /// Free-form session state. Carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
    #[serde(default)]
    pub threads: BTreeMap<String, Vec<MessageData>>,
}

impl SessionData {
    /// An empty session with no threads.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: None,
            threads: BTreeMap::new(),
        }
    }

    /// Messages of the `main` thread, or an empty slice if it does not exist.
    pub fn main_thread(&self) -> &[MessageData] {
        self.threads
            .get(MAIN_THREAD)
            .map(|t| t.as_slice())
            .unwrap_or(&[])
    }

    /// Mutable access to the `main` thread, creating it if absent.
    pub fn main_thread_mut(&mut self) -> &mut Vec<MessageData> {
        self.threads.entry(MAIN_THREAD.to_string()).or_default()
    }
}

/// Per-call tuning applied to a model invocation.
///
/// Never persisted on its own; attached fresh on every init/send call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    /// `None` defers to the model's registered default, then [`DEFAULT_TEMPERATURE`].
    pub temperature: Option<f64>,
    pub stop_sequences: Vec<String>,
    pub system_instructions: String,
}

impl GenerationConfig {
    /// Build a config from optional caller-supplied values.
    pub fn new(
        system_instructions: impl Into<String>,
        max_tokens: Option<u32>,
        temperature: Option<f64>,
        stop_sequences: Option<Vec<String>>,
    ) -> Self {
        Self {
            max_output_tokens: max_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            temperature,
            stop_sequences: stop_sequences.unwrap_or_default(),
            system_instructions: system_instructions.into(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_INSTRUCTIONS, None, None, None)
    }
}
