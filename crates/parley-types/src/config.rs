//! Global configuration types for Parley.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! HTTP surface, session storage, and per-backend model settings.

use serde::{Deserialize, Serialize};

use crate::llm::{ImageModelType, ModelType};

/// Top-level configuration for the Parley service.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on operations processed at the same time.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_concurrent_requests() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

/// Which session store implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Session storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for session files. Relative paths resolve against the data dir.
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: String,
}

fn default_sessions_dir() -> String {
    "sessions".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            sessions_dir: default_sessions_dir(),
        }
    }
}

/// Chat orchestration settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Serialize sends/deletes per session id within this process.
    #[serde(default)]
    pub serialize_session_writes: bool,
}

/// Settings for one chat backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModelConfig {
    pub model: String,
    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Temperature used when the caller does not supply one.
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Settings for one image backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageModelConfig {
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    pub size: String,
    #[serde(default)]
    pub style: Option<String>,
}

/// Per-backend model settings, keyed by symbolic model identifier.
///
/// Each `[models.*]` table is layered over that model's built-in defaults,
/// so a table may set only the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ModelsOverrides")]
pub struct ModelsConfig {
    pub gemini: ChatModelConfig,
    pub gpt: ChatModelConfig,
    pub grok: ChatModelConfig,
    pub dall_e: ImageModelConfig,
}

/// `[models]` as written in `config.toml`: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelsOverrides {
    gemini: ChatModelOverrides,
    gpt: ChatModelOverrides,
    grok: ChatModelOverrides,
    dall_e: ImageModelOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatModelOverrides {
    model: Option<String>,
    base_url: Option<String>,
    temperature: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageModelOverrides {
    model: Option<String>,
    base_url: Option<String>,
    size: Option<String>,
    style: Option<String>,
}

impl ChatModelOverrides {
    fn apply(self, mut base: ChatModelConfig) -> ChatModelConfig {
        if let Some(model) = self.model {
            base.model = model;
        }
        base.base_url = self.base_url.or(base.base_url);
        base.temperature = self.temperature.or(base.temperature);
        base
    }
}

impl ImageModelOverrides {
    fn apply(self, mut base: ImageModelConfig) -> ImageModelConfig {
        if let Some(model) = self.model {
            base.model = model;
        }
        if let Some(size) = self.size {
            base.size = size;
        }
        base.base_url = self.base_url.or(base.base_url);
        base.style = self.style.or(base.style);
        base
    }
}

impl From<ModelsOverrides> for ModelsConfig {
    fn from(overrides: ModelsOverrides) -> Self {
        Self {
            gemini: overrides.gemini.apply(default_gemini()),
            gpt: overrides.gpt.apply(default_gpt()),
            grok: overrides.grok.apply(default_grok()),
            dall_e: overrides.dall_e.apply(default_dall_e()),
        }
    }
}

fn default_gemini() -> ChatModelConfig {
    ChatModelConfig {
        model: "gemini-2.5-flash".to_string(),
        base_url: None,
        temperature: Some(0.8),
    }
}

fn default_gpt() -> ChatModelConfig {
    ChatModelConfig {
        model: "gpt-4o".to_string(),
        base_url: None,
        temperature: None,
    }
}

fn default_grok() -> ChatModelConfig {
    ChatModelConfig {
        model: "grok-3-mini".to_string(),
        base_url: None,
        temperature: None,
    }
}

fn default_dall_e() -> ImageModelConfig {
    ImageModelConfig {
        model: "dall-e-3".to_string(),
        base_url: None,
        size: "1024x1024".to_string(),
        style: Some("vivid".to_string()),
    }
}

impl ModelsConfig {
    /// Settings for a chat model identifier.
    pub fn chat(&self, model_type: ModelType) -> &ChatModelConfig {
        match model_type {
            ModelType::Gemini => &self.gemini,
            ModelType::Gpt => &self.gpt,
            ModelType::Grok => &self.grok,
        }
    }

    /// Settings for an image model identifier.
    pub fn image(&self, model_type: ImageModelType) -> &ImageModelConfig {
        match model_type {
            ImageModelType::DallE => &self.dall_e,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            gemini: default_gemini(),
            gpt: default_gpt(),
            grok: default_grok(),
            dall_e: default_dall_e(),
        }
    }
}
