//! Model registry for runtime backend lookup.
//!
//! Maps each symbolic model identifier to a configured backend client plus
//! the identifier's fixed defaults. Built once at startup and shared
//! read-only behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use parley_types::llm::{ImageModelType, ModelType};
use parley_types::session::{DEFAULT_TEMPERATURE, GenerationConfig};

use super::box_provider::BoxLlmProvider;
use super::image::BoxImageProvider;

/// A chat backend bound to a concrete model name.
#[derive(Debug, Clone)]
pub struct RegisteredModel {
    pub provider: Arc<BoxLlmProvider>,
    pub model: String,
    /// Temperature baked into this model's registration, if any.
    pub default_temperature: Option<f64>,
}

impl RegisteredModel {
    pub fn new(provider: Arc<BoxLlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            default_temperature: None,
        }
    }

    pub fn with_default_temperature(mut self, temperature: Option<f64>) -> Self {
        self.default_temperature = temperature;
        self
    }

    /// Per-call value, else the registered default, else [`DEFAULT_TEMPERATURE`].
    pub fn effective_temperature(&self, config: &GenerationConfig) -> f64 {
        config
            .temperature
            .or(self.default_temperature)
            .unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Fixed generation parameters for an image model.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDefaults {
    pub size: String,
    pub style: Option<String>,
}

/// An image backend bound to a concrete model name.
#[derive(Debug, Clone)]
pub struct RegisteredImageModel {
    pub provider: Arc<BoxImageProvider>,
    pub model: String,
    pub defaults: ImageDefaults,
}

/// Registry of available chat and image models, keyed by identifier.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    chat: HashMap<ModelType, RegisteredModel>,
    image: HashMap<ImageModelType, RegisteredImageModel>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chat model. Replaces any existing registration.
    pub fn register_chat(&mut self, model_type: ModelType, model: RegisteredModel) {
        self.chat.insert(model_type, model);
    }

    /// Register an image model. Replaces any existing registration.
    pub fn register_image(&mut self, model_type: ImageModelType, model: RegisteredImageModel) {
        self.image.insert(model_type, model);
    }

    pub fn chat_model(&self, model_type: ModelType) -> Option<&RegisteredModel> {
        self.chat.get(&model_type)
    }

    pub fn image_model(&self, model_type: ImageModelType) -> Option<&RegisteredImageModel> {
        self.image.get(&model_type)
    }

    /// Registered chat identifiers, in declaration order.
    pub fn chat_model_types(&self) -> Vec<ModelType> {
        ModelType::ALL
            .into_iter()
            .filter(|mt| self.chat.contains_key(mt))
            .collect()
    }

    pub fn has_chat_models(&self) -> bool {
        !self.chat.is_empty()
    }
}
