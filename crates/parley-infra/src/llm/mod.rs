//! Model backend implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] and
//! [`ImageProvider`] traits defined in `parley-core`, plus factories that
//! construct the right backend for each symbolic model identifier.
//!
//! [`LlmProvider`]: parley_core::llm::provider::LlmProvider
//! [`ImageProvider`]: parley_core::llm::image::ImageProvider

pub mod images;
pub mod openai_compat;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_core::llm::image::BoxImageProvider;
use parley_types::config::{ChatModelConfig, ImageModelConfig};
use parley_types::llm::{ImageModelType, ModelType};

use self::images::OpenAiImageProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{gemini_defaults, openai_defaults, xai_defaults};

/// Environment/secret key holding the credential for a chat backend.
pub fn chat_secret_key(model_type: ModelType) -> &'static str {
    match model_type {
        ModelType::Gemini => "GEMINI_API_KEY",
        ModelType::Gpt => "OPENAI_API_KEY",
        ModelType::Grok => "XAI_API_KEY",
    }
}

/// Environment/secret key holding the credential for an image backend.
pub fn image_secret_key(model_type: ImageModelType) -> &'static str {
    match model_type {
        ImageModelType::DallE => "OPENAI_API_KEY",
    }
}

/// Create a [`BoxLlmProvider`] for a chat model identifier.
pub fn create_chat_provider(
    model_type: ModelType,
    config: &ChatModelConfig,
    api_key: SecretString,
) -> BoxLlmProvider {
    let compat = match model_type {
        ModelType::Gemini => gemini_defaults(api_key, &config.model),
        ModelType::Gpt => openai_defaults(api_key, &config.model),
        ModelType::Grok => xai_defaults(api_key, &config.model),
    }
    .with_base_url(config.base_url.as_deref());

    BoxLlmProvider::new(OpenAiCompatibleProvider::new(compat))
}

/// Create a [`BoxImageProvider`] for an image model identifier.
pub fn create_image_provider(
    model_type: ImageModelType,
    config: &ImageModelConfig,
    api_key: SecretString,
) -> BoxImageProvider {
    match model_type {
        ImageModelType::DallE => BoxImageProvider::new(
            OpenAiImageProvider::new(api_key).with_base_url(config.base_url.as_deref()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::config::ModelsConfig;

    fn key() -> SecretString {
        SecretString::from("k".to_string())
    }

    #[test]
    fn test_create_chat_provider_names() {
        let models = ModelsConfig::default();
        assert_eq!(
            create_chat_provider(ModelType::Gemini, &models.gemini, key()).name(),
            "gemini"
        );
        assert_eq!(
            create_chat_provider(ModelType::Gpt, &models.gpt, key()).name(),
            "openai"
        );
        assert_eq!(
            create_chat_provider(ModelType::Grok, &models.grok, key()).name(),
            "xai"
        );
    }

    #[test]
    fn test_create_image_provider() {
        let models = ModelsConfig::default();
        let provider = create_image_provider(ImageModelType::DallE, &models.dall_e, key());
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_secret_keys() {
        assert_eq!(chat_secret_key(ModelType::Gemini), "GEMINI_API_KEY");
        assert_eq!(chat_secret_key(ModelType::Gpt), "OPENAI_API_KEY");
        assert_eq!(chat_secret_key(ModelType::Grok), "XAI_API_KEY");
        assert_eq!(image_secret_key(ImageModelType::DallE), "OPENAI_API_KEY");
    }
}
