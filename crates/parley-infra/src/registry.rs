//! Model registry builder -- wires configured backends into a `ModelRegistry`.
//!
//! Credentials are resolved through the `SecretService` chain. A backend
//! whose key is missing is skipped with a warning; startup fails only when
//! no chat backend at all can be registered.

use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tracing::{debug, info, warn};

use parley_core::llm::registry::{
    ImageDefaults, ModelRegistry, RegisteredImageModel, RegisteredModel,
};
use parley_core::secret::SecretService;
use parley_types::config::ModelsConfig;
use parley_types::error::RepositoryError;
use parley_types::llm::{ImageModelType, ModelType};

use crate::llm::{chat_secret_key, create_chat_provider, create_image_provider, image_secret_key};

#[derive(Debug, Error)]
pub enum RegistryBuildError {
    #[error(
        "no chat model could be registered; set at least one of GEMINI_API_KEY, OPENAI_API_KEY, XAI_API_KEY"
    )]
    NoChatModels,

    #[error("secret lookup failed: {0}")]
    Secret(#[from] RepositoryError),
}

/// Build the registry for every configured model whose credential resolves.
pub async fn build_model_registry(
    models: &ModelsConfig,
    secrets: &SecretService,
) -> Result<ModelRegistry, RegistryBuildError> {
    let mut registry = ModelRegistry::new();

    for model_type in ModelType::ALL {
        let key_name = chat_secret_key(model_type);
        let Some(api_key) = secrets.get_secret(key_name).await? else {
            warn!(model = %model_type, key = key_name, "Credential missing, model not registered");
            continue;
        };

        debug!(
            model = %model_type,
            key = key_name,
            value = %SecretService::mask_secret(&api_key),
            "Credential resolved"
        );

        let config = models.chat(model_type);
        let provider = create_chat_provider(model_type, config, SecretString::from(api_key));
        registry.register_chat(
            model_type,
            RegisteredModel::new(Arc::new(provider), config.model.clone())
                .with_default_temperature(config.temperature),
        );
        info!(model = %model_type, backend_model = %config.model, "Chat model registered");
    }

    let image_type = ImageModelType::DallE;
    let key_name = image_secret_key(image_type);
    match secrets.get_secret(key_name).await? {
        Some(api_key) => {
            let config = models.image(image_type);
            let provider = create_image_provider(image_type, config, SecretString::from(api_key));
            registry.register_image(
                image_type,
                RegisteredImageModel {
                    provider: Arc::new(provider),
                    model: config.model.clone(),
                    defaults: ImageDefaults {
                        size: config.size.clone(),
                        style: config.style.clone(),
                    },
                },
            );
            info!(model = %image_type, backend_model = %config.model, "Image model registered");
        }
        None => {
            warn!(model = %image_type, key = key_name, "Credential missing, model not registered");
        }
    }

    if !registry.has_chat_models() {
        return Err(RegistryBuildError::NoChatModels);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::chain::build_secret_chain;
    use crate::secret::file::SECRET_FILE_NAME;
    use tempfile::tempdir;

    async fn build_with(secret_file: &str) -> Result<ModelRegistry, RegistryBuildError> {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SECRET_FILE_NAME), secret_file).unwrap();
        let secrets = SecretService::new(build_secret_chain(dir.path(), false));
        build_model_registry(&ModelsConfig::default(), &secrets).await
    }

    #[tokio::test]
    async fn test_registers_only_models_with_credentials() {
        let registry = build_with("XAI_API_KEY=xai-1\nGEMINI_API_KEY=g-1\n")
            .await
            .unwrap();

        assert_eq!(
            registry.chat_model_types(),
            vec![ModelType::Gemini, ModelType::Grok]
        );
        let gemini = registry.chat_model(ModelType::Gemini).unwrap();
        assert_eq!(gemini.model, "gemini-2.5-flash");
        assert_eq!(gemini.default_temperature, Some(0.8));
        assert_eq!(gemini.provider.name(), "gemini");
        assert!(registry.image_model(ImageModelType::DallE).is_none());
    }

    #[tokio::test]
    async fn test_openai_key_enables_gpt_and_images() {
        let registry = build_with("OPENAI_API_KEY=sk-1\n").await.unwrap();

        assert_eq!(registry.chat_model_types(), vec![ModelType::Gpt]);
        let image = registry.image_model(ImageModelType::DallE).unwrap();
        assert_eq!(image.model, "dall-e-3");
        assert_eq!(image.defaults.size, "1024x1024");
        assert_eq!(image.defaults.style.as_deref(), Some("vivid"));
    }

    #[tokio::test]
    async fn test_fails_without_any_chat_credentials() {
        let err = build_with("# nothing here\n").await.unwrap_err();
        assert!(matches!(err, RegistryBuildError::NoChatModels));
    }
}
