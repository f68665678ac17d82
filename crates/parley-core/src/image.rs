//! One-shot image generation with per-model fixed defaults.

use std::sync::Arc;

use parley_types::error::ChatError;
use parley_types::llm::{ImageModelType, ImageRequest};
use tracing::info;

use crate::llm::registry::ModelRegistry;

/// Turns an image model identifier and a prompt into a single backend call.
///
/// Stateless; holds only the shared registry.
#[derive(Debug, Clone)]
pub struct ImageRequestAdapter {
    registry: Arc<ModelRegistry>,
}

impl ImageRequestAdapter {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Generate one image and return its URL, or `""` if the backend gave none.
    pub async fn generate(
        &self,
        model_type: ImageModelType,
        prompt: &str,
    ) -> Result<String, ChatError> {
        let registered = self
            .registry
            .image_model(model_type)
            .ok_or_else(|| ChatError::ModelUnavailable(model_type.to_string()))?;

        let request = ImageRequest {
            model: registered.model.clone(),
            prompt: prompt.to_string(),
            size: registered.defaults.size.clone(),
            style: registered.defaults.style.clone(),
        };

        let response = registered.provider.generate(&request).await?;
        let url = response.url.unwrap_or_default();
        info!(
            model = %model_type,
            has_url = !url.is_empty(),
            "Image generated"
        );
        Ok(url)
    }
}
