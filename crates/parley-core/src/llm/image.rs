//! ImageProvider trait and its boxed wrapper.
//!
//! Same shape as [`LlmProvider`](super::provider::LlmProvider) /
//! [`BoxLlmProvider`](super::box_provider::BoxLlmProvider), for one-shot
//! image generation backends.

use std::future::Future;
use std::pin::Pin;

use parley_types::llm::{ImageRequest, ImageResponse, LlmError};

/// Trait for image generation backends.
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Submit one prompt and return the backend's first result.
    fn generate(
        &self,
        request: &ImageRequest,
    ) -> impl Future<Output = Result<ImageResponse, LlmError>> + Send;
}

/// Object-safe version of [`ImageProvider`] with boxed futures.
pub trait ImageProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ImageResponse, LlmError>> + Send + 'a>>;
}

impl<T: ImageProvider> ImageProviderDyn for T {
    fn name(&self) -> &str {
        ImageProvider::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ImageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ImageResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.generate(request))
    }
}

/// Type-erased image provider.
pub struct BoxImageProvider {
    inner: Box<dyn ImageProviderDyn + Send + Sync>,
}

impl BoxImageProvider {
    pub fn new<T: ImageProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, LlmError> {
        self.inner.generate_boxed(request).await
    }
}

impl std::fmt::Debug for BoxImageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxImageProvider")
            .field("name", &self.name())
            .finish()
    }
}
