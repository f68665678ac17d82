//! OpenAiImageProvider -- concrete [`ImageProvider`] for the OpenAI Images API.
//!
//! Sends one `POST {base}/images/generations` per prompt and returns the
//! first result's URL. The API key is wrapped in [`SecretString`] and only
//! exposed when building the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use parley_core::llm::image::ImageProvider;
use parley_types::llm::{ImageRequest, ImageResponse, LlmError};

use super::openai_compat::config::OPENAI_BASE_URL;

/// Image generations can take a while; bound them anyway.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

/// OpenAI image generation backend (DALL·E).
pub struct OpenAiImageProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAiImageProvider {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        self
    }

    fn url(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }
}

impl ImageProvider for OpenAiImageProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, LlmError> {
        let body = GenerationBody {
            model: &request.model,
            prompt: &request.prompt,
            n: 1,
            size: &request.size,
            style: request.style.as_deref(),
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: None,
                },
                503 => LlmError::Overloaded(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let first = parsed.data.into_iter().next();
        Ok(ImageResponse {
            url: first.as_ref().and_then(|img| img.url.clone()),
            revised_prompt: first.and_then(|img| img.revised_prompt),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ImageRequest {
        ImageRequest {
            model: "dall-e-3".to_string(),
            prompt: "a lighthouse at dusk".to_string(),
            size: "1024x1024".to_string(),
            style: Some("vivid".to_string()),
        }
    }

    fn provider(server: &MockServer) -> OpenAiImageProvider {
        OpenAiImageProvider::new(SecretString::from("sk-test".to_string()))
            .with_base_url(Some(&server.uri()))
    }

    #[tokio::test]
    async fn test_generate_returns_first_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "dall-e-3",
                "n": 1,
                "size": "1024x1024",
                "style": "vivid"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "created": 1,
                "data": [
                    {"url": "https://img.example/1.png", "revised_prompt": "a lighthouse"},
                    {"url": "https://img.example/2.png"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server).generate(&request()).await.unwrap();
        assert_eq!(response.url.as_deref(), Some("https://img.example/1.png"));
        assert_eq!(response.revised_prompt.as_deref(), Some("a lighthouse"));
    }

    #[tokio::test]
    async fn test_generate_without_data_has_no_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let response = provider(&server).generate(&request()).await.unwrap();
        assert!(response.url.is_none());
    }

    #[tokio::test]
    async fn test_generate_maps_status_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert!(matches!(
            provider.generate(&request()).await,
            Err(LlmError::AuthenticationFailed)
        ));
        assert!(matches!(
            provider.generate(&request()).await,
            Err(LlmError::RateLimited { .. })
        ));
        match provider.generate(&request()).await {
            Err(LlmError::Provider { message }) => assert!(message.contains("boom")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
