//! Axum router configuration with middleware.
//!
//! Operation routes live under `/api/v1/` and share a concurrency limit.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/initChatSession", post(handlers::chat::init_chat_session))
        .route("/sendMessagesToChat", post(handlers::chat::send_messages_to_chat))
        .route("/deleteChatSession", post(handlers::chat::delete_chat_session))
        .route("/generateImage", post(handlers::image::generate_image))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_concurrency,
        ));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Hold a limiter permit for the duration of the request.
async fn limit_concurrency(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let _permit = state
        .limiter
        .acquire()
        .await
        .map_err(|_| AppError::Internal("request limiter closed".to_string()))?;
    Ok(next.run(request).await)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use parley_core::chat::box_store::BoxSessionStore;
    use parley_core::llm::box_provider::BoxLlmProvider;
    use parley_core::llm::image::{BoxImageProvider, ImageProvider};
    use parley_core::llm::provider::LlmProvider;
    use parley_core::llm::registry::{
        ImageDefaults, ModelRegistry, RegisteredImageModel, RegisteredModel,
    };
    use parley_infra::storage::memory::MemorySessionStore;
    use parley_types::config::GlobalConfig;
    use parley_types::llm::{
        CompletionRequest, CompletionResponse, ImageModelType, ImageRequest, ImageResponse,
        LlmError, ModelType, StopReason, Usage,
    };

    use super::*;

    /// Replies with the last user message prefixed by "echo: ".
    struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let last = request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: format!("echo: {last}"),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    struct FixedImageProvider;

    impl ImageProvider for FixedImageProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _request: &ImageRequest) -> Result<ImageResponse, LlmError> {
            Ok(ImageResponse {
                url: Some("https://img.example/1.png".to_string()),
                revised_prompt: None,
            })
        }
    }

    fn test_router() -> Router {
        let mut registry = ModelRegistry::new();
        registry.register_chat(
            ModelType::Gpt,
            RegisteredModel::new(Arc::new(BoxLlmProvider::new(EchoProvider)), "gpt-4o"),
        );
        registry.register_image(
            ImageModelType::DallE,
            RegisteredImageModel {
                provider: Arc::new(BoxImageProvider::new(FixedImageProvider)),
                model: "dall-e-3".to_string(),
                defaults: ImageDefaults {
                    size: "1024x1024".to_string(),
                    style: None,
                },
            },
        );

        let state = AppState::from_parts(
            GlobalConfig::default(),
            registry,
            BoxSessionStore::new(MemorySessionStore::new()),
        );
        build_router(state)
    }

    async fn post_raw(router: &Router, uri: &str, body: String) -> (StatusCode, Value) {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(router, uri, body.to_string()).await
    }

    fn error_code(body: &Value) -> &str {
        body["errors"][0]["code"].as_str().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_health() {
        let request = axum::http::Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let router = test_router();

        let (status, body) = post_json(
            &router,
            "/api/v1/initChatSession",
            json!({ "modelType": "gpt", "systemInstructions": "Be terse." }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["meta"]["request_id"].as_str().unwrap().is_empty());
        let session_id = body["data"]["sessionId"].as_str().unwrap().to_string();

        let (status, body) = post_json(
            &router,
            "/api/v1/sendMessagesToChat",
            json!({
                "sessionId": session_id,
                "modelType": "gpt",
                "messages": ["hi", "there"],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["response"], "echo: hi\necho: there");

        let (status, body) = post_json(
            &router,
            "/api/v1/deleteChatSession",
            json!({ "sessionId": session_id }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].is_null());

        let (status, body) = post_json(
            &router,
            "/api/v1/sendMessagesToChat",
            json!({ "sessionId": session_id, "modelType": "gpt", "messages": ["again"] }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "SESSION_NOT_FOUND");

        let (status, _) = post_json(
            &router,
            "/api/v1/deleteChatSession",
            json!({ "sessionId": session_id }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty_response() {
        let router = test_router();
        let (_, body) = post_json(
            &router,
            "/api/v1/initChatSession",
            json!({ "modelType": "gpt" }),
        )
        .await;
        let session_id = body["data"]["sessionId"].as_str().unwrap().to_string();

        let (status, body) = post_json(
            &router,
            "/api/v1/sendMessagesToChat",
            json!({ "sessionId": session_id, "modelType": "gpt", "messages": [] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["response"], "");
    }

    #[tokio::test]
    async fn test_unknown_model_type_is_validation_error() {
        let (status, body) = post_json(
            &test_router(),
            "/api/v1/initChatSession",
            json!({ "modelType": "claude" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unregistered_model_is_unavailable() {
        let (status, body) = post_json(
            &test_router(),
            "/api/v1/initChatSession",
            json!({ "modelType": "grok" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "MODEL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let (status, body) = post_raw(
            &test_router(),
            "/api/v1/initChatSession",
            "{ not json".to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_send_to_unknown_session_is_not_found() {
        let (status, body) = post_json(
            &test_router(),
            "/api/v1/sendMessagesToChat",
            json!({ "sessionId": "missing", "modelType": "gpt", "messages": ["hi"] }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_generate_image() {
        let router = test_router();

        let (status, body) = post_json(
            &router,
            "/api/v1/generateImage",
            json!({ "modelType": "dallE", "prompt": "a red fox" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["imageUrl"], "https://img.example/1.png");

        let (status, body) = post_json(
            &router,
            "/api/v1/generateImage",
            json!({ "modelType": "gpt", "prompt": "a red fox" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }
}
