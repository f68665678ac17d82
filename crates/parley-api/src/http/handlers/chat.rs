//! Chat session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/initChatSession    - Create a session holding only the preamble
//! - POST /api/v1/sendMessagesToChat - Feed a batch of messages through a model
//! - POST /api/v1/deleteChatSession  - Remove a session

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::llm::ModelType;
use parley_types::session::{DEFAULT_SYSTEM_INSTRUCTIONS, GenerationConfig, SessionId};

use crate::http::error::AppError;
use crate::http::extractors::json::{Validate, ValidatedJson, check_temperature};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Generation settings shared by init and send bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    #[serde(default = "default_system_instructions")]
    pub system_instructions: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
}

fn default_system_instructions() -> String {
    DEFAULT_SYSTEM_INSTRUCTIONS.to_string()
}

impl GenerationParams {
    fn to_config(&self) -> GenerationConfig {
        GenerationConfig::new(
            self.system_instructions.clone(),
            self.max_tokens,
            self.temperature,
            self.stop_sequences.clone(),
        )
    }
}

/// Request body for session creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitChatSessionRequest {
    pub model_type: ModelType,
    #[serde(flatten)]
    pub params: GenerationParams,
}

impl Validate for InitChatSessionRequest {
    fn validate(&self) -> Result<(), String> {
        check_temperature(self.params.temperature)
    }
}

/// Request body for a message batch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagesRequest {
    pub session_id: String,
    pub model_type: ModelType,
    pub messages: Vec<String>,
    #[serde(flatten)]
    pub params: GenerationParams,
}

impl Validate for SendMessagesRequest {
    fn validate(&self) -> Result<(), String> {
        check_temperature(self.params.temperature)
    }
}

/// Request body for session deletion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChatSessionRequest {
    pub session_id: String,
}

impl Validate for DeleteChatSessionRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitChatSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessagesResponse {
    pub response: String,
}

/// POST /api/v1/initChatSession
pub async fn init_chat_session(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<InitChatSessionRequest>,
) -> Result<Json<ApiResponse<InitChatSessionResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = state
        .chat
        .create_session(body.model_type, &body.params.to_config())
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        InitChatSessionResponse {
            session_id: session_id.to_string(),
        },
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/sendMessagesToChat
pub async fn send_messages_to_chat(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SendMessagesRequest>,
) -> Result<Json<ApiResponse<SendMessagesResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session_id = SessionId::from(body.session_id);
    let response = state
        .chat
        .send_messages(
            body.model_type,
            &session_id,
            &body.messages,
            &body.params.to_config(),
        )
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        SendMessagesResponse { response },
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/deleteChatSession
pub async fn delete_chat_session(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<DeleteChatSessionRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .chat
        .delete_session(&SessionId::from(body.session_id))
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success((), request_id, elapsed)))
}
