//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use parley_types::error::ChatError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat or image operation failure.
    Chat(ChatError),
    /// Malformed or out-of-range request input.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    /// Status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Chat(ChatError::NotFound(_)) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            AppError::Chat(ChatError::ModelUnavailable(_)) => {
                (StatusCode::BAD_REQUEST, "MODEL_UNAVAILABLE")
            }
            AppError::Chat(ChatError::Backend(_)) => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR"),
            AppError::Chat(ChatError::Persistence(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR")
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Chat(ChatError::NotFound(id)) => write!(f, "Session '{id}' not found"),
            AppError::Chat(e) => write!(f, "{e}"),
            AppError::Validation(msg) | AppError::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();
        let request_id = Uuid::now_v7().to_string();

        if status.is_server_error() {
            tracing::error!(%request_id, code, error = %message, "Request failed");
        } else {
            tracing::debug!(%request_id, code, error = %message, "Request rejected");
        }

        (status, Json(ApiResponse::error(code, &message, request_id, 0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::error::RepositoryError;
    use parley_types::llm::LlmError;
    use parley_types::session::SessionId;

    #[test]
    fn test_chat_errors_map_to_statuses() {
        let cases = [
            (
                AppError::from(ChatError::NotFound(SessionId::from("s-1"))),
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
            ),
            (
                AppError::from(ChatError::ModelUnavailable("grok".into())),
                StatusCode::BAD_REQUEST,
                "MODEL_UNAVAILABLE",
            ),
            (
                AppError::from(ChatError::Backend(LlmError::AuthenticationFailed)),
                StatusCode::BAD_GATEWAY,
                "BACKEND_ERROR",
            ),
            (
                AppError::from(ChatError::Persistence(RepositoryError::Io("disk full".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
            ),
            (
                AppError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code));
        }
    }

    #[tokio::test]
    async fn test_error_envelope_carries_request_id() {
        let response = AppError::Validation("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let request_id = body["meta"]["request_id"].as_str().unwrap();
        assert!(Uuid::parse_str(request_id).is_ok());
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found_message_names_session() {
        let err = AppError::from(ChatError::NotFound(SessionId::from("abc")));
        assert_eq!(err.to_string(), "Session 'abc' not found");
    }
}
