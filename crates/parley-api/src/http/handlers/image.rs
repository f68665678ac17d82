//! Image generation HTTP handler.
//!
//! Endpoint: POST /api/v1/generateImage

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::llm::ImageModelType;

use crate::http::error::AppError;
use crate::http::extractors::json::{Validate, ValidatedJson};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub model_type: ImageModelType,
    pub prompt: String,
}

impl Validate for GenerateImageRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    /// Empty when the backend returned no image.
    pub image_url: String,
}

/// POST /api/v1/generateImage
pub async fn generate_image(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GenerateImageRequest>,
) -> Result<Json<ApiResponse<GenerateImageResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let image_url = state.images.generate(body.model_type, &body.prompt).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        GenerateImageResponse { image_url },
        request_id,
        elapsed,
    )))
}
