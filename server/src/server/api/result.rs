//! Latest result API:
//!   GET    /api/result       – latest result JSON
//!   GET    /api/result/image – latest PNG as a download
//!   GET    /api/result/{id}/image – PNG of a specific result, while it is the latest
//!   DELETE /api/result       – discard the latest result

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::SharedState;
use crate::services::generation::GenerationResult;

use super::{err_json, ok_json, result_json, ApiResult};

const NO_RESULT: &str = "No QR code has been generated yet";
const REPLACED: &str = "This QR code is no longer available. Please generate it again.";

/// GET /api/result
pub async fn get_result(State(state): State<SharedState>) -> ApiResult {
    let result = state
        .latest_result()
        .await
        .ok_or_else(|| err_json(404, NO_RESULT))?;
    Ok(ok_json(result_json(&result)))
}

/// GET /api/result/image
pub async fn download_image(
    State(state): State<SharedState>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let result = state
        .latest_result()
        .await
        .ok_or_else(|| err_json(404, NO_RESULT))?;
    image_response(&result)
}

/// GET /api/result/{id}/image
///
/// Never serves a different result than the one the caller asked for.
pub async fn download_image_by_id(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let result = state
        .latest_result()
        .await
        .filter(|r| r.id() == id)
        .ok_or_else(|| err_json(404, REPLACED))?;
    image_response(&result)
}

fn image_response(result: &GenerationResult) -> Result<Response, (StatusCode, Json<Value>)> {
    let image = result.image();
    let disposition = format!("attachment; filename=\"{}\"", result.file_name());

    Response::builder()
        .header(header::CONTENT_TYPE, image.mime())
        .header(header::CONTENT_LENGTH, image.len())
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(image.bytes().to_vec()))
        .map_err(|e| err_json(500, &e.to_string()))
}

/// DELETE /api/result
pub async fn reset_result(State(state): State<SharedState>) -> Json<Value> {
    state.clear_result().await;
    tracing::info!("Latest result cleared");
    Json(json!({ "success": true, "message": "Result cleared" }))
}
