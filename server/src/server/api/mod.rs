//! REST API handlers grouped by domain.

pub mod generate;
pub mod result;
pub mod settings;


use axum::Json;
use serde_json::{json, Value};

use crate::services::generation::GenerationResult;

type ApiResult = Result<Json<Value>, (axum::http::StatusCode, Json<Value>)>;

/// Standard success response.
pub fn ok_json(data: Value) -> Json<Value> {
    Json(json!({ "status": "ok", "data": data }))
}

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (axum::http::StatusCode, Json<Value>) {
    (
        axum::http::StatusCode::from_u16(status).unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// JSON view of a finished generation.
pub fn result_json(result: &GenerationResult) -> Value {
    json!({
        "id": result.id(),
        "title": result.title(),
        "url": result.source_url(),
        "link": result.link(),
        "image": result.image().to_data_url(),
        "file_name": result.file_name(),
        "download": format!("/api/result/{}/image", result.id()),
        "created_at": result.created_at().to_rfc3339(),
    })
}
