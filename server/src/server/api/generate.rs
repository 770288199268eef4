//! QR generation API:
//!   POST /api/generate – multipart form with `url` and an optional `logo` file

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use image_engine::{LogoAsset, LogoError};
use serde_json::Value;

use crate::app::SharedState;
use crate::services::generation::{GenerationError, GenerationRequest};

use super::{err_json, ok_json, result_json, ApiResult};

/// POST /api/generate
pub async fn generate(State(state): State<SharedState>, mut multipart: Multipart) -> ApiResult {
    let max_logo_bytes = state.config().logo_max_bytes;
    let mut url = String::new();
    let mut logo = None;
    let form_err = |e| multipart_error(e, max_logo_bytes);

    while let Some(field) = multipart.next_field().await.map_err(form_err)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "url" => {
                url = field.text().await.map_err(form_err)?;
            }
            "logo" => {
                let content_type = field.content_type().map(str::to_string);
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => return Err(form_err(e)),
                    Err(e) => return Err(logo_error(LogoError::Read(e.body_text()))),
                };
                logo =
                    LogoAsset::from_upload(data.to_vec(), content_type.as_deref(), max_logo_bytes)
                        .map_err(logo_error)?;
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let request = GenerationRequest::new(url, logo).map_err(generation_error)?;
    let result = state
        .run_generation(request)
        .await
        .map_err(generation_error)?;

    Ok(ok_json(result_json(&result)))
}

/// Body-limit rejections read like the logo size check.
fn multipart_error(e: MultipartError, max_logo_bytes: usize) -> (StatusCode, Json<Value>) {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        let message = LogoError::TooLarge { size: 0, max: max_logo_bytes }.to_string();
        return err_json(status.as_u16(), &message);
    }
    err_json(status.as_u16(), &format!("Invalid form data: {}", e.body_text()))
}

fn logo_error(e: LogoError) -> (StatusCode, Json<Value>) {
    let status = match e {
        LogoError::TooLarge { .. } => 413,
        LogoError::Unsupported(_) => 415,
        LogoError::Read(_) => 400,
    };
    tracing::info!(error = %e, "Logo rejected");
    err_json(status, &e.to_string())
}

fn generation_error(e: GenerationError) -> (StatusCode, Json<Value>) {
    let status = match e {
        GenerationError::EmptyUrl | GenerationError::InvalidUrl(_) => 400,
        GenerationError::Image(_) => 422,
        GenerationError::Internal(_) => 500,
    };
    err_json(status, &e.to_string())
}
