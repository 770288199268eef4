use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::app::SharedState;
use super::{api, assets};

/// Room for the URL field and multipart framing on top of the logo cap.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let body_limit = state.config().logo_max_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        // --- Generation ---
        .route("/api/generate", post(api::generate::generate))
        .route("/api/result", get(api::result::get_result).delete(api::result::reset_result))
        .route("/api/result/image", get(api::result::download_image))
        .route("/api/result/{id}/image", get(api::result::download_image_by_id))
        // --- Settings ---
        .route("/api/settings", get(api::settings::get_settings))
        // --- Page at / ---
        .route("/", get(assets::page_index))
        .fallback(assets::page_fallback)
        // --- Middleware ---
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler(State(state): State<SharedState>) -> axum::Json<serde_json::Value> {
    let has_result = state.latest_result().await.is_some();
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "in_flight": state.in_flight(),
        "has_result": has_result,
    }))
}
