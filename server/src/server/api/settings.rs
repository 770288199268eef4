//! GET /api/settings – effective configuration (secrets masked)

use axum::extract::State;
use axum::Json;
use serde_json::{json, Map, Value};

use crate::app::SharedState;

pub async fn get_settings(State(state): State<SharedState>) -> Json<Value> {
    let settings: Map<String, Value> = state
        .config()
        .describe()
        .into_iter()
        .map(|info| {
            let val = json!({
                "key": info.key,
                "value": info.value,
                "type": info.setting_type,
                "required": info.required,
                "description": info.description,
                "has_value": info.has_value,
            });
            (info.key, val)
        })
        .collect();

    Json(json!({ "settings": settings }))
}
