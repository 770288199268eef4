pub mod app;
pub mod config;
pub mod server;
pub mod services;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use image_engine::QrOptions;
use title_client::{GeminiClient, TitleResolver, TitleSource};

use app::SharedState;
use config::AppConfig;
use services::generation::Generator;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load .env and the runtime config.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();
    let config = AppConfig::from_env()?;
    tracing::info!(?config, "Configuration loaded");
    Ok(config)
}

/// Wire the title client and generator into shared state.
pub fn build_state(config: AppConfig) -> Result<SharedState, anyhow::Error> {
    let client = GeminiClient::new(config.gemini_config())?;
    tracing::info!(model = client.model(), "Title lookup via Gemini");

    let source: Arc<dyn TitleSource> = Arc::new(client);
    let generator = Generator::new(TitleResolver::new(source), QrOptions::default());
    Ok(SharedState::new(config, generator))
}
