//! Google Gemini client used to look up page titles.
//!
//! Sends a single-turn prompt to `generateContent` and maps the reply onto
//! [`TitleLookup`]. The model is asked to answer with a fixed sentinel when it
//! cannot find a title; that convention stays inside this module.

mod models;

pub use models::{
    ApiErrorBody, ApiErrorDetails, Candidate, Content, GenerateContentRequest,
    GenerateContentResponse, Part,
};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::{TitleError, TitleLookup, TitleSource};

pub const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Reply the model is told to give when it cannot find a title.
const NOT_FOUND_REPLY: &str = "Title not found";

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"********")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            base_url: GEMINI_BASE.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, TitleError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send a single-turn prompt and return the trimmed reply text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, TitleError> {
        let body = GenerateContentRequest::from_prompt(prompt);
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        Ok(parsed.text().trim().to_string())
    }
}

#[async_trait]
impl TitleSource for GeminiClient {
    async fn lookup(&self, url: &str) -> Result<TitleLookup, TitleError> {
        let reply = self.generate_text(&title_prompt(url)).await?;
        tracing::debug!(url, model = %self.config.model, reply = %reply, "Title lookup reply");
        Ok(interpret_reply(&reply))
    }
}

/// Prompt asking the model for the `<title>` of `url`.
pub fn title_prompt(url: &str) -> String {
    format!(
        "Extract the exact content of the <title> tag from the webpage at the URL: {url}. \
         Respond with only the text content of the title tag and absolutely nothing else. \
         If you cannot access the URL or find a title, respond with \"{NOT_FOUND_REPLY}\"."
    )
}

/// Map raw reply text onto a lookup outcome.
pub(crate) fn interpret_reply(reply: &str) -> TitleLookup {
    let title = reply.trim().trim_matches('"').trim();
    if title.is_empty() || title.eq_ignore_ascii_case(NOT_FOUND_REPLY) {
        TitleLookup::NotFound
    } else {
        TitleLookup::Found(title.to_string())
    }
}

/// Build an API error from a non-2xx body, preferring Google's error message.
fn api_error(status: u16, body: &str) -> TitleError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    TitleError::Api { status, message }
}
