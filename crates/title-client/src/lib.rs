//! Page title lookup for generated QR codes.
//!
//! Provides the [`TitleSource`] seam, a Gemini-backed implementation, and
//! the [`TitleResolver`] that always produces some title.

pub mod gemini;
pub mod resolver;

pub use gemini::{GeminiClient, GeminiConfig};
pub use resolver::{fallback_title, TitleResolver, UNTITLED};

use async_trait::async_trait;

/// Outcome of a successful remote lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleLookup {
    Found(String),
    /// The service answered but could not determine a title.
    NotFound,
}

/// Unified error type for the title-client crate.
#[derive(Debug, thiserror::Error)]
pub enum TitleError {
    #[error("title service unavailable: {0}")]
    Unavailable(String),

    #[error("title service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed title response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TitleError {
    fn from(e: reqwest::Error) -> Self {
        TitleError::Unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for TitleError {
    fn from(e: serde_json::Error) -> Self {
        TitleError::Malformed(e.to_string())
    }
}

/// Something that can look up the title of a web page.
#[async_trait]
pub trait TitleSource: Send + Sync {
    async fn lookup(&self, url: &str) -> Result<TitleLookup, TitleError>;
}
