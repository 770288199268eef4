//! Best-effort title resolution with local fallbacks.

use std::sync::Arc;

use url::Url;

use crate::{TitleLookup, TitleSource};

/// Title used when neither the remote lookup nor the URL yield anything.
pub const UNTITLED: &str = "Untitled Page";

/// Resolves a URL to a human-readable title. Never fails.
///
/// Remote errors, "not found" answers and blank titles all degrade to the
/// URL's host name, and then to [`UNTITLED`].
#[derive(Clone)]
pub struct TitleResolver {
    source: Arc<dyn TitleSource>,
}

impl TitleResolver {
    pub fn new(source: Arc<dyn TitleSource>) -> Self {
        Self { source }
    }

    pub async fn resolve(&self, url: &str) -> String {
        match self.source.lookup(url).await {
            Ok(TitleLookup::Found(title)) if !title.trim().is_empty() => {
                title.trim().to_string()
            }
            Ok(_) => {
                tracing::debug!(url, "No title found, using fallback");
                fallback_title(url)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Title lookup failed, using fallback");
                fallback_title(url)
            }
        }
    }
}

/// Host name of `url`, or [`UNTITLED`] if it has none.
pub fn fallback_title(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}
