//! Test doubles shared by the unit tests in this crate.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use image_engine::QrOptions;
use title_client::{TitleError, TitleLookup, TitleResolver, TitleSource};

use crate::app::SharedState;
use crate::config::AppConfig;
use crate::services::generation::Generator;

/// In-memory title source with per-URL titles and delays.
#[derive(Default)]
pub struct FakeTitles {
    titles: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeTitles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, url: &str, title: &str) -> Self {
        self.titles.insert(url.to_string(), title.to_string());
        self
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn into_resolver(self) -> TitleResolver {
        TitleResolver::new(Arc::new(self))
    }
}

#[async_trait]
impl TitleSource for FakeTitles {
    async fn lookup(&self, url: &str) -> Result<TitleLookup, TitleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(TitleError::Unavailable("connection refused".into()));
        }
        Ok(self
            .titles
            .get(url)
            .cloned()
            .map(TitleLookup::Found)
            .unwrap_or(TitleLookup::NotFound))
    }
}

/// Shared state backed by a fake title source.
pub fn state_with(fake: FakeTitles) -> SharedState {
    let generator = Generator::new(fake.into_resolver(), QrOptions::default());
    SharedState::new(AppConfig::with_api_key("test-key"), generator)
}

/// A small opaque PNG usable as a logo.
pub fn png_logo() -> Vec<u8> {
    let img = RgbaImage::from_pixel(32, 32, Rgba([10, 120, 200, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
