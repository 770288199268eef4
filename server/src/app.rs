use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::services::generation::{GenerationError, GenerationRequest, GenerationResult, Generator};

/// Application shared state accessible from axum handlers.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Application configuration (fixed after startup)
    config: AppConfig,
    generator: Generator,
    /// Most recently completed generation, if any
    latest: RwLock<Option<Arc<GenerationResult>>>,
    in_flight: AtomicUsize,
    shutdown_token: CancellationToken,
}

/// Decrements the in-flight counter when the generation ends or is dropped.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SharedState {
    pub fn new(config: AppConfig, generator: Generator) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                generator,
                latest: RwLock::new(None),
                in_flight: AtomicUsize::new(0),
                shutdown_token: CancellationToken::new(),
            }),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.inner.config.server_port
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn generator(&self) -> &Generator {
        &self.inner.generator
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown_token
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Run a validated request and publish its result.
    ///
    /// The previous result is discarded when the generation starts. On success
    /// the slot is replaced wholesale, so it always holds the most recently
    /// completed request's own result.
    pub async fn run_generation(
        &self,
        request: GenerationRequest,
    ) -> Result<Arc<GenerationResult>, GenerationError> {
        let _guard = InFlightGuard::enter(&self.inner.in_flight);
        self.clear_result().await;

        let url = request.url().to_string();
        tracing::info!(url = %url, logo = request.logo().is_some(), "Generating QR code");

        match self.inner.generator.generate(request).await {
            Ok(result) => {
                let result = Arc::new(result);
                *self.inner.latest.write().await = Some(result.clone());
                tracing::info!(
                    url = %url,
                    title = %result.title(),
                    id = %result.id(),
                    "QR code generated"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "QR code generation failed");
                Err(e)
            }
        }
    }

    pub async fn latest_result(&self) -> Option<Arc<GenerationResult>> {
        self.inner.latest.read().await.clone()
    }

    pub async fn clear_result(&self) {
        *self.inner.latest.write().await = None;
    }
}
