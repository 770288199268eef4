//! Generation orchestrator: validates a request, renders the QR image and
//! resolves the page title concurrently, and assembles the result.

use chrono::{DateTime, Utc};
use image_engine::{EncodedImage, ImageError, LogoAsset, QrOptions};
use title_client::TitleResolver;
use url::Url;
use uuid::Uuid;

use super::download::download_file_name;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Please enter a URL.")]
    EmptyUrl,
    #[error("Please enter a valid URL (e.g., https://example.com).")]
    InvalidUrl(String),
    #[error("Failed to generate QR code: {0}")]
    Image(#[from] ImageError),
    #[error("Failed to generate QR code: {0}")]
    Internal(String),
}

impl GenerationError {
    /// Rejected before any work started.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyUrl | Self::InvalidUrl(_))
    }
}

/// Check that `url` has a scheme and a host.
pub fn validate_url(url: &str) -> Result<Url, GenerationError> {
    if url.trim().is_empty() {
        return Err(GenerationError::EmptyUrl);
    }
    let parsed = Url::parse(url).map_err(|e| GenerationError::InvalidUrl(e.to_string()))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(GenerationError::InvalidUrl("missing host".into())),
    }
}

/// A validated generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    url: String,
    logo: Option<LogoAsset>,
}

impl GenerationRequest {
    pub fn new(url: impl Into<String>, logo: Option<LogoAsset>) -> Result<Self, GenerationError> {
        let url = url.into();
        validate_url(&url)?;
        Ok(Self { url, logo })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn logo(&self) -> Option<&LogoAsset> {
        self.logo.as_ref()
    }
}

/// A finished QR code. Only built once both the image and the title exist.
#[derive(Debug)]
pub struct GenerationResult {
    id: Uuid,
    image: EncodedImage,
    title: String,
    source_url: String,
    created_at: DateTime<Utc>,
}

impl GenerationResult {
    fn new(image: EncodedImage, title: String, source_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            title,
            source_url,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn file_name(&self) -> String {
        download_file_name(&self.title)
    }

    /// The source URL when it is safe to use as a hyperlink (http or https).
    pub fn link(&self) -> Option<&str> {
        let parsed = Url::parse(&self.source_url).ok()?;
        matches!(parsed.scheme(), "http" | "https").then_some(self.source_url.as_str())
    }
}

/// Runs QR rendering and title resolution for a request.
#[derive(Clone)]
pub struct Generator {
    resolver: TitleResolver,
    options: QrOptions,
}

impl Generator {
    pub fn new(resolver: TitleResolver, options: QrOptions) -> Self {
        Self { resolver, options }
    }

    /// Validate `url` and generate in one step.
    pub async fn generate_for(
        &self,
        url: &str,
        logo: Option<LogoAsset>,
    ) -> Result<GenerationResult, GenerationError> {
        self.generate(GenerationRequest::new(url, logo)?).await
    }

    /// Render the image and resolve the title concurrently.
    ///
    /// Both must succeed; the first failure is returned.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let GenerationRequest { url, logo } = request;
        let options = self.options;
        let payload = url.clone();

        let render = async move {
            tokio::task::spawn_blocking(move || {
                image_engine::render_with_logo(&payload, &options, logo.as_ref())
            })
            .await
            .map_err(|e| GenerationError::Internal(format!("render task failed: {e}")))?
            .map_err(GenerationError::from)
        };
        let title = async { Ok::<_, GenerationError>(self.resolver.resolve(&url).await) };

        let (image, title) = tokio::try_join!(render, title)?;
        tracing::debug!(url = %url, bytes = image.len(), "QR image rendered");

        Ok(GenerationResult::new(image, title, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{png_logo, FakeTitles};
    use image_engine::{render_qr, encode_png, LogoPlacement, DEFAULT_MAX_LOGO_BYTES};

    fn generator(fake: FakeTitles) -> Generator {
        Generator::new(fake.into_resolver(), QrOptions::default())
    }

    #[test]
    fn validate_url_accepts_scheme_and_host() {
        assert!(validate_url("https://example.com/page?q=1").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn validate_url_rejects_garbage() {
        assert!(matches!(validate_url(""), Err(GenerationError::EmptyUrl)));
        assert!(matches!(validate_url("not a url"), Err(GenerationError::InvalidUrl(_))));
        assert!(matches!(validate_url("example.com"), Err(GenerationError::InvalidUrl(_))));
        assert!(matches!(
            validate_url("mailto:someone@example.com"),
            Err(GenerationError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn source_url_is_kept_verbatim() {
        let fake = FakeTitles::new().with_title("https://Example.com/Page?x=1#frag", "Example");
        let result = generator(fake)
            .generate_for("https://Example.com/Page?x=1#frag", None)
            .await
            .unwrap();
        assert_eq!(result.source_url(), "https://Example.com/Page?x=1#frag");
        assert_eq!(result.title(), "Example");
        assert_eq!(result.file_name(), "example.png");
    }

    #[tokio::test]
    async fn only_web_urls_are_linkable() {
        let g = generator(FakeTitles::new());
        let web = g.generate_for("https://example.com/page", None).await.unwrap();
        assert_eq!(web.link(), Some("https://example.com/page"));

        let script = g
            .generate_for("javascript://example.com/%0Aalert(document.cookie)", None)
            .await
            .unwrap();
        assert_eq!(script.source_url(), "javascript://example.com/%0Aalert(document.cookie)");
        assert_eq!(script.link(), None);
    }

    #[tokio::test]
    async fn invalid_url_does_no_work() {
        let fake = FakeTitles::new();
        let calls = fake.calls();
        let err = generator(fake).generate_for("not a url", None).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn image_without_logo_matches_bare_render() {
        let url = "https://example.com/page";
        let result = generator(FakeTitles::new()).generate_for(url, None).await.unwrap();
        let bare = encode_png(&render_qr(url, &QrOptions::default()).unwrap()).unwrap();
        assert_eq!(result.image().bytes(), bare.bytes());
    }

    #[tokio::test]
    async fn logo_changes_only_the_badge() {
        let url = "https://example.com/page";
        let logo = LogoAsset::from_upload(png_logo(), Some("image/png"), DEFAULT_MAX_LOGO_BYTES)
            .unwrap();
        let result = generator(FakeTitles::new()).generate_for(url, logo).await.unwrap();

        let out = image::load_from_memory(result.image().bytes()).unwrap().to_rgba8();
        let bare = render_qr(url, &QrOptions::default()).unwrap();
        let placement = LogoPlacement::for_side(512);
        for (x, y, pixel) in out.enumerate_pixels() {
            if !placement.badge_contains(x, y) {
                assert_eq!(pixel, bare.get_pixel(x, y));
            }
        }
    }

    #[tokio::test]
    async fn failing_title_service_falls_back_to_host() {
        let result = generator(FakeTitles::failing())
            .generate_for("https://example.com/page", None)
            .await
            .unwrap();
        assert_eq!(result.title(), "example.com");
    }

    #[tokio::test]
    async fn undecodable_logo_fails_the_generation() {
        let logo = LogoAsset::from_upload(b"garbage".to_vec(), Some("image/png"), 1024).unwrap();
        let err = generator(FakeTitles::new())
            .generate_for("https://example.com", logo)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Image(ImageError::LogoDecode(_))));
        assert!(err.to_string().starts_with("Failed to generate QR code: "));
    }

    #[tokio::test]
    async fn oversize_payload_is_a_bitmap_error() {
        let url = format!("https://example.com/{}", "a".repeat(3000));
        let err = generator(FakeTitles::new())
            .generate_for(&url, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Image(ImageError::Bitmap(_))));
    }
}
