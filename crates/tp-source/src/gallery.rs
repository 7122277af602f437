//! Résolution d'un tag en URL d'image via l'API de recherche waifu.im.

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use serde::Deserialize;
use tp_core::frame::PixelBuffer;
use tp_core::traits::Source;

use crate::fetch::{fetch_bytes, http_client};
use crate::image::decode_bytes;

/// Base de l'API de recherche.
pub const GALLERY_BASE_URL: &str = "https://api.waifu.im";

/// Tags acceptés par [`TagSource`].
///
/// Limités aux tags SFW de l'API : `oppai` est classé NSFW côté waifu.im et
/// n'est pas proposé.
pub const ALLOWED_TAGS: &[&str] = &[
    "maid",
    "waifu",
    "marin-kitagawa",
    "mori-calliope",
    "raiden-shogun",
    "selfies",
    "uniform",
    "kamisato-ayaka",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    images: Vec<GalleryImage>,
}

#[derive(Debug, Deserialize)]
struct GalleryImage {
    url: String,
}

/// Check `tag` against [`ALLOWED_TAGS`].
///
/// # Errors
/// Returns an error listing every valid tag.
///
/// # Example
/// ```
/// use tp_source::gallery::validate_tag;
/// assert!(validate_tag("maid").is_ok());
/// assert!(validate_tag("dog").is_err());
/// ```
pub fn validate_tag(tag: &str) -> Result<()> {
    if ALLOWED_TAGS.contains(&tag) {
        return Ok(());
    }
    let list: String = ALLOWED_TAGS.iter().map(|t| format!("\n- {t}")).collect();
    bail!("Tag invalide : {tag:?}. Tags valides :{list}")
}

/// First image URL of a search response body.
///
/// # Errors
/// Returns an error if the body is not JSON, has no `images` array, or the
/// array is empty.
///
/// # Example
/// ```
/// use tp_source::gallery::first_image_url;
/// let body = r#"{"images":[{"url":"https://cdn.example/1.jpg"},{"url":"https://cdn.example/2.jpg"}]}"#;
/// assert_eq!(first_image_url(body).unwrap(), "https://cdn.example/1.jpg");
/// ```
pub fn first_image_url(body: &str) -> Result<String> {
    let response: SearchResponse =
        serde_json::from_str(body).context("Réponse de l'API illisible")?;
    match response.images.into_iter().next() {
        Some(image) => Ok(image.url),
        None => bail!("La réponse de l'API ne contient aucune image"),
    }
}

/// Client de l'API de recherche par tag.
pub struct GalleryClient {
    base_url: String,
    client: Client,
}

impl GalleryClient {
    /// Client against [`GALLERY_BASE_URL`].
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_base_url(GALLERY_BASE_URL)
    }

    /// Client against a custom base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            client: http_client()?,
        })
    }

    /// `{base}/search` endpoint.
    #[must_use]
    pub fn search_endpoint(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }

    /// Resolve `tag` to the URL of the first matching image.
    ///
    /// # Errors
    /// Returns an error for an invalid tag, a failed request, a non-success
    /// status or an unusable response body.
    pub fn resolve(&self, tag: &str) -> Result<String> {
        validate_tag(tag)?;
        let endpoint = self.search_endpoint();
        log::info!("Recherche du tag {tag:?} sur {endpoint}");

        let response = self
            .client
            .get(&endpoint)
            .query(&[("included_tags", tag)])
            .send()
            .with_context(|| format!("Requête de recherche échouée : {endpoint}"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("Statut HTTP {} pour la recherche {tag:?}", status.as_u16());
        }

        let body = response.text().context("Lecture de la réponse échouée")?;
        let url = first_image_url(&body)?;
        log::info!("Tag {tag:?} → {url}");
        Ok(url)
    }

    /// Download raw bytes with this client.
    ///
    /// # Errors
    /// See [`fetch_bytes`].
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        fetch_bytes(&self.client, url)
    }
}

/// Source d'image résolue par tag.
///
/// # Example
/// ```no_run
/// use tp_core::traits::Source;
/// use tp_source::gallery::TagSource;
/// let mut source = TagSource::new("maid").unwrap();
/// let pixels = source.load().unwrap();
/// ```
pub struct TagSource {
    tag: String,
    gallery: GalleryClient,
}

impl TagSource {
    /// Source for an allow-listed tag.
    ///
    /// # Errors
    /// Returns an error if the tag is not allowed or the HTTP client cannot
    /// be built.
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        validate_tag(&tag)?;
        Ok(Self {
            tag,
            gallery: GalleryClient::new()?,
        })
    }
}

impl Source for TagSource {
    fn load(&mut self) -> Result<PixelBuffer> {
        let url = self.gallery.resolve(&self.tag)?;
        let bytes = self.gallery.download(&url)?;
        decode_bytes(&bytes).with_context(|| format!("Contenu invalide à {url}"))
    }

    fn describe(&self) -> String {
        format!("tag {}", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_allowed_tag_validates() {
        for tag in ALLOWED_TAGS {
            assert!(validate_tag(tag).is_ok(), "{tag}");
        }
    }

    #[test]
    fn nsfw_tag_is_not_allowed() {
        assert!(!ALLOWED_TAGS.contains(&"oppai"));
        assert!(validate_tag("oppai").is_err());
    }

    #[test]
    fn rejection_lists_valid_tags() {
        let err = validate_tag("Maid")
            .err()
            .unwrap_or_else(|| panic!("tags are case-sensitive"));
        let msg = err.to_string();
        for tag in ALLOWED_TAGS {
            assert!(msg.contains(tag), "{msg}");
        }
    }

    #[test]
    fn takes_first_image() {
        let body = r#"{"images":[{"url":"a","width":10},{"url":"b"}],"extra":true}"#;
        assert_eq!(first_image_url(body).unwrap_or_else(|e| panic!("{e:#}")), "a");
    }

    #[test]
    fn empty_images_is_an_error() {
        assert!(first_image_url(r#"{"images":[]}"#).is_err());
    }

    #[test]
    fn missing_or_malformed_images_is_an_error() {
        assert!(first_image_url(r#"{"detail":"not found"}"#).is_err());
        assert!(first_image_url(r#"{"images":"nope"}"#).is_err());
        assert!(first_image_url("<html>").is_err());
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = GalleryClient::with_base_url("http://localhost:8080/")
            .unwrap_or_else(|e| panic!("{e:#}"));
        assert_eq!(client.search_endpoint(), "http://localhost:8080/search");
    }

    #[test]
    fn tag_source_rejects_unknown_tag_before_any_request() {
        assert!(TagSource::new("not-a-tag").is_err());
    }

    mod mock_http {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::*;

        /// Run a blocking gallery call off the async runtime.
        async fn resolve_against(server: &MockServer, tag: &'static str) -> Result<String> {
            let base = server.uri();
            tokio::task::spawn_blocking(move || GalleryClient::with_base_url(base)?.resolve(tag))
                .await
                .unwrap_or_else(|e| panic!("{e}"))
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn resolve_sends_tag_and_takes_first_url() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search"))
                .and(query_param("included_tags", "maid"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "images": [
                        {"url": "https://cdn.example/first.jpg", "width": 800},
                        {"url": "https://cdn.example/second.jpg"}
                    ]
                })))
                .expect(1)
                .mount(&server)
                .await;

            let url = resolve_against(&server, "maid")
                .await
                .unwrap_or_else(|e| panic!("{e:#}"));
            assert_eq!(url, "https://cdn.example/first.jpg");
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn server_error_carries_status_code() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let err = resolve_against(&server, "waifu")
                .await
                .err()
                .unwrap_or_else(|| panic!("expected an error"));
            assert!(err.to_string().contains("500"), "{err:#}");
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn empty_result_is_an_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/search"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"images": []})),
                )
                .mount(&server)
                .await;

            assert!(resolve_against(&server, "uniform").await.is_err());
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn invalid_tag_sends_no_request() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;

            assert!(resolve_against(&server, "oppai").await.is_err());
        }
    }
}
