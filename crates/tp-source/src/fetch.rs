use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use tp_core::frame::PixelBuffer;
use tp_core::traits::Source;

use crate::image::decode_bytes;

/// Délai maximal d'une requête complète.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Délai maximal d'établissement de connexion.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the blocking HTTP client shared by URL and gallery sources.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialised.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .user_agent(concat!("termpix/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Impossible de créer le client HTTP")
}

/// GET `url` and return the raw body.
///
/// # Errors
/// Returns an error on network failure or any non-success status; the status
/// code is part of the message.
pub fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    log::info!("Téléchargement de {url}");
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Requête HTTP échouée : {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Statut HTTP {} pour {url}", status.as_u16());
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("Lecture du corps échouée : {url}"))?;
    log::debug!("{} octets reçus de {url}", bytes.len());
    Ok(bytes.to_vec())
}

/// Source d'image distante : télécharge puis décode.
///
/// # Example
/// ```no_run
/// use tp_core::traits::Source;
/// use tp_source::fetch::UrlSource;
/// let mut source = UrlSource::new("https://example.com/cat.png").unwrap();
/// let pixels = source.load().unwrap();
/// ```
pub struct UrlSource {
    url: String,
    client: Client,
}

impl UrlSource {
    /// Source fetching `url` on each load.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: http_client()?,
        })
    }
}

impl Source for UrlSource {
    fn load(&mut self) -> Result<PixelBuffer> {
        let bytes = fetch_bytes(&self.client, &self.url)?;
        decode_bytes(&bytes).with_context(|| format!("Contenu invalide à {}", self.url))
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}
