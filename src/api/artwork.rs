//! Artwork intake: download from a URL or decode inline base64

use base64::Engine;
use image::DynamicImage;
use thiserror::Error;
use tracing::debug;

use mockup_framer::engine::codec::decode_artwork;
use mockup_framer::engine::MockupError;

/// Artwork intake errors
#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("Provide exactly one of artwork_url or artwork_base64")]
    MissingSource,
    #[error("Failed to fetch artwork: {0}")]
    FetchFailed(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Artwork exceeds {0} bytes")]
    TooLarge(usize),
    #[error("Invalid base64 artwork: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Engine(#[from] MockupError),
}

/// Where the artwork comes from
#[derive(Debug, Clone, Copy)]
pub enum ArtworkSource<'a> {
    Url(&'a str),
    Base64(&'a str),
}

impl<'a> ArtworkSource<'a> {
    pub fn from_fields(url: Option<&'a str>, base64: Option<&'a str>) -> Result<Self, ArtworkError> {
        match (url, base64) {
            (Some(url), None) => Ok(ArtworkSource::Url(url)),
            (None, Some(data)) => Ok(ArtworkSource::Base64(data)),
            _ => Err(ArtworkError::MissingSource),
        }
    }
}

/// Fetch or decode artwork bytes into a raster
pub async fn load_artwork(
    client: &reqwest::Client,
    source: ArtworkSource<'_>,
    max_bytes: usize,
) -> Result<DynamicImage, ArtworkError> {
    let bytes = match source {
        ArtworkSource::Url(url) => fetch(client, url, max_bytes).await?,
        ArtworkSource::Base64(data) => {
            // Accept data URLs as well as bare base64
            let payload = data.split_once(',').map(|(_, rest)| rest).unwrap_or(data);
            base64::engine::general_purpose::STANDARD.decode(payload.trim())?
        }
    };

    if bytes.len() > max_bytes {
        return Err(ArtworkError::TooLarge(max_bytes));
    }

    Ok(decode_artwork(&bytes)?)
}

async fn fetch(client: &reqwest::Client, url: &str, max_bytes: usize) -> Result<Vec<u8>, ArtworkError> {
    debug!(url = %url, "Fetching artwork");

    let mut response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(ArtworkError::FetchFailed(format!(
            "HTTP {}: {}",
            response.status(),
            url
        )));
    }

    let expected = response.content_length().unwrap_or(0) as usize;
    if expected > max_bytes {
        return Err(ArtworkError::TooLarge(max_bytes));
    }

    // Chunked responses carry no length; stop as soon as the limit is crossed
    let mut bytes = Vec::with_capacity(expected);
    while let Some(chunk) = response.chunk().await? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(ArtworkError::TooLarge(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
