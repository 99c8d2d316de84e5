//! Image sources and load generations.
//!
//! Loading a photo is the only asynchronous step in the editor. A host starts
//! a load with [`crate::LandmarkEditor::begin_load`], which hands out a
//! [`LoadToken`]. Starting another load invalidates every earlier token, so a
//! slow load that finishes after a newer one was requested is discarded
//! instead of overwriting the current photo.
//!
//! # Data URLs
//!
//! A reference can be raw encoded bytes or a data URL of the form
//! `data:<mime>[;param=value][;base64],<payload>`. A string without the
//! `data:` prefix is taken to be the base64 payload on its own.

use std::io::Cursor;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageReader;
use thiserror::Error;

use crate::transform::ImageMetrics;

/// Error types for image loading.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// No image data was supplied.
    #[error("Empty image data")]
    Empty,

    /// The data URL header could not be parsed.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// The payload is not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The bytes are not in a recognized image format.
    #[error("Invalid or unsupported image format")]
    UnsupportedFormat,

    /// The header was recognized but could not be read.
    #[error("Corrupted or incomplete image file: {0}")]
    Corrupted(String),

    /// Failure reported by the host's own loader.
    #[error("Image source error: {0}")]
    Source(String),
}

/// Where to read a photo from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Encoded image bytes (JPEG, PNG or GIF).
    Bytes(Vec<u8>),
    /// A data URL, or a bare base64 payload.
    DataUrl(String),
}

impl ImageReference {
    /// Decoded image bytes for this reference.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ImageLoadError> {
        match self {
            ImageReference::Bytes(bytes) => Ok(bytes.clone()),
            ImageReference::DataUrl(url) => decode_data_url(url),
        }
    }
}

/// Decode the payload of a data URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ImageLoadError> {
    let url = url.trim();
    let payload = match url.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| ImageLoadError::InvalidDataUrl("missing ',' separator".into()))?;
            if !header.split(';').any(|part| part == "base64") {
                return Err(ImageLoadError::InvalidDataUrl(
                    "only base64 payloads are supported".into(),
                ));
            }
            payload
        }
        None => url,
    };

    if payload.is_empty() {
        return Err(ImageLoadError::Empty);
    }
    Ok(STANDARD.decode(payload)?)
}

/// Read the pixel dimensions of an encoded image without decoding pixels.
pub fn probe_metrics(bytes: &[u8]) -> Result<ImageMetrics, ImageLoadError> {
    if bytes.is_empty() {
        return Err(ImageLoadError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageLoadError::Corrupted(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ImageLoadError::UnsupportedFormat);
    }

    let dims = reader
        .into_dimensions()
        .map_err(|e| ImageLoadError::Corrupted(e.to_string()))?;

    Ok(ImageMetrics::from(dims))
}

/// Something that can turn an [`ImageReference`] into [`ImageMetrics`].
///
/// The editor runs on a single event loop, so implementations need not be
/// `Send`.
#[async_trait(?Send)]
pub trait ImageSource {
    async fn load(&self, reference: &ImageReference) -> Result<ImageMetrics, ImageLoadError>;
}

/// Loads metrics by probing the image header in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingSource;

#[async_trait(?Send)]
impl ImageSource for DecodingSource {
    async fn load(&self, reference: &ImageReference) -> Result<ImageMetrics, ImageLoadError> {
        let bytes = reference.to_bytes()?;
        probe_metrics(&bytes)
    }
}

/// Generation counter identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(pub u64);

/// A load that has been requested but not yet run.
#[derive(Debug, Clone)]
pub struct PendingLoad {
    /// Generation that requested the load.
    pub token: LoadToken,
    /// Photo to load.
    pub reference: ImageReference,
}

impl PendingLoad {
    pub fn new(token: LoadToken, reference: ImageReference) -> Self {
        Self { token, reference }
    }

    /// Run the load against `source`, keeping the token with the result.
    pub async fn resolve<S: ImageSource + ?Sized>(self, source: &S) -> CompletedLoad {
        let result = source.load(&self.reference).await;
        CompletedLoad {
            token: self.token,
            result,
        }
    }
}

/// The result of a load, tagged with the generation that requested it.
#[derive(Debug)]
pub struct CompletedLoad {
    /// Generation that requested the load.
    pub token: LoadToken,
    /// Measured dimensions, or why they could not be read.
    pub result: Result<ImageMetrics, ImageLoadError>,
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The load was current and its metrics are now in use.
    Applied,
    /// A newer load had been requested; the result was dropped.
    Stale,
}
