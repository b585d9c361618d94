//! Logo loading.
//!
//! The composer needs two things from a logo: its intrinsic size (to reserve a
//! footprint) and an embeddable representation (to inline it into the SVG). Both
//! come from an [`ImageLoader`].

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use tracing::{debug, trace};

use crate::error::ResourceError;

/// A decoded logo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl LoadedImage {
    /// Sniffs the format of `bytes` and reads the intrinsic size.
    ///
    /// Raster formats go through `image`; SVG documents are measured with `usvg`.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ResourceError> {
        if looks_like_svg(&bytes) {
            let tree = usvg::Tree::from_data(&bytes, &usvg::Options::default())
                .map_err(|e| ResourceError::Svg(e.to_string()))?;
            let size = tree.size();
            return Ok(Self {
                width: size.width().ceil() as u32,
                height: size.height().ceil() as u32,
                mime: "image/svg+xml".to_string(),
                bytes,
            });
        }

        let reader = image::ImageReader::new(Cursor::new(&bytes)).with_guessed_format()?;
        let mime = reader
            .format()
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let (width, height) = reader.into_dimensions()?;
        Ok(Self { width, height, mime, bytes })
    }

    /// Inline `data:` URI for embedding into the SVG.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Resolves a logo source into a [`LoadedImage`].
pub trait ImageLoader {
    /// `cross_origin` is the configured cross-origin mode, for loaders that fetch remotely.
    fn load(&self, src: &str, cross_origin: Option<&str>) -> Result<LoadedImage, ResourceError>;
}

/// Loads `data:` URIs and local files.
///
/// Relative paths resolve against `base_dir` when one is set. Remote URLs are
/// rejected; plug in another [`ImageLoader`] to fetch them.
#[derive(Debug, Clone, Default)]
pub struct DefaultImageLoader {
    base_dir: Option<PathBuf>,
}

impl DefaultImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: Some(base_dir.into()) }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for DefaultImageLoader {
    fn load(&self, src: &str, cross_origin: Option<&str>) -> Result<LoadedImage, ResourceError> {
        if let Some(mode) = cross_origin {
            trace!(mode, "cross-origin mode has no effect on local sources");
        }

        let image = if let Some(data) = src.strip_prefix("data:") {
            LoadedImage::from_bytes(decode_data_uri(data)?)?
        } else if src.starts_with("http://") || src.starts_with("https://") {
            return Err(ResourceError::Unsupported(format!(
                "{src}: remote images need a network-capable loader"
            )));
        } else {
            let path = self.resolve(src.strip_prefix("file://").unwrap_or(src));
            LoadedImage::from_bytes(std::fs::read(&path)?)?
        };

        debug!(width = image.width, height = image.height, mime = %image.mime, "loaded logo");
        Ok(image)
    }
}

/// Decodes the part of a data URI after `data:`.
fn decode_data_uri(data: &str) -> Result<Vec<u8>, ResourceError> {
    let (meta, payload) = data
        .split_once(',')
        .ok_or_else(|| ResourceError::Unsupported("data URI without payload".to_string()))?;
    if meta.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
    } else {
        Ok(percent_decode(payload))
    }
}

fn percent_decode(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}
