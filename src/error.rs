//! Error types.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = QrStyleError> = std::result::Result<T, E>;

/// Errors that abort a render or an export.
#[derive(Debug, Error)]
pub enum QrStyleError {
    /// The module matrix does not fit into the canvas once the margin is removed.
    #[error("the canvas is too small: {count} modules do not fit into {available}px")]
    CanvasTooSmall { count: usize, available: u32 },

    /// The options failed validation (for example a gradient without color stops).
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// `update` or `export` was called before the first `render`.
    #[error("nothing has been rendered yet")]
    NotRendered,

    /// The QR encoder rejected the payload.
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// Rasterizing or encoding the output failed.
    #[error("failed to export: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while fetching or decoding the logo image.
///
/// These never abort a render: the composer logs them and continues without the logo.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to parse SVG image: {0}")]
    Svg(String),

    /// The source cannot be handled by this loader.
    #[error("unsupported image source: {0}")]
    Unsupported(String),
}
