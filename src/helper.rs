use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbaImage;
use qrcode::{QrCode, Version};
use tracing::info;

use crate::composer::QrSvg;
use crate::error::{QrStyleError, Result};
use crate::export::{self, ExportFormat};
use crate::options::{ErrorCorrectionLevel, RenderOptions};

/*---- Utilities ----*/

/// Encodes `content` into a QR code.
///
/// A `type_number` of 0 picks the smallest version that fits.
///
/// # Errors
///
/// Returns [`QrStyleError::Encode`] when the data does not fit the requested version.
///
/// # Example
///
/// ```rust
/// use qistyle::{helper::encode, ErrorCorrectionLevel, ModuleMatrix};
///
/// let qr = encode("HELLO WORLD", ErrorCorrectionLevel::Q, 0).unwrap();
/// assert_eq!(qr.module_count(), 21);
/// ```
pub fn encode(content: &str, level: ErrorCorrectionLevel, type_number: u8) -> Result<QrCode> {
    let qr = if type_number == 0 {
        QrCode::with_error_correction_level(content, level.into())?
    } else {
        QrCode::with_version(content, Version::Normal(i16::from(type_number)), level.into())?
    };
    Ok(qr)
}

fn render(content: &str, options: Option<RenderOptions>) -> Result<QrSvg> {
    let options = options.unwrap_or_default();
    let qr = encode(
        content,
        options.qr_options.error_correction_level,
        options.qr_options.type_number,
    )?;
    let mut svg = QrSvg::new();
    svg.render(&qr, options)?;
    Ok(svg)
}

/// Generates a styled QR code SVG from the provided content.
///
/// # Arguments
///
/// * `content` - The content to encode into the QR code.
/// * `options` - Optional. Rendering options. Defaults to a 300x300 black-on-white code.
///
/// # Example
///
/// ```rust
/// use qistyle::helper::generate_svg_string;
///
/// let svg = generate_svg_string("Hello, World!", None).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn generate_svg_string(content: &str, options: Option<RenderOptions>) -> Result<String> {
    render(content, options)?.to_svg()
}

/// Generates a styled QR code as PNG bytes.
///
/// # Example
///
/// ```rust
/// use qistyle::helper::generate_png;
///
/// let png = generate_png("Hello, World!", None).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn generate_png(content: &str, options: Option<RenderOptions>) -> Result<Vec<u8>> {
    render(content, options)?.export(ExportFormat::Png)
}

/// Generates a styled QR code as an in-memory RGBA image.
///
/// # Example
///
/// ```rust
/// use qistyle::helper::generate_image_buffer;
///
/// let img = generate_image_buffer("Hello, World!", None).unwrap();
/// assert_eq!(img.dimensions(), (300, 300));
/// ```
pub fn generate_image_buffer(content: &str, options: Option<RenderOptions>) -> Result<RgbaImage> {
    let svg = render(content, options)?;
    let scene = svg.scene().ok_or(QrStyleError::NotRendered)?;
    export::rasterize(scene)
}

/// Generates a styled QR code and saves it to a file.
///
/// # Arguments
///
/// * `content` - The content to encode into the QR code.
/// * `options` - Optional. Rendering options.
/// * `format` - The file format; also decides the file extension.
/// * `directory` - Optional. The directory path where the file will be saved.
///   If not provided, the default directory is "generated".
/// * `filename` - Optional. The name of the file without extension.
///   If not provided, a timestamp-based filename will be used.
///
/// # Returns
///
/// The path of the written file.
///
/// # Example
///
/// ```rust,no_run
/// use qistyle::{helper::save, ExportFormat};
///
/// let path = save("Hello, World!", None, ExportFormat::Png, Some("images"), Some("qr_code")).unwrap();
/// println!("{}", path.display());
/// ```
pub fn save(
    content: &str,
    options: Option<RenderOptions>,
    format: ExportFormat,
    directory: Option<&str>,
    filename: Option<&str>,
) -> Result<PathBuf> {
    let bytes = render(content, options)?.export(format)?;

    let directory = directory.unwrap_or("generated");
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let since_the_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            since_the_epoch.as_millis().to_string()
        }
    };

    // Check if the directory exists, create it if it doesn't
    if !Path::new(directory).exists() {
        fs::create_dir_all(directory)?;
    }

    let path = Path::new(directory).join(format!("{}.{}", filename, format.extension()));
    fs::write(&path, bytes)?;
    info!(path = %path.display(), "saved QR code");
    Ok(path)
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::ModuleMatrix;
    use crate::options::DotType;

    #[test]
    fn test_encode_versions() {
        let auto = encode("HELLO WORLD", ErrorCorrectionLevel::L, 0).unwrap();
        assert_eq!(auto.module_count(), 21);

        let fixed = encode("HELLO WORLD", ErrorCorrectionLevel::L, 5).unwrap();
        assert_eq!(fixed.module_count(), 37);

        let too_long = "x".repeat(200);
        assert!(matches!(encode(&too_long, ErrorCorrectionLevel::H, 1), Err(QrStyleError::Encode(_))));
    }

    #[test]
    fn test_generate_svg_string() {
        let mut options = RenderOptions::default();
        options.dots_options.kind = DotType::Rounded;
        let svg = generate_svg_string("Hello, world!", Some(options)).unwrap();
        assert!(svg.starts_with("<svg width=\"300\" height=\"300\""));
        assert!(svg.contains("<path"));
    }

    #[test]
    fn test_generate_image_buffer() {
        let options = RenderOptions { width: 116, height: 116, margin: 8, ..Default::default() };
        let img = generate_image_buffer("Hello, world!", Some(options)).unwrap();
        assert_eq!(img.dimensions(), (116, 116));
        // Margin stays background, the top-left finder is dark.
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(10, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_save_writes_file() {
        let dir = std::env::temp_dir().join(format!("qistyle-helper-{}", std::process::id()));
        let dir_str = dir.to_str().unwrap();
        let path = save("Hello, world!", None, ExportFormat::Svg, Some(dir_str), Some("qr")).unwrap();
        assert_eq!(path, dir.join("qr.svg"));
        assert!(fs::read_to_string(&path).unwrap().starts_with("<svg"));

        let named = save("Hello, world!", None, ExportFormat::Png, Some(dir_str), None).unwrap();
        assert_eq!(named.extension().and_then(|e| e.to_str()), Some("png"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
