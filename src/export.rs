//! Serializing a rendered scene.
//!
//! SVG output is the scene's own markup. Raster formats parse that markup with
//! `usvg`, draw it with `resvg`, and encode the pixels with `image`.

use std::io::Cursor;
use std::str::FromStr;

use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::tiny_skia;

use crate::error::{QrStyleError, Result};
use crate::scene::Scene;

/// Output formats understood by [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            other => Err(QrStyleError::Export(format!("unsupported format `{other}`"))),
        }
    }
}

/// Serializes `scene` into the bytes of `format`.
pub fn export(scene: &Scene, format: ExportFormat) -> Result<Vec<u8>> {
    let image = match format {
        ExportFormat::Svg => return Ok(scene.to_svg().into_bytes()),
        ExportFormat::Png => DynamicImage::ImageRgba8(rasterize(scene)?),
        // JPEG has no alpha channel.
        ExportFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rasterize(scene)?).into_rgb8()),
    };
    let image_format = match format {
        ExportFormat::Jpeg => ImageFormat::Jpeg,
        _ => ImageFormat::Png,
    };
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image_format)
        .map_err(|e| QrStyleError::Export(e.to_string()))?;
    Ok(buf)
}

/// Draws `scene` into an RGBA image of the scene's size.
pub fn rasterize(scene: &Scene) -> Result<RgbaImage> {
    let pixmap = rasterize_pixmap(scene)?;
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| QrStyleError::Export("pixel buffer does not match the canvas".to_string()))
}

fn rasterize_pixmap(scene: &Scene) -> Result<tiny_skia::Pixmap> {
    let tree = usvg::Tree::from_str(&scene.to_svg(), &usvg::Options::default())
        .map_err(|e| QrStyleError::Export(e.to_string()))?;
    let mut pixmap = tiny_skia::Pixmap::new(scene.width, scene.height)
        .ok_or_else(|| QrStyleError::Export(format!("cannot allocate a {}x{} canvas", scene.width, scene.height)))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}
