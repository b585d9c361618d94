//! Render options.
//!
//! Every struct here deserializes from the camelCase JSON shape used by the
//! `qr-code-styling` family of libraries, so a configuration like
//!
//! ```json
//! { "width": 300, "dotsOptions": { "type": "rounded", "color": "#4267b2" } }
//! ```
//!
//! can be fed straight into [`RenderOptions::from_json`]. Missing fields take the
//! documented defaults.

use serde::{Deserialize, Serialize};

use crate::error::{QrStyleError, Result};

/// Shape used for ordinary data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "kebab-case")]
pub enum DotType {
    #[default]
    Square,
    Dots,
    Rounded,
    ExtraRounded,
    Classy,
    ClassyRounded,
}

impl From<&str> for DotType {
    fn from(value: &str) -> Self {
        match value {
            "dots" => DotType::Dots,
            "rounded" => DotType::Rounded,
            "extra-rounded" => DotType::ExtraRounded,
            "classy" => DotType::Classy,
            "classy-rounded" => DotType::ClassyRounded,
            _ => DotType::Square,
        }
    }
}

impl From<String> for DotType {
    fn from(value: String) -> Self {
        DotType::from(value.as_str())
    }
}

/// Shape of the 7x7 outer ring of a finder pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "kebab-case")]
pub enum CornerSquareType {
    #[default]
    Dot,
    Square,
    ExtraRounded,
}

impl From<&str> for CornerSquareType {
    fn from(value: &str) -> Self {
        match value {
            "square" => CornerSquareType::Square,
            "extra-rounded" => CornerSquareType::ExtraRounded,
            _ => CornerSquareType::Dot,
        }
    }
}

impl From<String> for CornerSquareType {
    fn from(value: String) -> Self {
        CornerSquareType::from(value.as_str())
    }
}

/// Shape of the 3x3 inner dot of a finder pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "kebab-case")]
pub enum CornerDotType {
    #[default]
    Dot,
    Square,
}

impl From<&str> for CornerDotType {
    fn from(value: &str) -> Self {
        match value {
            "square" => CornerDotType::Square,
            _ => CornerDotType::Dot,
        }
    }
}

impl From<String> for CornerDotType {
    fn from(value: String) -> Self {
        CornerDotType::from(value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient, in `[0, 1]`.
    pub offset: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self { offset, color: color.into() }
    }
}

/// A linear or radial gradient. `rotation` is in radians and only affects linear gradients.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientType,
    pub rotation: f64,
    pub color_stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn linear(rotation: f64, color_stops: Vec<ColorStop>) -> Self {
        Self { kind: GradientType::Linear, rotation, color_stops }
    }

    pub fn radial(color_stops: Vec<ColorStop>) -> Self {
        Self { kind: GradientType::Radial, rotation: 0.0, color_stops }
    }
}

/// The fill resolved for one paintable region. A gradient wins over a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint<'a> {
    Color(&'a str),
    Gradient(&'a Gradient),
}

fn resolve_paint<'a>(color: &'a Option<String>, gradient: &'a Option<Gradient>) -> Option<Paint<'a>> {
    match (gradient, color) {
        (Some(gradient), _) => Some(Paint::Gradient(gradient)),
        (None, Some(color)) => Some(Paint::Color(color)),
        (None, None) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DotsOptions {
    #[serde(rename = "type")]
    pub kind: DotType,
    pub color: Option<String>,
    pub gradient: Option<Gradient>,
}

impl Default for DotsOptions {
    fn default() -> Self {
        Self { kind: DotType::Square, color: Some("#000".to_string()), gradient: None }
    }
}

impl DotsOptions {
    pub fn paint(&self) -> Option<Paint<'_>> {
        resolve_paint(&self.color, &self.gradient)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundOptions {
    pub color: Option<String>,
    pub gradient: Option<Gradient>,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self { color: Some("#fff".to_string()), gradient: None }
    }
}

impl BackgroundOptions {
    pub fn paint(&self) -> Option<Paint<'_>> {
        resolve_paint(&self.color, &self.gradient)
    }
}

/// Finder ring options. With `kind` unset the ring is drawn from module dots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornersSquareOptions {
    #[serde(rename = "type")]
    pub kind: Option<CornerSquareType>,
    pub color: Option<String>,
    pub gradient: Option<Gradient>,
}

impl CornersSquareOptions {
    pub fn paint(&self) -> Option<Paint<'_>> {
        resolve_paint(&self.color, &self.gradient)
    }
}

/// Finder center options. With `kind` unset the center is drawn from module dots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornersDotOptions {
    #[serde(rename = "type")]
    pub kind: Option<CornerDotType>,
    pub color: Option<String>,
    pub gradient: Option<Gradient>,
}

impl CornersDotOptions {
    pub fn paint(&self) -> Option<Paint<'_>> {
        resolve_paint(&self.color, &self.gradient)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageOptions {
    /// Skip the modules underneath the logo.
    pub hide_background_dots: bool,
    /// Fraction of the error-correction budget the logo may cover, in `[0, 1]`.
    pub image_size: f64,
    /// Forwarded to the image loader.
    pub cross_origin: Option<String>,
    /// Padding in pixels between the hidden region and the drawn logo.
    pub margin: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self { hide_background_dots: true, image_size: 0.4, cross_origin: None, margin: 0 }
    }
}

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    M,
    #[default]
    Q,
    H,
}

impl ErrorCorrectionLevel {
    /// Share of the symbol that can be obscured while it still scans.
    pub fn safe_fraction(self) -> f64 {
        match self {
            ErrorCorrectionLevel::L => 0.07,
            ErrorCorrectionLevel::M => 0.15,
            ErrorCorrectionLevel::Q => 0.25,
            ErrorCorrectionLevel::H => 0.30,
        }
    }
}

impl From<ErrorCorrectionLevel> for qrcode::EcLevel {
    fn from(level: ErrorCorrectionLevel) -> Self {
        match level {
            ErrorCorrectionLevel::L => qrcode::EcLevel::L,
            ErrorCorrectionLevel::M => qrcode::EcLevel::M,
            ErrorCorrectionLevel::Q => qrcode::EcLevel::Q,
            ErrorCorrectionLevel::H => qrcode::EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrOptions {
    /// Symbol version 1..=40, or 0 to pick the smallest that fits.
    pub type_number: u8,
    pub error_correction_level: ErrorCorrectionLevel,
}

/// Everything the composer needs to style one QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Symmetric margin in pixels.
    pub margin: u32,
    /// Logo source: a file path or a `data:` URI.
    pub image: Option<String>,
    pub dots_options: DotsOptions,
    pub background_options: BackgroundOptions,
    pub corners_square_options: CornersSquareOptions,
    pub corners_dot_options: CornersDotOptions,
    pub image_options: ImageOptions,
    pub qr_options: QrOptions,
    /// Swap the row/column to x/y mapping, matching symbols rendered by older releases.
    pub use_legacy_dot_rotation: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            margin: 0,
            image: None,
            dots_options: DotsOptions::default(),
            background_options: BackgroundOptions::default(),
            corners_square_options: CornersSquareOptions::default(),
            corners_dot_options: CornersDotOptions::default(),
            image_options: ImageOptions::default(),
            qr_options: QrOptions::default(),
            use_legacy_dot_rotation: false,
        }
    }
}

impl RenderOptions {
    /// Parses, sanitizes, and validates options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: RenderOptions = serde_json::from_str(json)?;
        let options = options.sanitized();
        options.validate()?;
        Ok(options)
    }

    /// Clamps fractions and offsets into range and zeroes non-finite rotations.
    pub fn sanitized(mut self) -> Self {
        let size = self.image_options.image_size;
        self.image_options.image_size = if size.is_finite() { size.clamp(0.0, 1.0) } else { 0.0 };

        for gradient in [
            &mut self.dots_options.gradient,
            &mut self.background_options.gradient,
            &mut self.corners_square_options.gradient,
            &mut self.corners_dot_options.gradient,
        ]
        .into_iter()
        .flatten()
        {
            if !gradient.rotation.is_finite() {
                gradient.rotation = 0.0;
            }
            for stop in &mut gradient.color_stops {
                stop.offset = if stop.offset.is_finite() { stop.offset.clamp(0.0, 1.0) } else { 0.0 };
            }
        }
        self
    }

    /// Rejects options that cannot be rendered.
    pub fn validate(&self) -> Result<()> {
        let gradients = [
            ("dotsOptions", &self.dots_options.gradient),
            ("backgroundOptions", &self.background_options.gradient),
            ("cornersSquareOptions", &self.corners_square_options.gradient),
            ("cornersDotOptions", &self.corners_dot_options.gradient),
        ];
        for (name, gradient) in gradients {
            if let Some(gradient) = gradient {
                if gradient.color_stops.is_empty() {
                    return Err(QrStyleError::InvalidOptions(format!(
                        "{name}.gradient has no color stops"
                    )));
                }
            }
        }
        if self.qr_options.type_number > 40 {
            return Err(QrStyleError::InvalidOptions(format!(
                "qrOptions.typeNumber must be between 0 and 40, got {}",
                self.qr_options.type_number
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!((options.width, options.height, options.margin), (300, 300, 0));
        assert_eq!(options.dots_options.paint(), Some(Paint::Color("#000")));
        assert_eq!(options.background_options.paint(), Some(Paint::Color("#fff")));
        assert_eq!(options.corners_square_options.kind, None);
        assert!(options.image_options.hide_background_dots);
        assert_eq!(options.qr_options.error_correction_level, ErrorCorrectionLevel::Q);
    }

    #[test]
    fn test_from_json_original_names() {
        let options = RenderOptions::from_json(
            r##"{
                "width": 210,
                "height": 240,
                "margin": 5,
                "image": "logo.png",
                "dotsOptions": { "type": "classy-rounded", "color": "#123ddd" },
                "cornersSquareOptions": { "type": "extra-rounded" },
                "cornersDotOptions": { "type": "square", "color": "#7de88e" },
                "imageOptions": { "crossOrigin": "anonymous", "margin": 30, "imageSize": 0.3 },
                "qrOptions": { "errorCorrectionLevel": "H" },
                "useLegacyDotRotation": true
            }"##,
        )
        .unwrap();
        assert_eq!((options.width, options.height, options.margin), (210, 240, 5));
        assert_eq!(options.dots_options.kind, DotType::ClassyRounded);
        assert_eq!(options.corners_square_options.kind, Some(CornerSquareType::ExtraRounded));
        assert_eq!(options.corners_dot_options.kind, Some(CornerDotType::Square));
        assert_eq!(options.image_options.cross_origin.as_deref(), Some("anonymous"));
        assert_eq!(options.image_options.margin, 30);
        assert!(options.image_options.hide_background_dots);
        assert_eq!(options.qr_options.error_correction_level, ErrorCorrectionLevel::H);
        assert!(options.use_legacy_dot_rotation);
        assert_eq!(options.background_options.paint(), Some(Paint::Color("#fff")));
    }

    #[test]
    fn test_unknown_types_fall_back() {
        let options = RenderOptions::from_json(
            r#"{
                "dotsOptions": { "type": "hexagon" },
                "cornersSquareOptions": { "type": "star" },
                "cornersDotOptions": { "type": "heart" }
            }"#,
        )
        .unwrap();
        assert_eq!(options.dots_options.kind, DotType::Square);
        assert_eq!(options.corners_square_options.kind, Some(CornerSquareType::Dot));
        assert_eq!(options.corners_dot_options.kind, Some(CornerDotType::Dot));
    }

    #[test]
    fn test_gradient_wins_over_color() {
        let dots = DotsOptions {
            kind: DotType::Dots,
            color: Some("#000".into()),
            gradient: Some(Gradient::radial(vec![ColorStop::new(0.0, "#f00")])),
        };
        assert!(matches!(dots.paint(), Some(Paint::Gradient(_))));
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut options = RenderOptions::default();
        options.image_options.image_size = 3.0;
        options.dots_options.gradient = Some(Gradient::linear(
            f64::NAN,
            vec![ColorStop::new(-1.0, "#000"), ColorStop::new(2.0, "#fff")],
        ));
        let options = options.sanitized();
        assert_eq!(options.image_options.image_size, 1.0);
        let gradient = options.dots_options.gradient.unwrap();
        assert_eq!(gradient.rotation, 0.0);
        assert_eq!(gradient.color_stops[0].offset, 0.0);
        assert_eq!(gradient.color_stops[1].offset, 1.0);
    }

    #[test]
    fn test_validate_rejects_empty_stops() {
        let err = RenderOptions::from_json(r#"{ "backgroundOptions": { "gradient": { "type": "radial" } } }"#)
            .unwrap_err();
        assert!(matches!(err, QrStyleError::InvalidOptions(_)));
        assert!(err.to_string().contains("backgroundOptions"));
    }

    #[test]
    fn test_safe_fractions_increase_with_level() {
        let levels = [
            ErrorCorrectionLevel::L,
            ErrorCorrectionLevel::M,
            ErrorCorrectionLevel::Q,
            ErrorCorrectionLevel::H,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0].safe_fraction() < pair[1].safe_fraction());
        }
    }
}
