//! # qistyle
//!
//! A Rust library for rendering QR codes as styled vector graphics.
//!
//! `qistyle` takes the module matrix of an already-encoded QR code and draws it into an
//! SVG scene: module dots in one of several shapes, custom finder corners, solid or
//! gradient fills, and an optional centered logo that keeps the code scannable by only
//! hiding as many modules as the error correction level can recover.
//!
//! ## Features
//!
//! - Six module dot styles: square, dots, rounded, extra-rounded, classy, classy-rounded.
//! - Finder rings and centers drawn as dots, squares or extra-rounded shapes.
//! - Linear and radial gradients for the background, the modules and each corner.
//! - Logo embedding with automatic sizing against the error correction budget.
//! - Output as SVG markup, PNG or JPEG bytes, or in-memory image buffers.
//! - Options readable from JSON in the familiar `dotsOptions` / `cornersSquareOptions` shape.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qistyle = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a code with rounded dots and a gradient:
//!
//! ```rust
//! use qistyle::{ColorStop, DotType, Gradient, QrSvg, RenderOptions};
//! use qistyle::helper::encode;
//!
//! let qr = encode("https://example.com", qistyle::ErrorCorrectionLevel::H, 0).unwrap();
//!
//! let mut options = RenderOptions::default();
//! options.dots_options.kind = DotType::Rounded;
//! options.dots_options.gradient = Some(Gradient::linear(
//!     0.0,
//!     vec![ColorStop::new(0.0, "#4267b2"), ColorStop::new(1.0, "#e9ebee")],
//! ));
//!
//! let mut renderer = QrSvg::new();
//! let svg = renderer.render(&qr, options).unwrap().to_svg();
//! assert!(svg.contains("linearGradient"));
//! ```
//!
//! Options can also come from JSON:
//!
//! ```rust
//! use qistyle::helper::generate_svg_string;
//! use qistyle::RenderOptions;
//!
//! let options = RenderOptions::from_json(
//!     r##"{ "width": 240, "height": 240, "dotsOptions": { "type": "classy", "color": "#222" } }"##,
//! ).unwrap();
//! let svg = generate_svg_string("Hello, World!", Some(options)).unwrap();
//! assert!(svg.starts_with("<svg width=\"240\""));
//! ```
//!
//! ## Modules
//!
//! - [`composer`]: The [`QrSvg`] renderer and its layout.
//! - [`options`]: Rendering options.
//! - [`figures`]: Shapes for module dots and finder corners.
//! - [`scene`]: The rendered vector scene and its SVG serialization.
//! - [`export`]: SVG, PNG and JPEG output.
//! - [`helper`]: One-call utilities from text to styled output.

pub mod composer;
pub mod error;
pub mod export;
pub mod figures;
pub mod gradient;
pub mod helper;
pub mod image_size;
pub mod loader;
pub mod mask;
pub mod matrix;
pub mod options;
pub mod scene;

pub use composer::{Layout, QrSvg};
pub use error::{QrStyleError, ResourceError, Result};
pub use export::ExportFormat;
pub use loader::{DefaultImageLoader, ImageLoader, LoadedImage};
pub use matrix::{BitMatrix, ModuleMatrix};
pub use options::{
    BackgroundOptions, ColorStop, CornerDotType, CornerSquareType, CornersDotOptions, CornersSquareOptions,
    DotType, DotsOptions, ErrorCorrectionLevel, Gradient, GradientType, ImageOptions, QrOptions, RenderOptions,
};
pub use scene::Scene;
