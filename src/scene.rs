//! The vector scene produced by a render.
//!
//! A [`Scene`] is plain owned data: it can be inspected, serialized with serde, or
//! written out as SVG markup with [`Scene::to_svg`]. The composer builds a fresh
//! scene on every render and never patches an old one.

use std::fmt::Write;

use serde::Serialize;

use crate::gradient::GradientGeometry;
use crate::options::ColorStop;

/// Rigid rotation about a point, in degrees (SVG `rotate(deg, cx, cy)`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rotation {
    pub degrees: f64,
    pub cx: f64,
    pub cy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    Circle { cx: f64, cy: f64, r: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    /// SVG path data. `even_odd` sets `clip-rule="evenodd"` so rings keep their hole when clipping.
    Path { d: String, even_odd: bool },
}

/// One drawn figure: a shape plus an optional rotation about its own center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub shape: Shape,
    pub rotation: Option<Rotation>,
}

impl Figure {
    pub fn new(shape: Shape) -> Self {
        Self { shape, rotation: None }
    }

    /// Rotates by `radians` about `(cx, cy)`. A zero angle leaves the figure untransformed.
    pub fn rotated(mut self, radians: f64, cx: f64, cy: f64) -> Self {
        self.rotation = if radians == 0.0 || !radians.is_finite() {
            None
        } else {
            let degrees = radians.to_degrees();
            // Corner rotations are right angles; keep them integral in the markup.
            let snapped = degrees.round();
            let degrees = if (degrees - snapped).abs() < 1e-9 { snapped } else { degrees };
            Some(Rotation { degrees, cx, cy })
        };
        self
    }
}

/// A `.class { fill: color }` rule scoped to the scene's uid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub class: String,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientDef {
    pub id: String,
    pub geometry: GradientGeometry,
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Def {
    ClipPath { id: String, figures: Vec<Figure> },
    Gradient(GradientDef),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Fill {
    Color(String),
    /// Reference to a gradient definition by id.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectNode {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Fill>,
    pub clip_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageNode {
    /// Inline `data:` URI.
    pub href: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Rect(RectNode),
    Group { class: String, figures: Vec<Figure> },
    Image(ImageNode),
}

/// Where the figures of one paintable region end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A clip path in `defs`, revealed through a gradient-filled rect.
    ClipPath(usize),
    /// A class group in the body, filled by a style rule.
    Group(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub uid: String,
    pub width: u32,
    pub height: u32,
    pub styles: Vec<StyleRule>,
    pub defs: Vec<Def>,
    pub children: Vec<Node>,
}

impl Scene {
    pub fn new(uid: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            uid: uid.into(),
            width,
            height,
            styles: Vec::new(),
            defs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn push_style(&mut self, class: impl Into<String>, fill: impl Into<String>) {
        self.styles.push(StyleRule { class: class.into(), fill: fill.into() });
    }

    pub fn push_clip_path(&mut self, id: impl Into<String>) -> Target {
        self.defs.push(Def::ClipPath { id: id.into(), figures: Vec::new() });
        Target::ClipPath(self.defs.len() - 1)
    }

    pub fn push_group(&mut self, class: impl Into<String>) -> Target {
        self.children.push(Node::Group { class: class.into(), figures: Vec::new() });
        Target::Group(self.children.len() - 1)
    }

    pub fn push_gradient(&mut self, gradient: GradientDef) {
        self.defs.push(Def::Gradient(gradient));
    }

    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Appends a figure to a clip path or group created by this scene.
    pub fn append(&mut self, target: Target, figure: Figure) {
        let figures = match target {
            Target::ClipPath(index) => match self.defs.get_mut(index) {
                Some(Def::ClipPath { figures, .. }) => figures,
                _ => return,
            },
            Target::Group(index) => match self.children.get_mut(index) {
                Some(Node::Group { figures, .. }) => figures,
                _ => return,
            },
        };
        figures.push(figure);
    }

    /// Figures collected under `target`.
    pub fn figures(&self, target: Target) -> &[Figure] {
        match target {
            Target::ClipPath(index) => match self.defs.get(index) {
                Some(Def::ClipPath { figures, .. }) => figures,
                _ => &[],
            },
            Target::Group(index) => match self.children.get(index) {
                Some(Node::Group { figures, .. }) => figures,
                _ => &[],
            },
        }
    }

    /// Serializes the scene as SVG markup.
    ///
    /// The output only depends on the scene's contents, so two identical scenes
    /// produce identical bytes.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let uid = escape(&self.uid);
        let _ = write!(
            out,
            "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" \
             xmlns:xlink=\"http://www.w3.org/1999/xlink\" data-internal-uid=\"{}\">",
            self.width, self.height, uid
        );

        out.push_str("<style>");
        for rule in &self.styles {
            // Style content is text, so only `<` and `&` need care here.
            let _ = write!(
                out,
                "[data-internal-uid=\"{}\"] .{}{{ fill: {}; }}",
                uid,
                escape(&rule.class),
                escape(&rule.fill)
            );
        }
        out.push_str("</style>");

        out.push_str("<defs>");
        for def in &self.defs {
            match def {
                Def::ClipPath { id, figures } => {
                    let _ = write!(out, "<clipPath id=\"{}\">", escape(id));
                    for figure in figures {
                        write_figure(&mut out, figure);
                    }
                    out.push_str("</clipPath>");
                }
                Def::Gradient(gradient) => write_gradient(&mut out, gradient),
            }
        }
        out.push_str("</defs>");

        for node in &self.children {
            match node {
                Node::Rect(rect) => {
                    let _ = write!(
                        out,
                        "<rect x=\"{}\" y=\"{}\" height=\"{}\" width=\"{}\"",
                        num(rect.x),
                        num(rect.y),
                        num(rect.height),
                        num(rect.width)
                    );
                    if let Some(clip) = &rect.clip_path {
                        let _ = write!(out, " clip-path=\"url(#{})\"", escape(clip));
                    }
                    match &rect.fill {
                        Some(Fill::Color(color)) => {
                            let _ = write!(out, " fill=\"{}\"", escape(color));
                        }
                        Some(Fill::Url(id)) => {
                            let _ = write!(out, " fill=\"url(#{})\"", escape(id));
                        }
                        None => {}
                    }
                    out.push_str("/>");
                }
                Node::Group { class, figures } => {
                    let _ = write!(out, "<g class=\"{}\">", escape(class));
                    for figure in figures {
                        write_figure(&mut out, figure);
                    }
                    out.push_str("</g>");
                }
                Node::Image(image) => {
                    let href = escape(&image.href);
                    let _ = write!(
                        out,
                        "<image href=\"{href}\" xlink:href=\"{href}\" \
                         x=\"{}\" y=\"{}\" width=\"{}px\" height=\"{}px\"/>",
                        num(image.x),
                        num(image.y),
                        num(image.width),
                        num(image.height)
                    );
                }
            }
        }

        out.push_str("</svg>");
        out
    }
}

fn write_figure(out: &mut String, figure: &Figure) {
    match &figure.shape {
        Shape::Circle { cx, cy, r } => {
            let _ = write!(out, "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"", num(*cx), num(*cy), num(*r));
        }
        Shape::Rect { x, y, width, height } => {
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                num(*x),
                num(*y),
                num(*width),
                num(*height)
            );
        }
        Shape::Path { d, even_odd } => {
            out.push_str("<path");
            if *even_odd {
                out.push_str(" clip-rule=\"evenodd\"");
            }
            let _ = write!(out, " d=\"{}\"", escape(d));
        }
    }
    if let Some(rotation) = figure.rotation {
        let _ = write!(
            out,
            " transform=\"rotate({},{},{})\"",
            num(rotation.degrees),
            num(rotation.cx),
            num(rotation.cy)
        );
    }
    out.push_str("/>");
}

fn write_gradient(out: &mut String, gradient: &GradientDef) {
    let id = escape(&gradient.id);
    let tag = match gradient.geometry {
        GradientGeometry::Linear { x1, y1, x2, y2 } => {
            let _ = write!(
                out,
                "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">",
                num(x1),
                num(y1),
                num(x2),
                num(y2)
            );
            "linearGradient"
        }
        GradientGeometry::Radial { cx, cy, fx, fy, r } => {
            let _ = write!(
                out,
                "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" \
                 fx=\"{}\" fy=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\">",
                num(fx),
                num(fy),
                num(cx),
                num(cy),
                num(r)
            );
            "radialGradient"
        }
    };
    for stop in &gradient.stops {
        let _ = write!(
            out,
            "<stop offset=\"{}%\" stop-color=\"{}\"/>",
            num(100.0 * stop.offset),
            escape(&stop.color)
        );
    }
    let _ = write!(out, "</{tag}>");
}

/// Shortest decimal form of a coordinate, with negative zero printed as `0`.
pub(crate) fn num(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
