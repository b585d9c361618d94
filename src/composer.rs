//! The canvas composer.
//!
//! [`QrSvg`] turns a module matrix and a set of [`RenderOptions`] into a [`Scene`].
//! Every render runs the same linear stages on a brand-new scene:
//!
//! 1. lay out the module grid inside the canvas,
//! 2. load and size the logo, if one is configured,
//! 3. draw the background,
//! 4. draw ordinary modules, skipping finder patterns and the logo region,
//! 5. draw the three finder corners,
//! 6. place the logo.
//!
//! All of this happens under `&mut self`, so one instance can never run two renders
//! at once.

use std::f64::consts::FRAC_PI_2;
use std::sync::atomic::{AtomicUsize, Ordering};

use kurbo::Rect;
use tracing::{debug, trace, warn};

use crate::error::{QrStyleError, Result};
use crate::export::{self, ExportFormat};
use crate::figures::{self, DrawArgs, FigureKind};
use crate::gradient::compute_gradient;
use crate::image_size::{calculate_image_size, max_hidden_axis_dots, max_hidden_dots, DrawImageSize};
use crate::loader::{DefaultImageLoader, ImageLoader, LoadedImage};
use crate::mask::{mask_at, DotMask, DOT_MASK, SQUARE_MASK};
use crate::matrix::{BitMatrix, ModuleMatrix};
use crate::options::{Paint, RenderOptions};
use crate::scene::{Fill, GradientDef, ImageNode, Node, RectNode, Scene, Target};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Finder corners as `(column, row, rotation)`: top-left, top-right, bottom-left.
const CORNERS: [(usize, usize, f64); 3] = [(0, 0, 0.0), (1, 0, FRAC_PI_2), (0, 1, -FRAC_PI_2)];

/// Pixel placement of the module grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub count: usize,
    /// Edge length of one module in whole pixels.
    pub dot_size: f64,
    /// Left edge of the grid.
    pub x_beginning: f64,
    /// Top edge of the grid.
    pub y_beginning: f64,
}

impl Layout {
    /// Centers a `count` x `count` grid of whole-pixel modules inside the canvas.
    pub fn compute(width: u32, height: u32, margin: u32, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(QrStyleError::InvalidOptions("the module matrix is empty".to_string()));
        }
        let available = i64::from(width.min(height)) - 2 * i64::from(margin);
        if available < count as i64 {
            return Err(QrStyleError::CanvasTooSmall {
                count,
                available: available.max(0) as u32,
            });
        }
        let dot_size = (available / count as i64) as f64;
        let grid = count as f64 * dot_size;
        Ok(Self {
            count,
            dot_size,
            x_beginning: ((f64::from(width) - grid) / 2.0).floor(),
            y_beginning: ((f64::from(height) - grid) / 2.0).floor(),
        })
    }

    /// Edge length of the whole grid in pixels.
    pub fn grid_size(&self) -> f64 {
        self.count as f64 * self.dot_size
    }

    pub fn grid_bounds(&self) -> Rect {
        Rect::new(
            self.x_beginning,
            self.y_beginning,
            self.x_beginning + self.grid_size(),
            self.y_beginning + self.grid_size(),
        )
    }
}

/// Renders styled QR codes into vector scenes.
///
/// ```rust
/// use qistyle::{BitMatrix, QrSvg, RenderOptions};
///
/// let matrix = BitMatrix::from_matrix(&qrcode::QrCode::new(b"hello").unwrap());
/// let mut qr = QrSvg::new();
/// let svg = qr.render(&matrix, RenderOptions::default()).unwrap().to_svg();
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Debug)]
pub struct QrSvg<L = DefaultImageLoader> {
    id: usize,
    loader: L,
    options: RenderOptions,
    matrix: Option<BitMatrix>,
    scene: Option<Scene>,
}

impl QrSvg<DefaultImageLoader> {
    pub fn new() -> Self {
        Self::with_loader(DefaultImageLoader::default())
    }
}

impl Default for QrSvg<DefaultImageLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ImageLoader> QrSvg<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            loader,
            options: RenderOptions::default(),
            matrix: None,
            scene: None,
        }
    }

    /// Identifier scoping this instance's styles and element ids. Stable across re-renders.
    pub fn uid(&self) -> String {
        format!("svg_qr_{}", self.id)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The most recent successful render.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Renders `matrix` with `options`, replacing any previous scene.
    pub fn render(&mut self, matrix: &dyn ModuleMatrix, options: RenderOptions) -> Result<&Scene> {
        self.matrix = Some(BitMatrix::from_matrix(matrix));
        self.options = options;
        self.redraw()
    }

    /// Re-renders the last matrix with new options.
    pub fn update(&mut self, options: RenderOptions) -> Result<&Scene> {
        if self.matrix.is_none() {
            return Err(QrStyleError::NotRendered);
        }
        self.options = options;
        self.redraw()
    }

    pub fn to_svg(&self) -> Result<String> {
        self.scene.as_ref().map(Scene::to_svg).ok_or(QrStyleError::NotRendered)
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let scene = self.scene.as_ref().ok_or(QrStyleError::NotRendered)?;
        export::export(scene, format)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(id = self.id))]
    fn redraw(&mut self) -> Result<&Scene> {
        self.scene = None;
        let options = self.options.clone().sanitized();
        options.validate()?;
        let matrix = self.matrix.as_ref().ok_or(QrStyleError::NotRendered)?;
        let scene = Painter::paint(self.uid(), &options, matrix, &self.loader)?;
        Ok(&*self.scene.insert(scene))
    }
}

/// One render pass. Owns the scene under construction.
struct Painter<'a, L> {
    options: &'a RenderOptions,
    matrix: &'a BitMatrix,
    loader: &'a L,
    layout: Layout,
    scene: Scene,
}

impl<'a, L: ImageLoader> Painter<'a, L> {
    fn paint(uid: String, options: &'a RenderOptions, matrix: &'a BitMatrix, loader: &'a L) -> Result<Scene> {
        let layout = Layout::compute(options.width, options.height, options.margin, matrix.module_count())?;
        debug!(
            count = layout.count,
            dot_size = layout.dot_size,
            x = layout.x_beginning,
            y = layout.y_beginning,
            "computed layout"
        );

        let mut painter = Painter {
            options,
            matrix,
            loader,
            layout,
            scene: Scene::new(uid, options.width, options.height),
        };

        let logo = painter.load_logo();
        let mut mask = DotMask::new(layout.count);
        if let Some((_, size)) = &logo {
            if options.image_options.hide_background_dots {
                mask = mask.with_hidden_region(size.hidden_columns as usize, size.hidden_rows as usize);
            }
        }

        painter.draw_background();
        let dots = painter.draw_dots(&mask);
        painter.draw_corners(dots);
        if let Some((image, size)) = logo {
            painter.draw_image(&image, size);
        }
        Ok(painter.scene)
    }

    fn load_logo(&self) -> Option<(LoadedImage, DrawImageSize)> {
        let src = self.options.image.as_deref().filter(|src| !src.is_empty())?;
        let image_options = &self.options.image_options;
        let image = match self.loader.load(src, image_options.cross_origin.as_deref()) {
            Ok(image) => image,
            Err(error) => {
                warn!(%error, "logo could not be loaded, rendering without it");
                return None;
            }
        };

        let count = self.layout.count;
        let max = max_hidden_dots(
            image_options.image_size,
            self.options.qr_options.error_correction_level,
            count,
        );
        let size = calculate_image_size(
            f64::from(image.width),
            f64::from(image.height),
            max,
            max_hidden_axis_dots(count),
            self.layout.dot_size,
        );
        debug!(
            max_hidden_dots = max,
            hidden_columns = size.hidden_columns,
            hidden_rows = size.hidden_rows,
            width = size.width,
            height = size.height,
            "sized logo"
        );
        if size.is_empty() {
            return None;
        }
        Some((image, size))
    }

    /// Module row/column to display row/column. The legacy mapping is a transpose,
    /// so the same function maps back.
    fn to_display(&self, row: usize, col: usize) -> (usize, usize) {
        if self.options.use_legacy_dot_rotation {
            (col, row)
        } else {
            (row, col)
        }
    }

    fn is_dark_at_display(&self, row: usize, col: usize) -> bool {
        let (row, col) = self.to_display(row, col);
        self.matrix.is_dark(row, col)
    }

    /// Sets up where a region's figures go. Regions without their own paint reuse `inherit`.
    fn region(
        &mut self,
        paint: Option<Paint<'_>>,
        name: &str,
        bounds: Rect,
        rotation: f64,
        inherit: Option<Target>,
    ) -> Target {
        match (paint, inherit) {
            (Some(Paint::Gradient(gradient)), _) => {
                let id = format!("{}-{}", self.scene.uid, name);
                let clip_id = format!("{}-clip-path-{}", self.scene.uid, name);
                let target = self.scene.push_clip_path(clip_id.clone());
                self.scene.push_gradient(GradientDef {
                    id: id.clone(),
                    geometry: compute_gradient(gradient, bounds, rotation),
                    stops: gradient.color_stops.clone(),
                });
                self.scene.push_node(Node::Rect(RectNode {
                    x: bounds.x0,
                    y: bounds.y0,
                    width: bounds.width(),
                    height: bounds.height(),
                    fill: Some(Fill::Url(id)),
                    clip_path: Some(clip_id),
                }));
                target
            }
            (Some(Paint::Color(color)), _) => {
                self.scene.push_style(name, color);
                self.scene.push_group(name)
            }
            (None, Some(target)) => target,
            (None, None) => self.scene.push_group(name),
        }
    }

    fn draw_background(&mut self) {
        let options = self.options;
        let bounds = Rect::new(0.0, 0.0, f64::from(options.width), f64::from(options.height));
        let fill = match options.background_options.paint() {
            Some(Paint::Gradient(gradient)) => {
                let id = format!("{}-background-color", self.scene.uid);
                self.scene.push_gradient(GradientDef {
                    id: id.clone(),
                    geometry: compute_gradient(gradient, bounds, 0.0),
                    stops: gradient.color_stops.clone(),
                });
                Fill::Url(id)
            }
            Some(Paint::Color(color)) => Fill::Color(color.to_string()),
            None => return,
        };
        self.scene.push_node(Node::Rect(RectNode {
            x: 0.0,
            y: 0.0,
            width: bounds.width(),
            height: bounds.height(),
            fill: Some(fill),
            clip_path: None,
        }));
    }

    /// Draws every paintable dark module and returns the dots' target.
    fn draw_dots(&mut self, mask: &DotMask) -> Target {
        let options = self.options;
        let layout = self.layout;
        let target = self.region(options.dots_options.paint(), "dot-color", layout.grid_bounds(), 0.0, None);
        let kind = FigureKind::Dot(options.dots_options.kind);
        let count = layout.count;

        let mut drawn = 0usize;
        for row in 0..count {
            for col in 0..count {
                if !mask.is_paintable(row, col) || !self.is_dark_at_display(row, col) {
                    continue;
                }
                let has_neighbor = |d_row: i32, d_col: i32| {
                    let r = row as i64 + i64::from(d_row);
                    let c = col as i64 + i64::from(d_col);
                    if r < 0 || c < 0 || r >= count as i64 || c >= count as i64 {
                        return false;
                    }
                    let (r, c) = (r as usize, c as usize);
                    mask.is_paintable(r, c) && self.is_dark_at_display(r, c)
                };
                let args = DrawArgs::new(
                    layout.x_beginning + col as f64 * layout.dot_size,
                    layout.y_beginning + row as f64 * layout.dot_size,
                    layout.dot_size,
                );
                let figure = figures::draw(kind, args, &has_neighbor);
                self.scene.append(target, figure);
                drawn += 1;
            }
        }
        debug!(drawn, "drew modules");
        target
    }

    fn draw_corners(&mut self, dots: Target) {
        let options = self.options;
        let layout = self.layout;
        let dot = layout.dot_size;
        let offset = layout.count.saturating_sub(7) as f64 * dot;

        for (column, row, rotation) in CORNERS {
            let x = layout.x_beginning + column as f64 * offset;
            let y = layout.y_beginning + row as f64 * offset;
            let suffix = format!("{column}-{row}");
            trace!(x, y, rotation, "drawing corner");

            let square_bounds = Rect::new(x, y, x + 7.0 * dot, y + 7.0 * dot);
            let square_target = self.region(
                options.corners_square_options.paint(),
                &format!("corners-square-color-{suffix}"),
                square_bounds,
                rotation,
                Some(dots),
            );
            match options.corners_square_options.kind {
                Some(kind) => {
                    let args = DrawArgs::new(x, y, 7.0 * dot).with_rotation(rotation);
                    let figure = figures::draw(FigureKind::CornerSquare(kind), args, &|_, _| false);
                    self.scene.append(square_target, figure);
                }
                None => self.draw_from_mask(&SQUARE_MASK, x, y, square_target),
            }

            let dot_bounds = Rect::new(x + 2.0 * dot, y + 2.0 * dot, x + 5.0 * dot, y + 5.0 * dot);
            let dot_target = self.region(
                options.corners_dot_options.paint(),
                &format!("corners-dot-color-{suffix}"),
                dot_bounds,
                rotation,
                Some(square_target),
            );
            match options.corners_dot_options.kind {
                Some(kind) => {
                    let args = DrawArgs::new(x + 2.0 * dot, y + 2.0 * dot, 3.0 * dot).with_rotation(rotation);
                    let figure = figures::draw(FigureKind::CornerDot(kind), args, &|_, _| false);
                    self.scene.append(dot_target, figure);
                }
                None => self.draw_from_mask(&DOT_MASK, x, y, dot_target),
            }
        }
    }

    /// Draws a finder part from module dots, merging along the fixed mask instead of the matrix.
    fn draw_from_mask(&mut self, mask: &[[u8; 7]; 7], x: f64, y: f64, target: Target) {
        let kind = FigureKind::Dot(self.options.dots_options.kind);
        let dot = self.layout.dot_size;
        for row in 0..7i64 {
            for col in 0..7i64 {
                if !mask_at(mask, row, col) {
                    continue;
                }
                let has_neighbor =
                    |d_row: i32, d_col: i32| mask_at(mask, row + i64::from(d_row), col + i64::from(d_col));
                let args = DrawArgs::new(x + col as f64 * dot, y + row as f64 * dot, dot);
                let figure = figures::draw(kind, args, &has_neighbor);
                self.scene.append(target, figure);
            }
        }
    }

    fn draw_image(&mut self, image: &LoadedImage, size: DrawImageSize) {
        let layout = self.layout;
        let margin = f64::from(self.options.image_options.margin);
        let width = size.width - margin * 2.0;
        let height = size.height - margin * 2.0;
        if width <= 0.0 || height <= 0.0 {
            debug!(width, height, "logo margin leaves nothing to draw");
            return;
        }
        let grid = layout.grid_size();
        self.scene.push_node(Node::Image(ImageNode {
            href: image.to_data_uri(),
            x: layout.x_beginning + margin + (grid - size.width) / 2.0,
            y: layout.y_beginning + margin + (grid - size.height) / 2.0,
            width,
            height,
        }));
    }
}
