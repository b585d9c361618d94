//! Figure generator.
//!
//! Three families of figures make up a styled QR code: module dots, the 7x7 finder
//! rings ("corner squares") and the 3x3 finder centers ("corner dots"). Each family is a
//! closed set of variants; every variant is a closed-form shape scaled by `size` and
//! rotated as a whole about its own center.
//!
//! Module dots may depend on their neighbors so that adjacent dark modules merge into
//! one smooth blob. Neighborhood is answered by a caller-supplied lookup, which keeps
//! the generator independent of any matrix.

pub mod corner_dot;
pub mod corner_square;
pub mod dot;

use crate::options::{CornerDotType, CornerSquareType, DotType};
use crate::scene::{Figure, Shape};

/// Which figure to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Dot(DotType),
    CornerSquare(CornerSquareType),
    CornerDot(CornerDotType),
}

/// Placement of one figure: the top-left of its cell, its edge length, and a rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawArgs {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
}

impl DrawArgs {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size, rotation: 0.0 }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// Occupancy of the 8 cells around a module.
///
/// Every variant shapes itself from the four edge neighbors. The diagonal bits are
/// recorded for completeness and only surface through [`Neighbors::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors(u8);

impl Neighbors {
    /// `(d_row, d_col)` offsets, in bit order.
    pub const OFFSETS: [(i32, i32); 8] = [
        (-1, 0),
        (0, 1),
        (1, 0),
        (0, -1),
        (-1, -1),
        (-1, 1),
        (1, 1),
        (1, -1),
    ];

    /// Asks `has_neighbor(d_row, d_col)` for each of the 8 surrounding cells.
    pub fn query(has_neighbor: impl Fn(i32, i32) -> bool) -> Self {
        let mut bits = 0u8;
        for (bit, &(d_row, d_col)) in Self::OFFSETS.iter().enumerate() {
            if has_neighbor(d_row, d_col) {
                bits |= 1 << bit;
            }
        }
        Self(bits)
    }

    pub fn contains(&self, d_row: i32, d_col: i32) -> bool {
        Self::OFFSETS
            .iter()
            .position(|&offset| offset == (d_row, d_col))
            .is_some_and(|bit| self.0 & (1 << bit) != 0)
    }

    pub fn top(&self) -> bool {
        self.0 & 0b0001 != 0
    }

    pub fn right(&self) -> bool {
        self.0 & 0b0010 != 0
    }

    pub fn bottom(&self) -> bool {
        self.0 & 0b0100 != 0
    }

    pub fn left(&self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// Number of occupied edge-sharing neighbors.
    pub fn cardinal_count(&self) -> u32 {
        (self.0 & 0b1111).count_ones()
    }
}

/// Draws one figure.
///
/// `has_neighbor(d_row, d_col)` is only consulted by module dot variants that merge
/// with their neighbors; corner figures are drawn whole.
pub fn draw(kind: FigureKind, args: DrawArgs, has_neighbor: &dyn Fn(i32, i32) -> bool) -> Figure {
    match kind {
        FigureKind::Dot(dot_type) => {
            let neighbors = if dot_type.merges_with_neighbors() {
                Neighbors::query(has_neighbor)
            } else {
                Neighbors::default()
            };
            dot::draw(dot_type, args, neighbors)
        }
        FigureKind::CornerSquare(square_type) => corner_square::draw(square_type, args),
        FigureKind::CornerDot(dot_type) => corner_dot::draw(dot_type, args),
    }
}

impl DotType {
    /// Whether the variant's shape depends on neighboring modules.
    pub fn merges_with_neighbors(self) -> bool {
        !matches!(self, DotType::Square | DotType::Dots)
    }
}

pub(crate) fn circle(args: DrawArgs) -> Figure {
    let (cx, cy) = args.center();
    Figure::new(Shape::Circle { cx, cy, r: args.size / 2.0 }).rotated(args.rotation, cx, cy)
}

pub(crate) fn square(args: DrawArgs) -> Figure {
    let (cx, cy) = args.center();
    Figure::new(Shape::Rect { x: args.x, y: args.y, width: args.size, height: args.size })
        .rotated(args.rotation, cx, cy)
}

pub(crate) fn path(args: DrawArgs, d: String, even_odd: bool) -> Figure {
    let (cx, cy) = args.center();
    Figure::new(Shape::Path { d, even_odd }).rotated(args.rotation, cx, cy)
}
