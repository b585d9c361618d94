//! Module dots.
//!
//! The neighbor-aware variants start from a few base shapes drawn in one
//! orientation and turn them toward the occupied neighbors:
//!
//! - side rounded: the right side is a half circle, the left side is flat;
//! - corner rounded: the top-right corner is rounded, the others are square;
//! - corner extra rounded: the top-right corner is a full quarter circle;
//! - corners rounded: the bottom-left and top-right corners are rounded.
//!
//! Quarter turns are clockwise in SVG coordinates (y grows downward).

use std::f64::consts::{FRAC_PI_2, PI};

use super::{circle, path, square, DrawArgs, Neighbors};
use crate::options::DotType;
use crate::scene::{num, Figure};

/// Draws one module dot. `args.rotation` is added to any orientation the variant picks.
pub fn draw(kind: DotType, args: DrawArgs, neighbors: Neighbors) -> Figure {
    match kind {
        DotType::Square => square(args),
        DotType::Dots => circle(args),
        DotType::Rounded => rounded(args, neighbors, false),
        DotType::ExtraRounded => rounded(args, neighbors, true),
        DotType::Classy => classy(args, neighbors, false),
        DotType::ClassyRounded => classy(args, neighbors, true),
    }
}

fn turned(args: DrawArgs, turn: f64) -> DrawArgs {
    args.with_rotation(args.rotation + turn)
}

fn rounded(args: DrawArgs, n: Neighbors, extra: bool) -> Figure {
    let count = n.cardinal_count();

    if count == 0 {
        return circle(args);
    }

    if count > 2 || (n.left() && n.right()) || (n.top() && n.bottom()) {
        return square(args);
    }

    if count == 2 {
        let turn = if n.left() && n.top() {
            FRAC_PI_2
        } else if n.top() && n.right() {
            PI
        } else if n.right() && n.bottom() {
            -FRAC_PI_2
        } else {
            0.0
        };
        return if extra {
            corner_extra_rounded(turned(args, turn))
        } else {
            corner_rounded(turned(args, turn))
        };
    }

    let turn = if n.top() {
        FRAC_PI_2
    } else if n.right() {
        PI
    } else if n.bottom() {
        -FRAC_PI_2
    } else {
        0.0
    };
    side_rounded(turned(args, turn))
}

/// Leaf-like dots: the two open diagonal corners round off, everything joined stays square.
fn classy(args: DrawArgs, n: Neighbors, extra: bool) -> Figure {
    let corner: fn(DrawArgs) -> Figure = if extra { corner_extra_rounded } else { corner_rounded };

    if n.cardinal_count() == 0 {
        return corners_rounded(turned(args, FRAC_PI_2));
    }

    if !n.left() && !n.top() {
        return corner(turned(args, -FRAC_PI_2));
    }

    if !n.right() && !n.bottom() {
        return corner(turned(args, FRAC_PI_2));
    }

    square(args)
}

fn side_rounded(args: DrawArgs) -> Figure {
    let DrawArgs { x, y, size, .. } = args;
    let half = num(size / 2.0);
    let d = format!(
        "M {} {}v {}h {half}a {half} {half}, 0, 0, 0, 0 {}",
        num(x),
        num(y),
        num(size),
        num(-size)
    );
    path(args, d, false)
}

fn corner_rounded(args: DrawArgs) -> Figure {
    let DrawArgs { x, y, size, .. } = args;
    let half = num(size / 2.0);
    let neg_half = num(-size / 2.0);
    let d = format!(
        "M {} {}v {s}h {s}v {neg_half}a {half} {half}, 0, 0, 0, {neg_half} {neg_half}",
        num(x),
        num(y),
        s = num(size)
    );
    path(args, d, false)
}

fn corner_extra_rounded(args: DrawArgs) -> Figure {
    let DrawArgs { x, y, size, .. } = args;
    let d = format!(
        "M {} {}v {s}h {s}a {s} {s}, 0, 0, 0, {neg} {neg}",
        num(x),
        num(y),
        s = num(size),
        neg = num(-size)
    );
    path(args, d, false)
}

fn corners_rounded(args: DrawArgs) -> Figure {
    let DrawArgs { x, y, size, .. } = args;
    let half = num(size / 2.0);
    let neg_half = num(-size / 2.0);
    let d = format!(
        "M {} {}v {half}a {half} {half}, 0, 0, 0, {half} {half}\
         h {half}v {neg_half}a {half} {half}, 0, 0, 0, {neg_half} {neg_half}",
        num(x),
        num(y)
    );
    path(args, d, false)
}
