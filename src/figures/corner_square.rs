//! Finder rings.
//!
//! A finder pattern's outer ring is one module thick on a 7-module square, so every
//! variant works in units of `size / 7` and draws the ring as an outer contour with
//! an inner contour wound the other way.

use super::{path, DrawArgs};
use crate::options::CornerSquareType;
use crate::scene::{num, Figure};

pub fn draw(kind: CornerSquareType, args: DrawArgs) -> Figure {
    match kind {
        CornerSquareType::Dot => dot(args),
        CornerSquareType::Square => square(args),
        CornerSquareType::ExtraRounded => extra_rounded(args),
    }
}

fn dot(args: DrawArgs) -> Figure {
    let DrawArgs { x, y, size, .. } = args;
    let unit = size / 7.0;
    let outer = num(size / 2.0);
    let inner = num(size / 2.0 - unit);
    // Two almost-closed arcs; the 0.1 offset keeps each arc from collapsing to a point.
    let d = format!(
        "M {} {}a {outer} {outer} 0 1 0 0.1 0zm 0 {}a {inner} {inner} 0 1 1 -0.1 0Z",
        num(x + size / 2.0),
        num(y),
        num(unit)
    );
    path(args, d, true)
}

fn square(args: DrawArgs) -> Figure {
    let DrawArgs { x, y, size, .. } = args;
    let unit = size / 7.0;
    let inner = size - 2.0 * unit;
    let d = format!(
        "M {} {}v {}h {}v {}zM {} {}h {}v {}h {}z",
        num(x),
        num(y),
        num(size),
        num(size),
        num(-size),
        num(x + unit),
        num(y + unit),
        num(inner),
        num(inner),
        num(-inner)
    );
    path(args, d, true)
}

fn extra_rounded(args: DrawArgs) -> Figure {
    let DrawArgs { x, y, size, .. } = args;
    let u = size / 7.0;
    let (r, nr) = (num(2.5 * u), num(-2.5 * u));
    let (ri, nri) = (num(1.5 * u), num(-1.5 * u));
    let (side, nside) = (num(2.0 * u), num(-2.0 * u));
    let mut d = format!("M {} {}", num(x), num(y + 2.5 * u));
    d += &format!("v {side}");
    d += &format!("a {r} {r}, 0, 0, 0, {r} {r}");
    d += &format!("h {side}");
    d += &format!("a {r} {r}, 0, 0, 0, {r} {nr}");
    d += &format!("v {nside}");
    d += &format!("a {r} {r}, 0, 0, 0, {nr} {nr}");
    d += &format!("h {nside}");
    d += &format!("a {r} {r}, 0, 0, 0, {nr} {r}");
    d += &format!("M {} {}", num(x + 2.5 * u), num(y + u));
    d += &format!("h {side}");
    d += &format!("a {ri} {ri}, 0, 0, 1, {ri} {ri}");
    d += &format!("v {side}");
    d += &format!("a {ri} {ri}, 0, 0, 1, {nri} {ri}");
    d += &format!("h {nside}");
    d += &format!("a {ri} {ri}, 0, 0, 1, {nri} {nri}");
    d += &format!("v {nside}");
    d += &format!("a {ri} {ri}, 0, 0, 1, {ri} {nri}");
    path(args, d, true)
}
