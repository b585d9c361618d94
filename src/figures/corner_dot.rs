//! Finder centers: the solid 3x3 block inside each finder ring.

use super::{circle, square, DrawArgs};
use crate::options::CornerDotType;
use crate::scene::Figure;

pub fn draw(kind: CornerDotType, args: DrawArgs) -> Figure {
    match kind {
        CornerDotType::Dot => circle(args),
        CornerDotType::Square => square(args),
    }
}
