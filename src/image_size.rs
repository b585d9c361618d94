//! Logo footprint sizing.
//!
//! A logo placed over a QR code destroys the modules underneath it, so its size is
//! bounded by how many modules error correction can recover. The footprint is always
//! an odd number of modules on each axis, which keeps it centered on the module grid
//! of an (odd-sized) QR symbol.

use serde::Serialize;

use crate::options::ErrorCorrectionLevel;

/// Reserved logo footprint, in modules and in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DrawImageSize {
    pub hidden_columns: u32,
    pub hidden_rows: u32,
    pub width: f64,
    pub height: f64,
}

impl DrawImageSize {
    pub fn is_empty(&self) -> bool {
        self.hidden_columns == 0 || self.hidden_rows == 0
    }
}

/// Number of modules a logo may hide for a symbol with `count` modules per side.
pub fn max_hidden_dots(image_size: f64, level: ErrorCorrectionLevel, count: usize) -> u64 {
    let cover = image_size * level.safe_fraction();
    if !cover.is_finite() || cover <= 0.0 {
        return 0;
    }
    (cover * (count * count) as f64).floor() as u64
}

/// Modules per axis that may be hidden: the two 7-module finder bands are never covered.
pub fn max_hidden_axis_dots(count: usize) -> u64 {
    count.saturating_sub(14) as u64
}

/// Fits an image of `original_width` x `original_height` into the module budget.
///
/// The result never hides more than `max_hidden_dots` modules in total nor more than
/// `max_hidden_axis_dots` along either axis, and the pixel size keeps the image's aspect
/// ratio inside the hidden region. Any degenerate input yields an empty footprint.
pub fn calculate_image_size(
    original_width: f64,
    original_height: f64,
    max_hidden_dots: u64,
    max_hidden_axis_dots: u64,
    dot_size: f64,
) -> DrawImageSize {
    let valid = original_width.is_finite()
        && original_height.is_finite()
        && dot_size.is_finite()
        && original_width > 0.0
        && original_height > 0.0
        && dot_size > 0.0;
    if !valid || max_hidden_dots == 0 || max_hidden_axis_dots == 0 {
        return DrawImageSize::default();
    }

    let max = max_hidden_dots as i64;
    let axis = odd_floor(max_hidden_axis_dots.min(i64::MAX as u64) as i64);
    let k = original_height / original_width;

    // Widest odd column count the area budget allows for this aspect ratio.
    let mut columns = ((max as f64 / k).sqrt().floor() as i64).max(1).min(axis);
    columns = odd_floor(columns);
    let mut rows = odd_cover(columns as f64 * k, axis);

    // Too tall: derive the columns from the rows instead.
    if rows > axis || (rows * columns > max && rows > 1) {
        rows = if rows > axis { axis } else { rows - 2 };
        columns = odd_cover(rows as f64 / k, axis);
    }

    loop {
        if columns < 1 || rows < 1 {
            return DrawImageSize::default();
        }
        if columns > axis {
            columns = axis;
        } else if rows > axis {
            rows = axis;
        } else if columns * rows > max {
            if columns >= rows {
                columns -= 2;
            } else {
                rows -= 2;
            }
        } else {
            break;
        }
    }

    let box_width = columns as f64 * dot_size;
    let box_height = rows as f64 * dot_size;
    let (width, height) = if box_width * k <= box_height {
        (box_width, (box_width * k).round())
    } else {
        ((box_height / k).round(), box_height)
    };

    DrawImageSize { hidden_columns: columns as u32, hidden_rows: rows as u32, width, height }
}

/// Largest odd number not above `n` (or `n` itself when already odd).
fn odd_floor(n: i64) -> i64 {
    if n % 2 == 0 {
        n - 1
    } else {
        n
    }
}

/// Smallest odd module count covering `extent` modules, capped at the odd `cap`.
fn odd_cover(extent: f64, cap: i64) -> i64 {
    let extent = extent.min(cap as f64);
    1 + 2 * ((extent - 1.0) / 2.0).ceil() as i64
}
