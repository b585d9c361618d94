//! The module matrix consumed by the renderer.
//!
//! Encoding data into a QR symbol is not this crate's job. Anything that can answer
//! "how many modules per side" and "is this module dark" can be rendered, which is
//! what [`ModuleMatrix`] captures. An adapter for [`qrcode::QrCode`] is provided.

/// A square grid of dark and light modules, addressed by zero-based `(row, col)`.
pub trait ModuleMatrix {
    /// Number of modules along one side.
    fn module_count(&self) -> usize;

    /// Whether the module at `(row, col)` is dark. Callers only ask for in-range coordinates.
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

impl ModuleMatrix for qrcode::QrCode {
    fn module_count(&self) -> usize {
        self.width()
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        // qrcode indexes by (x, y).
        self[(col, row)] == qrcode::Color::Dark
    }
}

/// An owned, row-major copy of a module matrix.
///
/// The composer keeps one of these so it can re-render on option changes without
/// holding on to the encoder's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    count: usize,
    modules: Vec<bool>,
}

impl BitMatrix {
    /// Builds a matrix by asking `f(row, col)` for every module.
    pub fn from_fn(count: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut modules = Vec::with_capacity(count * count);
        for row in 0..count {
            for col in 0..count {
                modules.push(f(row, col));
            }
        }
        Self { count, modules }
    }

    /// Snapshots any [`ModuleMatrix`].
    pub fn from_matrix(matrix: &dyn ModuleMatrix) -> Self {
        Self::from_fn(matrix.module_count(), |row, col| matrix.is_dark(row, col))
    }

    /// Parses rows of `#` (dark) and anything else (light). Short rows are padded light.
    ///
    /// ```rust
    /// use qistyle::matrix::{BitMatrix, ModuleMatrix};
    ///
    /// let m = BitMatrix::from_rows(&["#.", ".#"]);
    /// assert!(m.is_dark(1, 1));
    /// assert!(!m.is_dark(0, 1));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let count = rows.len();
        Self::from_fn(count, |row, col| rows[row].as_bytes().get(col) == Some(&b'#'))
    }

    /// Sets a single module.
    pub fn set(&mut self, row: usize, col: usize, dark: bool) {
        if row < self.count && col < self.count {
            self.modules[row * self.count + col] = dark;
        }
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&dark| dark).count()
    }
}

impl ModuleMatrix for BitMatrix {
    fn module_count(&self) -> usize {
        self.count
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.count && col < self.count && self.modules[row * self.count + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = BitMatrix::from_rows(&["##.", "...", "#"]);
        assert_eq!(m.module_count(), 3);
        assert!(m.is_dark(0, 0));
        assert!(m.is_dark(0, 1));
        assert!(!m.is_dark(0, 2));
        assert!(m.is_dark(2, 0));
        assert!(!m.is_dark(2, 2));
        assert_eq!(m.dark_count(), 3);
    }

    #[test]
    fn test_out_of_range_is_light() {
        let m = BitMatrix::from_fn(2, |_, _| true);
        assert!(!m.is_dark(2, 0));
        assert!(!m.is_dark(0, 5));
    }

    #[test]
    fn test_qrcode_adapter_matches_encoder() {
        let code = qrcode::QrCode::new(b"HELLO WORLD").unwrap();
        let snapshot = BitMatrix::from_matrix(&code);
        assert_eq!(snapshot.module_count(), code.width());
        // Top-left finder corner is always dark, the separator next to it light.
        assert!(snapshot.is_dark(0, 0));
        assert!(!snapshot.is_dark(7, 7));
        let colors = code.to_colors();
        let width = code.width();
        for row in 0..width {
            for col in 0..width {
                assert_eq!(snapshot.is_dark(row, col), colors[row * width + col] == qrcode::Color::Dark);
            }
        }
    }
}
