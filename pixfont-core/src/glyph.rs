//! Glyph encodings.
//!
//! Bitmap fonts arrive in two shapes: nested rows (`[[0,1,0],[1,0,1]]`)
//! or a flat row-major array (`[0,1,0,1,0,1]`). The flat form carries no
//! width of its own, so its [`GlyphGeometry`] is attached when the font is
//! loaded and travels with every glyph.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Fixed cell geometry of a packed (1D) font.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlyphGeometry {
    pub width: usize,
    pub height: usize,
}

impl GlyphGeometry {
    pub const MICRO_3X3: Self = Self::new(3, 3);
    pub const MINI_3X5: Self = Self::new(3, 5);

    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Geometry of the packed fonts in the stock bundle.
    ///
    /// Bundles may also declare geometry explicitly; this table only covers
    /// fonts that predate that field.
    pub fn for_font_name(name: &str) -> Option<Self> {
        match name {
            "Microfont3x3" => Some(Self::MICRO_3X3),
            "threeXFiveMinifont" => Some(Self::MINI_3X5),
            _ => None,
        }
    }

    /// Number of cells a packed glyph of this geometry holds.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// One glyph's bitmap. A cell is ink when its value is exactly `1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlyphDefinition {
    /// Nested rows. Width is the first row's length; ragged rows read the
    /// missing cells as empty.
    Grid(Vec<Vec<u8>>),
    /// Row-major cells with explicit geometry.
    Packed {
        geometry: GlyphGeometry,
        cells: Vec<u8>,
    },
}

impl GlyphDefinition {
    /// Build a grid glyph from `'#'`/`'.'` art, one string per row.
    ///
    /// Any character other than `'#'` is empty.
    pub fn from_art(rows: &[&str]) -> Self {
        Self::Grid(
            rows.iter()
                .map(|row| row.chars().map(|c| u8::from(c == '#')).collect())
                .collect(),
        )
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Grid(rows) => rows.first().map_or(0, Vec::len),
            Self::Packed { geometry, .. } => geometry.width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Grid(rows) => rows.len(),
            Self::Packed { geometry, .. } => geometry.height,
        }
    }

    /// Whether cell `(x, y)` is ink. Out-of-range cells are empty.
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        let value = match self {
            Self::Grid(rows) => rows.get(y).and_then(|row| row.get(x)).copied(),
            Self::Packed { geometry, cells } => {
                if x >= geometry.width || y >= geometry.height {
                    None
                } else {
                    cells.get(y * geometry.width + x).copied()
                }
            }
        };
        value == Some(1)
    }

    /// Whether any row of column `x` holds ink.
    pub fn column_has_ink(&self, x: usize) -> bool {
        (0..self.height()).any(|y| self.is_ink(x, y))
    }

    /// Inclusive span of columns holding ink, or `None` for a blank glyph.
    pub fn ink_columns(&self) -> Option<RangeInclusive<usize>> {
        let width = self.width();
        let first = (0..width).find(|&x| self.column_has_ink(x))?;
        let last = (first..width).rev().find(|&x| self.column_has_ink(x))?;
        Some(first..=last)
    }

    /// Number of ink cells inside the glyph's declared bounds.
    pub fn ink_count(&self) -> usize {
        let width = self.width();
        (0..self.height())
            .map(|y| (0..width).filter(|&x| self.is_ink(x, y)).count())
            .sum()
    }
}
