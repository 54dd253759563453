//! # pixfont-core
//!
//! Data model shared by the pixfont rasterizers and viewport.
//!
//! ## Architecture
//!
//! ```text
//! fonts.json ──► FontBundle ──► FontCatalog { char → GlyphDefinition }
//!                                    │
//!                                    ▼
//!                      (pixfont-text rasterizers)
//!                                    │
//!                                    ▼
//!                    Rendered { PixelBuffer, ink_count } ──► PNG
//! ```
//!
//! - **`glyph`** — tagged glyph encodings (2D grid / packed 1D) and geometry.
//! - **`catalog`** — per-font glyph lookup and the JSON bundle loader.
//! - **`buffer`** — the monochrome pixel buffer and its PNG encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod buffer;
pub mod catalog;
pub mod glyph;

pub use buffer::{EncodeError, PixelBuffer, Rendered};
pub use catalog::{CatalogError, FontBundle, FontCatalog, Lookup};
pub use glyph::{GlyphDefinition, GlyphGeometry};

/// Horizontal alignment of each line inside the shared buffer width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// Not implemented as true justification; rasterizers lay it out as `Left`.
    Justify,
}

impl Default for Alignment {
    fn default() -> Self {
        Self::Left
    }
}

impl Alignment {
    /// All modes, in the order the alignment controls list them.
    pub const ALL: [Alignment; 4] = [Self::Left, Self::Center, Self::Right, Self::Justify];

    /// Lowercase name, as in `align-<name>` control ids.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }

    /// Horizontal offset of a line of `line_width` inside `total_width`.
    ///
    /// Lines wider than the total (which the layout never produces) get 0.
    pub fn offset(self, total_width: u32, line_width: u32) -> u32 {
        let slack = total_width.saturating_sub(line_width);
        match self {
            Self::Center => slack / 2,
            Self::Right => slack,
            Self::Left | Self::Justify => 0,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown alignment name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alignment: {0}")]
pub struct ParseAlignmentError(pub String);

impl FromStr for Alignment {
    type Err = ParseAlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches("align-");
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseAlignmentError(s.to_string()))
    }
}
