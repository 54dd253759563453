//! Glyph rasterizer — lays out text in a bitmap font and composes it into
//! a tightly cropped [`PixelBuffer`].
//!
//! Layout runs once and feeds both sizing and drawing:
//!
//! ```text
//! text ──split('\n')──► LineLayout { placements, width }  (per line)
//!                              │
//!            buffer W = max(line width), H = lines·(h + ls) − ls
//!                              │
//!                              ▼
//!        compose: x = align offset, write occupied columns, count ink
//! ```
//!
//! Each glyph is cropped to its ink columns, so a font's inter-character
//! gap is exactly `char_spacing` no matter how much padding the source
//! bitmaps carry. Spaces are the exception: they always take
//! [`SPACE_ADVANCE`] columns.

use std::ops::RangeInclusive;
use thiserror::Error;

use pixfont_core::{Alignment, FontCatalog, GlyphDefinition, Lookup, PixelBuffer, Rendered};

/// Columns taken by a space, whatever its bitmap holds.
pub const SPACE_ADVANCE: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("nothing to render: text is empty")]
    EmptyText,
    #[error("font {font:?} has no reference glyph ('A', 'a' or space)")]
    NoReferenceGlyph { font: String },
}

/// Gaps between characters and between lines, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphSpacing {
    pub char_spacing: u32,
    pub line_spacing: u32,
}

impl Default for GlyphSpacing {
    fn default() -> Self {
        Self {
            char_spacing: 1,
            line_spacing: 1,
        }
    }
}

/// One laid-out character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement<'a> {
    Space,
    Glyph {
        glyph: &'a GlyphDefinition,
        /// Ink columns of the source bitmap; `None` for a blank glyph.
        columns: Option<RangeInclusive<usize>>,
    },
}

impl Placement<'_> {
    /// Rendered width in cells, excluding character spacing.
    pub fn width(&self) -> u32 {
        match self {
            Self::Space => SPACE_ADVANCE,
            Self::Glyph { columns: Some(cols), .. } => (cols.end() - cols.start() + 1) as u32,
            Self::Glyph { columns: None, .. } => 0,
        }
    }
}

/// Placements of one input line and its total width.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineLayout<'a> {
    pub placements: Vec<Placement<'a>>,
    pub width: u32,
}

/// Layout of a whole text block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLayout<'a> {
    pub lines: Vec<LineLayout<'a>>,
    pub glyph_height: u32,
    pub width: u32,
    pub height: u32,
}

/// Renders text in bitmap fonts.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlyphRasterizer {
    pub spacing: GlyphSpacing,
}

impl GlyphRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spacing(spacing: GlyphSpacing) -> Self {
        Self { spacing }
    }

    /// Lay out `text` without drawing it.
    pub fn layout<'a>(
        &self,
        catalog: &'a FontCatalog,
        text: &str,
    ) -> Result<TextLayout<'a>, RenderError> {
        if text.is_empty() {
            return Err(RenderError::EmptyText);
        }
        let glyph_height = catalog
            .glyph_height()
            .ok_or_else(|| RenderError::NoReferenceGlyph {
                font: catalog.name().to_string(),
            })? as u32;

        let lines: Vec<LineLayout<'a>> = text
            .split('\n')
            .map(|line| self.layout_line(catalog, line))
            .collect();

        let width = lines.iter().map(|l| l.width).max().unwrap_or(0);
        let line_count = lines.len() as u32;
        let height = (line_count * (glyph_height + self.spacing.line_spacing))
            .saturating_sub(self.spacing.line_spacing);

        Ok(TextLayout {
            lines,
            glyph_height,
            width,
            height,
        })
    }

    fn layout_line<'a>(&self, catalog: &'a FontCatalog, line: &str) -> LineLayout<'a> {
        let placements: Vec<Placement<'a>> = line
            .chars()
            .filter_map(|ch| match catalog.resolve(ch)? {
                Lookup::Space(_) => Some(Placement::Space),
                Lookup::Glyph(glyph) => Some(Placement::Glyph {
                    glyph,
                    columns: glyph.ink_columns(),
                }),
            })
            .collect();

        // Spacing sits between characters; the last one carries none.
        let gaps = (placements.len() as u32).saturating_sub(1);
        let width = placements.iter().map(Placement::width).sum::<u32>()
            + gaps * self.spacing.char_spacing;

        LineLayout { placements, width }
    }

    /// Render `text`, reporting why nothing could be drawn.
    pub fn try_render(
        &self,
        catalog: &FontCatalog,
        text: &str,
        alignment: Alignment,
    ) -> Result<Rendered, RenderError> {
        let layout = self.layout(catalog, text)?;
        Ok(self.compose(&layout, alignment))
    }

    /// Render `text`; degenerate input yields [`Rendered::empty`].
    pub fn render(&self, catalog: &FontCatalog, text: &str, alignment: Alignment) -> Rendered {
        match self.try_render(catalog, text, alignment) {
            Ok(rendered) => rendered,
            Err(RenderError::EmptyText) => Rendered::empty(),
            Err(e) => {
                log::warn!("Glyph render skipped: {e}");
                Rendered::empty()
            }
        }
    }

    /// Draw a finished layout.
    pub fn compose(&self, layout: &TextLayout<'_>, alignment: Alignment) -> Rendered {
        let mut buffer = PixelBuffer::new(layout.width, layout.height);
        let mut ink_count = 0u32;
        let row_limit = layout.glyph_height as usize;

        for (i, line) in layout.lines.iter().enumerate() {
            let top = i as u32 * (layout.glyph_height + self.spacing.line_spacing);
            let mut cursor = alignment.offset(layout.width, line.width);

            for placement in &line.placements {
                if let Placement::Glyph {
                    glyph,
                    columns: Some(cols),
                } = placement
                {
                    for (dx, x) in cols.clone().enumerate() {
                        let rows = glyph.height().min(row_limit);
                        for y in 0..rows {
                            if glyph.is_ink(x, y)
                                && buffer.set(cursor + dx as u32, top + y as u32, true)
                            {
                                ink_count += 1;
                            }
                        }
                    }
                }
                cursor += placement.width() + self.spacing.char_spacing;
            }
        }

        debug_assert_eq!(ink_count, buffer.ink_count());
        log::debug!(
            "Glyph render: {}×{}, {} lines, {} ink pixels",
            buffer.width(),
            buffer.height(),
            layout.lines.len(),
            ink_count
        );
        Rendered { buffer, ink_count }
    }
}

// ===================================================================
// Tests
// ===================================================================
