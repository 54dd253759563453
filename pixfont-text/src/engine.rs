//! Text engine — the [`TextBackend`] backed by `cosmic-text`.
//!
//! The engine manages a `FontSystem` (font discovery + shaping) and a
//! `SwashCache` (glyph rasterization). Each line is shaped into its own
//! unwrapped `Buffer` whose line height equals the font size, so the
//! first layout run's top is the em-box top the caller positions.
//!
//! ## Family resolution
//!
//! Family strings are CSS chains (`"'VT323', monospace"`). The chain is
//! walked against the font database: the first installed concrete family
//! wins, then the first generic keyword, then `sans-serif`. Results are
//! cached per family string.

use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};

use crate::fonts::{FamilyChain, FamilyName, GenericFamily};
use crate::vector::{Surface, TextBackend};

/// Ink color handed to the rasterizer.
const INK: Color = Color::rgba(0, 0, 0, 255);

/// Family a chain resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedFamily {
    Named(String),
    Generic(GenericFamily),
}

impl ResolvedFamily {
    fn as_family(&self) -> Family<'_> {
        match self {
            Self::Named(name) => Family::Name(name),
            Self::Generic(GenericFamily::Serif) => Family::Serif,
            Self::Generic(GenericFamily::SansSerif) => Family::SansSerif,
            Self::Generic(GenericFamily::Monospace) => Family::Monospace,
            Self::Generic(GenericFamily::Cursive) => Family::Cursive,
            Self::Generic(GenericFamily::Fantasy) => Family::Fantasy,
        }
    }
}

/// Core text engine wrapping cosmic-text.
pub struct TextEngine {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    resolved: HashMap<String, ResolvedFamily>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Create a new text engine with system font discovery.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    /// Create an engine over an existing font system (e.g. one with
    /// extra fonts loaded into its database).
    pub fn with_font_system(font_system: FontSystem) -> Self {
        log::info!(
            "TextEngine: {} font faces available",
            font_system.db().faces().count()
        );
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            resolved: HashMap::new(),
        }
    }

    /// Whether any font face is installed at all.
    pub fn has_fonts(&self) -> bool {
        self.font_system.db().faces().next().is_some()
    }

    /// Whether a concrete family is installed (case-insensitive).
    pub fn has_family(&self, name: &str) -> bool {
        self.font_system.db().faces().any(|face| {
            face.families
                .iter()
                .any(|(family, _)| family.eq_ignore_ascii_case(name))
        })
    }

    /// Resolve a CSS family chain to the family cosmic-text will use.
    pub fn resolve_family(&mut self, family_str: &str) -> ResolvedFamily {
        if let Some(resolved) = self.resolved.get(family_str) {
            return resolved.clone();
        }

        let chain = FamilyChain::from_css(family_str);
        let resolved = chain
            .families
            .iter()
            .find_map(|family| match family {
                FamilyName::Named(name) if self.has_family(name) => {
                    Some(ResolvedFamily::Named(name.clone()))
                }
                FamilyName::Named(_) => None,
                FamilyName::Generic(generic) => Some(ResolvedFamily::Generic(*generic)),
            })
            .unwrap_or(ResolvedFamily::Generic(GenericFamily::SansSerif));

        log::debug!("Family {family_str:?} resolved to {resolved:?}");
        self.resolved
            .insert(family_str.to_string(), resolved.clone());
        resolved
    }

    /// Shape one unwrapped line.
    fn shape_line(&mut self, line: &str, family_str: &str, size_px: f32) -> Buffer {
        let resolved = self.resolve_family(family_str);
        let attrs = Attrs::new().family(resolved.as_family()).color(INK);

        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size_px, size_px));
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, line, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl TextBackend for TextEngine {
    fn measure(&mut self, line: &str, family: &str, size_px: f32) -> f32 {
        if line.is_empty() {
            return 0.0;
        }
        let buffer = self.shape_line(line, family, size_px);
        buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0f32, f32::max)
    }

    fn fill_line(
        &mut self,
        surface: &mut Surface,
        line: &str,
        family: &str,
        size_px: f32,
        origin: (f32, f32),
    ) {
        if line.is_empty() {
            return;
        }
        let buffer = self.shape_line(line, family, size_px);

        for run in buffer.layout_runs() {
            let line_y = run.line_y;
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical(origin, 1.0);
                self.swash_cache.with_pixels(
                    &mut self.font_system,
                    physical.cache_key,
                    INK,
                    |x, y, color| {
                        surface.blend(
                            physical.x + x,
                            line_y as i32 + physical.y + y,
                            [color.r(), color.g(), color.b(), color.a()],
                        );
                    },
                );
            }
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
