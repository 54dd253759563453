//! Font catalogs and the JSON font bundle.
//!
//! A bundle (`fonts.json`) is a JSON object of font name → glyph map:
//!
//! ```text
//! {
//!   "SomeGridFont":       { "A": [[0,1,0],[1,0,1], ...], " ": [[0],[0], ...] },
//!   "threeXFiveMinifont": { "A": [0,1,0,1,0,1, ...], ... },
//!   "NewPackedFont":      { "geometry": { "width": 4, "height": 6 },
//!                           "glyphs": { "A": [ ... 24 cells ... ] } }
//! }
//! ```
//!
//! Packed glyphs get their geometry from the optional `geometry` field or,
//! failing that, from [`GlyphGeometry::for_font_name`]. A packed font with
//! neither is rejected at load time.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

use crate::glyph::{GlyphDefinition, GlyphGeometry};

/// Characters tried, in order, to find the glyph that defines a font's height.
const REFERENCE_CHARS: [char; 3] = ['A', 'a', ' '];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("font bundle must be a JSON object of fonts")]
    NotAnObject,
    #[error("font {font:?}: packed glyphs need a known geometry")]
    UnknownGeometry { font: String },
    #[error("font {font:?}: glyph {key:?} is not a list of 0/1 cells ({reason})")]
    InvalidGlyph {
        font: String,
        key: String,
        reason: String,
    },
}

/// Result of resolving a character against a catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// A regular glyph, found by exact or lowercase match.
    Glyph(&'a GlyphDefinition),
    /// The space glyph, either asked for directly or used as the fallback.
    Space(&'a GlyphDefinition),
}

/// Immutable glyph map of one bitmap font.
#[derive(Clone, Debug, Default)]
pub struct FontCatalog {
    name: String,
    glyphs: FxHashMap<char, GlyphDefinition>,
}

impl FontCatalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            glyphs: FxHashMap::default(),
        }
    }

    /// Builder-style insert.
    pub fn with_glyph(mut self, ch: char, glyph: GlyphDefinition) -> Self {
        self.insert(ch, glyph);
        self
    }

    pub fn insert(&mut self, ch: char, glyph: GlyphDefinition) {
        self.glyphs.insert(ch, glyph);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, ch: char) -> Option<&GlyphDefinition> {
        self.glyphs.get(&ch)
    }

    pub fn space(&self) -> Option<&GlyphDefinition> {
        self.glyphs.get(&' ')
    }

    /// Resolve `ch`: exact match, then lowercase, then the space glyph.
    ///
    /// `None` means the character cannot be drawn and takes no room.
    pub fn resolve(&self, ch: char) -> Option<Lookup<'_>> {
        if ch == ' ' {
            return self.space().map(Lookup::Space);
        }
        if let Some(glyph) = self.glyphs.get(&ch) {
            return Some(Lookup::Glyph(glyph));
        }
        if let Some(glyph) = single_lowercase(ch).and_then(|lower| self.glyphs.get(&lower)) {
            return Some(Lookup::Glyph(glyph));
        }
        self.space().map(Lookup::Space)
    }

    /// Glyph whose height defines the font: `A`, `a`, then space.
    pub fn reference_glyph(&self) -> Option<&GlyphDefinition> {
        REFERENCE_CHARS.iter().find_map(|ch| self.glyphs.get(ch))
    }

    /// Line height in cells, from the reference glyph.
    pub fn glyph_height(&self) -> Option<usize> {
        self.reference_glyph().map(GlyphDefinition::height)
    }

    /// Parse one font's JSON value.
    pub fn from_json(name: &str, value: serde_json::Value) -> Result<Self, CatalogError> {
        let raw: RawFont = serde_json::from_value(value)?;
        let (declared, glyphs) = match raw {
            RawFont::Explicit { geometry, glyphs } => (geometry, glyphs),
            RawFont::Bare(glyphs) => (None, glyphs),
        };
        let geometry = declared.or_else(|| GlyphGeometry::for_font_name(name));

        let mut catalog = Self::new(name);
        for (key, raw_glyph) in glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                log::debug!("font {name:?}: skipping multi-character key {key:?}");
                continue;
            };
            let glyph = match raw_glyph {
                RawGlyph::Grid(rows) => GlyphDefinition::Grid(rows),
                RawGlyph::Packed(cells) => {
                    let geometry = geometry.ok_or_else(|| CatalogError::UnknownGeometry {
                        font: name.to_string(),
                    })?;
                    if cells.len() != geometry.cell_count() {
                        log::warn!(
                            "font {name:?}: glyph {key:?} has {} cells, expected {}",
                            cells.len(),
                            geometry.cell_count()
                        );
                    }
                    GlyphDefinition::Packed { geometry, cells }
                }
                RawGlyph::Invalid(value) => {
                    return Err(CatalogError::InvalidGlyph {
                        font: name.to_string(),
                        key,
                        reason: format!("got {value}"),
                    });
                }
            };
            catalog.insert(ch, glyph);
        }
        Ok(catalog)
    }
}

/// Lowercase form of `ch` when it is a single character.
fn single_lowercase(ch: char) -> Option<char> {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) if l != ch => Some(l),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFont {
    Explicit {
        geometry: Option<GlyphGeometry>,
        glyphs: HashMap<String, RawGlyph>,
    },
    Bare(HashMap<String, RawGlyph>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGlyph {
    Grid(Vec<Vec<u8>>),
    Packed(Vec<u8>),
    Invalid(serde_json::Value),
}

/// Ordered collection of bitmap fonts, as loaded from a bundle.
#[derive(Clone, Debug, Default)]
pub struct FontBundle {
    fonts: Vec<FontCatalog>,
}

impl FontBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bundle, logging and skipping fonts that fail to load.
    ///
    /// Only a malformed top level is an error.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::parse(json, false)
    }

    /// Parse a bundle, failing on the first font that does not load.
    pub fn from_json_str_strict(json: &str) -> Result<Self, CatalogError> {
        Self::parse(json, true)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CatalogError> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json_str(&json)
    }

    fn parse(json: &str, strict: bool) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(fonts) = value else {
            return Err(CatalogError::NotAnObject);
        };

        let mut bundle = Self::new();
        for (name, font) in fonts {
            match FontCatalog::from_json(&name, font) {
                Ok(catalog) => bundle.push(catalog),
                Err(e) if !strict => log::error!("Skipping font {name:?}: {e}"),
                Err(e) => return Err(e),
            }
        }
        log::info!("Font bundle loaded: {} fonts", bundle.len());
        Ok(bundle)
    }

    /// Append a font. A font with an existing name replaces it in place.
    pub fn push(&mut self, catalog: FontCatalog) {
        match self.fonts.iter_mut().find(|f| f.name() == catalog.name()) {
            Some(existing) => *existing = catalog,
            None => self.fonts.push(catalog),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FontCatalog> {
        self.fonts.iter().find(|f| f.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fonts.iter().map(FontCatalog::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontCatalog> + '_ {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> FontCatalog {
        FontCatalog::new("sample")
            .with_glyph('A', GlyphDefinition::from_art(&["#", "#"]))
            .with_glyph('b', GlyphDefinition::from_art(&["##", "##"]))
            .with_glyph(' ', GlyphDefinition::from_art(&[".", "."]))
    }

    #[test]
    fn test_resolve_exact() {
        let catalog = sample_catalog();
        assert!(matches!(catalog.resolve('A'), Some(Lookup::Glyph(g)) if g.width() == 1));
    }

    #[test]
    fn test_resolve_lowercase_fallback() {
        let catalog = sample_catalog();
        assert!(matches!(catalog.resolve('B'), Some(Lookup::Glyph(g)) if g.width() == 2));
        // Uppercase is not tried for a lowercase miss.
        assert!(matches!(catalog.resolve('a'), Some(Lookup::Space(_))));
    }

    #[test]
    fn test_resolve_space_and_fallback() {
        let catalog = sample_catalog();
        assert!(matches!(catalog.resolve(' '), Some(Lookup::Space(_))));
        assert!(matches!(catalog.resolve('?'), Some(Lookup::Space(_))));
    }

    #[test]
    fn test_resolve_miss_without_space() {
        let catalog = FontCatalog::new("no-space").with_glyph('A', GlyphDefinition::from_art(&["#"]));
        assert_eq!(catalog.resolve('?'), None);
        assert_eq!(catalog.resolve(' '), None);
    }

    #[test]
    fn test_reference_glyph_order() {
        let catalog = sample_catalog();
        assert_eq!(catalog.glyph_height(), Some(2));

        let lower_only = FontCatalog::new("lower")
            .with_glyph('a', GlyphDefinition::from_art(&["#", "#", "#"]))
            .with_glyph(' ', GlyphDefinition::from_art(&["."]));
        assert_eq!(lower_only.glyph_height(), Some(3));

        let space_only = FontCatalog::new("space").with_glyph(' ', GlyphDefinition::from_art(&[".."; 4]));
        assert_eq!(space_only.glyph_height(), Some(4));

        let none = FontCatalog::new("none").with_glyph('z', GlyphDefinition::from_art(&["#"]));
        assert!(none.reference_glyph().is_none());
    }

    #[test]
    fn test_bundle_preserves_order_and_geometry() {
        let json = r#"{
            "Grid": { "A": [[0,1,0],[1,0,1]], " ": [[0],[0]] },
            "threeXFiveMinifont": { "A": [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1] },
            "Microfont3x3": { "a": [1,1,1, 1,0,1, 1,1,1] }
        }"#;
        let bundle = FontBundle::from_json_str(json).unwrap();
        let names: Vec<_> = bundle.names().collect();
        assert_eq!(names, vec!["Grid", "threeXFiveMinifont", "Microfont3x3"]);

        let mini = bundle.get("threeXFiveMinifont").unwrap();
        assert_eq!(mini.glyph_height(), Some(5));
        assert_eq!(mini.get('A').unwrap().width(), 3);

        let micro = bundle.get("Microfont3x3").unwrap();
        assert_eq!(micro.glyph_height(), Some(3));
    }

    #[test]
    fn test_explicit_geometry() {
        let json = r#"{
            "Tall": { "geometry": { "width": 2, "height": 3 },
                      "glyphs": { "A": [1,1, 1,0, 1,1] } }
        }"#;
        let bundle = FontBundle::from_json_str_strict(json).unwrap();
        let tall = bundle.get("Tall").unwrap();
        let a = tall.get('A').unwrap();
        assert_eq!((a.width(), a.height()), (2, 3));
        assert!(!a.is_ink(1, 1));
    }

    #[test]
    fn test_unknown_packed_geometry_rejected() {
        let json = r#"{ "Mystery": { "A": [1,0,1,0] }, "Grid": { "A": [[1]] } }"#;
        let err = FontBundle::from_json_str_strict(json).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownGeometry { ref font } if font == "Mystery"));

        // Lenient loading keeps the good fonts.
        let bundle = FontBundle::from_json_str(json).unwrap();
        assert_eq!(bundle.len(), 1);
        assert!(bundle.get("Grid").is_some());
    }

    #[test]
    fn test_invalid_glyph_rejected() {
        let json = r#"{ "Bad": { "A": "not cells" } }"#;
        let err = FontBundle::from_json_str_strict(json).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidGlyph { ref key, .. } if key == "A"));
    }

    #[test]
    fn test_multi_char_keys_skipped() {
        let json = r#"{ "F": { "A": [[1]], "AB": [[1]] } }"#;
        let bundle = FontBundle::from_json_str_strict(json).unwrap();
        assert_eq!(bundle.get("F").unwrap().len(), 1);
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(matches!(FontBundle::from_json_str("[1, 2]"), Err(CatalogError::NotAnObject)));
        assert!(matches!(FontBundle::from_json_str("{"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn test_from_reader() {
        let json = br#"{ "G": { "A": [[1,1]] } }"#;
        let bundle = FontBundle::from_reader(&json[..]).unwrap();
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn test_push_replaces_same_name() {
        let mut bundle = FontBundle::new();
        bundle.push(FontCatalog::new("x"));
        bundle.push(FontCatalog::new("y"));
        bundle.push(FontCatalog::new("x").with_glyph('A', GlyphDefinition::from_art(&["#"])));
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.names().next(), Some("x"));
        assert_eq!(bundle.get("x").unwrap().len(), 1);
    }
}
