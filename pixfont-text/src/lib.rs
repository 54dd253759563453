//! # pixfont-text
//!
//! Text-to-bitmap rasterizers for the pixel-font engine.
//!
//! ## Architecture
//!
//! ```text
//!  FontCatalog ──► GlyphRasterizer ──► layout ──► compose ──┐
//!                                                           ├──► Rendered
//!  family str ──► VectorRasterizer<B: TextBackend> ──► Surface ──► threshold
//!                          │
//!                          └── TextEngine (cosmic-text FontSystem + SwashCache)
//! ```
//!
//! - **`glyph`** — Bitmap-font rasterizer: line layout, alignment, ink count.
//! - **`vector`** — Outline-font rasterizer over a pluggable text backend.
//! - **`engine`** — The cosmic-text backend.
//! - **`fonts`** — Vector font descriptors and CSS family chains.

pub mod engine;
pub mod fonts;
pub mod glyph;
pub mod vector;

// Re-exports for ergonomic use.
pub use engine::{ResolvedFamily, TextEngine};
pub use fonts::{default_vector_fonts, FamilyChain, FamilyName, GenericFamily, VectorFont};
pub use glyph::{
    GlyphRasterizer, GlyphSpacing, LineLayout, Placement, RenderError, TextLayout, SPACE_ADVANCE,
};
pub use vector::{Surface, TextBackend, VectorConfig, VectorRasterizer};
