//! Preview session — owns the font list, render state and viewport.
//!
//! `Session` is the single source of truth for the running preview. Input
//! events re-render through the matching rasterizer and update the
//! viewport; every event method returns whether a redraw is needed.

use std::fs;
use std::path::{Path, PathBuf};

use pixfont_core::{Alignment, EncodeError, FontBundle, PixelBuffer, Rendered};
use pixfont_text::{
    GlyphRasterizer, GlyphSpacing, TextBackend, VectorConfig, VectorFont, VectorRasterizer,
};
use pixfont_view::{
    compose, compose_into, ComposeError, TouchPoint, Viewport, ViewportConfig, ViewportState,
};
use thiserror::Error;
use tiny_skia::{Pixmap, PixmapMut};

/// Key prefix marking a bitmap font from the bundle.
pub const BITMAP_KEY_PREFIX: &str = "custom-";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("enter some text to generate an image")]
    EmptyText,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Configuration ───────────────────────────────────────────────────

/// Startup values and tuning for a session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub initial_text: String,
    /// Font key selected at startup; the first font is used if it is missing.
    pub initial_font: String,
    /// Vector font size in pixels.
    pub font_size: f32,
    pub font_size_bounds: (f32, f32),
    pub spacing: GlyphSpacing,
    pub vector: VectorConfig,
    pub viewport: ViewportConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_text: "Hello World!".to_string(),
            initial_font: format!("{BITMAP_KEY_PREFIX}threeXFiveMinifont"),
            font_size: 16.0,
            font_size_bounds: (8.0, 128.0),
            spacing: GlyphSpacing::default(),
            vector: VectorConfig::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

// ── Font choice ─────────────────────────────────────────────────────

/// One entry of the font picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontChoice {
    /// A bundle font, by name.
    Bitmap(String),
    Vector(VectorFont),
}

impl FontChoice {
    /// Selection key: `custom-<name>` for bundle fonts, the family string
    /// for vector fonts.
    pub fn key(&self) -> String {
        match self {
            Self::Bitmap(name) => format!("{BITMAP_KEY_PREFIX}{name}"),
            Self::Vector(font) => font.family.clone(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Bitmap(name) => name,
            Self::Vector(font) => &font.name,
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }
}

/// Direction of the ink count relative to the previous render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InkTrend {
    Increased,
    Decreased,
    Unchanged,
}

// ── Session ─────────────────────────────────────────────────────────

/// Owns the whole text → buffer → viewport pipeline.
pub struct Session<B: TextBackend> {
    bundle: FontBundle,
    fonts: Vec<FontChoice>,
    current: Option<usize>,
    text: String,
    alignment: Alignment,
    font_size: f32,
    glyphs: GlyphRasterizer,
    vector: VectorRasterizer<B>,
    rendered: Rendered,
    previous_ink: u32,
    surface: (u32, u32),
    viewport: Viewport,
    hint_visible: bool,
    config: SessionConfig,
}

impl<B: TextBackend> Session<B> {
    /// Build a session over a loaded bundle and vector font list.
    ///
    /// Bundle fonts come first in the picker, then vector fonts.
    pub fn new(
        bundle: FontBundle,
        vector_fonts: Vec<VectorFont>,
        backend: B,
        config: SessionConfig,
    ) -> Self {
        let fonts: Vec<FontChoice> = bundle
            .names()
            .map(|name| FontChoice::Bitmap(name.to_string()))
            .chain(vector_fonts.into_iter().map(FontChoice::Vector))
            .collect();
        let current = fonts
            .iter()
            .position(|f| f.key() == config.initial_font)
            .or(if fonts.is_empty() { None } else { Some(0) });

        let mut session = Self {
            bundle,
            fonts,
            current,
            text: config.initial_text.clone(),
            alignment: Alignment::default(),
            font_size: config.font_size,
            glyphs: GlyphRasterizer::with_spacing(config.spacing),
            vector: VectorRasterizer::with_config(backend, config.vector),
            rendered: Rendered::empty(),
            previous_ink: 0,
            surface: (0, 0),
            viewport: Viewport::new(config.viewport),
            hint_visible: true,
            config,
        };
        session.rerender();
        log::info!(
            "Session started: {} fonts, current {:?}",
            session.fonts.len(),
            session.current_font().map(FontChoice::display_name)
        );
        session
    }

    // ── Accessors ──

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn fonts(&self) -> &[FontChoice] {
        &self.fonts
    }

    pub fn current_font(&self) -> Option<&FontChoice> {
        self.current.map(|i| &self.fonts[i])
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.rendered.buffer
    }

    pub fn ink_count(&self) -> u32 {
        self.rendered.ink_count
    }

    pub fn ink_trend(&self) -> InkTrend {
        match self.rendered.ink_count.cmp(&self.previous_ink) {
            std::cmp::Ordering::Greater => InkTrend::Increased,
            std::cmp::Ordering::Less => InkTrend::Decreased,
            std::cmp::Ordering::Equal => InkTrend::Unchanged,
        }
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    /// Whitespace-only text counts as empty.
    pub fn is_text_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Size controls only apply to vector fonts.
    pub fn font_size_adjustable(&self) -> bool {
        self.current_font().is_some_and(FontChoice::is_vector)
    }

    /// The usage hint shows until the first pan or zoom gesture.
    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    // ── Text and font inputs ──

    pub fn text_changed(&mut self, text: impl Into<String>) -> bool {
        self.text = text.into();
        self.rerender();
        true
    }

    pub fn alignment_selected(&mut self, alignment: Alignment) -> bool {
        self.alignment = alignment;
        self.rerender();
        true
    }

    /// Step the vector font size by `delta`, within the configured bounds.
    pub fn font_size_delta(&mut self, delta: i32) -> bool {
        let (min, max) = self.config.font_size_bounds;
        let size = (self.font_size + delta as f32).clamp(min, max);
        if size == self.font_size {
            return false;
        }
        self.font_size = size;
        self.rerender();
        true
    }

    /// Select a font by key; unknown keys are ignored.
    pub fn font_selected(&mut self, key: &str) -> bool {
        match self.fonts.iter().position(|f| f.key() == key) {
            Some(index) => self.switch_font(index),
            None => {
                log::warn!("Unknown font key {key:?}");
                false
            }
        }
    }

    pub fn next_font(&mut self) -> bool {
        self.step_font(1)
    }

    pub fn previous_font(&mut self) -> bool {
        self.step_font(-1)
    }

    fn step_font(&mut self, step: isize) -> bool {
        let (Some(current), len) = (self.current, self.fonts.len()) else {
            return false;
        };
        let index = (current as isize + step).rem_euclid(len as isize) as usize;
        self.switch_font(index)
    }

    fn switch_font(&mut self, index: usize) -> bool {
        self.current = Some(index);
        self.rerender();
        self.recentre();
        true
    }

    // ── Surface and gestures ──

    /// Track the display surface size and recentre the buffer in it.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.surface = (width, height);
        self.recentre();
        true
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.hint_visible = false;
        self.viewport.pointer_down(x, y)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.viewport.pointer_move(x, y)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.viewport.pointer_up()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.viewport.pointer_leave()
    }

    pub fn touch_start(&mut self, points: &[TouchPoint]) -> bool {
        self.hint_visible = false;
        self.viewport.touch_start(points)
    }

    pub fn touch_move(&mut self, points: &[TouchPoint]) -> bool {
        self.viewport.touch_move(points)
    }

    pub fn touch_end(&mut self) -> bool {
        self.viewport.touch_end()
    }

    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) -> bool {
        self.hint_visible = false;
        self.viewport.wheel(delta_y, x, y)
    }

    // ── Outputs ──

    /// Compose the preview at the current surface size.
    pub fn frame(&self) -> Result<Pixmap, ComposeError> {
        let (width, height) = self.surface;
        compose(
            &self.rendered.buffer,
            &self.viewport.state(),
            width,
            height,
            self.viewport.config(),
        )
    }

    /// Compose the preview into a caller-owned pixmap.
    pub fn draw_into(&self, target: &mut PixmapMut<'_>) -> Result<(), ComposeError> {
        compose_into(
            target,
            &self.rendered.buffer,
            &self.viewport.state(),
            self.viewport.config(),
        )
    }

    /// PNG bytes of the rendered buffer at 1:1 scale.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        if self.is_text_empty() {
            return Err(ExportError::EmptyText);
        }
        Ok(self.rendered.buffer.encode_png()?)
    }

    /// `pixel_font_<text>.png`, with every character outside
    /// `[A-Za-z0-9\n]` replaced by one `_` per UTF-16 code unit, so an
    /// astral character such as an emoji becomes `__`.
    pub fn export_file_name(&self) -> String {
        let stem: String = self
            .text
            .chars()
            .flat_map(|c| {
                if c.is_ascii_alphanumeric() || c == '\n' {
                    std::iter::repeat(c).take(1)
                } else {
                    std::iter::repeat('_').take(c.len_utf16())
                }
            })
            .collect();
        format!("pixel_font_{stem}.png")
    }

    /// Write the export into `dir`, returning the written path.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let png = self.export_png()?;
        let path = dir.join(self.export_file_name());
        fs::write(&path, png)?;
        log::info!("Exported {}", path.display());
        Ok(path)
    }

    // ── Internals ──

    fn rerender(&mut self) {
        let rendered = match self.current.map(|i| &self.fonts[i]) {
            Some(FontChoice::Bitmap(name)) => match self.bundle.get(name) {
                Some(catalog) => self.glyphs.render(catalog, &self.text, self.alignment),
                None => {
                    log::warn!("Font {name:?} is not in the bundle");
                    Rendered::empty()
                }
            },
            Some(FontChoice::Vector(font)) => {
                self.vector
                    .render(&self.text, &font.family, self.font_size, self.alignment)
            }
            None => {
                log::warn!("No font selected");
                Rendered::empty()
            }
        };

        self.previous_ink = self.rendered.ink_count;
        self.rendered = rendered;
        log::debug!(
            "Rendered {}×{}, {} ink pixels ({:?})",
            self.rendered.buffer.width(),
            self.rendered.buffer.height(),
            self.rendered.ink_count,
            self.ink_trend()
        );
    }

    fn recentre(&mut self) {
        let (width, height) = self.surface;
        let buffer = (self.rendered.buffer.width(), self.rendered.buffer.height());
        self.viewport
            .recentre((width as f32, height as f32), buffer);
    }
}

// ===================================================================
// Tests
// ===================================================================
