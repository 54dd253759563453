//! Preview composition with tiny-skia.
//!
//! The surface is cleared to the background, the buffer is drawn under
//! `translate(pan) ∘ scale(zoom)` with nearest-neighbour sampling, then a
//! grid is stroked at every integer buffer coordinate with a width of
//! `1 / zoom` so lines stay one device pixel wide.

use pixfont_core::PixelBuffer;
use thiserror::Error;
use tiny_skia::{
    Color, FilterQuality, IntSize, Paint, Path, PathBuilder, Pixmap, PixmapMut, PixmapPaint,
    Stroke, Transform,
};

use crate::viewport::{ViewportConfig, ViewportState};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("cannot allocate a {width}×{height} surface")]
    Surface { width: u32, height: u32 },
    #[error("cannot wrap a {width}×{height} buffer as a pixmap")]
    Buffer { width: u32, height: u32 },
}

/// Wrap a pixel buffer as a pixmap (ink opaque black, empty transparent).
pub fn buffer_pixmap(buffer: &PixelBuffer) -> Result<Pixmap, ComposeError> {
    let err = ComposeError::Buffer {
        width: buffer.width(),
        height: buffer.height(),
    };
    let size = IntSize::from_wh(buffer.width(), buffer.height()).ok_or(err.clone())?;
    // Both cell colors are already valid premultiplied RGBA.
    Pixmap::from_vec(buffer.to_rgba8(), size).ok_or(err)
}

/// Path with one segment per grid line of a `width`×`height` buffer.
pub fn grid_path(width: u32, height: u32) -> Option<Path> {
    let (w, h) = (width as f32, height as f32);
    let mut pb = PathBuilder::new();
    for x in 0..=width {
        pb.move_to(x as f32, 0.0);
        pb.line_to(x as f32, h);
    }
    for y in 0..=height {
        pb.move_to(0.0, y as f32);
        pb.line_to(w, y as f32);
    }
    pb.finish()
}

/// Compose the preview into an existing pixmap (e.g. a window buffer).
pub fn compose_into(
    target: &mut PixmapMut<'_>,
    buffer: &PixelBuffer,
    state: &ViewportState,
    config: &ViewportConfig,
) -> Result<(), ComposeError> {
    let [r, g, b, a] = config.background;
    target.fill(Color::from_rgba8(r, g, b, a));

    let source = buffer_pixmap(buffer)?;
    let transform = Transform::from_row(state.zoom, 0.0, 0.0, state.zoom, state.pan_x, state.pan_y);
    let paint = PixmapPaint {
        quality: FilterQuality::Nearest,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

    if let Some(grid) = grid_path(buffer.width(), buffer.height()) {
        let [r, g, b, a] = config.grid_color;
        let mut grid_paint = Paint::default();
        grid_paint.set_color_rgba8(r, g, b, a);
        let stroke = Stroke {
            width: 1.0 / state.zoom,
            ..Stroke::default()
        };
        target.stroke_path(&grid, &grid_paint, &stroke, transform, None);
    }
    Ok(())
}

/// Compose the preview into a fresh `width`×`height` pixmap.
pub fn compose(
    buffer: &PixelBuffer,
    state: &ViewportState,
    width: u32,
    height: u32,
    config: &ViewportConfig,
) -> Result<Pixmap, ComposeError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(ComposeError::Surface { width, height })?;
    compose_into(&mut pixmap.as_mut(), buffer, state, config)?;
    log::trace!("Composed {width}×{height} preview at {state}");
    Ok(pixmap)
}

// ===================================================================
// Tests
// ===================================================================
