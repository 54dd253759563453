//! # pixfont-view
//!
//! Interactive preview of a rendered pixel buffer: pan, zoom anchored at
//! the cursor or pinch centroid, and composition onto a display surface.
//!
//! ```text
//! pointer / touch / wheel ──► Viewport ──► ViewportState { zoom, pan }
//!                                                │
//!                  PixelBuffer ──► compose ◄─────┘ ──► tiny-skia Pixmap
//! ```
//!
//! - **`viewport`** — State value, gesture machine, zoom anchoring.
//! - **`compose`** — Background, nearest-neighbour blit and grid overlay.

pub mod compose;
pub mod viewport;

pub use compose::{buffer_pixmap, compose, compose_into, grid_path, ComposeError};
pub use viewport::{
    Gesture, TouchPoint, Viewport, ViewportConfig, ViewportState, BACKGROUND_RGBA, GRID_RGBA,
};
