//! Pixfont desktop — session state shared by the native previewer.
//!
//! The binary in `main.rs` wires winit input into a [`Session`] and blits
//! its composed frame through softbuffer.

pub mod session;

pub use session::{ExportError, FontChoice, InkTrend, Session, SessionConfig, BITMAP_KEY_PREFIX};
