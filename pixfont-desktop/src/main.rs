//! Pixfont Desktop — native pixel-font previewer.
//!
//! Uses `winit` 0.30 for windowing and input, `softbuffer` to present the
//! CPU-composed frame, and a [`Session`] over the cosmic-text backend.
//!
//! Usage: `pixfont-desktop [fonts.json]`

use std::collections::BTreeMap;
use std::fs::File;
use std::num::NonZeroU32;
use std::sync::Arc;

use log::{error, info, warn};
use pixfont_core::{Alignment, CatalogError, FontBundle};
use pixfont_desktop::{ExportError, InkTrend, Session, SessionConfig};
use pixfont_text::{default_vector_fonts, TextEngine};
use pixfont_view::{ComposeError, TouchPoint};
use softbuffer::{Context, SoftBufferError, Surface};
use thiserror::Error;
use tiny_skia::PixmapMut;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, ModifiersState, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

const DEFAULT_BUNDLE: &str = "fonts.json";
const WINDOW_TITLE: &str = "Pixfont";

#[derive(Error, Debug)]
enum FrameError {
    #[error("softbuffer: {0}")]
    Surface(#[from] SoftBufferError),
    #[error("compose: {0}")]
    Compose(#[from] ComposeError),
    #[error("window buffer does not fit a {0}×{1} pixmap")]
    Pixmap(u32, u32),
}

/// Window plus the softbuffer surface presenting into it.
struct Display {
    // Dropped before the window.
    surface: Surface<Arc<Window>, Arc<Window>>,
    window: Arc<Window>,
}

/// Winit 0.30 application handler.
struct App {
    session: Session<TextEngine>,
    display: Option<Display>,
    cursor: (f32, f32),
    modifiers: ModifiersState,
    touches: BTreeMap<u64, TouchPoint>,
    frame_count: u64,
}

impl App {
    fn new(session: Session<TextEngine>) -> Self {
        Self {
            session,
            display: None,
            cursor: (0.0, 0.0),
            modifiers: ModifiersState::empty(),
            touches: BTreeMap::new(),
            frame_count: 0,
        }
    }

    fn create_display(event_loop: &ActiveEventLoop) -> Result<Display, Box<dyn std::error::Error>> {
        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(1024, 640))
            .with_min_inner_size(LogicalSize::new(320, 240));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = Context::new(Arc::clone(&window))?;
        let surface = Surface::new(&context, Arc::clone(&window))?;
        Ok(Display { surface, window })
    }

    /// Push the font name and pixel count into the title bar.
    fn update_title(&self) {
        let Some(display) = &self.display else {
            return;
        };
        let font = self
            .session
            .current_font()
            .map(|f| f.display_name())
            .unwrap_or("no font");
        let trend = match self.session.ink_trend() {
            InkTrend::Increased => " ▲",
            InkTrend::Decreased => " ▼",
            InkTrend::Unchanged => "",
        };
        let mut title = format!(
            "{WINDOW_TITLE} — {font} — Pixel Count: {}{trend}",
            self.session.ink_count()
        );
        if self.session.font_size_adjustable() {
            title.push_str(&format!(" — {}px", self.session.font_size()));
        }
        if self.session.hint_visible() {
            title.push_str(" — drag to pan, scroll to zoom");
        }
        display.window.set_title(&title);
    }

    fn touch_points(&self) -> Vec<TouchPoint> {
        self.touches.values().copied().collect()
    }

    fn handle_touch(&mut self, touch: Touch) -> bool {
        let point = TouchPoint::new(touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => {
                self.touches.insert(touch.id, point);
                let points = self.touch_points();
                self.session.touch_start(&points)
            }
            TouchPhase::Moved => {
                self.touches.insert(touch.id, point);
                let points = self.touch_points();
                self.session.touch_move(&points)
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&touch.id);
                self.session.touch_end()
            }
        }
    }

    fn handle_key(&mut self, key: Key, text: Option<&str>) -> bool {
        let ctrl = self.modifiers.control_key() || self.modifiers.super_key();
        match key {
            Key::Named(NamedKey::ArrowLeft) => self.session.previous_font(),
            Key::Named(NamedKey::ArrowRight) => self.session.next_font(),
            Key::Named(NamedKey::Backspace) => {
                let mut text = self.session.text().to_string();
                text.pop().is_some() && self.session.text_changed(text)
            }
            Key::Named(NamedKey::Enter) => {
                let text = format!("{}\n", self.session.text());
                self.session.text_changed(text)
            }
            Key::Character(ref c) if ctrl => match c.as_str() {
                "1" => self.session.alignment_selected(Alignment::Left),
                "2" => self.session.alignment_selected(Alignment::Center),
                "3" => self.session.alignment_selected(Alignment::Right),
                "4" => self.session.alignment_selected(Alignment::Justify),
                "+" | "=" => self.session.font_size_delta(1),
                "-" => self.session.font_size_delta(-1),
                "s" | "S" => {
                    self.export();
                    false
                }
                _ => false,
            },
            _ if !ctrl => match text {
                Some(typed) if typed.chars().all(|c| !c.is_control()) => {
                    let text = format!("{}{typed}", self.session.text());
                    self.session.text_changed(text)
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn export(&self) {
        let dir = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("Export failed: {e}");
                return;
            }
        };
        match self.session.export_to(&dir) {
            Ok(path) => info!("Saved {}", path.display()),
            Err(ExportError::EmptyText) => warn!("Please enter some text to generate an image."),
            Err(e) => error!("Export failed: {e}"),
        }
    }

    fn redraw(&mut self) -> Result<(), FrameError> {
        let Some(display) = self.display.as_mut() else {
            return Ok(());
        };
        let size = display.window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(());
        };
        display.surface.resize(width, height)?;

        let mut buffer = display.surface.buffer_mut()?;
        let mut pixmap = PixmapMut::from_bytes(
            bytemuck::cast_slice_mut(&mut buffer),
            size.width,
            size.height,
        )
        .ok_or(FrameError::Pixmap(size.width, size.height))?;
        self.session.draw_into(&mut pixmap)?;

        // tiny-skia writes RGBA bytes; softbuffer reads 0RGB words.
        for pixel in buffer.iter_mut() {
            *pixel = *pixel & 0xFF00_FF00
                | ((0x0000_00FF & *pixel) << 16)
                | ((0x00FF_0000 & *pixel) >> 16);
        }
        buffer.present()?;
        self.frame_count += 1;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.display.is_some() {
            return; // Already initialized.
        }

        let display = match Self::create_display(event_loop) {
            Ok(display) => display,
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = display.window.inner_size();
        self.session.resize(size.width, size.height);
        info!("Pixfont Desktop initialized: {}×{}", size.width, size.height);

        display.window.request_redraw();
        self.display = Some(display);
        self.update_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let redraw = match event {
            // ── Close ───────────────────────────────────────────
            WindowEvent::CloseRequested => {
                info!("Window closed after {} frames", self.frame_count);
                event_loop.exit();
                false
            }

            // ── Keyboard ────────────────────────────────────────
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                false
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.handle_key(event.logical_key.clone(), event.text.as_deref())
            }

            // ── Resize ──────────────────────────────────────────
            WindowEvent::Resized(new_size) => {
                self.session.resize(new_size.width, new_size.height)
            }

            // ── Pointer → pan ───────────────────────────────────
            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.cursor = (x as f32, y as f32);
                self.session.pointer_move(self.cursor.0, self.cursor.1)
            }
            WindowEvent::CursorLeft { .. } => self.session.pointer_leave(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.session.pointer_down(self.cursor.0, self.cursor.1),
                ElementState::Released => self.session.pointer_up(),
            },
            WindowEvent::Touch(touch) => self.handle_touch(touch),

            // ── Scroll → zoom ───────────────────────────────────
            WindowEvent::MouseWheel { delta, .. } => {
                // Scrolling up is positive here and zooms in.
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.session.wheel(dy, self.cursor.0, self.cursor.1)
            }

            // ── Redraw ──────────────────────────────────────────
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    error!("Render error: {e}");
                }
                false
            }

            _ => false,
        };

        if redraw {
            self.update_title();
            if let Some(display) = &self.display {
                display.window.request_redraw();
            }
        }
    }
}

fn load_bundle(path: &str) -> Result<FontBundle, CatalogError> {
    let file = File::open(path)?;
    FontBundle::from_reader(file)
}

fn main() {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_BUNDLE.to_string());
    info!("Starting Pixfont Desktop with {path}...");

    let bundle = load_bundle(&path).unwrap_or_else(|e| {
        error!("Error loading {path}: {e}; only vector fonts are available");
        FontBundle::new()
    });
    let session = Session::new(
        bundle,
        default_vector_fonts(),
        TextEngine::new(),
        SessionConfig::default(),
    );

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {e}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(session);
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {e}");
    }
}
