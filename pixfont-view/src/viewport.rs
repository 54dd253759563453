//! Viewport controller — pan and zoom over a rendered pixel buffer.
//!
//! [`ViewportState`] is a plain value: every transform returns a new state
//! computed from the old one, so zoom and pan always change together.
//! [`Viewport`] owns one state plus the gesture machine that turns pointer,
//! touch and wheel events into new states.
//!
//! ```text
//!            pointer_down / 1-finger touch_start
//!   Idle ─────────────────────────────────────────► Panning { last }
//!    ▲                                                 │ pointer_move / touch_move
//!    │      pointer_up / pointer_leave / touch_end     │ pan += current − last
//!    └─────────────────────────────────────────────────┘
//!
//!   2-finger touch_start records the pinch distance; 2-finger touch_move
//!   zooms by (d − d_last)·sensitivity around the centroid.
//! ```

use std::fmt;

/// Surface background, `#f0f0f0`.
pub const BACKGROUND_RGBA: [u8; 4] = [240, 240, 240, 255];
/// Grid overlay, `rgba(229, 229, 229, 0.5)`.
pub const GRID_RGBA: [u8; 4] = [229, 229, 229, 128];

// ── Configuration ───────────────────────────────────────────────────

/// Zoom limits, gesture tuning and composition colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub initial_zoom: f32,
    /// Zoom change per wheel notch.
    pub wheel_step: f32,
    /// Zoom change per pixel of pinch-distance change.
    pub pinch_sensitivity: f32,
    pub background: [u8; 4],
    pub grid_color: [u8; 4],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 1.0,
            max_zoom: 15.0,
            initial_zoom: 4.0,
            wheel_step: 1.0,
            pinch_sensitivity: 0.05,
            background: BACKGROUND_RGBA,
            grid_color: GRID_RGBA,
        }
    }
}

impl ViewportConfig {
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

// ── State ───────────────────────────────────────────────────────────

/// Zoom level and pan offset (surface pixels) of the preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ViewportConfig::default().initial_zoom)
    }
}

impl ViewportState {
    pub fn new(zoom: f32) -> Self {
        Self {
            zoom,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    /// Convert surface coordinates to buffer coordinates.
    pub fn screen_to_buffer(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// Convert buffer coordinates to surface coordinates.
    pub fn buffer_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
    }

    /// Shift by a surface-space delta.
    pub fn panned(self, dx: f32, dy: f32) -> Self {
        Self {
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
            ..self
        }
    }

    /// Change zoom to `zoom` keeping the buffer point under `anchor` fixed.
    ///
    /// `p' = a − (a − p)·(z0 / z1)` on each axis.
    pub fn zoomed_at(self, anchor: (f32, f32), zoom: f32) -> Self {
        let ratio = self.zoom / zoom;
        let (ax, ay) = anchor;
        Self {
            zoom,
            pan_x: ax - (ax - self.pan_x) * ratio,
            pan_y: ay - (ay - self.pan_y) * ratio,
        }
    }

    /// Pan so a `buffer`-sized image sits in the middle of `surface`.
    pub fn recentred(self, surface: (f32, f32), buffer: (u32, u32)) -> Self {
        Self {
            pan_x: (surface.0 - buffer.0 as f32 * self.zoom) / 2.0,
            pan_y: (surface.1 - buffer.1 as f32 * self.zoom) / 2.0,
            ..self
        }
    }
}

impl fmt::Display for ViewportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}× @ ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

// ── Gestures ────────────────────────────────────────────────────────

/// A touch contact in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &TouchPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &TouchPoint) -> (f32, f32) {
        ((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Drag state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        last: (f32, f32),
    },
}

// ── Controller ──────────────────────────────────────────────────────

/// Owns the viewport state and turns input events into state changes.
///
/// Every event method returns `true` when the preview must be redrawn.
#[derive(Clone, Debug)]
pub struct Viewport {
    state: ViewportState,
    gesture: Gesture,
    pinch_distance: Option<f32>,
    config: ViewportConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            state: ViewportState::new(config.clamp_zoom(config.initial_zoom)),
            gesture: Gesture::Idle,
            pinch_distance: None,
            config,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn screen_to_buffer(&self, x: f32, y: f32) -> (f32, f32) {
        self.state.screen_to_buffer(x, y)
    }

    /// Set zoom (clamped) around `anchor`.
    pub fn zoom_to(&mut self, zoom: f32, anchor: (f32, f32)) -> bool {
        let zoom = self.config.clamp_zoom(zoom);
        if zoom == self.state.zoom {
            return false;
        }
        self.state = self.state.zoomed_at(anchor, zoom);
        true
    }

    /// Center a `buffer`-sized image in `surface`, discarding user pan.
    pub fn recentre(&mut self, surface: (f32, f32), buffer: (u32, u32)) -> bool {
        self.state = self.state.recentred(surface, buffer);
        log::debug!("Viewport recentred: {}", self.state);
        true
    }

    // ── Pointer ──

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.gesture = Gesture::Panning { last: (x, y) };
        false
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let Gesture::Panning { last } = self.gesture else {
            return false;
        };
        self.gesture = Gesture::Panning { last: (x, y) };
        self.state = self.state.panned(x - last.0, y - last.1);
        true
    }

    pub fn pointer_up(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        false
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }

    // ── Touch ──

    pub fn touch_start(&mut self, points: &[TouchPoint]) -> bool {
        match points {
            [p] => self.gesture = Gesture::Panning { last: (p.x, p.y) },
            [a, b] => self.pinch_distance = Some(a.distance(b)),
            _ => {}
        }
        false
    }

    pub fn touch_move(&mut self, points: &[TouchPoint]) -> bool {
        match points {
            [p] => self.pointer_move(p.x, p.y),
            [a, b] => {
                let Some(last_distance) = self.pinch_distance else {
                    return false;
                };
                let distance = a.distance(b);
                self.pinch_distance = Some(distance);
                let zoom = self.state.zoom
                    + (distance - last_distance) * self.config.pinch_sensitivity;
                self.zoom_to(zoom, a.midpoint(b));
                true
            }
            _ => false,
        }
    }

    pub fn touch_end(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        self.pinch_distance = None;
        false
    }

    // ── Wheel ──

    /// Step zoom in (`delta_y < 0`) or out by one notch around `(x, y)`.
    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32) -> bool {
        let step = if delta_y < 0.0 {
            self.config.wheel_step
        } else {
            -self.config.wheel_step
        };
        self.zoom_to(self.state.zoom + step, (x, y))
    }
}

// ===================================================================
// Tests
// ===================================================================
