//! Host abstraction types so `gossamer-core` stays presentation-agnostic.
//!
//! The engine never talks to a window system, a GPU, or a file. It consumes
//! viewport and pointer data and emits draw calls against the [`Surface`]
//! trait; hosts decide what a surface actually is (a pixel buffer, a draw
//! list, a GPU pass).

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Viewport dimensions in pixels. Zero on either axis is legal and makes
/// every render a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extents as a float vector, `(width, height)`.
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A draw-call color: 8-bit channels plus a unit-interval alpha decided at
/// draw time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Frame-oriented 2-D drawing surface.
///
/// One frame is: `clear`, then any number of line/circle calls. Coordinates
/// are viewport pixels; backends clip as needed and never fail — a call
/// that lands nowhere simply draws nothing.
pub trait Surface {
    /// Reset the whole surface to transparent.
    fn clear(&mut self);

    /// Stroke a 1-px line between two points.
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba);

    /// Fill a disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Fill a disc with a soft halo behind it. `halo` is the halo color
    /// (alpha included) and `blur` its reach in pixels beyond the disc edge.
    fn glow_circle(&mut self, center: Vec2, radius: f32, color: Rgba, halo: Rgba, blur: f32);
}

/// One recorded draw operation, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear,
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    GlowCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        halo: Rgba,
        blur: f32,
    },
}

/// A [`Surface`] that records draw commands instead of producing pixels.
/// Used by headless hosts and by tests asserting on a frame's draw stream.
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCmd>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand over everything recorded so far, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for Recorder {
    fn clear(&mut self) {
        self.commands.push(DrawCmd::Clear);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.commands.push(DrawCmd::Line { from, to, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn glow_circle(&mut self, center: Vec2, radius: f32, color: Rgba, halo: Rgba, blur: f32) {
        self.commands.push(DrawCmd::GlowCircle {
            center,
            radius,
            color,
            halo,
            blur,
        });
    }
}
