//! The field's color vocabulary: five base colors plus a link accent.

use gossamer_platform::Rgba;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A base color. Alpha is decided at draw time, per particle or per link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha channel for a draw call.
    pub fn alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

/// Particle colors plus the accent used for link strokes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub entries: [Rgb; 5],
    pub accent: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: [
                Rgb::new(34, 197, 94),  // green
                Rgb::new(16, 185, 129), // emerald
                Rgb::new(20, 184, 166), // teal
                Rgb::new(59, 130, 246), // blue
                Rgb::new(147, 51, 234), // purple
            ],
            accent: Rgb::new(34, 197, 94),
        }
    }
}

impl Palette {
    /// Pick one of the entries uniformly.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Rgb {
        self.entries[rng.gen_range(0..self.entries.len())]
    }
}
