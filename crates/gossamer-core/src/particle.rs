//! Individual particle state and its spawn/respawn rules.

use glam::Vec2;
use rand::Rng;

use crate::config::{AmbientConfig, PointerConfig};
use crate::palette::{Palette, Rgb};

/// What a particle is for; governs its rendering style and what happens
/// when its life runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Seeded at startup; drifts and respawns forever.
    Ambient,
    /// Ambient behavior plus a soft halo when drawn.
    Glow,
    /// Emitted by pointer motion; fades out and is removed for good.
    PointerSpawned,
}

/// One particle. Positions are viewport pixels, velocities pixels per
/// frame; there is no wall-clock time anywhere in the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Drawn size, fixed at spawn.
    pub radius: f32,
    /// Current alpha in `[0, 1]`.
    pub opacity: f32,
    pub color: Rgb,
    /// Frames remaining; hits 0 at end of life.
    pub life: u32,
    /// Life budget assigned at spawn or respawn.
    pub max_life: u32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Seed one long-lived particle somewhere in `bounds`.
    pub(crate) fn ambient<R: Rng>(
        rng: &mut R,
        bounds: Vec2,
        cfg: &AmbientConfig,
        palette: &Palette,
    ) -> Self {
        let max_life = uniform_u32(rng, cfg.life_min, cfg.life_max);
        let kind = if cfg.glow_chance > 0.0 && rng.gen_bool(cfg.glow_chance.min(1.0)) {
            ParticleKind::Glow
        } else {
            ParticleKind::Ambient
        };
        Self {
            pos: random_point(rng, bounds),
            vel: Vec2::new(
                symmetric(rng, cfg.drift_speed),
                symmetric(rng, cfg.drift_speed),
            ),
            radius: uniform_f32(rng, cfg.radius_min, cfg.radius_max),
            opacity: uniform_f32(rng, cfg.opacity_min, cfg.opacity_max),
            color: palette.pick(rng),
            life: max_life,
            max_life,
            kind,
        }
    }

    /// Emit one transient particle near `at`, scattered by the configured
    /// jitter.
    pub(crate) fn pointer_spawned<R: Rng>(
        rng: &mut R,
        at: Vec2,
        cfg: &PointerConfig,
        palette: &Palette,
    ) -> Self {
        Self {
            pos: at + Vec2::new(symmetric(rng, cfg.jitter), symmetric(rng, cfg.jitter)),
            vel: Vec2::new(symmetric(rng, cfg.speed), symmetric(rng, cfg.speed)),
            radius: uniform_f32(rng, cfg.radius_min, cfg.radius_max),
            opacity: cfg.opacity,
            color: palette.pick(rng),
            life: cfg.life,
            max_life: cfg.life,
            kind: ParticleKind::PointerSpawned,
        }
    }

    /// Reinitialize in place: fresh position and opacity, full life budget.
    /// Velocity, color, and kind carry over.
    pub(crate) fn respawn<R: Rng>(&mut self, rng: &mut R, bounds: Vec2, cfg: &AmbientConfig) {
        self.pos = random_point(rng, bounds);
        self.life = self.max_life;
        self.opacity = uniform_f32(rng, cfg.opacity_min, cfg.opacity_max);
    }

    /// End of life: the frame counter ran out or the particle faded away.
    pub fn expired(&self) -> bool {
        self.life == 0 || self.opacity <= 0.0
    }
}

// Range-safe sampling: every config value is legal; empty or degenerate
// ranges collapse to the lower bound instead of panicking.

fn uniform_f32<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn uniform_u32<R: Rng>(rng: &mut R, lo: u32, hi: u32) -> u32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn symmetric<R: Rng>(rng: &mut R, magnitude: f32) -> f32 {
    if magnitude > 0.0 {
        rng.gen_range(-magnitude..magnitude)
    } else {
        0.0
    }
}

fn random_point<R: Rng>(rng: &mut R, bounds: Vec2) -> Vec2 {
    Vec2::new(
        uniform_f32(rng, 0.0, bounds.x),
        uniform_f32(rng, 0.0, bounds.y),
    )
}
