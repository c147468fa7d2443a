//! Engine tuning knobs.
//!
//! Defaults reproduce the animation as shipped; a TOML file may override
//! any subset of them:
//!
//! ```toml
//! [ambient]
//! max_count = 200
//! glow_chance = 0.5
//!
//! [attraction]
//! radius = 140.0
//!
//! [palette]
//! accent = { r = 255, g = 255, b = 255 }
//! ```
//!
//! Several constants are deliberate magic numbers inherited from hand
//! tuning (the `1e-4` attraction strength, the 0.2 spawn chance, the 0.1
//! link alpha). They are exposed, not rationalized.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::Palette;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The ambient population: particles seeded at startup that drift and
/// respawn forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Hard cap on the seeded population.
    pub max_count: u32,
    /// One seeded particle per this many pixels of viewport width.
    pub width_per_particle: f32,
    /// Velocity components are drawn from `[-drift_speed, drift_speed)`.
    pub drift_speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Life budget in frames, drawn from `[life_min, life_max)`.
    pub life_min: u32,
    pub life_max: u32,
    /// Probability that a seeded particle carries the glow halo.
    pub glow_chance: f64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            max_count: 150,
            width_per_particle: 10.0,
            drift_speed: 0.25,
            radius_min: 1.0,
            radius_max: 4.0,
            opacity_min: 0.2,
            opacity_max: 0.7,
            life_min: 100,
            life_max: 300,
            glow_chance: 0.3,
        }
    }
}

/// Pointer attraction force field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractionConfig {
    /// Particles closer to the pointer than this are pulled toward it.
    pub radius: f32,
    /// Per-frame acceleration is `gap * (radius - d) / radius * strength`.
    pub strength: f32,
}

impl Default for AttractionConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            strength: 1e-4,
        }
    }
}

/// Proximity links drawn between nearby particles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Pairs closer than this get a connecting stroke.
    pub radius: f32,
    /// Stroke alpha at zero distance; fades linearly to 0 at `radius`.
    pub max_alpha: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            radius: 120.0,
            max_alpha: 0.1,
        }
    }
}

/// Transient particles emitted while the pointer moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Chance that one pointer-move event emits a particle.
    pub spawn_chance: f64,
    /// Spawn position scatter, up to this many pixels per axis.
    pub jitter: f32,
    /// Velocity components are drawn from `[-speed, speed)`.
    pub speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Opacity at spawn; fades linearly to 0 over `life`.
    pub opacity: f32,
    /// Fixed life budget in frames.
    pub life: u32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.2,
            jitter: 10.0,
            speed: 1.0,
            radius_min: 2.0,
            radius_max: 6.0,
            opacity: 0.8,
            life: 60,
        }
    }
}

/// Halo rendering for glow-kind particles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    /// Halo reach in pixels beyond the disc edge.
    pub blur: f32,
    /// Halo color alpha, independent of the particle's own opacity.
    pub halo_alpha: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            blur: 20.0,
            halo_alpha: 0.8,
        }
    }
}

/// Everything the field needs to know, grouped per concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub ambient: AmbientConfig,
    pub attraction: AttractionConfig,
    pub links: LinkConfig,
    pub pointer: PointerConfig,
    pub glow: GlowConfig,
    pub palette: Palette,
}

impl FieldConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Ambient particle count for a viewport width:
    /// `min(max_count, floor(width / width_per_particle))`.
    ///
    /// Total over any input; a degenerate `width_per_particle` saturates
    /// at `max_count` (or zero) instead of failing.
    pub fn ambient_count(&self, width: u32) -> usize {
        let by_width = (width as f32 / self.ambient.width_per_particle).floor() as u32;
        by_width.min(self.ambient.max_count) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_the_tuned_constants() {
        let config = FieldConfig::default();
        assert_eq!(config.ambient.max_count, 150);
        assert_eq!(config.ambient.glow_chance, 0.3);
        assert_eq!(config.attraction.radius, 100.0);
        assert_eq!(config.attraction.strength, 1e-4);
        assert_eq!(config.links.radius, 120.0);
        assert_eq!(config.links.max_alpha, 0.1);
        assert_eq!(config.pointer.spawn_chance, 0.2);
        assert_eq!(config.pointer.life, 60);
        assert_eq!(config.glow.blur, 20.0);
    }

    #[test]
    fn partial_toml_overrides_only_what_it_names() {
        let config = FieldConfig::from_toml_str(
            "[ambient]\nmax_count = 40\n\n[links]\nradius = 90.0\n",
        )
        .unwrap();
        assert_eq!(config.ambient.max_count, 40);
        assert_eq!(config.links.radius, 90.0);
        // untouched sections keep their defaults
        assert_eq!(config.ambient.glow_chance, 0.3);
        assert_eq!(config.pointer.spawn_chance, 0.2);
    }

    #[test]
    fn bad_toml_reports_a_parse_error() {
        let err = FieldConfig::from_toml_str("[ambient\nmax_count = 40").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn ambient_count_applies_cap_and_floor() {
        let config = FieldConfig::default();
        assert_eq!(config.ambient_count(800), 80);
        assert_eq!(config.ambient_count(809), 80);
        assert_eq!(config.ambient_count(5000), 150);
        assert_eq!(config.ambient_count(1500), 150);
        assert_eq!(config.ambient_count(9), 0);
        assert_eq!(config.ambient_count(0), 0);
    }

    #[test]
    fn palette_override_reaches_the_accent() {
        let config = FieldConfig::from_toml_str("[palette]\naccent = { r = 1, g = 2, b = 3 }\n")
            .unwrap();
        assert_eq!(config.palette.accent, crate::palette::Rgb::new(1, 2, 3));
        // entries stay at the default five
        assert_eq!(config.palette.entries.len(), 5);
    }
}
