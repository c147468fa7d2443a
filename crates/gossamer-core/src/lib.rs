//! Gossamer core engine: platform-agnostic particle field simulation,
//! pointer interaction, and the frame pump that drives both.

pub mod config;
pub mod engine;
pub mod field;
pub mod palette;
pub mod particle;

pub use config::{
    AmbientConfig, AttractionConfig, ConfigError, FieldConfig, GlowConfig, LinkConfig,
    PointerConfig,
};
pub use engine::{Engine, EngineHandle, HostEvent};
pub use field::ParticleField;
pub use palette::{Palette, Rgb};
pub use particle::{Particle, ParticleKind};
