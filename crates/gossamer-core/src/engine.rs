//! The frame pump: owns a field, drains host input between frames, and
//! draws each frame onto whatever surface the host brings.

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::Vec2;
use tracing::info;

use gossamer_platform::{Surface, Viewport};

use crate::config::FieldConfig;
use crate::field::ParticleField;

/// Input a host delivers to the engine. Events queue up between frames
/// and are folded in at the next frame boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMoved(Vec2),
    Resized(Viewport),
    Stop,
}

/// Cloneable input half of an engine. Sends never block, and once the
/// engine is dropped they quietly become no-ops, so UI threads can hold
/// a handle without caring about engine lifetime.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    events: Sender<HostEvent>,
}

impl EngineHandle {
    pub fn pointer_moved(&self, x: f32, y: f32) {
        let _ = self.events.send(HostEvent::PointerMoved(Vec2::new(x, y)));
    }

    pub fn resized(&self, viewport: Viewport) {
        let _ = self.events.send(HostEvent::Resized(viewport));
    }

    pub fn stop(&self) {
        let _ = self.events.send(HostEvent::Stop);
    }
}

/// Owns the simulation and paces it one [`frame`](Self::frame) at a time.
/// The host decides the cadence; the engine never sleeps or spawns
/// threads of its own.
pub struct Engine {
    field: ParticleField,
    inbox: Receiver<HostEvent>,
    stopped: bool,
}

impl Engine {
    /// Build an engine seeded from OS entropy, plus its input handle.
    pub fn start(config: FieldConfig, viewport: Viewport) -> (Self, EngineHandle) {
        Self::build(ParticleField::new(config, viewport))
    }

    /// Build a deterministic engine for replayable runs.
    pub fn start_seeded(
        config: FieldConfig,
        viewport: Viewport,
        seed: u64,
    ) -> (Self, EngineHandle) {
        Self::build(ParticleField::seeded(config, viewport, seed))
    }

    fn build(field: ParticleField) -> (Self, EngineHandle) {
        let (events, inbox) = unbounded();
        info!(particles = field.len(), "engine started");
        (
            Self {
                field,
                inbox,
                stopped: false,
            },
            EngineHandle { events },
        )
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Run one frame: drain input, step the simulation, draw onto
    /// `surface`. Returns `false` once a stop has been observed; the
    /// frame that observes the stop is not simulated or drawn.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> bool {
        if self.stopped {
            return false;
        }
        self.drain_events();
        if self.stopped {
            info!("engine stopped");
            return false;
        }
        self.field.step();
        self.field.render(surface);
        true
    }

    /// Fold queued events into the field. Pointer positions coalesce
    /// last-wins, but each pointer event keeps its own spawn roll at the
    /// coalesced position, so a fast-moving pointer still feels dense.
    fn drain_events(&mut self) {
        let mut pointer: Option<Vec2> = None;
        let mut pointer_events = 0usize;
        let mut resize: Option<Viewport> = None;

        for event in self.inbox.try_iter() {
            match event {
                HostEvent::PointerMoved(at) => {
                    pointer = Some(at);
                    pointer_events += 1;
                }
                HostEvent::Resized(viewport) => resize = Some(viewport),
                HostEvent::Stop => self.stopped = true,
            }
        }

        if let Some(viewport) = resize {
            self.field.resize(viewport);
        }
        if let Some(at) = pointer {
            for _ in 0..pointer_events {
                self.field.pointer_moved(at);
            }
        }
    }
}
