//! The particle field: population management, per-frame physics, and the
//! draw pass that turns state into [`Surface`] calls.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use gossamer_platform::{Surface, Viewport};

use crate::config::FieldConfig;
use crate::particle::{Particle, ParticleKind};

/// A bounded 2-D field of drifting particles.
///
/// The field is a pure state machine: [`step`](Self::step) advances one
/// frame, [`render`](Self::render) describes the current frame to a
/// surface, and nothing in between touches a clock or a thread. Pointer
/// input arrives through [`pointer_moved`](Self::pointer_moved).
pub struct ParticleField {
    config: FieldConfig,
    bounds: Vec2,
    particles: Vec<Particle>,
    ambient_count: usize,
    pointer: Option<Vec2>,
    rng: SmallRng,
}

impl ParticleField {
    /// Seed a field from OS entropy.
    pub fn new(config: FieldConfig, viewport: Viewport) -> Self {
        Self::seeded(config, viewport, rand::random())
    }

    /// Seed a field deterministically. Two fields built with the same
    /// config, viewport, and seed replay identically under the same
    /// inputs.
    pub fn seeded(config: FieldConfig, viewport: Viewport, seed: u64) -> Self {
        let bounds = viewport.bounds();
        let ambient_count = config.ambient_count(viewport.width);
        let mut rng = SmallRng::seed_from_u64(seed);
        let particles = (0..ambient_count)
            .map(|_| Particle::ambient(&mut rng, bounds, &config.ambient, &config.palette))
            .collect();
        info!(
            ambient_count,
            width = viewport.width,
            height = viewport.height,
            seed,
            "field seeded"
        );
        Self {
            config,
            bounds,
            particles,
            ambient_count,
            pointer: None,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Size of the long-lived population, fixed at seeding time.
    pub fn ambient_count(&self) -> usize {
        self.ambient_count
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Last reported pointer position, if any event has arrived yet.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Adopt a new viewport. The population is kept; particles that end
    /// up outside the shrunken bounds are pulled back by the wrap on the
    /// next step.
    pub fn resize(&mut self, viewport: Viewport) {
        self.bounds = viewport.bounds();
        debug!(
            width = viewport.width,
            height = viewport.height,
            "field resized"
        );
    }

    /// Record the pointer position without a spawn roll.
    pub fn set_pointer(&mut self, at: Vec2) {
        self.pointer = Some(at);
    }

    /// Record a pointer movement and roll once for a transient spawn.
    pub fn pointer_moved(&mut self, at: Vec2) {
        self.set_pointer(at);
        let chance = self.config.pointer.spawn_chance;
        if chance > 0.0 && self.rng.gen_bool(chance.min(1.0)) {
            self.emit_pointer_particle(at);
        }
    }

    /// Unconditionally add one pointer-spawned particle near `at`.
    pub fn emit_pointer_particle(&mut self, at: Vec2) {
        let particle =
            Particle::pointer_spawned(&mut self.rng, at, &self.config.pointer, &self.config.palette);
        self.particles.push(particle);
    }

    /// Advance the simulation by one frame.
    ///
    /// Per particle, in order: integrate velocity, apply pointer
    /// attraction, wrap into bounds, spend one frame of life, then either
    /// retire (transient) or respawn (long-lived) on expiry. Surviving
    /// transients fade with remaining life.
    pub fn step(&mut self) {
        let Self {
            config,
            bounds,
            particles,
            pointer,
            rng,
            ..
        } = self;
        let bounds = *bounds;
        let pointer = *pointer;

        particles.retain_mut(|p| {
            p.pos += p.vel;

            if let Some(target) = pointer {
                if p.kind != ParticleKind::PointerSpawned {
                    let gap = target - p.pos;
                    let d = gap.length();
                    if d < config.attraction.radius {
                        let falloff = (config.attraction.radius - d) / config.attraction.radius;
                        p.vel += gap * (falloff * config.attraction.strength);
                    }
                }
            }

            p.pos.x = wrap(p.pos.x, bounds.x);
            p.pos.y = wrap(p.pos.y, bounds.y);

            p.life = p.life.saturating_sub(1);

            if p.expired() {
                if p.kind == ParticleKind::PointerSpawned {
                    return false;
                }
                p.respawn(rng, bounds, &config.ambient);
                return true;
            }

            if p.kind == ParticleKind::PointerSpawned {
                p.opacity = p.life as f32 / p.max_life as f32;
            }
            true
        });
    }

    /// Describe the current frame: clear, then links, then particles on
    /// top.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear();
        self.render_links(surface);
        self.render_particles(surface);
    }

    fn render_links(&self, surface: &mut dyn Surface) {
        let links = &self.config.links;
        if links.radius <= 0.0 {
            return;
        }
        let accent = self.config.palette.accent;
        // O(n^2) pair scan; the width cap keeps the population small
        // enough that this stays cheap.
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let d = a.pos.distance(b.pos);
                if d < links.radius {
                    let alpha = (links.radius - d) / links.radius * links.max_alpha;
                    surface.line(a.pos, b.pos, accent.alpha(alpha));
                }
            }
        }
    }

    fn render_particles(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            let fill = p.color.alpha(p.opacity);
            match p.kind {
                ParticleKind::Glow => surface.glow_circle(
                    p.pos,
                    p.radius,
                    fill,
                    p.color.alpha(self.config.glow.halo_alpha),
                    self.config.glow.blur,
                ),
                _ => surface.fill_circle(p.pos, p.radius, fill),
            }
        }
    }
}

/// Wrap `coord` into `[0, bound)`, landing strays from a shrink in one
/// step. `rem_euclid` of a tiny negative can round up to exactly `bound`,
/// hence the second guard. A zero-size axis is left alone.
fn wrap(coord: f32, bound: f32) -> f32 {
    if bound <= 0.0 {
        return coord;
    }
    if coord >= 0.0 && coord < bound {
        return coord;
    }
    let wrapped = coord.rem_euclid(bound);
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;
    use gossamer_platform::{DrawCmd, Recorder};

    fn field_at(width: u32, height: u32) -> ParticleField {
        ParticleField::seeded(FieldConfig::default(), Viewport::new(width, height), 7)
    }

    /// Config that seeds no ambient particles, so tests can stage exact
    /// populations by hand.
    fn empty_config() -> FieldConfig {
        let mut config = FieldConfig::default();
        config.ambient.max_count = 0;
        config
    }

    fn probe(pos: Vec2, kind: ParticleKind) -> Particle {
        Particle {
            pos,
            vel: Vec2::ZERO,
            radius: 2.0,
            opacity: 0.5,
            color: Rgb::new(34, 197, 94),
            life: 1000,
            max_life: 1000,
            kind,
        }
    }

    #[test]
    fn population_scales_with_width_up_to_the_cap() {
        assert_eq!(field_at(800, 600).len(), 80);
        assert_eq!(field_at(5000, 600).len(), 150);
        assert_eq!(field_at(9, 600).len(), 0);
        assert_eq!(field_at(0, 0).len(), 0);
    }

    #[test]
    fn population_is_stable_without_pointer_input() {
        let mut field = field_at(800, 600);
        for _ in 0..400 {
            field.step();
        }
        assert_eq!(field.len(), 80);
        assert_eq!(field.ambient_count(), 80);
    }

    #[test]
    fn positions_stay_in_bounds() {
        let mut field = field_at(800, 600);
        field.set_pointer(Vec2::new(400.0, 300.0));
        for _ in 0..500 {
            field.step();
            for p in field.particles() {
                assert!(p.pos.x >= 0.0 && p.pos.x < 800.0, "x out of bounds: {}", p.pos.x);
                assert!(p.pos.y >= 0.0 && p.pos.y < 600.0, "y out of bounds: {}", p.pos.y);
            }
        }
    }

    #[test]
    fn opacity_stays_in_unit_interval() {
        let mut field = field_at(800, 600);
        for frame in 0..300 {
            field.pointer_moved(Vec2::new(frame as f32, 150.0));
            field.step();
            for p in field.particles() {
                assert!(p.opacity >= 0.0 && p.opacity <= 1.0);
            }
        }
    }

    #[test]
    fn shrinking_resize_rewraps_in_one_step() {
        let mut field = field_at(1400, 1200);
        assert_eq!(field.len(), 140);
        field.resize(Viewport::new(300, 200));
        field.step();
        assert_eq!(field.len(), 140);
        for p in field.particles() {
            assert!(p.pos.x >= 0.0 && p.pos.x < 300.0);
            assert!(p.pos.y >= 0.0 && p.pos.y < 200.0);
        }
    }

    #[test]
    fn pointer_particles_fade_linearly_then_retire() {
        let mut field = field_at(800, 600);
        field.emit_pointer_particle(Vec2::new(400.0, 300.0));
        assert_eq!(field.len(), 81);

        for k in 1..60u32 {
            field.step();
            let trail = field
                .particles()
                .iter()
                .find(|p| p.kind == ParticleKind::PointerSpawned)
                .expect("trail particle alive before frame 60");
            let expected = (60 - k) as f32 / 60.0;
            assert!(
                (trail.opacity - expected).abs() < 1e-6,
                "frame {k}: opacity {} != {expected}",
                trail.opacity
            );
        }

        field.step();
        assert!(field
            .particles()
            .iter()
            .all(|p| p.kind != ParticleKind::PointerSpawned));
        assert_eq!(field.len(), 80);
    }

    #[test]
    fn expired_ambient_respawns_in_place() {
        let mut field = field_at(800, 600);
        let before = field.particles[3];
        field.particles[3].life = 1;
        field.step();

        let after = field.particles[3];
        assert_eq!(after.life, after.max_life);
        assert_eq!(after.max_life, before.max_life);
        assert_eq!(after.vel, before.vel);
        assert_eq!(after.color, before.color);
        assert_eq!(after.kind, before.kind);
        assert!(after.opacity >= 0.2 && after.opacity < 0.7);
        assert!(after.pos.x >= 0.0 && after.pos.x < 800.0);
        assert_eq!(field.len(), 80);
    }

    #[test]
    fn attraction_pulls_particles_inside_the_radius() {
        let mut field = ParticleField::seeded(empty_config(), Viewport::new(800, 600), 7);
        field.particles.push(probe(Vec2::new(100.0, 100.0), ParticleKind::Ambient));
        field.set_pointer(Vec2::new(150.0, 100.0));
        field.step();

        // gap 50 at radius 100: falloff 0.5, so dv = 50 * 0.5 * 1e-4
        let vel = field.particles[0].vel;
        assert!((vel.x - 0.0025).abs() < 1e-7, "vel.x = {}", vel.x);
        assert!(vel.y.abs() < 1e-7);
    }

    #[test]
    fn attraction_ignores_distant_particles() {
        let mut field = ParticleField::seeded(empty_config(), Viewport::new(800, 600), 7);
        field.particles.push(probe(Vec2::new(100.0, 100.0), ParticleKind::Ambient));
        field.set_pointer(Vec2::new(250.0, 100.0));
        field.step();
        assert_eq!(field.particles[0].vel, Vec2::ZERO);
    }

    #[test]
    fn attraction_skips_pointer_spawned_particles() {
        let mut field = ParticleField::seeded(empty_config(), Viewport::new(800, 600), 7);
        let mut trail = probe(Vec2::new(100.0, 100.0), ParticleKind::PointerSpawned);
        trail.life = 60;
        trail.max_life = 60;
        field.particles.push(trail);
        field.set_pointer(Vec2::new(150.0, 100.0));
        field.step();
        assert_eq!(field.particles[0].vel, Vec2::ZERO);
    }

    #[test]
    fn links_fade_with_distance_and_cut_off() {
        let mut field = ParticleField::seeded(empty_config(), Viewport::new(800, 600), 7);
        field.particles.push(probe(Vec2::new(100.0, 100.0), ParticleKind::Ambient));
        field.particles.push(probe(Vec2::new(150.0, 100.0), ParticleKind::Ambient));

        let mut rec = Recorder::new();
        field.render(&mut rec);
        assert_eq!(rec.commands[0], DrawCmd::Clear);
        match &rec.commands[1] {
            DrawCmd::Line { color, .. } => {
                let expected = (120.0 - 50.0) / 120.0 * 0.1;
                assert!((color.a - expected).abs() < 1e-6, "alpha = {}", color.a);
                assert_eq!((color.r, color.g, color.b), (34, 197, 94));
            }
            other => panic!("expected a link line, got {other:?}"),
        }
        assert_eq!(rec.commands.len(), 4, "clear + line + two discs");

        // push them apart past the link radius: the line disappears
        field.particles[1].pos = Vec2::new(250.0, 100.0);
        rec.take();
        field.render(&mut rec);
        assert!(rec
            .commands
            .iter()
            .all(|cmd| !matches!(cmd, DrawCmd::Line { .. })));
    }

    #[test]
    fn glow_particles_render_with_a_halo() {
        let mut field = ParticleField::seeded(empty_config(), Viewport::new(800, 600), 7);
        field.particles.push(probe(Vec2::new(100.0, 100.0), ParticleKind::Glow));

        let mut rec = Recorder::new();
        field.render(&mut rec);
        match &rec.commands[1] {
            DrawCmd::GlowCircle { halo, blur, .. } => {
                assert_eq!(*blur, 20.0);
                assert!((halo.a - 0.8).abs() < 1e-6);
            }
            other => panic!("expected a glow circle, got {other:?}"),
        }
    }

    #[test]
    fn seeded_fields_replay_identically() {
        let viewport = Viewport::new(800, 600);
        let mut a = ParticleField::seeded(FieldConfig::default(), viewport, 42);
        let mut b = ParticleField::seeded(FieldConfig::default(), viewport, 42);

        for frame in 0..30 {
            let at = Vec2::new(frame as f32 * 10.0, 200.0);
            a.pointer_moved(at);
            b.pointer_moved(at);
            a.step();
            b.step();
        }

        let mut rec_a = Recorder::new();
        let mut rec_b = Recorder::new();
        a.render(&mut rec_a);
        b.render(&mut rec_b);
        assert_eq!(rec_a.commands, rec_b.commands);
    }

    #[test]
    fn wrap_restores_the_unit_range() {
        assert_eq!(wrap(5.0, 10.0), 5.0);
        assert_eq!(wrap(-1.0, 10.0), 9.0);
        assert_eq!(wrap(12.5, 10.0), 2.5);
        assert_eq!(wrap(-25.0, 10.0), 5.0);
        let tiny = wrap(-1.0e-8, 10.0);
        assert!(tiny >= 0.0 && tiny < 10.0);
        assert_eq!(wrap(3.0, 0.0), 3.0, "zero-size axis is untouched");
    }
}
