//! Headless demo: drives the field with a synthetic pointer sweep and
//! writes the rendered frames out as PNGs.

use std::path::PathBuf;
use std::str::FromStr;

use glam::Vec2;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gossamer_core::{Engine, FieldConfig};
use gossamer_platform::{Result, Viewport};
use gossamer_raster::Pixmap;

fn main() {
    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Gossamer starting");
    if let Err(e) = run() {
        eprintln!("Gossamer error: {e}");
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let width = parse_arg(&args, "--width").unwrap_or(800);
    let height = parse_arg(&args, "--height").unwrap_or(600);
    let frames: u32 = parse_arg(&args, "--frames").unwrap_or(300);
    let seed: Option<u64> = parse_arg(&args, "--seed");
    let dump_every: u32 = parse_arg(&args, "--dump-every").unwrap_or(0);
    let out: PathBuf = parse_arg(&args, "--out").unwrap_or_else(|| PathBuf::from("frames"));

    let config = match parse_arg::<PathBuf>(&args, "--config") {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            FieldConfig::from_path(path)?
        }
        None => {
            debug!("no config file, using defaults");
            FieldConfig::default()
        }
    };

    let viewport = Viewport::new(width, height);
    let (mut engine, handle) = match seed {
        Some(seed) => Engine::start_seeded(config, viewport, seed),
        None => Engine::start(config, viewport),
    };

    std::fs::create_dir_all(&out)?;
    let mut pixmap = Pixmap::new(viewport);
    let sweep = PointerSweep::new(viewport);

    for frame in 0..frames {
        let at = sweep.at(frame);
        handle.pointer_moved(at.x, at.y);
        if !engine.frame(&mut pixmap) {
            break;
        }
        if dump_every > 0 && frame % dump_every == 0 {
            let path = out.join(format!("frame_{frame:05}.png"));
            if let Err(e) = pixmap.save_png(&path) {
                warn!(path = %path.display(), error = %e, "frame dump failed");
            }
        }
        if frame % 60 == 0 {
            info!(frame, particles = engine.field().len(), "running");
        }
    }

    let final_path = out.join("final.png");
    pixmap.save_png(&final_path)?;
    info!(path = %final_path.display(), "wrote final frame");

    handle.stop();
    if engine.frame(&mut pixmap) {
        warn!("engine accepted a frame after stop");
    }
    Ok(())
}

/// Circular pointer path through the middle of the viewport, sized so
/// the sweep keeps crossing the ambient population.
struct PointerSweep {
    center: Vec2,
    radius: f32,
}

impl PointerSweep {
    fn new(viewport: Viewport) -> Self {
        let bounds = viewport.bounds();
        Self {
            center: bounds * 0.5,
            radius: bounds.min_element() * 0.35,
        }
    }

    fn at(&self, frame: u32) -> Vec2 {
        let theta = frame as f32 * 0.05;
        self.center + Vec2::new(theta.cos(), theta.sin()) * self.radius
    }
}

fn parse_arg<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|v| v == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
