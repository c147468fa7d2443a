use std::path::Path;

use glam::Vec2;
use tracing::debug;

use gossamer_platform::{Rgba, Surface, Viewport};

/// An RGBA8 pixel buffer with straight (non-premultiplied) alpha.
///
/// Drawing goes through the [`Surface`] impl; everything here is plain
/// CPU work with no GPU or window in sight, which keeps it usable from
/// tests and batch renders alike.
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Allocate a transparent pixmap covering `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            data: vec![0; viewport.width as usize * viewport.height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Raw pixels, row-major RGBA8.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// One pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Reallocate for a new viewport; contents reset to transparent.
    pub fn resize(&mut self, viewport: Viewport) {
        self.width = viewport.width;
        self.height = viewport.height;
        self.data = vec![0; viewport.width as usize * viewport.height as usize * 4];
        debug!(
            width = viewport.width,
            height = viewport.height,
            "pixmap resized"
        );
    }

    /// Copy the buffer out as an [`image`] buffer.
    pub fn to_image(&self) -> image::RgbaImage {
        // data is always exactly width * height * 4, so from_raw cannot fail
        match image::RgbaImage::from_raw(self.width, self.height, self.data.clone()) {
            Some(img) => img,
            None => image::RgbaImage::new(self.width, self.height),
        }
    }

    /// Write the buffer out as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
    }

    fn blend_at(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let cells: &mut [[u8; 4]] = bytemuck::cast_slice_mut(self.data.as_mut_slice());
        blend(&mut cells[idx], color, coverage);
    }
}

impl Surface for Pixmap {
    fn clear(&mut self) {
        self.data.fill(0);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        let delta = to - from;
        // spans past 64k cells get sampled sparsely
        let steps = (delta.x.abs().max(delta.y.abs()).ceil() as i32).min(65_536);
        if steps <= 0 {
            self.blend_at(from.x.floor() as i32, from.y.floor() as i32, color, 1.0);
            return;
        }
        let inc = delta / steps as f32;
        let mut pos = from;
        let mut last = (i32::MIN, i32::MIN);
        for _ in 0..=steps {
            let cell = (pos.x.floor() as i32, pos.y.floor() as i32);
            if cell != last {
                self.blend_at(cell.0, cell.1, color, 1.0);
                last = cell;
            }
            pos += inc;
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        let min_x = ((center.x - radius).floor() as i32).max(0);
        let max_x = ((center.x + radius).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((center.y - radius).floor() as i32).max(0);
        let max_y = ((center.y + radius).ceil() as i32).min(self.height as i32 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let at = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                // half-pixel feather at the rim
                let coverage = (radius - at.distance(center) + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_at(x, y, color, coverage);
                }
            }
        }
    }

    fn glow_circle(&mut self, center: Vec2, radius: f32, color: Rgba, halo: Rgba, blur: f32) {
        if blur > 0.0 && halo.a > 0.0 {
            // concentric rings, fading quadratically toward the fringe
            let layers = ((blur / 2.0).ceil() as u32).max(1);
            for i in 1..=layers {
                let t = i as f32 / layers as f32;
                let ring = radius + blur * t;
                let alpha = halo.a * (1.0 - t * t) / layers as f32;
                self.fill_circle(center, ring, Rgba::new(halo.r, halo.g, halo.b, alpha));
            }
        }
        self.fill_circle(center, radius, color);
    }
}

/// Straight-alpha source-over.
fn blend(dst: &mut [u8; 4], color: Rgba, coverage: f32) {
    let a = (color.a * coverage).clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    if out_a <= 0.0 {
        return;
    }
    let over = |src: u8, under: u8| -> u8 {
        let s = src as f32 / 255.0;
        let d = under as f32 / 255.0;
        ((s * a + d * dst_a * (1.0 - a)) / out_a * 255.0 + 0.5) as u8
    };
    dst[0] = over(color.r, dst[0]);
    dst[1] = over(color.g, dst[1]);
    dst[2] = over(color.b, dst[2]);
    dst[3] = (out_a * 255.0 + 0.5) as u8;
}
