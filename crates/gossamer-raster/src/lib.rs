//! Gossamer raster backend: a plain CPU pixmap that implements the draw
//! surface, for headless rendering and PNG capture.

mod pixmap;

pub use pixmap::Pixmap;
