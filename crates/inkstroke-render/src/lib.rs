//! Inkstroke Render Library
//!
//! CPU raster backend for inkstroke pens.
//! Draws into a tiny-skia pixmap and snapshots it as PNG.

mod raster;

pub use raster::{RasterSurface, RenderResult, RendererError};
