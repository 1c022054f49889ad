//! CPU raster surface backed by a tiny-skia pixmap.

use inkstroke_core::{EncodeSurface, ExportError, RenderSurface};
use kurbo::{Cap, Join, Point, Rect, Size};
use peniko::Color;
use thiserror::Error;
use tiny_skia::{BlendMode, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface has no backing store")]
    NoBackingStore,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Immediate-mode raster surface with canvas-style state.
///
/// Strokes are anti-aliased and painted straight into the pixmap, so the pixel
/// contents always reflect every `stroke` since the last clear.
#[derive(Debug)]
pub struct RasterSurface {
    /// Backing pixels; `None` until a non-empty backing size is set.
    pixmap: Option<Pixmap>,
    display: Size,
    path: PathBuilder,
    paint: Paint<'static>,
    stroke: Stroke,
    transform: Transform,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface {
    pub fn new() -> Self {
        let mut paint = Paint::default();
        paint.set_color_rgba8(0, 0, 0, 255);
        paint.anti_alias = true;
        Self {
            pixmap: None,
            display: Size::ZERO,
            path: PathBuilder::new(),
            paint,
            stroke: Stroke::default(),
            transform: Transform::identity(),
        }
    }

    /// Backing store width in device pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::width)
    }

    /// Backing store height in device pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::height)
    }

    /// Displayed size in logical pixels.
    pub fn display_size(&self) -> Size {
        self.display
    }

    /// Straight-alpha RGBA of a device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap
            .as_ref()
            .is_none_or(|p| p.pixels().iter().all(|c| c.alpha() == 0))
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map_or(&[][..], |p| p.data())
    }

    /// Encode the backing store as an RGBA8 PNG.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        let pixmap = self.pixmap.as_ref().ok_or(RendererError::NoBackingStore)?;
        let rgba: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|c| {
                let c = c.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&rgba)?;
            writer.finish()?;
        }
        Ok(png_data)
    }
}

impl RenderSurface for RasterSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.pixmap = Pixmap::new(width, height);
        if self.pixmap.is_none() {
            log::warn!("Cannot allocate a {}x{} backing store; drawing is disabled", width, height);
        }
    }

    fn set_display_size(&mut self, size: Size) {
        self.display = size;
    }

    /// Zero, negative and non-finite widths are ignored and the previous width
    /// stays in effect, as on a canvas context.
    fn set_line_width(&mut self, width: f64) {
        let width = width as f32;
        if width.is_finite() && width > 0.0 {
            self.stroke.width = width;
        } else {
            log::warn!("Ignoring invalid line width {}; keeping {}", width, self.stroke.width);
        }
    }

    fn set_stroke_color(&mut self, color: Color) {
        let c = color.to_rgba8();
        self.paint.set_color_rgba8(c.r, c.g, c.b, c.a);
    }

    fn set_line_cap(&mut self, cap: Cap) {
        self.stroke.line_cap = match cap {
            Cap::Butt => LineCap::Butt,
            Cap::Square => LineCap::Square,
            Cap::Round => LineCap::Round,
        };
    }

    fn set_line_join(&mut self, join: Join) {
        self.stroke.line_join = match join {
            Join::Bevel => LineJoin::Bevel,
            Join::Miter => LineJoin::Miter,
            Join::Round => LineJoin::Round,
        };
    }

    fn set_scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.pre_scale(sx as f32, sy as f32);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point.x as f32, point.y as f32);
    }

    fn line_to(&mut self, point: Point) {
        self.path.line_to(point.x as f32, point.y as f32);
    }

    fn stroke(&mut self) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        // A path with no segments paints nothing; `finish` consumes the builder.
        let Some(path) = self.path.clone().finish() else {
            return;
        };
        pixmap.stroke_path(&path, &self.paint, &self.stroke, self.transform, None);
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(region) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) else {
            return;
        };
        let (width, height) = (pixmap.width() as f32, pixmap.height() as f32);
        let covers_all = region.transform(self.transform).is_some_and(|r| {
            r.left() <= 0.0 && r.top() <= 0.0 && r.right() >= width && r.bottom() >= height
        });
        if covers_all {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
            return;
        }

        let mut clear = Paint::default();
        clear.blend_mode = BlendMode::Clear;
        clear.anti_alias = false;
        pixmap.fill_rect(region, &clear, self.transform, None);
    }
}

impl EncodeSurface for RasterSurface {
    fn encode_png(&self) -> Result<Vec<u8>, ExportError> {
        self.to_png().map_err(|e| ExportError::Encode(e.to_string()))
    }
}
