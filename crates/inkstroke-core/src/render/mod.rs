//! Rendering surface abstraction and the density-aware engine on top of it.

mod recording;

pub use recording::{RecordingSurface, SurfaceCall};

use crate::history::Stroke;
use kurbo::{Cap, Join, Point, Rect, Size};
use peniko::Color;

/// The 2D drawing context the engine renders through.
///
/// Mirrors an immediate-mode canvas context: style setters persist until changed,
/// a path is built with `begin_path`/`move_to`/`line_to` and committed with `stroke`.
/// Coordinates passed to path methods are logical; the surface applies the scale
/// set with `set_scale`.
pub trait RenderSurface {
    /// Resize the raster backing store, in device pixels. Clears its contents.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Pin the displayed (layout) size, in logical pixels.
    fn set_display_size(&mut self, size: Size);

    fn set_line_width(&mut self, width: f64);

    fn set_stroke_color(&mut self, color: Color);

    fn set_line_cap(&mut self, cap: Cap);

    fn set_line_join(&mut self, join: Join);

    /// Set a uniform coordinate scale applied to every later drawing call.
    fn set_scale(&mut self, sx: f64, sy: f64);

    /// Discard the current path and start a new one.
    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Stroke the current path with the current style.
    fn stroke(&mut self);

    /// Clear a rectangle (logical coordinates) to transparent.
    fn clear_rect(&mut self, rect: Rect);
}

/// Global stroke style shared by every stroke.
#[derive(Debug, Clone, Copy)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: Color,
    pub cap: Cap,
    pub join: Join,
}

impl StrokeStyle {
    /// Color as straight-alpha RGBA8.
    pub fn rgba8(&self) -> [u8; 4] {
        let c = self.color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }
}

/// Logical layout size plus device pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Layout size in logical pixels.
    pub logical: Size,
    /// Device pixels per logical pixel, if the host reports one.
    pub density: Option<f64>,
}

impl SurfaceGeometry {
    pub fn new(logical: Size, density: Option<f64>) -> Self {
        Self { logical, density }
    }

    /// The scale applied to drawing calls, or `None` when no usable density
    /// is available (missing, zero, negative or not finite).
    pub fn scale(&self) -> Option<f64> {
        self.density.filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Backing store size in device pixels.
    ///
    /// Logical dimensions are truncated to whole pixels first, as a layout
    /// measurement parsed to an integer would be.
    pub fn backing_size(&self) -> (u32, u32) {
        let width = self.logical.width.trunc();
        let height = self.logical.height.trunc();
        match self.scale() {
            Some(d) => ((width * d) as u32, (height * d) as u32),
            None => (width as u32, height as u32),
        }
    }

    /// The full surface in logical coordinates.
    pub fn logical_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.logical)
    }
}

/// Thin adapter over a [`RenderSurface`], owning sizing and style setup.
#[derive(Debug)]
pub struct RenderEngine<S> {
    surface: S,
    geometry: SurfaceGeometry,
    style: StrokeStyle,
}

impl<S: RenderSurface> RenderEngine<S> {
    /// Size the surface for `geometry` and apply `style`. This is the only
    /// point at which sizing and style are set.
    pub fn new(mut surface: S, geometry: SurfaceGeometry, style: StrokeStyle) -> Self {
        let (width, height) = geometry.backing_size();
        surface.set_backing_size(width, height);
        surface.set_display_size(geometry.logical);
        if let Some(d) = geometry.scale() {
            surface.set_scale(d, d);
        }
        surface.set_line_width(style.width);
        surface.set_stroke_color(style.color);
        surface.set_line_cap(style.cap);
        surface.set_line_join(style.join);

        log::info!(
            "Render engine initialized: logical {}x{}, backing {}x{}, scale {:?}",
            geometry.logical.width,
            geometry.logical.height,
            width,
            height,
            geometry.scale()
        );

        Self {
            surface,
            geometry,
            style,
        }
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn begin_path(&mut self) {
        self.surface.begin_path();
    }

    pub fn move_to(&mut self, point: Point) {
        self.surface.move_to(point);
    }

    pub fn line_to(&mut self, point: Point) {
        self.surface.line_to(point);
    }

    pub fn stroke(&mut self) {
        self.surface.stroke();
    }

    /// Clear the whole surface.
    pub fn clear(&mut self) {
        self.surface.clear_rect(self.geometry.logical_rect());
    }

    /// Start a new path at `point` without painting anything.
    pub fn begin_stroke(&mut self, point: Point) {
        self.surface.begin_path();
        self.surface.move_to(point);
    }

    /// Paint one incremental segment.
    pub fn draw_segment(&mut self, from: Point, to: Point) {
        self.surface.begin_path();
        self.surface.move_to(from);
        self.surface.line_to(to);
        self.surface.stroke();
    }

    /// Paint a whole point sequence as one connected path.
    pub fn draw_points(&mut self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.surface.begin_path();
        self.surface.move_to(*first);
        for point in rest {
            self.surface.line_to(*point);
        }
        self.surface.stroke();
    }

    /// Paint a finalized stroke.
    pub fn draw_stroke(&mut self, stroke: &Stroke) {
        self.draw_points(stroke.points());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PenConfig;

    fn engine(density: Option<f64>) -> RenderEngine<RecordingSurface> {
        RenderEngine::new(
            RecordingSurface::new(),
            SurfaceGeometry::new(Size::new(100.0, 50.0), density),
            PenConfig::default().stroke_style(),
        )
    }

    #[test]
    fn test_backing_size_with_density() {
        let geometry = SurfaceGeometry::new(Size::new(100.0, 50.0), Some(2.0));
        assert_eq!(geometry.backing_size(), (200, 100));
        assert_eq!(geometry.scale(), Some(2.0));
    }

    #[test]
    fn test_backing_size_without_density() {
        for density in [None, Some(0.0), Some(f64::NAN), Some(-2.0)] {
            let geometry = SurfaceGeometry::new(Size::new(100.0, 50.0), density);
            assert_eq!(geometry.backing_size(), (100, 50));
            assert_eq!(geometry.scale(), None);
        }
    }

    #[test]
    fn test_backing_size_truncates_logical() {
        let geometry = SurfaceGeometry::new(Size::new(100.7, 50.2), Some(1.5));
        assert_eq!(geometry.backing_size(), (150, 75));
    }

    #[test]
    fn test_init_sequence() {
        let engine = engine(Some(2.0));
        let calls = engine.surface().calls();
        assert_eq!(calls[0], SurfaceCall::BackingSize(200, 100));
        assert_eq!(calls[1], SurfaceCall::DisplaySize(Size::new(100.0, 50.0)));
        assert_eq!(calls[2], SurfaceCall::Scale(2.0, 2.0));
        assert!(calls.contains(&SurfaceCall::LineWidth(6.0)));
        assert!(calls.contains(&SurfaceCall::StrokeColor([0, 0, 0, 255])));
        assert!(calls.contains(&SurfaceCall::LineCap(Cap::Round)));
        assert!(calls.contains(&SurfaceCall::LineJoin(Join::Round)));
    }

    #[test]
    fn test_no_scale_without_density() {
        let engine = engine(None);
        assert!(
            !engine
                .surface()
                .calls()
                .iter()
                .any(|c| matches!(c, SurfaceCall::Scale(..)))
        );
    }

    #[test]
    fn test_clear_covers_logical_surface() {
        let mut engine = engine(Some(2.0));
        engine.clear();
        assert_eq!(
            engine.surface().calls().last(),
            Some(&SurfaceCall::ClearRect(Rect::new(0.0, 0.0, 100.0, 50.0)))
        );
    }

    #[test]
    fn test_drawing_calls_are_density_independent() {
        let mut low = engine(Some(1.0));
        let mut high = engine(Some(2.0));
        let points = [Point::new(10.0, 10.0), Point::new(20.0, 10.0)];

        for e in [&mut low, &mut high] {
            e.surface_mut().take_calls();
            e.draw_points(&points);
        }

        assert_eq!(low.surface().calls(), high.surface().calls());
        assert_eq!(low.surface().painted_paths(), vec![points.to_vec()]);
    }

    #[test]
    fn test_draw_points_empty_is_noop() {
        let mut engine = engine(None);
        engine.surface_mut().take_calls();
        engine.draw_points(&[]);
        assert!(engine.surface().calls().is_empty());
    }
}
