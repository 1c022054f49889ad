//! In-memory surface that records every call, for tests and headless hosts.

use super::RenderSurface;
use kurbo::{Cap, Join, Point, Rect, Size};
use peniko::Color;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    BackingSize(u32, u32),
    DisplaySize(Size),
    LineWidth(f64),
    /// Straight-alpha RGBA8.
    StrokeColor([u8; 4]),
    LineCap(Cap),
    LineJoin(Join),
    Scale(f64, f64),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Stroke,
    ClearRect(Rect),
}

/// Records calls and tracks which paths are currently painted.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    display: Size,
    path: Vec<Point>,
    painted: Vec<Vec<Point>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call since creation or the last [`take_calls`](Self::take_calls).
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Paths stroked since the surface was last fully cleared, in paint order.
    pub fn painted_paths(&self) -> Vec<Vec<Point>> {
        self.painted.clone()
    }

    /// True when nothing has been stroked since the last full clear.
    pub fn is_blank(&self) -> bool {
        self.painted.is_empty()
    }
}

impl RenderSurface for RecordingSurface {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.calls.push(SurfaceCall::BackingSize(width, height));
        self.painted.clear();
    }

    fn set_display_size(&mut self, size: Size) {
        self.calls.push(SurfaceCall::DisplaySize(size));
        self.display = size;
    }

    fn set_line_width(&mut self, width: f64) {
        self.calls.push(SurfaceCall::LineWidth(width));
    }

    fn set_stroke_color(&mut self, color: Color) {
        let c = color.to_rgba8();
        self.calls.push(SurfaceCall::StrokeColor([c.r, c.g, c.b, c.a]));
    }

    fn set_line_cap(&mut self, cap: Cap) {
        self.calls.push(SurfaceCall::LineCap(cap));
    }

    fn set_line_join(&mut self, join: Join) {
        self.calls.push(SurfaceCall::LineJoin(join));
    }

    fn set_scale(&mut self, sx: f64, sy: f64) {
        self.calls.push(SurfaceCall::Scale(sx, sy));
    }

    fn begin_path(&mut self) {
        self.calls.push(SurfaceCall::BeginPath);
        self.path.clear();
    }

    fn move_to(&mut self, point: Point) {
        self.calls.push(SurfaceCall::MoveTo(point));
        self.path.push(point);
    }

    fn line_to(&mut self, point: Point) {
        self.calls.push(SurfaceCall::LineTo(point));
        self.path.push(point);
    }

    fn stroke(&mut self) {
        self.calls.push(SurfaceCall::Stroke);
        // A lone move-to paints nothing.
        if self.path.len() > 1 {
            self.painted.push(self.path.clone());
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.calls.push(SurfaceCall::ClearRect(rect));
        let full = Rect::from_origin_size(Point::ZERO, self.display);
        if rect.union(full) == rect {
            self.painted.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_painted_paths() {
        let mut surface = RecordingSurface::new();
        surface.set_display_size(Size::new(10.0, 10.0));
        surface.begin_path();
        surface.move_to(Point::new(1.0, 1.0));
        surface.line_to(Point::new(2.0, 2.0));
        surface.stroke();

        assert_eq!(
            surface.painted_paths(),
            vec![vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]]
        );
    }

    #[test]
    fn test_lone_move_paints_nothing() {
        let mut surface = RecordingSurface::new();
        surface.begin_path();
        surface.move_to(Point::new(1.0, 1.0));
        surface.stroke();
        assert!(surface.is_blank());
    }

    #[test]
    fn test_full_clear_blanks_partial_does_not() {
        let mut surface = RecordingSurface::new();
        surface.set_display_size(Size::new(10.0, 10.0));
        surface.begin_path();
        surface.move_to(Point::new(1.0, 1.0));
        surface.line_to(Point::new(2.0, 2.0));
        surface.stroke();

        surface.clear_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert!(!surface.is_blank());

        surface.clear_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(surface.is_blank());
    }

    #[test]
    fn test_take_calls_drains() {
        let mut surface = RecordingSurface::new();
        surface.begin_path();
        assert_eq!(surface.take_calls(), vec![SurfaceCall::BeginPath]);
        assert!(surface.calls().is_empty());
    }
}
