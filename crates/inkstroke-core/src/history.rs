//! Finalized strokes and the append-only history they are replayed from.

use kurbo::{BezPath, Point, Rect};

/// One continuous press-to-release gesture.
///
/// A stroke always holds at least one point; the only way to build one is
/// [`Stroke::from_points`], which rejects an empty buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Create a stroke from recorded points, or `None` if there are none.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    /// Points in recording order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The point the stroke's path begins at.
    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed stroke.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the recorded points (zero-area for a single point).
    pub fn bounds(&self) -> Rect {
        let first = self.first();
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(first, first), |rect, p| rect.union_pt(*p))
    }

    /// The stroke as a polyline path: move to the first point, line through the rest.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.first());
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }
        path
    }
}

/// Ordered record of finalized strokes, oldest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    strokes: Vec<Stroke>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized stroke.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
        log::debug!("History push: {} strokes", self.strokes.len());
    }

    /// Remove and return the most recently pushed stroke.
    pub fn pop(&mut self) -> Option<Stroke> {
        let stroke = self.strokes.pop();
        if stroke.is_some() {
            log::debug!("History pop: {} strokes remain", self.strokes.len());
        }
        stroke
    }

    /// Drop every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    /// Strokes in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }
}
