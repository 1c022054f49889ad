//! The Idle/Drawing stroke capture state machine.
//!
//! Transitions are pure functions on [`RecorderState`]: each consumes the current
//! state and returns the next one together with the rendering and history effects
//! the caller must apply. Nothing here touches a surface or the history directly.

use crate::history::Stroke;
use kurbo::Point;

/// Capture state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RecorderState {
    /// No press is active; moves and releases are ignored.
    #[default]
    Idle,
    /// A press is active. `buffer` is never empty; its last point is the
    /// previous point for the next segment.
    Drawing { buffer: Vec<Point> },
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEffect {
    /// Start a new path at the point.
    BeginPath(Point),
    /// Draw one incremental segment.
    Segment { from: Point, to: Point },
    /// Push the finished stroke to history.
    Finalize(Stroke),
    /// The open stroke was abandoned; its pixels must be removed by a redraw.
    Discard,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: RecorderState,
    pub effects: Vec<RecorderEffect>,
}

impl Transition {
    fn unchanged(state: RecorderState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

impl RecorderState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, RecorderState::Drawing { .. })
    }

    /// Points of the in-progress stroke (empty while idle).
    pub fn buffer(&self) -> &[Point] {
        match self {
            RecorderState::Idle => &[],
            RecorderState::Drawing { buffer } => buffer,
        }
    }

    /// Begin a stroke at `point`.
    ///
    /// A press while already drawing (a second touch contact, a lost release)
    /// finalizes the open stroke before starting the new one.
    pub fn press(self, point: Point) -> Transition {
        let mut effects = Vec::new();
        if let RecorderState::Drawing { buffer } = self {
            effects.extend(Stroke::from_points(buffer).map(RecorderEffect::Finalize));
        }
        effects.push(RecorderEffect::BeginPath(point));
        Transition {
            state: RecorderState::Drawing { buffer: vec![point] },
            effects,
        }
    }

    /// Extend the open stroke to `point`. Ignored while idle.
    pub fn moved(self, point: Point) -> Transition {
        match self {
            RecorderState::Idle => Transition::unchanged(RecorderState::Idle),
            RecorderState::Drawing { mut buffer } => {
                let from = buffer.last().copied().unwrap_or(point);
                buffer.push(point);
                Transition {
                    state: RecorderState::Drawing { buffer },
                    effects: vec![RecorderEffect::Segment { from, to: point }],
                }
            }
        }
    }

    /// Finish the open stroke. Ignored while idle.
    pub fn release(self) -> Transition {
        match self {
            RecorderState::Idle => Transition::unchanged(RecorderState::Idle),
            RecorderState::Drawing { buffer } => Transition {
                state: RecorderState::Idle,
                effects: Stroke::from_points(buffer)
                    .map(RecorderEffect::Finalize)
                    .into_iter()
                    .collect(),
            },
        }
    }

    /// Abandon the open stroke without recording it. Ignored while idle.
    pub fn cancel(self) -> Transition {
        match self {
            RecorderState::Idle => Transition::unchanged(RecorderState::Idle),
            RecorderState::Drawing { .. } => Transition {
                state: RecorderState::Idle,
                effects: vec![RecorderEffect::Discard],
            },
        }
    }
}

/// Holds the capture state between events and threads it through transitions.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    state: RecorderState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn press(&mut self, point: Point) -> Vec<RecorderEffect> {
        self.apply(|state| state.press(point))
    }

    pub fn moved(&mut self, point: Point) -> Vec<RecorderEffect> {
        self.apply(|state| state.moved(point))
    }

    pub fn release(&mut self) -> Vec<RecorderEffect> {
        self.apply(RecorderState::release)
    }

    pub fn cancel(&mut self) -> Vec<RecorderEffect> {
        self.apply(RecorderState::cancel)
    }

    fn apply(&mut self, transition: impl FnOnce(RecorderState) -> Transition) -> Vec<RecorderEffect> {
        let was_drawing = self.state.is_drawing();
        let Transition { state, effects } = transition(std::mem::take(&mut self.state));
        if was_drawing != state.is_drawing() {
            log::debug!(
                "Recorder {} -> {}",
                if was_drawing { "Drawing" } else { "Idle" },
                if state.is_drawing() { "Drawing" } else { "Idle" }
            );
        }
        self.state = state;
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_press_begins_path() {
        let t = RecorderState::Idle.press(p(1.0, 2.0));
        assert!(t.state.is_drawing());
        assert_eq!(t.state.buffer(), &[p(1.0, 2.0)]);
        assert_eq!(t.effects, vec![RecorderEffect::BeginPath(p(1.0, 2.0))]);
    }

    #[test]
    fn test_move_appends_and_draws_segment() {
        let t = RecorderState::Idle.press(p(0.0, 0.0)).state.moved(p(5.0, 0.0));
        assert_eq!(t.state.buffer(), &[p(0.0, 0.0), p(5.0, 0.0)]);
        assert_eq!(
            t.effects,
            vec![RecorderEffect::Segment {
                from: p(0.0, 0.0),
                to: p(5.0, 0.0)
            }]
        );

        let t = t.state.moved(p(5.0, 5.0));
        assert_eq!(
            t.effects,
            vec![RecorderEffect::Segment {
                from: p(5.0, 0.0),
                to: p(5.0, 5.0)
            }]
        );
    }

    #[test]
    fn test_idle_move_is_noop() {
        let t = RecorderState::Idle.moved(p(3.0, 3.0));
        assert_eq!(t.state, RecorderState::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_idle_release_is_noop() {
        let t = RecorderState::Idle.release();
        assert_eq!(t.state, RecorderState::Idle);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_release_finalizes_in_order() {
        let state = RecorderState::Idle.press(p(10.0, 10.0)).state;
        let state = state.moved(p(20.0, 10.0)).state;
        let state = state.moved(p(20.0, 20.0)).state;
        let t = state.release();

        assert_eq!(t.state, RecorderState::Idle);
        let expected = Stroke::from_points(vec![p(10.0, 10.0), p(20.0, 10.0), p(20.0, 20.0)]).unwrap();
        assert_eq!(t.effects, vec![RecorderEffect::Finalize(expected)]);
    }

    #[test]
    fn test_press_while_drawing_finalizes_previous() {
        let state = RecorderState::Idle.press(p(0.0, 0.0)).state;
        let t = state.press(p(9.0, 9.0));

        assert_eq!(t.state.buffer(), &[p(9.0, 9.0)]);
        assert_eq!(
            t.effects,
            vec![
                RecorderEffect::Finalize(Stroke::from_points(vec![p(0.0, 0.0)]).unwrap()),
                RecorderEffect::BeginPath(p(9.0, 9.0)),
            ]
        );
    }

    #[test]
    fn test_cancel_discards() {
        let state = RecorderState::Idle.press(p(0.0, 0.0)).state;
        let t = state.cancel();
        assert_eq!(t.state, RecorderState::Idle);
        assert_eq!(t.effects, vec![RecorderEffect::Discard]);

        assert!(RecorderState::Idle.cancel().effects.is_empty());
    }

    #[test]
    fn test_recorder_threads_state() {
        let mut recorder = StrokeRecorder::new();
        assert!(!recorder.is_drawing());

        recorder.press(p(0.0, 0.0));
        assert!(recorder.is_drawing());
        recorder.moved(p(1.0, 1.0));
        assert_eq!(recorder.state().buffer().len(), 2);

        let effects = recorder.release();
        assert!(!recorder.is_drawing());
        assert!(matches!(effects.as_slice(), [RecorderEffect::Finalize(s)] if s.len() == 2));
    }
}
