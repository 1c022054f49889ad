//! Destructive undo, reset and full redraw over the history.

use crate::history::{HistoryStack, Stroke};
use crate::render::{RenderEngine, RenderSurface};

/// Couples the history with the engine so that every mutation is followed by
/// the matching surface update.
pub struct UndoController<'a, S> {
    history: &'a mut HistoryStack,
    engine: &'a mut RenderEngine<S>,
}

impl<'a, S: RenderSurface> UndoController<'a, S> {
    pub fn new(history: &'a mut HistoryStack, engine: &'a mut RenderEngine<S>) -> Self {
        Self { history, engine }
    }

    /// Drop the most recent stroke and rebuild the surface from what remains.
    /// Redraws even when there was nothing to drop.
    pub fn undo(&mut self) -> Option<Stroke> {
        let removed = self.history.pop();
        if removed.is_none() {
            log::debug!("Undo with empty history");
        }
        self.redraw();
        removed
    }

    /// Empty the history and blank the surface.
    pub fn reset(&mut self) {
        self.history.clear();
        self.engine.clear();
        log::debug!("History reset");
    }

    /// Clear the surface and replay every stroke, oldest first.
    pub fn redraw(&mut self) {
        self.engine.clear();
        for stroke in self.history.iter() {
            self.engine.draw_stroke(stroke);
        }
    }
}
