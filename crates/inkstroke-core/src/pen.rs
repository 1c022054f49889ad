//! The pen: one drawing surface with its capture state, history and renderer.

use crate::config::{PenConfig, PenOverrides};
use crate::export::{EncodeSurface, EncodedImage, ExportError};
use crate::history::{HistoryStack, Stroke};
use crate::input::{DeviceClass, EventNames, InputNormalizer, KeyInput, PointerInput, UndoShortcut};
use crate::recorder::{RecorderEffect, StrokeRecorder};
use crate::render::{RenderEngine, RenderSurface, SurfaceGeometry};
use crate::undo::UndoController;
use kurbo::{Point, Vec2};

/// A freehand drawing surface.
///
/// Every operation runs to completion before the next one starts. Configuration,
/// geometry and the surface offset are fixed at construction.
#[derive(Debug)]
pub struct Pen<S> {
    config: PenConfig,
    normalizer: InputNormalizer,
    recorder: StrokeRecorder,
    history: HistoryStack,
    engine: RenderEngine<S>,
    undo_shortcut: UndoShortcut,
}

impl<S: RenderSurface> Pen<S> {
    /// Initialize a pen over `surface`.
    ///
    /// `offset` is the surface's `(left, top)` in client coordinates, measured once.
    pub fn new(
        surface: S,
        geometry: SurfaceGeometry,
        device: DeviceClass,
        offset: Vec2,
        overrides: PenOverrides,
    ) -> Self {
        let config = PenConfig::with_overrides(overrides);
        let engine = RenderEngine::new(surface, geometry, config.stroke_style());
        log::info!(
            "Pen ready: {:?} input, width {}, color {:?}",
            device,
            config.line_width,
            config.color
        );
        Self {
            config,
            normalizer: InputNormalizer::new(device, offset),
            recorder: StrokeRecorder::new(),
            history: HistoryStack::new(),
            engine,
            undo_shortcut: UndoShortcut::default(),
        }
    }

    pub fn config(&self) -> &PenConfig {
        &self.config
    }

    pub fn device(&self) -> DeviceClass {
        self.normalizer.device()
    }

    /// Events a host must deliver to this pen.
    pub fn event_names(&self) -> EventNames {
        self.normalizer.device().event_names()
    }

    pub fn undo_shortcut(&self) -> UndoShortcut {
        self.undo_shortcut
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    /// Points of the stroke being drawn, empty while idle.
    pub fn current_stroke(&self) -> &[Point] {
        self.recorder.state().buffer()
    }

    pub fn engine(&self) -> &RenderEngine<S> {
        &self.engine
    }

    pub fn surface(&self) -> &S {
        self.engine.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.engine.surface_mut()
    }

    /// Pointer pressed: start a stroke.
    pub fn press(&mut self, event: &PointerInput) {
        if let Some(point) = self.normalizer.normalize(event) {
            let effects = self.recorder.press(point);
            self.apply(effects);
        }
    }

    /// Pointer moved: extend the open stroke, if any.
    pub fn move_pointer(&mut self, event: &PointerInput) {
        if let Some(point) = self.normalizer.normalize(event) {
            let effects = self.recorder.moved(point);
            self.apply(effects);
        }
    }

    /// Pointer released: finalize the open stroke, if any.
    pub fn release(&mut self) {
        let effects = self.recorder.release();
        self.apply(effects);
    }

    /// Abandon the open stroke, if any, and remove its pixels.
    pub fn cancel_stroke(&mut self) {
        let effects = self.recorder.cancel();
        self.apply(effects);
    }

    /// Handle a key press. Returns true when it triggered an undo.
    pub fn handle_key(&mut self, key: &KeyInput) -> bool {
        if self.undo_shortcut.matches(key) {
            log::debug!("Undo shortcut {}", self.undo_shortcut.format());
            self.undo();
            true
        } else {
            false
        }
    }

    /// Drop the most recently finalized stroke and redraw.
    ///
    /// A stroke still being drawn is unaffected and stays visible.
    pub fn undo(&mut self) -> Option<Stroke> {
        let removed = UndoController::new(&mut self.history, &mut self.engine).undo();
        self.replay_open_stroke();
        removed
    }

    /// Empty the history and blank the surface. A stroke being drawn is discarded.
    pub fn reset(&mut self) {
        if self.recorder.is_drawing() {
            self.recorder.cancel();
        }
        UndoController::new(&mut self.history, &mut self.engine).reset();
    }

    /// Rebuild the surface from history.
    pub fn redraw(&mut self) {
        UndoController::new(&mut self.history, &mut self.engine).redraw();
        self.replay_open_stroke();
    }

    fn replay_open_stroke(&mut self) {
        let buffer = self.recorder.state().buffer();
        if !buffer.is_empty() {
            self.engine.draw_points(buffer);
        }
    }

    fn apply(&mut self, effects: Vec<RecorderEffect>) {
        for effect in effects {
            match effect {
                RecorderEffect::BeginPath(point) => self.engine.begin_stroke(point),
                RecorderEffect::Segment { from, to } => self.engine.draw_segment(from, to),
                RecorderEffect::Finalize(stroke) => self.history.push(stroke),
                RecorderEffect::Discard => {
                    log::debug!("Open stroke discarded");
                    self.redraw();
                }
            }
        }
    }
}

impl<S: RenderSurface + EncodeSurface> Pen<S> {
    /// Snapshot the surface as PNG.
    pub fn export_png(&self) -> Result<EncodedImage, ExportError> {
        let bytes = self.engine.surface().encode_png()?;
        log::info!("Exported PNG ({} bytes)", bytes.len());
        Ok(EncodedImage::png(bytes))
    }

    /// Snapshot the surface as a PNG data URL.
    pub fn export_data_url(&self) -> Result<String, ExportError> {
        Ok(self.export_png()?.to_data_url())
    }
}
