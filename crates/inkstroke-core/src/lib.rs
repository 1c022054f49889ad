//! Inkstroke Core Library
//!
//! Freehand stroke capture for pointer-driven drawing surfaces: input
//! normalization, the Idle/Drawing capture state machine, the stroke history
//! with destructive undo, and deterministic redraw through an abstract 2D surface.

pub mod config;
pub mod events;
pub mod export;
pub mod history;
pub mod input;
pub mod pen;
pub mod recorder;
pub mod render;
pub mod undo;

pub use config::{PenConfig, PenOverrides};
pub use events::{EventSource, Handler, InputEvent, PenBinding, SyntheticEventSource};
pub use export::{EncodeSurface, EncodedImage, ExportError, PNG_MIME};
pub use history::{HistoryStack, Stroke};
pub use input::{DeviceClass, EventNames, InputNormalizer, KeyInput, Modifiers, PointerInput, UndoShortcut};
pub use pen::Pen;
pub use recorder::{RecorderEffect, RecorderState, StrokeRecorder, Transition};
pub use render::{RecordingSurface, RenderEngine, RenderSurface, StrokeStyle, SurfaceCall, SurfaceGeometry};
pub use undo::UndoController;

pub use kurbo;
pub use peniko;
