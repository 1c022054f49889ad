//! Pointer/touch/keyboard input and its normalization to surface-local points.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Class of pointer device the surface listens to, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    #[default]
    Mouse,
    Touch,
}

impl DeviceClass {
    /// Pick the device class from an environment capability query.
    pub fn from_touch_support(touch: bool) -> Self {
        if touch { Self::Touch } else { Self::Mouse }
    }

    /// Event names subscribed for this device class.
    pub fn event_names(self) -> EventNames {
        match self {
            DeviceClass::Mouse => EventNames {
                press: "mousedown",
                moved: "mousemove",
                release: "mouseup",
                cancel: None,
                key: "keydown",
            },
            DeviceClass::Touch => EventNames {
                press: "touchstart",
                moved: "touchmove",
                release: "touchend",
                cancel: Some("touchcancel"),
                key: "keydown",
            },
        }
    }
}

/// Names of the events a pen subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventNames {
    pub press: &'static str,
    pub moved: &'static str,
    pub release: &'static str,
    /// Aborts the open stroke. Only touch sources deliver one.
    pub cancel: Option<&'static str>,
    pub key: &'static str,
}

/// A raw pointer or touch event in client (viewport) coordinates.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    /// Direct event coordinates.
    pub client: Point,
    /// Active touch contacts; empty for mouse events.
    pub touches: Vec<Point>,
    default_prevented: Cell<bool>,
}

impl PointerInput {
    /// A mouse-style event at client coordinates.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            client: Point::new(x, y),
            ..Self::default()
        }
    }

    /// A touch event with the given active contacts.
    pub fn touch(touches: Vec<Point>) -> Self {
        Self {
            client: touches.first().copied().unwrap_or(Point::ZERO),
            touches,
            ..Self::default()
        }
    }

    /// Suppress the host's default handling (scrolling, zooming).
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };
}

/// A key press identified by its physical key code (e.g. `"KeyZ"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub code: String,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(code: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            code: code.into(),
            modifiers,
        }
    }
}

/// The key chord that triggers undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoShortcut {
    pub code: &'static str,
    pub ctrl: bool,
    /// Required shift state; `None` accepts either.
    pub shift: Option<bool>,
}

impl Default for UndoShortcut {
    fn default() -> Self {
        Self {
            code: "KeyZ",
            ctrl: true,
            shift: None,
        }
    }
}

impl UndoShortcut {
    /// Whether a key press triggers this shortcut. Alt and meta are not checked.
    pub fn matches(&self, key: &KeyInput) -> bool {
        key.code == self.code
            && key.modifiers.ctrl == self.ctrl
            && self.shift.is_none_or(|shift| key.modifiers.shift == shift)
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift == Some(true) {
            parts.push("Shift");
        }
        parts.push(self.code.strip_prefix("Key").unwrap_or(self.code));
        parts.join("+")
    }
}

/// Maps client-space events to surface-local logical points.
///
/// The surface offset is captured once at construction and never re-measured;
/// if the surface moves afterwards, recorded points drift by the same amount.
#[derive(Debug, Clone, Copy)]
pub struct InputNormalizer {
    device: DeviceClass,
    offset: Vec2,
}

impl InputNormalizer {
    /// `offset` is the surface's `(left, top)` in client coordinates.
    pub fn new(device: DeviceClass, offset: Vec2) -> Self {
        Self { device, offset }
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Convert an event to a surface-local point.
    ///
    /// Touch events use their first active contact and always have their default
    /// handling suppressed; a touch event without contacts yields `None`.
    pub fn normalize(&self, event: &PointerInput) -> Option<Point> {
        let client = match self.device {
            DeviceClass::Mouse => event.client,
            DeviceClass::Touch => {
                event.prevent_default();
                *event.touches.first()?
            }
        };
        Some(client - self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_normalization() {
        let normalizer = InputNormalizer::new(DeviceClass::Mouse, Vec2::new(10.0, 20.0));
        let event = PointerInput::at(15.0, 25.0);

        assert_eq!(normalizer.normalize(&event), Some(Point::new(5.0, 5.0)));
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_touch_uses_first_contact() {
        let normalizer = InputNormalizer::new(DeviceClass::Touch, Vec2::new(10.0, 20.0));
        let event = PointerInput::touch(vec![Point::new(30.0, 40.0), Point::new(100.0, 100.0)]);

        assert_eq!(normalizer.normalize(&event), Some(Point::new(20.0, 20.0)));
        assert!(event.default_prevented());
    }

    #[test]
    fn test_touch_without_contacts() {
        let normalizer = InputNormalizer::new(DeviceClass::Touch, Vec2::ZERO);
        let event = PointerInput::touch(Vec::new());

        assert_eq!(normalizer.normalize(&event), None);
        assert!(event.default_prevented());
    }

    #[test]
    fn test_event_names_per_device() {
        let mouse = DeviceClass::from_touch_support(false).event_names();
        assert_eq!((mouse.press, mouse.moved, mouse.release), ("mousedown", "mousemove", "mouseup"));
        assert_eq!(mouse.cancel, None);

        let touch = DeviceClass::from_touch_support(true).event_names();
        assert_eq!((touch.press, touch.moved, touch.release), ("touchstart", "touchmove", "touchend"));
        assert_eq!(touch.cancel, Some("touchcancel"));
    }

    #[test]
    fn test_undo_shortcut() {
        let shortcut = UndoShortcut::default();
        assert!(shortcut.matches(&KeyInput::new("KeyZ", Modifiers::CTRL)));
        assert!(!shortcut.matches(&KeyInput::new("KeyZ", Modifiers::default())));
        assert!(!shortcut.matches(&KeyInput::new("KeyY", Modifiers::CTRL)));

        assert_eq!(shortcut.format(), "Ctrl+Z");
    }

    #[test]
    fn test_undo_shortcut_ignores_shift() {
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CTRL
        };
        assert!(UndoShortcut::default().matches(&KeyInput::new("KeyZ", ctrl_shift)));

        let strict = UndoShortcut {
            shift: Some(false),
            ..UndoShortcut::default()
        };
        assert!(!strict.matches(&KeyInput::new("KeyZ", ctrl_shift)));
        assert!(strict.matches(&KeyInput::new("KeyZ", Modifiers::CTRL)));

        let redo_style = UndoShortcut {
            shift: Some(true),
            ..UndoShortcut::default()
        };
        assert_eq!(redo_style.format(), "Ctrl+Shift+Z");
    }
}
