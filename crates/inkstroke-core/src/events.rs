//! Injected event sources and the binding that connects a pen to one.

use crate::input::{DeviceClass, EventNames, KeyInput, PointerInput};
use crate::pen::Pen;
use crate::render::RenderSurface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// An event delivered by a source.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Pointer(PointerInput),
    Key(KeyInput),
}

/// Event callback. Identity (for unsubscribing) is the `Rc` allocation.
pub type Handler = Rc<dyn Fn(&InputEvent)>;

/// Something that delivers named events to subscribed handlers.
pub trait EventSource {
    fn subscribe(&mut self, name: &'static str, handler: Handler);

    /// Remove a handler previously passed to `subscribe` under the same name.
    /// Handlers are compared by identity, not by behavior.
    fn unsubscribe(&mut self, name: &str, handler: &Handler);
}

/// In-memory event source driven by explicit `dispatch` calls.
///
/// Subscriptions go through `&self`, so a handler holding a reference to the
/// source may subscribe or unsubscribe while an event is being dispatched.
/// Such changes take effect from the next dispatch.
#[derive(Default)]
pub struct SyntheticEventSource {
    handlers: RefCell<HashMap<&'static str, Vec<Handler>>>,
}

impl SyntheticEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, name: &'static str, handler: Handler) {
        self.handlers.borrow_mut().entry(name).or_default().push(handler);
    }

    pub fn unsubscribe(&self, name: &str, handler: &Handler) {
        let mut handlers = self.handlers.borrow_mut();
        if let Some(list) = handlers.get_mut(name) {
            if let Some(index) = list.iter().position(|h| Rc::ptr_eq(h, handler)) {
                list.remove(index);
            }
        }
    }

    /// Deliver `event` to every handler subscribed to `name`, in subscription order.
    pub fn dispatch(&self, name: &str, event: &InputEvent) {
        // Snapshot, releasing the borrow before any handler runs.
        let handlers = self.handlers.borrow().get(name).cloned().unwrap_or_default();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.handlers.borrow().get(name).map_or(0, Vec::len)
    }
}

impl EventSource for SyntheticEventSource {
    fn subscribe(&mut self, name: &'static str, handler: Handler) {
        SyntheticEventSource::subscribe(self, name, handler);
    }

    fn unsubscribe(&mut self, name: &str, handler: &Handler) {
        SyntheticEventSource::unsubscribe(self, name, handler);
    }
}

/// The handlers a pen subscribed with, kept so that detaching removes exactly them.
pub struct PenBinding {
    names: EventNames,
    press: Handler,
    moved: Handler,
    release: Handler,
    /// Present only for device classes that deliver a cancel event.
    cancel: Option<Handler>,
    key: Handler,
}

impl PenBinding {
    /// Subscribe `pen` to the press/move/release (and, for touch, cancel) events of
    /// its device class and to key presses for undo.
    pub fn attach<S, E>(pen: &Rc<RefCell<Pen<S>>>, source: &mut E) -> Self
    where
        S: RenderSurface + 'static,
        E: EventSource + ?Sized,
    {
        let device = pen.borrow().device();
        let names = device.event_names();

        let binding = Self {
            names,
            press: pointer_handler(pen, device, |pen, event| pen.press(event)),
            moved: pointer_handler(pen, device, |pen, event| pen.move_pointer(event)),
            release: pointer_handler(pen, device, |pen, _| pen.release()),
            cancel: names
                .cancel
                .map(|_| pointer_handler(pen, device, |pen, _| pen.cancel_stroke())),
            key: key_handler(pen),
        };

        source.subscribe(names.press, Rc::clone(&binding.press));
        source.subscribe(names.moved, Rc::clone(&binding.moved));
        source.subscribe(names.release, Rc::clone(&binding.release));
        if let (Some(name), Some(cancel)) = (names.cancel, &binding.cancel) {
            source.subscribe(name, Rc::clone(cancel));
        }
        source.subscribe(names.key, Rc::clone(&binding.key));
        log::debug!("Pen attached to {:?} events", device);

        binding
    }

    /// Unsubscribe every handler added by [`attach`](Self::attach).
    pub fn detach<E: EventSource + ?Sized>(self, source: &mut E) {
        source.unsubscribe(self.names.press, &self.press);
        source.unsubscribe(self.names.moved, &self.moved);
        source.unsubscribe(self.names.release, &self.release);
        if let (Some(name), Some(cancel)) = (self.names.cancel, &self.cancel) {
            source.unsubscribe(name, cancel);
        }
        source.unsubscribe(self.names.key, &self.key);
        log::debug!("Pen detached");
    }

    pub fn event_names(&self) -> EventNames {
        self.names
    }
}

/// Run `f` on the pen if it is still alive and not already handling an event.
fn with_pen<S>(pen: &Weak<RefCell<Pen<S>>>, f: impl FnOnce(&mut Pen<S>)) {
    let Some(pen) = pen.upgrade() else {
        return;
    };
    match pen.try_borrow_mut() {
        Ok(mut pen) => f(&mut *pen),
        Err(_) => log::warn!("Dropping event delivered while the pen is busy"),
    };
}

fn pointer_handler<S: RenderSurface + 'static>(
    pen: &Rc<RefCell<Pen<S>>>,
    device: DeviceClass,
    f: impl Fn(&mut Pen<S>, &PointerInput) + 'static,
) -> Handler {
    let pen = Rc::downgrade(pen);
    Rc::new(move |event: &InputEvent| {
        if let InputEvent::Pointer(pointer) = event {
            if device == DeviceClass::Touch {
                pointer.prevent_default();
            }
            with_pen(&pen, |pen| f(pen, pointer));
        }
    })
}

fn key_handler<S: RenderSurface + 'static>(pen: &Rc<RefCell<Pen<S>>>) -> Handler {
    let pen = Rc::downgrade(pen);
    Rc::new(move |event: &InputEvent| {
        if let InputEvent::Key(key) = event {
            with_pen(&pen, |pen| {
                pen.handle_key(key);
            });
        }
    })
}
