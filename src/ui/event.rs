use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use glam::Vec2;
use smol_str::SmolStr;

use crate::ui::{AnyView, StateMut, View, ViewRuntime};
use crate::view::{NodeId, WindowOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Space,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Character(SmolStr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerUp,
    PointerMove,
    Click,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
}

bitflags! {
    /// A set of [`EventKind`]s, used to compare handler bindings structurally.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventKinds: u8 {
        const POINTER_DOWN = 1 << 0;
        const POINTER_UP = 1 << 1;
        const POINTER_MOVE = 1 << 2;
        const CLICK = 1 << 3;
        const KEY_DOWN = 1 << 4;
        const KEY_UP = 1 << 5;
        const FOCUS = 1 << 6;
        const BLUR = 1 << 7;
    }
}

impl EventKind {
    pub const fn flag(self) -> EventKinds {
        match self {
            Self::PointerDown => EventKinds::POINTER_DOWN,
            Self::PointerUp => EventKinds::POINTER_UP,
            Self::PointerMove => EventKinds::POINTER_MOVE,
            Self::Click => EventKinds::CLICK,
            Self::KeyDown => EventKinds::KEY_DOWN,
            Self::KeyUp => EventKinds::KEY_UP,
            Self::Focus => EventKinds::FOCUS,
            Self::Blur => EventKinds::BLUR,
        }
    }

    /// Focus and blur go to their target only.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::Focus | Self::Blur)
    }
}

/// Raw pointer input, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub position: Vec2,
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            repeat: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Input as delivered to a window by the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerInput),
    PointerUp(PointerInput),
    PointerMove(PointerInput),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown(PointerInput {
            position: Vec2::new(x, y),
            button: Some(MouseButton::Left),
            modifiers: Modifiers::empty(),
        })
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp(PointerInput {
            position: Vec2::new(x, y),
            button: Some(MouseButton::Left),
            modifiers: Modifiers::empty(),
        })
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove(PointerInput {
            position: Vec2::new(x, y),
            button: None,
            modifiers: Modifiers::empty(),
        })
    }

    pub fn key_down(key: Key) -> Self {
        Self::KeyDown(KeyEvent::new(key))
    }

    pub fn key_up(key: Key) -> Self {
        Self::KeyUp(KeyEvent::new(key))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown(_) | Self::PointerUp(_) | Self::PointerMove(_)
        )
    }
}

/// Pointer data as seen by a handler. `local` is relative to the target's box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub local: Vec2,
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    PointerMove(PointerEvent),
    Click(PointerEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    Focus,
    Blur,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown(_) => EventKind::PointerDown,
            Self::PointerUp(_) => EventKind::PointerUp,
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::Click(_) => EventKind::Click,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::Focus => EventKind::Focus,
            Self::Blur => EventKind::Blur,
        }
    }

    pub fn pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::PointerDown(pointer)
            | Self::PointerUp(pointer)
            | Self::PointerMove(pointer)
            | Self::Click(pointer) => Some(pointer),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::KeyDown(key) | Self::KeyUp(key) => Some(key),
            _ => None,
        }
    }
}

/// Requests a handler can make of the application shell. Applied after
/// dispatch returns.
pub enum ShellCommand {
    OpenWindow {
        options: WindowOptions,
        view: Box<dyn AnyView>,
    },
    CloseWindow,
    Quit,
}

impl fmt::Debug for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenWindow { options, view } => f
                .debug_struct("OpenWindow")
                .field("options", options)
                .field("view", &view.view_name())
                .finish(),
            Self::CloseWindow => f.write_str("CloseWindow"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

/// Per-event context handed to every handler along the bubble path.
#[derive(Debug)]
pub struct EventCx {
    event: UiEvent,
    target: NodeId,
    current_target: NodeId,
    propagation_stopped: bool,
    commands: Vec<ShellCommand>,
}

impl EventCx {
    pub fn new(event: UiEvent, target: NodeId) -> Self {
        Self {
            event,
            target,
            current_target: target,
            propagation_stopped: false,
            commands: Vec::new(),
        }
    }

    pub fn event(&self) -> &UiEvent {
        &self.event
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose handler is currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, node: NodeId) {
        self.current_target = node;
    }

    pub(crate) fn set_pointer_local(&mut self, local: Vec2) {
        match &mut self.event {
            UiEvent::PointerDown(pointer)
            | UiEvent::PointerUp(pointer)
            | UiEvent::PointerMove(pointer)
            | UiEvent::Click(pointer) => pointer.local = local,
            _ => {}
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn open_window<V: View>(&mut self, options: WindowOptions, view: V) {
        self.commands.push(ShellCommand::OpenWindow {
            options,
            view: Box::new(ViewRuntime::new(view)),
        });
    }

    pub fn close_window(&mut self) {
        self.commands.push(ShellCommand::CloseWindow);
    }

    pub fn quit(&mut self) {
        self.commands.push(ShellCommand::Quit);
    }

    pub(crate) fn take_commands(&mut self) -> Vec<ShellCommand> {
        std::mem::take(&mut self.commands)
    }
}

type HandlerFn<V> = dyn FnMut(&mut StateMut<'_, V>, &mut EventCx);

/// An event callback bound on an element. Clones share the same closure.
pub struct Handler<V> {
    kind: EventKind,
    callback: Rc<RefCell<HandlerFn<V>>>,
}

impl<V> Handler<V> {
    pub fn new<F>(kind: EventKind, callback: F) -> Self
    where
        F: FnMut(&mut StateMut<'_, V>, &mut EventCx) + 'static,
    {
        Self {
            kind,
            callback: Rc::new(RefCell::new(callback)),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn call(&self, state: &mut StateMut<'_, V>, cx: &mut EventCx) {
        (self.callback.borrow_mut())(state, cx);
    }
}

impl<V> Clone for Handler<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            callback: self.callback.clone(),
        }
    }
}

impl<V> fmt::Debug for Handler<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{EventCx, EventKind, EventKinds, PointerEvent, UiEvent};
    use crate::view::NodeId;
    use glam::Vec2;

    #[test]
    fn kinds_map_to_distinct_flags() {
        let all = [
            EventKind::PointerDown,
            EventKind::PointerUp,
            EventKind::PointerMove,
            EventKind::Click,
            EventKind::KeyDown,
            EventKind::KeyUp,
            EventKind::Focus,
            EventKind::Blur,
        ];
        let mut seen = EventKinds::empty();
        for kind in all {
            assert!(!seen.contains(kind.flag()));
            seen |= kind.flag();
        }
        assert_eq!(seen, EventKinds::all());
    }

    #[test]
    fn local_position_only_touches_pointer_events() {
        let pointer = PointerEvent {
            position: Vec2::new(10.0, 10.0),
            local: Vec2::ZERO,
            button: None,
            modifiers: Default::default(),
        };
        let mut cx = EventCx::new(UiEvent::Click(pointer), NodeId(3));
        cx.set_pointer_local(Vec2::new(2.0, 4.0));
        assert_eq!(cx.event().pointer().map(|p| p.local), Some(Vec2::new(2.0, 4.0)));

        let mut cx = EventCx::new(UiEvent::Focus, NodeId(3));
        cx.set_pointer_local(Vec2::ONE);
        assert_eq!(cx.event(), &UiEvent::Focus);
    }
}
