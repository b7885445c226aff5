//! Routes input to element handlers.
//!
//! Pointer input is hit-tested against the last layout; keyboard input goes
//! to the focused element, or the root when nothing is focused. Handlers run
//! from the target up towards the root until one stops propagation.

use glam::Vec2;
use tracing::{trace, warn};

use crate::ui::{
    Element, EventCx, EventKind, InputEvent, Invalidation, Key, Modifiers, PointerEvent,
    PointerInput, ShellCommand, StateMut, UiEvent,
};
use crate::view::{LayoutNode, NodeId, hit_test};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPhase {
    #[default]
    Idle,
    DispatchingPointer,
    DispatchingKeyboard,
}

/// Result of dispatching one input event.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Handlers invoked, including synthesized click, focus and blur.
    pub handlers_called: usize,
    pub commands: Vec<ShellCommand>,
}

impl DispatchOutcome {
    pub fn handled(&self) -> bool {
        self.handlers_called > 0
    }

    fn absorb(&mut self, handlers_called: usize, commands: Vec<ShellCommand>) {
        self.handlers_called += handlers_called;
        self.commands.extend(commands);
    }
}

/// Per-window dispatch state: focus and the pending press.
#[derive(Debug, Default)]
pub struct Dispatcher {
    phase: DispatchPhase,
    focused: Option<Vec<usize>>,
    pressed: Option<Vec<usize>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    /// Path of child indices to the focused element.
    pub fn focused_path(&self) -> Option<&[usize]> {
        self.focused.as_deref()
    }

    /// Drops focus and any pending press without emitting events.
    pub fn reset(&mut self) {
        self.focused = None;
        self.pressed = None;
    }

    pub fn dispatch<V>(
        &mut self,
        root: &Element<V>,
        layout: &LayoutNode,
        view: &mut V,
        invalidation: &Invalidation,
        input: &InputEvent,
    ) -> DispatchOutcome {
        if self.phase != DispatchPhase::Idle {
            warn!(phase = ?self.phase, "re-entrant dispatch ignored");
            return DispatchOutcome::default();
        }

        let mut target = Target {
            root,
            layout,
            view,
            invalidation,
        };
        self.phase = if input.is_pointer() {
            DispatchPhase::DispatchingPointer
        } else {
            DispatchPhase::DispatchingKeyboard
        };
        let outcome = match input {
            InputEvent::PointerDown(pointer) => self.pointer_down(&mut target, pointer),
            InputEvent::PointerUp(pointer) => self.pointer_up(&mut target, pointer),
            InputEvent::PointerMove(pointer) => {
                let mut outcome = DispatchOutcome::default();
                if let Some(path) = hit_test(layout, pointer.position) {
                    let event = UiEvent::PointerMove(pointer_event(pointer));
                    let (calls, commands) = target.bubble(&path, event);
                    outcome.absorb(calls, commands);
                }
                outcome
            }
            InputEvent::KeyDown(key) => {
                let path = self.keyboard_target(root);
                let (calls, commands) = target.bubble(&path, UiEvent::KeyDown(key.clone()));
                let mut outcome = DispatchOutcome {
                    handlers_called: calls,
                    commands,
                };
                if calls == 0 && key.key == Key::Tab {
                    let backwards = key.modifiers.contains(Modifiers::SHIFT);
                    self.traverse_focus(&mut target, backwards, &mut outcome);
                }
                outcome
            }
            InputEvent::KeyUp(key) => {
                let path = self.keyboard_target(root);
                let (calls, commands) = target.bubble(&path, UiEvent::KeyUp(key.clone()));
                DispatchOutcome {
                    handlers_called: calls,
                    commands,
                }
            }
        };
        self.phase = DispatchPhase::Idle;

        if !outcome.handled() {
            trace!(?input, "no handler matched, event dropped");
        }
        outcome
    }

    fn pointer_down<V>(&mut self, target: &mut Target<'_, V>, pointer: &PointerInput) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let hit = hit_test(target.layout, pointer.position);
        if let Some(path) = &hit {
            let (calls, commands) = target.bubble(path, UiEvent::PointerDown(pointer_event(pointer)));
            outcome.absorb(calls, commands);
        }

        let focus = hit.as_deref().and_then(|path| nearest_focusable(target.root, path));
        self.set_focus(target, focus, &mut outcome);
        self.pressed = hit;
        outcome
    }

    fn pointer_up<V>(&mut self, target: &mut Target<'_, V>, pointer: &PointerInput) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let pressed = self.pressed.take();
        let Some(path) = hit_test(target.layout, pointer.position) else {
            return outcome;
        };

        let (calls, commands) = target.bubble(&path, UiEvent::PointerUp(pointer_event(pointer)));
        outcome.absorb(calls, commands);

        if pressed.as_ref() == Some(&path) {
            let (calls, commands) = target.bubble(&path, UiEvent::Click(pointer_event(pointer)));
            outcome.absorb(calls, commands);
        }
        outcome
    }

    fn keyboard_target<V>(&mut self, root: &Element<V>) -> Vec<usize> {
        match self.focused.take() {
            Some(path) if root.at_path(&path).is_some_and(Element::is_focusable) => {
                self.focused = Some(path.clone());
                path
            }
            _ => Vec::new(),
        }
    }

    fn traverse_focus<V>(&mut self, target: &mut Target<'_, V>, backwards: bool, outcome: &mut DispatchOutcome) {
        let order: Vec<Vec<usize>> = target
            .root
            .preorder_paths()
            .into_iter()
            .filter(|path| target.root.at_path(path).is_some_and(Element::is_focusable))
            .collect();
        if order.is_empty() {
            return;
        }

        let current = self
            .focused
            .as_ref()
            .and_then(|focused| order.iter().position(|path| path == focused));
        let next = match (current, backwards) {
            (Some(index), false) => (index + 1) % order.len(),
            (Some(index), true) => (index + order.len() - 1) % order.len(),
            (None, false) => 0,
            (None, true) => order.len() - 1,
        };
        self.set_focus(target, Some(order[next].clone()), outcome);
    }

    fn set_focus<V>(&mut self, target: &mut Target<'_, V>, next: Option<Vec<usize>>, outcome: &mut DispatchOutcome) {
        if self.focused == next {
            return;
        }
        if let Some(previous) = self.focused.take() {
            if target.root.at_path(&previous).is_some() {
                let (calls, commands) = target.bubble(&previous, UiEvent::Blur);
                outcome.absorb(calls, commands);
            }
        }
        if let Some(path) = &next {
            let (calls, commands) = target.bubble(path, UiEvent::Focus);
            outcome.absorb(calls, commands);
        }
        trace!(focused = ?next, "focus changed");
        self.focused = next;
    }
}

fn pointer_event(pointer: &PointerInput) -> PointerEvent {
    PointerEvent {
        position: pointer.position,
        local: Vec2::ZERO,
        button: pointer.button,
        modifiers: pointer.modifiers,
    }
}

/// The target itself or its closest focusable ancestor.
fn nearest_focusable<V>(root: &Element<V>, path: &[usize]) -> Option<Vec<usize>> {
    (0..=path.len())
        .rev()
        .map(|depth| &path[..depth])
        .find(|prefix| root.at_path(prefix).is_some_and(Element::is_focusable))
        .map(<[usize]>::to_vec)
}

/// Everything handlers need, borrowed for one dispatch.
struct Target<'a, V> {
    root: &'a Element<V>,
    layout: &'a LayoutNode,
    view: &'a mut V,
    invalidation: &'a Invalidation,
}

impl<V> Target<'_, V> {
    /// Delivers `event` along `path`, deepest first. Returns how many
    /// handlers ran and the commands they queued.
    fn bubble(&mut self, path: &[usize], event: UiEvent) -> (usize, Vec<ShellCommand>) {
        let kind = event.kind();
        let target_id = self
            .layout
            .at_path(path)
            .map(|node| node.id)
            .unwrap_or(NodeId::ROOT);
        let mut cx = EventCx::new(event, target_id);
        let mut calls = 0;

        let depths: Vec<usize> = if kind.bubbles() {
            (0..=path.len()).rev().collect()
        } else {
            vec![path.len()]
        };
        for depth in depths {
            let prefix = &path[..depth];
            let (Some(element), Some(node)) = (self.root.at_path(prefix), self.layout.at_path(prefix)) else {
                continue;
            };
            let Some(handler) = element.handler(kind) else {
                continue;
            };

            cx.set_current_target(node.id);
            if let Some(pointer) = cx.event().pointer() {
                let local = pointer.position - node.rect.origin();
                cx.set_pointer_local(local);
            }
            let mut state = StateMut::new(&mut *self.view, self.invalidation);
            handler.call(&mut state, &mut cx);
            calls += 1;

            if cx.propagation_stopped() {
                break;
            }
        }
        (calls, cx.take_commands())
    }
}
