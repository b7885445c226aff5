use std::any::Any;

use tracing::{debug, trace};

use crate::ui::{Element, InputEvent, Invalidation, StateMut, View};
use crate::view::{DispatchOutcome, Dispatcher, LayoutContext, LayoutNode, LayoutOutcome, compute_layout};

/// Owns one view's state together with the tree it last rendered.
pub struct ViewRuntime<V: View> {
    view: V,
    current: Option<Element<V>>,
    invalidation: Invalidation,
    render_count: u64,
}

impl<V: View> ViewRuntime<V> {
    /// Wraps `view`; the first render is already pending.
    pub fn new(view: V) -> Self {
        let invalidation = Invalidation::new();
        invalidation.request();
        Self {
            view,
            current: None,
            invalidation,
            render_count: 0,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutates state from outside a handler, with the same invalidation rules.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut StateMut<'_, V>) -> R) -> R {
        let mut state = StateMut::new(&mut self.view, &self.invalidation);
        f(&mut state)
    }

    pub fn invalidate(&self) {
        self.invalidation.request();
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidation.is_pending()
    }

    pub fn invalidation(&self) -> &Invalidation {
        &self.invalidation
    }

    /// Renders once if any invalidation is pending.
    pub fn render_if_invalidated(&mut self) -> bool {
        if !self.invalidation.take() {
            return false;
        }
        let element = self.view.render();
        self.render_count += 1;
        debug!(
            view = self.view.name(),
            render = self.render_count,
            nodes = element.node_count(),
            "rendered"
        );
        self.current = Some(element);
        true
    }

    /// The tree from the most recent render.
    pub fn element(&self) -> Option<&Element<V>> {
        self.current.as_ref()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn layout(&self, width: f32, height: f32, cx: &LayoutContext<'_>) -> Option<LayoutOutcome> {
        self.current
            .as_ref()
            .map(|root| compute_layout(root, width, height, cx))
    }

    pub fn dispatch(
        &mut self,
        dispatcher: &mut Dispatcher,
        layout: &LayoutNode,
        input: &InputEvent,
    ) -> DispatchOutcome {
        let Some(root) = self.current.as_ref() else {
            trace!(view = self.view.name(), "input before first render dropped");
            return DispatchOutcome::default();
        };
        dispatcher.dispatch(root, layout, &mut self.view, &self.invalidation, input)
    }
}

/// Type-erased [`ViewRuntime`], so one shell can host views of different types.
pub trait AnyView {
    fn view_name(&self) -> &'static str;
    fn invalidate(&self);
    fn is_invalidated(&self) -> bool;
    fn render_if_invalidated(&mut self) -> bool;
    fn render_count(&self) -> u64;
    fn has_rendered(&self) -> bool;
    fn layout(&self, width: f32, height: f32, cx: &LayoutContext<'_>) -> Option<LayoutOutcome>;
    fn dispatch(
        &mut self,
        dispatcher: &mut Dispatcher,
        layout: &LayoutNode,
        input: &InputEvent,
    ) -> DispatchOutcome;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<V: View> AnyView for ViewRuntime<V> {
    fn view_name(&self) -> &'static str {
        self.view.name()
    }

    fn invalidate(&self) {
        ViewRuntime::invalidate(self);
    }

    fn is_invalidated(&self) -> bool {
        ViewRuntime::is_invalidated(self)
    }

    fn render_if_invalidated(&mut self) -> bool {
        ViewRuntime::render_if_invalidated(self)
    }

    fn render_count(&self) -> u64 {
        self.render_count
    }

    fn has_rendered(&self) -> bool {
        self.current.is_some()
    }

    fn layout(&self, width: f32, height: f32, cx: &LayoutContext<'_>) -> Option<LayoutOutcome> {
        ViewRuntime::layout(self, width, height, cx)
    }

    fn dispatch(
        &mut self,
        dispatcher: &mut Dispatcher,
        layout: &LayoutNode,
        input: &InputEvent,
    ) -> DispatchOutcome {
        ViewRuntime::dispatch(self, dispatcher, layout, input)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn AnyView {
    pub fn downcast_ref<V: View>(&self) -> Option<&ViewRuntime<V>> {
        self.as_any().downcast_ref::<ViewRuntime<V>>()
    }

    pub fn downcast_mut<V: View>(&mut self) -> Option<&mut ViewRuntime<V>> {
        self.as_any_mut().downcast_mut::<ViewRuntime<V>>()
    }
}
