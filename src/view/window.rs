use glam::Vec2;
use tracing::{debug, trace, warn};

use crate::asset::AssetRequest;
use crate::error::{LayoutOverflow, UiError};
use crate::ui::{AnyView, InputEvent, PaintBackend, View, ViewRuntime, reconcile};
use crate::view::{DispatchOutcome, Dispatcher, LayoutContext, LayoutKind, LayoutNode};

slotmap::new_key_type! {
    /// Generational handle to an open window. Stale after the window closes.
    pub struct WindowId;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    pub size: Vec2,
    pub position: Vec2,
}

impl WindowOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "sprig".to_string(),
            size: Vec2::new(800.0, 600.0),
            position: Vec2::ZERO,
        }
    }
}

/// What one window produced in a frame.
#[derive(Debug, Default)]
pub(crate) struct WindowFrame {
    pub rendered: bool,
    pub painted: bool,
    pub overflows: Vec<LayoutOverflow>,
    pub missing_assets: Vec<AssetRequest>,
    pub paint_error: Option<UiError>,
}

/// A window owning one root view.
pub struct Window {
    id: WindowId,
    title: String,
    size: Vec2,
    position: Vec2,
    view: Box<dyn AnyView>,
    dispatcher: Dispatcher,
    layout: Option<LayoutNode>,
    redraw_requested: bool,
}

impl Window {
    pub(crate) fn new(id: WindowId, options: WindowOptions, view: Box<dyn AnyView>) -> Self {
        Self {
            id,
            title: options.title,
            size: clamp_size(options.size),
            position: options.position,
            view,
            dispatcher: Dispatcher::new(),
            layout: None,
            redraw_requested: true,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Resizing re-renders and re-lays out the view on the next frame.
    pub fn set_size(&mut self, width: f32, height: f32) {
        let size = clamp_size(Vec2::new(width, height));
        if size == self.size {
            return;
        }
        self.size = size;
        self.view.invalidate();
        self.request_redraw();
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested || self.view.is_invalidated()
    }

    pub fn view(&self) -> &dyn AnyView {
        self.view.as_ref()
    }

    pub fn invalidate(&self) {
        self.view.invalidate();
    }

    /// The typed runtime, if this window hosts a `V`.
    pub fn runtime<V: View>(&self) -> Option<&ViewRuntime<V>> {
        self.view.downcast_ref::<V>()
    }

    pub fn runtime_mut<V: View>(&mut self) -> Option<&mut ViewRuntime<V>> {
        self.view.downcast_mut::<V>()
    }

    /// The layout painted by the last frame.
    pub fn layout(&self) -> Option<&LayoutNode> {
        self.layout.as_ref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Whether a placeholder in the current layout is waiting on `path`.
    pub fn awaits_asset(&self, path: &str) -> bool {
        fn walk(node: &LayoutNode, path: &str) -> bool {
            let matches = match &node.kind {
                LayoutKind::Image(p) | LayoutKind::VectorIcon(p) => node.placeholder && p == path,
                _ => false,
            };
            matches || node.children.iter().any(|child| walk(child, path))
        }
        self.layout.as_ref().is_some_and(|root| walk(root, path))
    }

    pub(crate) fn handle_input(&mut self, input: &InputEvent) -> DispatchOutcome {
        let Some(layout) = self.layout.as_ref() else {
            trace!(window = ?self.id, "input before first frame dropped");
            return DispatchOutcome::default();
        };
        self.view.dispatch(&mut self.dispatcher, layout, input)
    }

    /// Renders if invalidated, lays out, diffs and paints.
    pub(crate) fn frame(&mut self, cx: &LayoutContext<'_>, backend: &mut dyn PaintBackend) -> WindowFrame {
        let mut frame = WindowFrame::default();
        frame.rendered = self.view.render_if_invalidated();
        if !std::mem::take(&mut self.redraw_requested) && !frame.rendered {
            return frame;
        }

        let Some(outcome) = self.view.layout(self.size.x, self.size.y, cx) else {
            return frame;
        };
        let damage = reconcile(self.layout.as_ref(), &outcome.root);
        if !damage.is_empty() {
            trace!(window = ?self.id, ?damage, "painting");
            match backend.present(self.id, &outcome.root, &damage) {
                Ok(()) => frame.painted = true,
                Err(message) => {
                    let err = UiError::Paint(message);
                    warn!(window = ?self.id, %err, "frame dropped");
                    frame.paint_error = Some(err);
                }
            }
        }
        if frame.rendered {
            debug!(
                window = ?self.id,
                nodes = outcome.root.node_count(),
                overflows = outcome.overflows.len(),
                "frame laid out"
            );
        }

        self.layout = Some(outcome.root);
        frame.overflows = outcome.overflows;
        frame.missing_assets = outcome.missing_assets;
        frame
    }
}

fn clamp_size(size: Vec2) -> Vec2 {
    size.max(Vec2::ONE)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use slotmap::SlotMap;

    use super::{Window, WindowId, WindowOptions};
    use crate::asset::AssetCache;
    use crate::style::Style;
    use crate::ui::{Element, InputEvent, NullBackend, View, ViewRuntime};
    use crate::view::{LayoutContext, MonospaceMeasurer};

    struct Pane {
        pressed: u32,
    }

    impl View for Pane {
        fn render(&self) -> Element<Self> {
            Element::<Self>::container()
                .style(Style::new().padding(4.0))
                .child(Element::image("logo.png"))
                .on_pointer_down(|state, _| state.pressed += 1)
        }
    }

    fn window() -> Window {
        let mut ids: SlotMap<WindowId, ()> = SlotMap::with_key();
        let id = ids.insert(());
        Window::new(
            id,
            WindowOptions::new("pane").with_size(200.0, 100.0),
            Box::new(ViewRuntime::new(Pane { pressed: 0 })),
        )
    }

    #[test]
    fn first_frame_renders_and_paints() {
        let mut window = window();
        let measurer = MonospaceMeasurer::default();
        let assets = AssetCache::new();
        let cx = LayoutContext::new(&measurer, &assets);

        let frame = window.frame(&cx, &mut NullBackend);
        assert!(frame.rendered && frame.painted);
        assert_eq!(frame.missing_assets.len(), 1);
        assert!(window.awaits_asset("logo.png"));

        let idle = window.frame(&cx, &mut NullBackend);
        assert!(!idle.rendered && !idle.painted);
    }

    #[test]
    fn input_before_first_frame_is_dropped() {
        let mut window = window();
        let outcome = window.handle_input(&InputEvent::pointer_down(10.0, 10.0));
        assert!(!outcome.handled());
        assert_eq!(window.runtime::<Pane>().map(|rt| rt.view().pressed), Some(0));
    }

    #[test]
    fn resize_invalidates_the_view() {
        let mut window = window();
        let measurer = MonospaceMeasurer::default();
        let assets = AssetCache::new();
        let cx = LayoutContext::new(&measurer, &assets);
        window.frame(&cx, &mut NullBackend);

        window.set_size(300.0, 100.0);
        assert!(window.redraw_requested());
        let frame = window.frame(&cx, &mut NullBackend);
        assert!(frame.rendered);
        assert_eq!(window.layout().map(|root| root.rect.size()), Some(Vec2::new(300.0, 100.0)));
        assert_eq!(window.runtime::<Pane>().map(ViewRuntime::render_count), Some(2));
    }
}
