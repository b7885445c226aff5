//! The application shell: owns every window and drives frames.

use std::sync::mpsc::{self, Receiver, Sender};

use slotmap::SlotMap;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::asset::{AssetCache, AssetCompleter, AssetInfo, AssetSource, FsAssetSource};
use crate::config::UiConfig;
use crate::error::{AssetError, LayoutOverflow, Result, UiError};
use crate::style::ComputedStyle;
use crate::ui::{AnyView, InputEvent, NullBackend, PaintBackend, ShellCommand, View, ViewRuntime};
use crate::view::{
    LayoutContext, MonospaceMeasurer, ShapedTextMeasurer, TextMeasurer, Window, WindowId,
    WindowOptions,
};

/// Messages posted to the shell from outside the render loop. Applied at the
/// start of the next frame.
#[derive(Debug)]
pub enum AppMessage {
    AssetLoaded {
        path: SmolStr,
        result: std::result::Result<AssetInfo, AssetError>,
    },
    Invalidate(WindowId),
    InvalidateAll,
    Quit,
}

/// Sendable handle to a running [`Application`].
#[derive(Debug, Clone)]
pub struct AppProxy {
    tx: Sender<AppMessage>,
}

impl AppProxy {
    /// Returns false once the application is gone.
    pub fn invalidate(&self, window: WindowId) -> bool {
        self.tx.send(AppMessage::Invalidate(window)).is_ok()
    }

    pub fn invalidate_all(&self) -> bool {
        self.tx.send(AppMessage::InvalidateAll).is_ok()
    }

    pub fn quit(&self) -> bool {
        self.tx.send(AppMessage::Quit).is_ok()
    }
}

/// Normalized events from the OS windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    Input { window: WindowId, event: InputEvent },
    Resized { window: WindowId, width: f32, height: f32 },
    Moved { window: WindowId, x: f32, y: f32 },
    CloseRequested(WindowId),
    Focused(WindowId),
}

/// Summary of one [`Application::frame`].
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Windows whose view re-rendered.
    pub rendered: Vec<WindowId>,
    /// Windows handed to the paint backend.
    pub painted: Vec<WindowId>,
    pub overflows: Vec<LayoutOverflow>,
    /// Asset paths requested from the source this frame.
    pub requested_assets: Vec<SmolStr>,
    /// Backend failures, one per window whose frame was dropped.
    pub paint_errors: Vec<(WindowId, UiError)>,
}

impl FrameReport {
    pub fn is_idle(&self) -> bool {
        self.rendered.is_empty() && self.painted.is_empty() && self.requested_assets.is_empty()
    }
}

pub struct Application {
    config: UiConfig,
    windows: SlotMap<WindowId, Window>,
    order: Vec<WindowId>,
    focused: Option<WindowId>,
    assets: AssetCache,
    source: Box<dyn AssetSource>,
    measurer: Box<dyn TextMeasurer>,
    backend: Box<dyn PaintBackend>,
    root_style: ComputedStyle,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    running: bool,
    frame_count: u64,
}

impl Application {
    pub fn new(config: UiConfig) -> Self {
        let measurer: Box<dyn TextMeasurer> = if config.text.shaped {
            Box::new(ShapedTextMeasurer::new())
        } else {
            Box::new(MonospaceMeasurer::default())
        };
        let root_style = ComputedStyle::root(config.text.font_size, config.text.line_height);
        let (tx, rx) = mpsc::channel();
        debug!(?config, "application created");
        Self {
            config,
            windows: SlotMap::with_key(),
            order: Vec::new(),
            focused: None,
            assets: AssetCache::new(),
            source: Box::new(FsAssetSource::new(".")),
            measurer,
            backend: Box::new(NullBackend),
            root_style,
            tx,
            rx,
            running: true,
            frame_count: 0,
        }
    }

    pub fn with_backend(mut self, backend: impl PaintBackend + 'static) -> Self {
        self.backend = Box::new(backend);
        self
    }

    pub fn with_asset_source(mut self, source: impl AssetSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn proxy(&self) -> AppProxy {
        AppProxy {
            tx: self.tx.clone(),
        }
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Open windows in the order they were created.
    pub fn windows(&self) -> impl Iterator<Item = &Window> + '_ {
        self.order.iter().filter_map(|id| self.windows.get(*id))
    }

    pub fn window_count(&self) -> usize {
        self.order.len()
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focused
    }

    /// Options built from the `[window]` config section.
    pub fn default_window_options(&self) -> WindowOptions {
        self.config.window.window_options()
    }

    pub fn open_window<V: View>(&mut self, options: WindowOptions, view: V) -> WindowId {
        self.open_window_boxed(options, Box::new(ViewRuntime::new(view)))
    }

    pub fn open_window_boxed(&mut self, options: WindowOptions, view: Box<dyn AnyView>) -> WindowId {
        let title = options.title.clone();
        let view_name = view.view_name();
        let id = self
            .windows
            .insert_with_key(|id| Window::new(id, options, view));
        self.order.push(id);
        if self.focused.is_none() {
            self.focused = Some(id);
        }
        debug!(window = ?id, %title, view = view_name, "window opened");
        id
    }

    /// Destroys the window and drops its view. Closing the last window quits
    /// when `app.quit_on_last_window_closed` is set.
    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        self.windows.remove(id).ok_or(UiError::UnknownWindow(id))?;
        self.order.retain(|open| *open != id);
        if self.focused == Some(id) {
            self.focused = self.order.last().copied();
        }
        self.backend.window_closed(id);
        debug!(window = ?id, remaining = self.order.len(), "window closed");

        if self.order.is_empty() && self.config.app.quit_on_last_window_closed {
            self.quit();
        }
        Ok(())
    }

    pub fn resize_window(&mut self, id: WindowId, width: f32, height: f32) -> Result<()> {
        let window = self.windows.get_mut(id).ok_or(UiError::UnknownWindow(id))?;
        window.set_size(width, height);
        trace!(window = ?id, width, height, "window resized");
        Ok(())
    }

    pub fn move_window(&mut self, id: WindowId, x: f32, y: f32) -> Result<()> {
        let window = self.windows.get_mut(id).ok_or(UiError::UnknownWindow(id))?;
        window.set_position(x, y);
        Ok(())
    }

    pub fn focus_window(&mut self, id: WindowId) -> Result<()> {
        if !self.windows.contains_key(id) {
            return Err(UiError::UnknownWindow(id));
        }
        if self.focused != Some(id) {
            trace!(window = ?id, "window focused");
            self.focused = Some(id);
        }
        Ok(())
    }

    /// Dispatches `input` into a window's view, then applies any shell
    /// commands its handlers issued. Returns the number of handlers called.
    ///
    /// Pointer input goes to `id` and focuses it. Keyboard input goes to the
    /// focused window whatever `id` says, and is dropped when none is focused.
    pub fn handle_input(&mut self, id: WindowId, input: InputEvent) -> Result<usize> {
        if !self.windows.contains_key(id) {
            return Err(UiError::UnknownWindow(id));
        }
        let target = if input.is_pointer() {
            if matches!(input, InputEvent::PointerDown(_)) {
                self.focused = Some(id);
            }
            id
        } else {
            match self.focused {
                Some(focused) => focused,
                None => {
                    trace!(window = ?id, "key input without a focused window dropped");
                    return Ok(0);
                }
            }
        };

        let window = self
            .windows
            .get_mut(target)
            .ok_or(UiError::UnknownWindow(target))?;
        let outcome = window.handle_input(&input);
        for command in outcome.commands {
            self.apply_command(target, command)?;
        }
        Ok(outcome.handlers_called)
    }

    pub fn handle(&mut self, event: ShellEvent) -> Result<()> {
        match event {
            ShellEvent::Input { window, event } => self.handle_input(window, event).map(|_| ()),
            ShellEvent::Resized {
                window,
                width,
                height,
            } => self.resize_window(window, width, height),
            ShellEvent::Moved { window, x, y } => self.move_window(window, x, y),
            ShellEvent::CloseRequested(window) => self.close_window(window),
            ShellEvent::Focused(window) => self.focus_window(window),
        }
    }

    fn apply_command(&mut self, source: WindowId, command: ShellCommand) -> Result<()> {
        trace!(window = ?source, ?command, "applying shell command");
        match command {
            ShellCommand::OpenWindow { options, view } => {
                self.open_window_boxed(options, view);
                Ok(())
            }
            // The source may already be gone if an earlier command closed it.
            ShellCommand::CloseWindow => match self.close_window(source) {
                Err(UiError::UnknownWindow(_)) => Ok(()),
                other => other,
            },
            ShellCommand::Quit => {
                self.quit();
                Ok(())
            }
        }
    }

    /// Tears down every window. Later frames do nothing.
    pub fn quit(&mut self) {
        if !self.running {
            return;
        }
        for id in std::mem::take(&mut self.order) {
            if self.windows.remove(id).is_some() {
                self.backend.window_closed(id);
            }
        }
        self.focused = None;
        self.running = false;
        debug!(frames = self.frame_count, "application quit");
    }

    /// Applies pending messages, then renders, lays out and paints every
    /// window that needs it, and requests assets layout found missing.
    pub fn frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        self.drain_messages();
        if !self.running {
            return report;
        }
        self.frame_count += 1;

        let cx = LayoutContext::new(self.measurer.as_ref(), &self.assets)
            .with_overflow(self.config.layout.overflow)
            .with_root_style(self.root_style.clone());
        let mut missing = Vec::new();
        for id in &self.order {
            let Some(window) = self.windows.get_mut(*id) else {
                continue;
            };
            let frame = window.frame(&cx, self.backend.as_mut());
            if frame.rendered {
                report.rendered.push(*id);
            }
            if frame.painted {
                report.painted.push(*id);
            }
            if let Some(err) = frame.paint_error {
                report.paint_errors.push((*id, err));
            }
            report.overflows.extend(frame.overflows);
            missing.extend(frame.missing_assets);
        }

        for request in missing {
            if !self.assets.mark_pending(request.path.clone()) {
                continue;
            }
            debug!(path = %request.path, kind = ?request.kind, "requesting asset");
            report.requested_assets.push(request.path.clone());
            self.source
                .request(AssetCompleter::new(request, self.tx.clone()));
        }

        trace!(
            frame = self.frame_count,
            rendered = report.rendered.len(),
            painted = report.painted.len(),
            "frame done"
        );
        report
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                AppMessage::AssetLoaded { path, result } => self.apply_asset(path, result),
                AppMessage::Invalidate(id) => match self.windows.get(id) {
                    Some(window) => window.invalidate(),
                    None => trace!(window = ?id, "invalidate for closed window dropped"),
                },
                AppMessage::InvalidateAll => {
                    for window in self.windows.values() {
                        window.invalidate();
                    }
                }
                AppMessage::Quit => self.quit(),
            }
        }
    }

    fn apply_asset(&mut self, path: SmolStr, result: std::result::Result<AssetInfo, AssetError>) {
        match &result {
            Ok(info) => debug!(%path, size = ?info.size, "asset ready"),
            Err(err) => {
                let err = UiError::AssetLoadFailure {
                    path: path.clone(),
                    source: err.clone(),
                };
                warn!(%err, "showing placeholder");
            }
        }
        for window in self.windows.values() {
            if window.awaits_asset(&path) {
                window.invalidate();
            }
        }
        self.assets.insert(path, result);
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::{Application, ShellEvent};
    use crate::asset::MemoryAssetSource;
    use crate::asset::tests::png_bytes;
    use crate::config::UiConfig;
    use crate::error::UiError;
    use crate::style::Style;
    use crate::ui::{Element, InputEvent, View};
    use crate::view::WindowOptions;

    struct Launcher;

    impl View for Launcher {
        fn render(&self) -> Element<Self> {
            Element::container()
                .style(Style::new().size(100.0, 40.0))
                .on_click(|_, cx| cx.open_window(WindowOptions::new("child"), Photo))
        }
    }

    struct Photo;

    impl View for Photo {
        fn render(&self) -> Element<Self> {
            Element::container()
                .child(Element::image("photo.png"))
                .on_key_down(|_, cx| cx.close_window())
        }
    }

    fn click(app: &mut Application, window: crate::view::WindowId, x: f32, y: f32) {
        app.handle_input(window, InputEvent::pointer_down(x, y)).unwrap();
        app.handle_input(window, InputEvent::pointer_up(x, y)).unwrap();
    }

    #[test]
    fn handler_can_open_a_window() {
        let mut app = Application::default();
        let main = app.open_window(WindowOptions::new("main"), Launcher);
        app.frame();

        click(&mut app, main, 10.0, 10.0);
        assert_eq!(app.window_count(), 2);
        let titles: Vec<&str> = app.windows().map(|w| w.title()).collect();
        assert_eq!(titles, ["main", "child"]);
    }

    #[test]
    fn closing_the_last_window_quits_by_default() {
        let mut app = Application::default();
        let id = app.open_window(WindowOptions::default(), Photo);
        app.close_window(id).unwrap();
        assert!(!app.is_running());
        assert!(app.frame().is_idle());
    }

    #[test]
    fn quit_policy_can_be_disabled() {
        let mut config = UiConfig::default();
        config.app.quit_on_last_window_closed = false;
        let mut app = Application::new(config);
        let id = app.open_window(WindowOptions::default(), Photo);
        app.handle(ShellEvent::CloseRequested(id)).unwrap();
        assert!(app.is_running());
        assert_eq!(app.window_count(), 0);
    }

    #[test]
    fn stale_window_ids_are_rejected() {
        let mut app = Application::default();
        let first = app.open_window(WindowOptions::default(), Photo);
        let _second = app.open_window(WindowOptions::default(), Photo);
        app.close_window(first).unwrap();
        assert!(matches!(
            app.resize_window(first, 10.0, 10.0),
            Err(UiError::UnknownWindow(id)) if id == first
        ));
        assert!(app.handle(ShellEvent::Focused(first)).is_err());
    }

    #[test]
    fn key_handler_closes_its_own_window() {
        let mut config = UiConfig::default();
        config.app.quit_on_last_window_closed = false;
        let mut app = Application::new(config);
        let id = app.open_window(WindowOptions::default(), Photo);
        app.frame();
        // no focused element: keys go to the root
        app.handle_input(id, InputEvent::key_down(crate::ui::Key::Escape))
            .unwrap();
        assert!(app.window(id).is_none());
    }

    #[test]
    fn loaded_asset_relayouts_waiting_window() {
        let source = MemoryAssetSource::new().with_file("photo.png", png_bytes(30, 20));
        let mut app = Application::default().with_asset_source(source);
        let id = app.open_window(WindowOptions::new("photo").with_size(200.0, 200.0), Photo);

        let first = app.frame();
        assert_eq!(first.requested_assets, ["photo.png"]);
        assert!(app.window(id).unwrap().awaits_asset("photo.png"));

        let second = app.frame();
        assert_eq!(second.rendered, [id]);
        let window = app.window(id).unwrap();
        assert!(!window.awaits_asset("photo.png"));
        let image = window.layout().unwrap().at_path(&[0]).unwrap();
        assert_eq!(image.rect.size(), Vec2::new(30.0, 20.0));
    }

    #[test]
    fn proxy_messages_apply_on_next_frame() {
        let mut app = Application::default();
        let id = app.open_window(WindowOptions::default(), Launcher);
        app.frame();
        assert!(app.frame().is_idle());

        let proxy = app.proxy();
        std::thread::spawn(move || proxy.invalidate(id)).join().unwrap();
        assert_eq!(app.frame().rendered, [id]);

        app.proxy().quit();
        app.frame();
        assert!(!app.is_running());
        assert_eq!(app.window_count(), 0);
    }
}
