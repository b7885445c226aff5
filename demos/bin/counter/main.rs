use demos::{LoggingBackend, init_tracing};
use glam::Vec2;
use sprig::{
    AlignItems, Application, Element, FontWeight, InputEvent, JustifyContent, Key, ShellEvent,
    Style, UiConfig, View, WindowId,
};
use tracing::info;

struct Counter {
    count: i32,
}

impl View for Counter {
    fn render(&self) -> Element<Self> {
        let button = |label: &str| -> Element<Self> {
            Element::container()
                .style(
                    Style::new()
                        .size(48.0, 32.0)
                        .background("#61afef")
                        .corner_radius(6.0)
                        .justify(JustifyContent::Center)
                        .align(AlignItems::Center),
                )
                .focusable(true)
                .child(Element::text(label))
        };

        Element::<Self>::container()
            .style(Style::new().padding(20.0).gap(12.0).align(AlignItems::Center))
            .child(button("-").on_click(|state, _| state.count -= 1))
            .child(
                Element::text(format!("{}", self.count))
                    .style(Style::new().font_size(24.0).font_weight(FontWeight::BOLD)),
            )
            .child(button("+").on_click(|state, _| state.count += 1))
            .on_key_down(|state, cx| match cx.event().key().map(|key| &key.key) {
                Some(Key::ArrowUp) => state.count += 1,
                Some(Key::ArrowDown) => state.count -= 1,
                _ => {}
            })
    }
}

fn click(app: &mut Application, window: WindowId, x: f32, y: f32) -> sprig::Result<()> {
    app.handle(ShellEvent::Input {
        window,
        event: InputEvent::pointer_down(x, y),
    })?;
    app.handle(ShellEvent::Input {
        window,
        event: InputEvent::pointer_up(x, y),
    })
}

/// Center of the root's `index`th child in the last painted layout.
fn child_center(app: &Application, window: WindowId, index: usize) -> Option<Vec2> {
    let node = app.window(window)?.layout()?.at_path(&[index])?;
    Some(node.rect.origin() + node.rect.size() / 2.0)
}

fn main() -> sprig::Result<()> {
    init_tracing();
    let config = UiConfig::load();
    let mut app = Application::new(config).with_backend(LoggingBackend::default());
    let options = app.default_window_options().with_size(320.0, 120.0);
    let window = app.open_window(options, Counter { count: 0 });
    app.frame();

    if let Some(plus) = child_center(&app, window, 2) {
        for _ in 0..3 {
            click(&mut app, window, plus.x, plus.y)?;
            app.frame();
        }
    }
    if let Some(minus) = child_center(&app, window, 0) {
        click(&mut app, window, minus.x, minus.y)?;
    }
    app.handle_input(window, InputEvent::key_down(Key::ArrowUp))?;
    app.frame();

    let count = app
        .window(window)
        .and_then(|w| w.runtime::<Counter>())
        .map(|rt| rt.view().count);
    info!(?count, "final count");

    app.handle(ShellEvent::CloseRequested(window))?;
    Ok(())
}
