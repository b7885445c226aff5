use demos::{LoggingBackend, init_tracing};
use sprig::{
    Application, Element, InputEvent, Key, ShellEvent, Style, UiConfig, View, WindowOptions,
};
use tracing::info;

/// Opens a numbered inspector window per click.
struct Launcher {
    opened: u32,
}

impl View for Launcher {
    fn render(&self) -> Element<Self> {
        Element::container()
            .style(Style::new().column().padding(12.0).gap(8.0))
            .child(Element::text(format!("{} inspectors opened", self.opened)))
            .child(
                Element::<Self>::container()
                    .style(Style::new().size(120.0, 32.0).background("#98c379"))
                    .child(Element::text("open"))
                    .on_click(|state, cx| {
                        state.opened += 1;
                        let title = format!("inspector {}", state.opened);
                        cx.open_window(
                            WindowOptions::new(title).with_size(240.0, 160.0),
                            Inspector { index: state.opened },
                        );
                    }),
            )
    }
}

struct Inspector {
    index: u32,
}

impl View for Inspector {
    fn render(&self) -> Element<Self> {
        Element::container()
            .style(Style::new().padding(8.0))
            .child(Element::text(format!("inspector #{}, escape closes", self.index)))
            .on_key_down(|_, cx| {
                if cx.event().key().is_some_and(|key| key.key == Key::Escape) {
                    cx.close_window();
                }
            })
    }
}

fn main() -> sprig::Result<()> {
    init_tracing();
    let mut app = Application::new(UiConfig::load()).with_backend(LoggingBackend::default());
    let main = app.open_window(
        WindowOptions::new("launcher").with_size(300.0, 120.0),
        Launcher { opened: 0 },
    );
    app.frame();

    for _ in 0..2 {
        // the button sits below the 19.2px label and the 8px gap
        app.handle_input(main, InputEvent::pointer_down(20.0, 45.0))?;
        app.handle_input(main, InputEvent::pointer_up(20.0, 45.0))?;
        app.frame();
    }
    let ids: Vec<_> = app.windows().map(|w| w.id()).collect();
    info!(windows = ids.len(), "inspectors open");

    if let Some(&first) = ids.get(1) {
        app.handle(ShellEvent::Focused(first))?;
        app.handle(ShellEvent::Input {
            window: first,
            event: InputEvent::key_down(Key::Escape),
        })?;
    }
    app.frame();
    info!(windows = app.window_count(), "after escape");

    // closing the rest ends the application
    for id in ids {
        if app.window(id).is_some() {
            app.handle(ShellEvent::CloseRequested(id))?;
        }
    }
    info!(running = app.is_running(), "done");
    Ok(())
}
