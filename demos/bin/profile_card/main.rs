use demos::{LoggingBackend, init_tracing};
use sprig::ui::host::{container, image, text, vector_icon};
use sprig::{
    AlignItems, Application, Color, Element, FontWeight, InputEvent, MemoryAssetSource, Style,
    UiConfig, View, WindowOptions,
};
use tracing::{info, warn};

const STAR_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20"><path d="M10 1l3 6 6 1-4 4 1 6-6-3-6 3 1-6-4-4 6-1z"/></svg>"#;

struct ProfileCard {
    name: String,
    role: String,
    starred: bool,
}

fn card_style() -> Style {
    Style::new()
        .column()
        .padding(16.0)
        .gap(8.0)
        .background(Color::WHITE)
        .border(1.0, "#d0d7de")
        .corner_radius(12.0)
}

impl View for ProfileCard {
    fn render(&self) -> Element<Self> {
        let accent = if self.starred { "#e5c07b" } else { "#abb2bf" };
        let header = container()
            .style(Style::new().row().gap(12.0).align(AlignItems::Center))
            .child(image("avatars/ada.png").style(Style::new().size(48.0, 48.0).corner_radius(24.0)))
            .child(
                container()
                    .style(Style::new().column().gap(2.0))
                    .child(text(self.name.clone()).style(Style::new().font_weight(FontWeight::BOLD)))
                    .child(text(self.role.clone()).style(Style::new().font_size(12.0).color("#5c6370"))),
            );

        container()
            // later directives win, so the merged card keeps its own width
            .style(card_style() + Style::new().width(280.0))
            .child(header)
            .child(
                container::<Self>()
                    .style(Style::new().row().gap(6.0).align(AlignItems::Center))
                    .focusable(true)
                    .child(vector_icon("icons/star.svg").style(Style::new().background(accent)))
                    .child(text(if self.starred { "Starred" } else { "Star" }))
                    .on_click(|state, _| state.starred = !state.starred),
            )
    }
}

fn main() -> sprig::Result<()> {
    init_tracing();

    if let Err(err) = Style::new().padding(-4.0).validate() {
        warn!(%err, "rejected style, as expected");
    }

    let assets = MemoryAssetSource::new().with_file("icons/star.svg", STAR_SVG);
    let mut app = Application::new(UiConfig::load())
        .with_backend(LoggingBackend::default())
        .with_asset_source(assets);
    let window = app.open_window(
        WindowOptions::new("profile").with_size(320.0, 200.0),
        ProfileCard {
            name: "Ada Lovelace".to_string(),
            role: "Analyst".to_string(),
            starred: false,
        },
    );

    let first = app.frame();
    info!(requested = ?first.requested_assets, "first frame");
    // star.svg arrives, avatars/ada.png stays a placeholder
    app.frame();

    let star_row = app
        .window(window)
        .and_then(|w| w.layout())
        .and_then(|root| root.at_path(&[1]))
        .map(|node| node.rect);
    if let Some(rect) = star_row {
        let (x, y) = (rect.x + 4.0, rect.y + 4.0);
        app.handle_input(window, InputEvent::pointer_down(x, y))?;
        app.handle_input(window, InputEvent::pointer_up(x, y))?;
    }
    let report = app.frame();
    info!(rendered = report.rendered.len(), painted = report.painted.len(), "after click");

    app.quit();
    Ok(())
}
