//! Shared pieces for the headless demo binaries.

use sprig::{Damage, LayoutKind, LayoutNode, PaintBackend, WindowId};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Logs with `info` unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Paints by printing the layout tree.
#[derive(Debug, Default)]
pub struct LoggingBackend {
    frames: u64,
}

impl PaintBackend for LoggingBackend {
    fn present(&mut self, window: WindowId, root: &LayoutNode, damage: &[Damage]) -> Result<(), String> {
        self.frames += 1;
        info!(?window, frame = self.frames, damaged = damage.len(), "present");
        let mut out = String::new();
        describe(root, 0, &mut out);
        println!("{out}");
        Ok(())
    }

    fn window_closed(&mut self, window: WindowId) {
        info!(?window, "window closed");
    }
}

fn describe(node: &LayoutNode, depth: usize, out: &mut String) {
    let label = match &node.kind {
        LayoutKind::Container => "container".to_string(),
        LayoutKind::Text(text) => format!("text {text:?}"),
        LayoutKind::Image(path) => format!("image {path}"),
        LayoutKind::VectorIcon(path) => format!("icon {path}"),
    };
    let r = node.rect;
    out.push_str(&format!(
        "{:indent$}{label} @ ({}, {}) {}x{}{}\n",
        "",
        r.x,
        r.y,
        r.width,
        r.height,
        if node.placeholder { " [placeholder]" } else { "" },
        indent = depth * 2,
    ));
    for child in &node.children {
        describe(child, depth + 1, out);
    }
}
