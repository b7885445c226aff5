#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sprig::{Damage, LayoutNode, PaintBackend, WindowId};

#[derive(Debug, Clone)]
pub struct Presented {
    pub window: WindowId,
    pub root: LayoutNode,
    pub damage: Vec<Damage>,
}

/// Keeps a copy of every frame it is handed. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    frames: Rc<RefCell<Vec<Presented>>>,
    closed: Rc<RefCell<Vec<WindowId>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Presented> {
        self.frames.borrow().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last(&self) -> Option<Presented> {
        self.frames.borrow().last().cloned()
    }

    pub fn closed(&self) -> Vec<WindowId> {
        self.closed.borrow().clone()
    }
}

impl PaintBackend for RecordingBackend {
    fn present(
        &mut self,
        window: WindowId,
        root: &LayoutNode,
        damage: &[Damage],
    ) -> Result<(), String> {
        self.frames.borrow_mut().push(Presented {
            window,
            root: root.clone(),
            damage: damage.to_vec(),
        });
        Ok(())
    }

    fn window_closed(&mut self, window: WindowId) {
        self.closed.borrow_mut().push(window);
    }
}

/// Rejects every frame.
#[derive(Debug, Default)]
pub struct FailingBackend;

impl PaintBackend for FailingBackend {
    fn present(&mut self, _: WindowId, _: &LayoutNode, _: &[Damage]) -> Result<(), String> {
        Err("surface lost".to_string())
    }
}

/// Installs a test subscriber once; `RUST_LOG` controls the output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn xs(node: &LayoutNode) -> Vec<f32> {
    node.children.iter().map(|child| child.rect.x).collect()
}

pub fn ys(node: &LayoutNode) -> Vec<f32> {
    node.children.iter().map(|child| child.rect.y).collect()
}

pub fn widths(node: &LayoutNode) -> Vec<f32> {
    node.children.iter().map(|child| child.rect.width).collect()
}
