use crate::ui::Damage;
use crate::view::{LayoutNode, WindowId};

/// Receives finished frames. Implemented by whatever draws pixels.
///
/// The layout tree is read-only and valid for the duration of the call.
pub trait PaintBackend {
    fn present(
        &mut self,
        window: WindowId,
        root: &LayoutNode,
        damage: &[Damage],
    ) -> Result<(), String>;

    /// Called once after a window is destroyed.
    fn window_closed(&mut self, _window: WindowId) {}
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl PaintBackend for NullBackend {
    fn present(&mut self, _: WindowId, _: &LayoutNode, _: &[Damage]) -> Result<(), String> {
        Ok(())
    }
}
