use crate::ui::Element;

/// A unit of UI that owns its state and projects it into an element tree.
///
/// `render` must be a pure function of `&self`: rendering the same state
/// twice yields structurally equal trees. State changes happen in handlers,
/// through the [`StateMut`](crate::ui::StateMut) they receive.
pub trait View: Sized + 'static {
    fn render(&self) -> Element<Self>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
