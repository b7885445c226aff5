mod element;
mod event;
pub mod host;
mod reconciler;
mod render_backend;
mod runtime;
mod state;
mod view;

pub use element::*;
pub use event::*;
pub use reconciler::*;
pub use render_backend::*;
pub use runtime::*;
pub use state::*;
pub use view::*;
