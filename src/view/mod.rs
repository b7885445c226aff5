mod app;
mod dispatcher;
mod hit_test;
mod layout;
mod measure;
mod window;

pub use app::*;
pub use dispatcher::*;
pub use hit_test::*;
pub use layout::*;
pub use measure::*;
pub use window::*;
