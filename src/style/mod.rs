pub mod color;
mod computed_style;
mod parsed_style;

pub use color::*;
pub use computed_style::*;
pub use parsed_style::*;
