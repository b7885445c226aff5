//! Shorthand constructors for the built-in element kinds.
//!
//! ```ignore
//! use sprig::ui::host::*;
//!
//! container().child(text("Hello")).child(vector_icon("icons/star.svg"))
//! ```

use smol_str::SmolStr;

use crate::ui::Element;

pub fn container<V>() -> Element<V> {
    Element::container()
}

pub fn text<V>(content: impl Into<String>) -> Element<V> {
    Element::text(content)
}

pub fn image<V>(path: impl Into<SmolStr>) -> Element<V> {
    Element::image(path)
}

pub fn vector_icon<V>(path: impl Into<SmolStr>) -> Element<V> {
    Element::vector_icon(path)
}
