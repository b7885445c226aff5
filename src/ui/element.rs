use std::fmt;

use smol_str::SmolStr;
use tracing::warn;

use crate::error::InvalidStyleValue;
use crate::style::Style;
use crate::ui::{EventCx, EventKind, EventKinds, Handler, StateMut};

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Container,
    Text(String),
    Image(SmolStr),
    VectorIcon(SmolStr),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Text(_) => "Text",
            Self::Image(_) => "Image",
            Self::VectorIcon(_) => "VectorIcon",
        }
    }
}

/// One node of the tree a view renders.
///
/// Built fresh by every render and consumed by layout and dispatch. Builder
/// methods take `self`; an element is never mutated after it is handed back
/// from `render`.
pub struct Element<V> {
    kind: ElementKind,
    style: Style,
    style_error: Option<InvalidStyleValue>,
    key: Option<SmolStr>,
    focusable: bool,
    handlers: Vec<Handler<V>>,
    children: Vec<Element<V>>,
}

macro_rules! impl_handler_binding {
    ($($method:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $method<F>(self, handler: F) -> Self
            where
                F: FnMut(&mut StateMut<'_, V>, &mut EventCx) + 'static,
            {
                self.on(EventKind::$kind, handler)
            }
        )*
    };
}

impl<V> Element<V> {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            style: Style::new(),
            style_error: None,
            key: None,
            focusable: false,
            handlers: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn container() -> Self {
        Self::new(ElementKind::Container)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text(content.into()))
    }

    pub fn image(path: impl Into<SmolStr>) -> Self {
        Self::new(ElementKind::Image(path.into()))
    }

    pub fn vector_icon(path: impl Into<SmolStr>) -> Self {
        Self::new(ElementKind::VectorIcon(path.into()))
    }

    /// Attaches a style. A style that failed validation is dropped in favour
    /// of the defaults; the error stays readable through [`style_error`].
    ///
    /// [`style_error`]: Self::style_error
    pub fn style(mut self, style: Style) -> Self {
        match style.validate() {
            Ok(()) => {
                self.style = style;
                self.style_error = None;
            }
            Err(err) => {
                warn!(element = self.kind.name(), %err, "invalid style, using defaults");
                self.style = Style::new();
                self.style_error = Some(err);
            }
        }
        self
    }

    pub fn try_style(mut self, style: Style) -> Result<Self, InvalidStyleValue> {
        style.validate()?;
        self.style = style;
        self.style_error = None;
        Ok(self)
    }

    pub fn key(mut self, key: impl Into<SmolStr>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Appends a child. Only containers have children.
    pub fn child(mut self, child: Element<V>) -> Self {
        if self.kind != ElementKind::Container {
            warn!(element = self.kind.name(), "child ignored on non-container element");
            return self;
        }
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element<V>>) -> Self {
        for child in children {
            self = self.child(child);
        }
        self
    }

    /// Binds `handler` to `kind`, replacing an earlier binding of that kind.
    pub fn on<F>(mut self, kind: EventKind, handler: F) -> Self
    where
        F: FnMut(&mut StateMut<'_, V>, &mut EventCx) + 'static,
    {
        self.handlers.retain(|bound| bound.kind() != kind);
        self.handlers.push(Handler::new(kind, handler));
        self
    }

    impl_handler_binding! {
        on_pointer_down => PointerDown,
        on_pointer_up => PointerUp,
        on_pointer_move => PointerMove,
        on_click => Click,
        on_key_down => KeyDown,
        on_key_up => KeyUp,
        on_focus => Focus,
        on_blur => Blur,
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn parsed_style(&self) -> &Style {
        &self.style
    }

    pub fn style_error(&self) -> Option<&InvalidStyleValue> {
        self.style_error.as_ref()
    }

    pub fn key_str(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn child_elements(&self) -> &[Element<V>] {
        &self.children
    }

    pub fn handler(&self, kind: EventKind) -> Option<&Handler<V>> {
        self.handlers.iter().find(|handler| handler.kind() == kind)
    }

    pub fn bound_kinds(&self) -> EventKinds {
        self.handlers
            .iter()
            .fold(EventKinds::empty(), |kinds, handler| kinds | handler.kind().flag())
    }

    /// Follows child indices from this element.
    pub fn at_path(&self, path: &[usize]) -> Option<&Element<V>> {
        path.iter()
            .try_fold(self, |element, &index| element.children.get(index))
    }

    /// Paths of every element in preorder, this one first.
    pub fn preorder_paths(&self) -> Vec<Vec<usize>> {
        fn walk<V>(element: &Element<V>, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
            out.push(path.clone());
            for (index, child) in element.children.iter().enumerate() {
                path.push(index);
                walk(child, path, out);
                path.pop();
            }
        }

        let mut out = Vec::new();
        walk(self, &mut Vec::new(), &mut out);
        out
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Element::node_count).sum::<usize>()
    }
}

/// Structural equality: handlers compare by the kinds they are bound to,
/// never by closure identity.
impl<V> PartialEq for Element<V> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.style == other.style
            && self.style_error == other.style_error
            && self.key == other.key
            && self.focusable == other.focusable
            && self.bound_kinds() == other.bound_kinds()
            && self.children == other.children
    }
}

impl<V> Clone for Element<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            style: self.style.clone(),
            style_error: self.style_error.clone(),
            key: self.key.clone(),
            focusable: self.focusable,
            handlers: self.handlers.clone(),
            children: self.children.clone(),
        }
    }
}

impl<V> fmt::Debug for Element<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Element");
        debug.field("kind", &self.kind);
        if !self.style.is_empty() {
            debug.field("style", &self.style);
        }
        if let Some(err) = &self.style_error {
            debug.field("style_error", err);
        }
        if let Some(key) = &self.key {
            debug.field("key", key);
        }
        if self.focusable {
            debug.field("focusable", &true);
        }
        if !self.handlers.is_empty() {
            debug.field("handlers", &self.bound_kinds());
        }
        if !self.children.is_empty() {
            debug.field("children", &self.children);
        }
        debug.finish()
    }
}
