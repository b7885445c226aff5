//! A small reactive UI core.
//!
//! A [`View`] renders an [`Element`] tree from its own state. The shell lays
//! the tree out with a flex-style engine, hands the result to a
//! [`PaintBackend`] and routes input back into the view's handlers, which
//! mutate state and schedule the next render.

pub mod asset;
pub mod config;
pub mod error;
pub mod style;
pub mod ui;
pub mod view;

pub use asset::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use config::UiConfig;
pub use error::{InvalidStyleValue, LayoutOverflow, Result, UiError};
pub use style::*;
pub use ui::{
    Damage, Element, ElementKind, EventCx, EventKind, InputEvent, Key, KeyEvent, Modifiers,
    MouseButton, NullBackend, PaintBackend, StateMut, UiEvent, View, ViewRuntime,
};
pub use view::{
    AppProxy, Application, FrameReport, LayoutKind, LayoutNode, OverflowPolicy, Rect, ShellEvent, Window,
    WindowId, WindowOptions,
};
