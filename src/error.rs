//! Error and warning types shared across the crate.

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::style::PropertyId;
use crate::view::{Axis, NodeId, WindowId};

pub type Result<T> = std::result::Result<T, UiError>;

/// A style directive whose value violates the property's constraints.
///
/// Raised while the style is being built; the element carrying it falls
/// back to default styling.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value for {property:?}: {reason}")]
pub struct InvalidStyleValue {
    pub property: PropertyId,
    pub reason: &'static str,
}

/// Children of a container need more main-axis space than it has.
///
/// A warning, not a failure: layout always completes.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error(
    "node {node:?} overflows on the {axis:?} axis by {overflow}px ({required}px needed, {available}px available)"
)]
pub struct LayoutOverflow {
    pub node: NodeId,
    pub axis: Axis,
    pub available: f32,
    pub required: f32,
    pub overflow: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset not found")]
    NotFound,

    #[error("i/o error: {0}")]
    Io(String),

    #[error("could not decode asset: {0}")]
    Decode(String),
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum UiError {
    #[error(transparent)]
    InvalidStyleValue(#[from] InvalidStyleValue),

    #[error("failed to load asset `{path}`: {source}")]
    AssetLoadFailure {
        path: SmolStr,
        #[source]
        source: AssetError,
    },

    #[error("window {0:?} is not open")]
    UnknownWindow(WindowId),

    #[error("paint backend failed: {0}")]
    Paint(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
