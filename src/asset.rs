//! Asset loading for image and vector-icon elements.
//!
//! Sources never block the caller: a request is answered later through an
//! [`AssetCompleter`], which decodes the intrinsic size and posts the result
//! to the application's message channel.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use glam::Vec2;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{trace, warn};

use crate::error::AssetError;
use crate::view::AppMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// PNG, JPEG and the other raster formats `image` understands.
    Raster,
    /// SVG.
    Vector,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub path: SmolStr,
    pub kind: AssetKind,
}

impl AssetRequest {
    pub fn new(path: impl Into<SmolStr>, kind: AssetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// What layout needs to know about a loaded asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetInfo {
    pub kind: AssetKind,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetState {
    Pending,
    Ready(AssetInfo),
    Failed(AssetError),
}

/// Reads the intrinsic pixel size of an encoded asset.
pub fn decode_intrinsic_size(kind: AssetKind, bytes: &[u8]) -> Result<AssetInfo, AssetError> {
    let size = match kind {
        AssetKind::Raster => {
            let reader = image::ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(|err| AssetError::Decode(err.to_string()))?;
            let (width, height) = reader
                .into_dimensions()
                .map_err(|err| AssetError::Decode(err.to_string()))?;
            Vec2::new(width as f32, height as f32)
        }
        AssetKind::Vector => {
            let tree = resvg::usvg::Tree::from_data(bytes, &resvg::usvg::Options::default())
                .map_err(|err| AssetError::Decode(err.to_string()))?;
            let size = tree.size();
            Vec2::new(size.width(), size.height())
        }
    };
    Ok(AssetInfo { kind, size })
}

/// Load state of every asset path seen so far.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: FxHashMap<SmolStr, AssetState>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&AssetState> {
        self.entries.get(path)
    }

    /// Intrinsic size of a ready asset.
    pub fn intrinsic_size(&self, path: &str) -> Option<Vec2> {
        match self.entries.get(path) {
            Some(AssetState::Ready(info)) => Some(info.size),
            _ => None,
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Marks `path` as requested. Returns `false` if it was already known.
    pub fn mark_pending(&mut self, path: SmolStr) -> bool {
        if self.entries.contains_key(&path) {
            return false;
        }
        self.entries.insert(path, AssetState::Pending);
        true
    }

    pub fn insert(&mut self, path: SmolStr, result: Result<AssetInfo, AssetError>) {
        let state = match result {
            Ok(info) => AssetState::Ready(info),
            Err(err) => AssetState::Failed(err),
        };
        self.entries.insert(path, state);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One-shot reply handle for an asset request.
#[derive(Debug)]
pub struct AssetCompleter {
    request: AssetRequest,
    tx: Sender<AppMessage>,
}

impl AssetCompleter {
    pub(crate) fn new(request: AssetRequest, tx: Sender<AppMessage>) -> Self {
        Self { request, tx }
    }

    pub fn request(&self) -> &AssetRequest {
        &self.request
    }

    /// Decodes `bytes` (if the read succeeded) and posts the outcome.
    pub fn complete(self, bytes: Result<Vec<u8>, AssetError>) {
        let result = bytes.and_then(|bytes| decode_intrinsic_size(self.request.kind, &bytes));
        if let Err(err) = &result {
            warn!(path = %self.request.path, %err, "asset load failed");
        }
        let message = AppMessage::AssetLoaded {
            path: self.request.path,
            result,
        };
        if self.tx.send(message).is_err() {
            trace!("application gone before asset completed");
        }
    }
}

pub trait AssetSource {
    fn request(&self, completer: AssetCompleter);
}

/// Reads assets from disk on a worker thread, relative to `root`.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    fn request(&self, completer: AssetCompleter) {
        let path = self.root.join(completer.request().path.as_str());
        trace!(path = %path.display(), "reading asset");
        std::thread::spawn(move || {
            let bytes = std::fs::read(&path).map_err(AssetError::from);
            completer.complete(bytes);
        });
    }
}

/// In-memory assets; requests complete immediately.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    files: FxHashMap<SmolStr, Vec<u8>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<SmolStr>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: impl Into<SmolStr>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }
}

impl AssetSource for MemoryAssetSource {
    fn request(&self, completer: AssetCompleter) {
        let bytes = self
            .files
            .get(completer.request().path.as_str())
            .cloned()
            .ok_or(AssetError::NotFound);
        completer.complete(bytes);
    }
}
