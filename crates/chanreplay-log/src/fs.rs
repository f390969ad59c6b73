//! Filesystem implementation of the MessageSource trait.
//!
//! Each message lives in its own file, as written by the `update` tool or
//! captured from the wire.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{LogError, Result};
use crate::traits::MessageSource;

/// Reads messages from files.
///
/// Relative paths resolve against `root` when one is set, otherwise against
/// the process working directory.
#[derive(Debug, Default, Clone)]
pub struct FsSource {
    root: Option<PathBuf>,
}

impl FsSource {
    /// Resolve paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => Path::new(path).to_path_buf(),
        }
    }
}

impl MessageSource for FsSource {
    fn load(&self, path: &str) -> Result<Bytes> {
        let full = self.resolve(path);
        tracing::trace!(path = %full.display(), "loading message");

        std::fs::read(&full).map(Bytes::from).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LogError::NotFound(path.to_string())
            } else {
                LogError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}
