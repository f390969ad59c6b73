//! In-memory implementation of the MessageSource trait.
//!
//! This is primarily for testing. Paths are plain map keys; nothing touches
//! the filesystem.

use std::collections::HashMap;

use bytes::Bytes;
use chanreplay_core::{encode_pkt, CoreError, Pkt};

use crate::error::{LogError, Result};
use crate::traits::MessageSource;

/// In-memory message source.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    messages: HashMap<String, Bytes>,
}

impl MemorySource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `path`, replacing any previous entry.
    pub fn insert_bytes(&mut self, path: impl Into<String>, bytes: impl Into<Bytes>) {
        self.messages.insert(path.into(), bytes.into());
    }

    /// Encode and store a message under `path`.
    pub fn insert(&mut self, path: impl Into<String>, pkt: &Pkt) -> std::result::Result<(), CoreError> {
        let bytes = encode_pkt(pkt)?;
        self.insert_bytes(path, bytes);
        Ok(())
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageSource for MemorySource {
    fn load(&self, path: &str) -> Result<Bytes> {
        self.messages
            .get(path)
            .cloned()
            .ok_or_else(|| LogError::NotFound(path.to_string()))
    }
}
