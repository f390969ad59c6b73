//! MessageSource trait: where captured message bytes come from.
//!
//! Replay itself never touches storage. Everything a log entry names is
//! fetched and decoded through this trait first, so the state transitions
//! can stay pure and in-memory.

use bytes::Bytes;
use chanreplay_core::{decode_pkt_with_id, MessageId, MessageKind, OpenAnchor, OpenChannel, Pkt};

use crate::error::{LogError, Result};

/// A store of encoded protocol messages addressed by path.
///
/// Loads may block (for example on the filesystem) and may fail.
pub trait MessageSource {
    /// Fetch the raw bytes stored under `path`.
    fn load(&self, path: &str) -> Result<Bytes>;
}

impl<S: MessageSource + ?Sized> MessageSource for &S {
    fn load(&self, path: &str) -> Result<Bytes> {
        (**self).load(path)
    }
}

/// Extension trait for decoding messages out of a source.
pub trait MessageSourceExt: MessageSource {
    /// Load and decode the message at `path`.
    fn decode(&self, path: &str) -> Result<(MessageId, Pkt)> {
        let bytes = self.load(path)?;
        decode_pkt_with_id(&bytes).map_err(|source| LogError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Load an open offer.
    fn load_open(&self, path: &str) -> Result<OpenChannel> {
        match self.decode(path)? {
            (_, Pkt::Open(open)) => Ok(open),
            (_, other) => Err(wrong_kind(path, MessageKind::Open, &other)),
        }
    }

    /// Load the anchor description.
    fn load_anchor(&self, path: &str) -> Result<OpenAnchor> {
        match self.decode(path)? {
            (_, Pkt::OpenAnchor(anchor)) => Ok(anchor),
            (_, other) => Err(wrong_kind(path, MessageKind::OpenAnchor, &other)),
        }
    }
}

impl<S: MessageSource + ?Sized> MessageSourceExt for S {}

fn wrong_kind(path: &str, expected: MessageKind, found: &Pkt) -> LogError {
    LogError::WrongKind {
        path: path.to_string(),
        expected,
        found: found.kind(),
    }
}
