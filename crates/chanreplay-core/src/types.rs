//! Strong type definitions for channel replay.
//!
//! Parties, message directions and locktimes are newtypes or enums so
//! that a local/remote mix-up fails at compile time, not at replay time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two channel participants.
///
/// The local party is ledger side "A", the remote party is side "B".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Local,
    Remote,
}

impl Party {
    /// The other participant.
    pub const fn counterparty(self) -> Self {
        match self {
            Party::Local => Party::Remote,
            Party::Remote => Party::Local,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Local => f.write_str("local"),
            Party::Remote => f.write_str("remote"),
        }
    }
}

/// Whether a logged message was sent by us or received from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// The party that authored a message travelling in this direction.
    pub const fn sender(self) -> Party {
        match self {
            Direction::Sent => Party::Local,
            Direction::Received => Party::Remote,
        }
    }

    /// Check if the message came from the counterparty.
    pub const fn is_received(self) -> bool {
        matches!(self, Direction::Received)
    }

    /// The log marker for this direction (`+` sent, `-` received).
    pub const fn marker(self) -> char {
        match self {
            Direction::Sent => '+',
            Direction::Received => '-',
        }
    }

    /// Parse a log marker.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '+' => Some(Direction::Sent),
            '-' => Some(Direction::Received),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sent => f.write_str("sent"),
            Direction::Received => f.write_str("received"),
        }
    }
}

/// An absolute locktime, as used for HTLC expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbsLocktime {
    /// Unix time in seconds.
    Seconds(u32),
    /// Block height.
    Blocks(u32),
}

impl fmt::Display for AbsLocktime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsLocktime::Seconds(s) => write!(f, "{s}s"),
            AbsLocktime::Blocks(b) => write!(f, "block {b}"),
        }
    }
}

/// A relative locktime, as used for the commitment output delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelLocktime {
    /// Delay in seconds.
    Seconds(u32),
    /// Delay in blocks.
    Blocks(u32),
}

/// Millisatoshis per satoshi.
pub const MSAT_PER_SAT: u64 = 1000;
