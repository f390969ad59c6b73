//! Error types for replay.

use chanreplay_core::{CoreError, Direction, FundingError, MessageKind, TransitionError};
use chanreplay_log::LogError;
use thiserror::Error;

/// Broad category of a replay failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The opening parameters cannot describe a channel.
    Configuration,
    /// The log is malformed or references state that does not exist.
    Structural,
    /// A requested balance or HTLC change is not affordable.
    Arithmetic,
    /// A preimage or signature does not check out.
    Cryptographic,
    /// Internal bookkeeping is inconsistent. Always a defect.
    Invariant,
}

/// Errors that abort a replay run.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Both or neither party claims to be the funder.
    #[error("must be exactly one funder (local funder: {local}, remote funder: {remote})")]
    FunderConflict { local: bool, remote: bool },

    /// The anchor cannot cover the opening fee.
    #[error("invalid open combination: {0}")]
    InitialFunding(#[source] FundingError),

    /// A message could not be applied.
    #[error("message {index} ({direction} {kind}): {source}")]
    Transition {
        index: usize,
        direction: Direction,
        kind: MessageKind,
        #[source]
        source: TransitionError,
    },

    /// A final commit signature was requested but none was seen.
    #[error("no commit signature message found")]
    MissingSignature,

    /// The final commit signature does not decode.
    #[error("invalid commit signature: {0}")]
    InvalidSignature(#[source] CoreError),

    /// Value was created or destroyed.
    #[error("ledger imbalance{}: expected {expected} msat, found {actual} msat", .after_message.map(|i| format!(" after message {i}")).unwrap_or_default())]
    LedgerImbalance {
        expected: u64,
        actual: u64,
        after_message: Option<usize>,
    },
}

impl ReplayError {
    /// Which category the failure belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            ReplayError::FunderConflict { .. } | ReplayError::InitialFunding(_) => {
                ErrorClass::Configuration
            }
            ReplayError::Transition { source, .. } => match source {
                TransitionError::DuplicateHash(_)
                | TransitionError::UnknownHash(_)
                | TransitionError::UnexpectedMessage(_) => ErrorClass::Structural,
                TransitionError::Infeasible { source, .. } => match source {
                    FundingError::Unbalanced { .. } => ErrorClass::Invariant,
                    _ => ErrorClass::Arithmetic,
                },
                TransitionError::InvalidPreimage { .. } => ErrorClass::Cryptographic,
            },
            ReplayError::MissingSignature | ReplayError::InvalidSignature(_) => {
                ErrorClass::Cryptographic
            }
            ReplayError::LedgerImbalance { .. } => ErrorClass::Invariant,
        }
    }

    /// Index of the offending message, when the failure is tied to one.
    pub fn message_index(&self) -> Option<usize> {
        match self {
            ReplayError::Transition { index, .. } => Some(*index),
            ReplayError::LedgerImbalance { after_message, .. } => *after_message,
            _ => None,
        }
    }
}

/// Errors from replaying a log of message files.
#[derive(Debug, Error)]
pub enum GatherError {
    /// An entry could not be parsed or its message could not be loaded.
    #[error("log entry {index}: {source}")]
    Log {
        index: usize,
        #[source]
        source: LogError,
    },

    /// Opening packets could not be loaded.
    #[error("opening parameters: {0}")]
    Open(#[source] LogError),

    /// Replay rejected the log.
    #[error("{}{source}", .path.as_deref().map(|p| format!("{p}: ")).unwrap_or_default())]
    Replay {
        /// Path of the entry at fault, if the failure is tied to one.
        path: Option<String>,
        #[source]
        source: ReplayError,
    },
}

impl GatherError {
    /// Which category the failure belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            GatherError::Log { .. } => ErrorClass::Structural,
            GatherError::Open(_) => ErrorClass::Configuration,
            GatherError::Replay { source, .. } => source.class(),
        }
    }
}

/// Result type for replay.
pub type Result<T> = std::result::Result<T, ReplayError>;
