//! Error types for the channel replay core.

use thiserror::Error;

use crate::crypto::Sha256Digest;
use crate::message::MessageKind;
use crate::types::Party;

/// Core errors from primitives and the message codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("truncated message: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("unsupported message version: {0}")]
    UnsupportedVersion(u8),

    #[error("message length mismatch: header says {declared}, body is {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Which ledger side a funding failure refers to.
///
/// Sides are named relative to the `funding_delta` call, not to the
/// channel: `A` is whichever side was passed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingSide {
    A,
    B,
}

impl std::fmt::Display for FundingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FundingSide::A => f.write_str("A"),
            FundingSide::B => f.write_str("B"),
        }
    }
}

/// Errors from the funding arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FundingError {
    #[error("fee of {fee} satoshi exceeds anchor of {anchor} satoshi")]
    FeeExceedsAnchor { fee: u64, anchor: u64 },

    #[error("amount overflows millisatoshi arithmetic")]
    AmountOverflow,

    #[error("side {side} needs {needed} msat but only has {available} msat")]
    InsufficientFunds {
        side: FundingSide,
        needed: u64,
        available: u64,
    },

    #[error("non-funder cannot pay while unable to cover its {fee} msat fee share")]
    NonFunderCannotCoverFee { fee: u64 },

    #[error("funder cannot cover its {fee} msat fee share")]
    FunderCannotCoverFee { fee: u64 },

    #[error("sides hold {actual} msat, anchor is {expected} msat")]
    Unbalanced { expected: u64, actual: u64 },
}

/// Errors from applying a single message to channel state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("duplicate HTLC hash {0}")]
    DuplicateHash(Sha256Digest),

    #[error("unknown HTLC hash {0}")]
    UnknownHash(Sha256Digest),

    /// Wide enough for any offered `u64` amount and any signed delta.
    #[error("infeasible delta of {amount_msat} msat: {source}")]
    Infeasible {
        amount_msat: i128,
        #[source]
        source: FundingError,
    },

    #[error("revocation preimage does not open the {party} party's previous commitment")]
    InvalidPreimage { party: Party },

    #[error("unexpected message type {0}")]
    UnexpectedMessage(MessageKind),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
