//! # Channel Replay Core
//!
//! Pure primitives for reconstructing a two-party payment channel from its
//! message log: digests and signatures, protocol messages and their wire
//! framing, funding arithmetic, the HTLC registry and revocation chains.
//!
//! This crate contains no I/O. It is pure computation over channel state.
//!
//! ## Key Types
//!
//! - [`Pkt`] - Any protocol message
//! - [`ChannelState`] - Both ledger sides (`a` local, `b` remote)
//! - [`Htlc`] - A pending conditional payment
//! - [`RevocationTracker`] - Current and previous revocation hashes per party
//! - [`Seed`] - Root of a party's revocation hash chain
//!
//! ## Funding
//!
//! Balances only ever change through [`funding_delta`], which either applies
//! a legal split to both sides or leaves them untouched.

pub mod codec;
pub mod crypto;
pub mod error;
pub mod funding;
pub mod htlc;
pub mod message;
pub mod revocation;
pub mod shachain;
pub mod types;

pub use codec::{decode_pkt, decode_pkt_with_id, encode_pkt, WIRE_VERSION};
pub use crypto::{
    CommitSignature, Ed25519PublicKey, Ed25519Signature, Keypair, MessageId, Preimage,
    Sha256Digest,
};
pub use error::{CoreError, FundingError, FundingSide, TransitionError};
pub use funding::{anchor_msat, funding_delta, initial_funding, ChannelState, LedgerSide};
pub use htlc::Htlc;
pub use message::{
    AnchorOffer, CloseChannel, CloseChannelComplete, ErrorPkt, MessageKind, OpenAnchor,
    OpenChannel, OpenCommitSig, OpenComplete, Pkt, Update, UpdateAccept, UpdateAddHtlc,
    UpdateComplete, UpdateFulfillHtlc, UpdateRoutefailHtlc, UpdateSignature, UpdateTimedoutHtlc,
};
pub use revocation::{RevocationSnapshot, RevocationTracker};
pub use shachain::{shachain_from_seed, Seed};
pub use types::{AbsLocktime, Direction, Party, RelLocktime, MSAT_PER_SAT};
