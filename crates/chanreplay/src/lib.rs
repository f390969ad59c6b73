//! # Channel Replay
//!
//! Reconstructs the state of a two-party payment channel from its opening
//! parameters and an ordered log of sent and received protocol messages,
//! validating every step on the way.
//!
//! ## Overview
//!
//! - **Funding**: Both ledger sides start from the anchor less the opening fee.
//! - **HTLCs**: Conditional payments are locked, refunded or fulfilled by hash.
//! - **Revocation**: Each party's revocation hash advances with every update;
//!   signatures and completions must reveal the preimage of the previous one.
//! - **Conservation**: When the log ends, both sides must still add up to the anchor.
//!
//! Replay stops at the first message that breaks any of these rules.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chanreplay::{gather_updates, ChannelParams, ReplayConfig};
//! use chanreplay::log::FsSource;
//!
//! let source = FsSource::with_root("capture");
//! let params = ChannelParams::load(&source, "open-a", "open-b", "anchor", 5_000).unwrap();
//! let outcome = gather_updates(
//!     &source,
//!     &params,
//!     ["+update-1", "-accept-1", "+signature-1", "-complete-1"],
//!     ReplayConfig::default().with_commit_sig(),
//! )
//! .unwrap();
//! println!("{} updates, ours {}", outcome.update_count, outcome.state.a.pay_msat);
//! ```
//!
//! ## Re-exports
//!
//! - `chanreplay::core` - Messages, funding arithmetic, HTLCs, revocation chains
//! - `chanreplay::log` - Log entries and message sources

pub mod config;
pub mod engine;
pub mod error;
pub mod gather;

pub use chanreplay_core as core;
pub use chanreplay_log as log;

pub use config::ReplayConfig;
pub use engine::{replay, ChannelParams, ReplayOutcome, Replayer};
pub use error::{ErrorClass, GatherError, ReplayError, Result};
pub use gather::gather_updates;

pub use chanreplay_core::{ChannelState, Direction, Htlc, LedgerSide, Party, Pkt};
