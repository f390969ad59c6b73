//! # chanreplay-cli
//!
//! Provides the `chanreplay` command-line interface over the replay library.
//!
//! ## Subcommands
//!
//! - `chanreplay update`: Build a balance update message from a revocation seed.
//! - `chanreplay gather`: Replay a captured message log and print the final state.
//! - `chanreplay revocation`: Print a revocation hash or preimage.
//!
//! Every handler takes its parsed arguments and an output sink and returns
//! the process exit code, so the binary stays a thin dispatcher.

pub mod gather;
pub mod revocation;
pub mod update;
