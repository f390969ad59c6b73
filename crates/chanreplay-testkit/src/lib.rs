//! # Channel Replay Testkit
//!
//! Testing utilities for channel replay.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known revocation chain values for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A two-party channel that records protocol-correct logs
//!
//! ## Golden Vectors
//!
//! ```rust
//! use chanreplay_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use chanreplay_testkit::generators::{fixture_from_params, HistoryParams};
//!
//! proptest! {
//!     #[test]
//!     fn replay_is_deterministic(params: HistoryParams) {
//!         let fixture = fixture_from_params(&params);
//!         let first = fixture.replay(Default::default()).ok();
//!         let second = fixture.replay(Default::default()).ok();
//!         prop_assert_eq!(first, second);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use chanreplay_core::Party;
//! use chanreplay_testkit::fixtures::ChannelFixture;
//!
//! let mut fixture = ChannelFixture::new(10_000, 1_000);
//! fixture.pay(Party::Local, 2_000_000);
//! let outcome = fixture.replay(Default::default()).unwrap();
//! assert_eq!(outcome.update_count, 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{preimage, ChannelFixture, PartyFixture, UpdateBody};
pub use generators::{fixture_from_params, HistoryOp, HistoryParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
