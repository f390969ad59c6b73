//! Revocation chain tracking.
//!
//! Every state-changing message carries the sender's next revocation hash.
//! Revealing the preimage of the hash it replaced is how a party gives up
//! the right to broadcast the older commitment.

use serde::{Deserialize, Serialize};

use crate::crypto::{Preimage, Sha256Digest};
use crate::error::TransitionError;
use crate::types::Party;

/// The latest two revocation commitments of one party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationSnapshot {
    /// Commitment for the party's newest state.
    pub current: Sha256Digest,
    /// Commitment that the next revealed preimage must open.
    ///
    /// `None` until the chain has advanced once.
    pub previous: Option<Sha256Digest>,
}

impl RevocationSnapshot {
    /// Seed from the hash in the party's open offer.
    pub fn new(initial: Sha256Digest) -> Self {
        Self {
            current: initial,
            previous: None,
        }
    }

    /// Record a new commitment, keeping the one it replaces.
    pub fn advance(&mut self, next: Sha256Digest) {
        self.previous = Some(self.current);
        self.current = next;
    }

    /// Check whether `preimage` opens the replaced commitment.
    pub fn justifies(&self, preimage: &Preimage) -> bool {
        self.previous.map_or(false, |prev| preimage.opens(&prev))
    }
}

/// Revocation state of both parties plus the channel update counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationTracker {
    pub local: RevocationSnapshot,
    pub remote: RevocationSnapshot,
    /// Number of counted updates seen so far.
    pub update_count: u64,
}

impl RevocationTracker {
    pub fn new(local: Sha256Digest, remote: Sha256Digest) -> Self {
        Self {
            local: RevocationSnapshot::new(local),
            remote: RevocationSnapshot::new(remote),
            update_count: 0,
        }
    }

    /// Snapshot of `party`.
    pub fn snapshot(&self, party: Party) -> &RevocationSnapshot {
        match party {
            Party::Local => &self.local,
            Party::Remote => &self.remote,
        }
    }

    /// Advance `party`'s chain to `next`.
    ///
    /// `counted` is false for accept messages, which finalise an update
    /// already counted rather than proposing a new one.
    pub fn advance(&mut self, party: Party, next: Sha256Digest, counted: bool) {
        match party {
            Party::Local => self.local.advance(next),
            Party::Remote => self.remote.advance(next),
        }
        if counted {
            self.update_count += 1;
        }
    }

    /// Verify a revealed revocation preimage from `party`.
    pub fn verify_preimage(&self, party: Party, preimage: &Preimage) -> Result<(), TransitionError> {
        if self.snapshot(party).justifies(preimage) {
            Ok(())
        } else {
            Err(TransitionError::InvalidPreimage { party })
        }
    }
}
