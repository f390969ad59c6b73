//! HTLC registry: the pending conditional payments a ledger side has offered.
//!
//! Hashes are unique within one side. Order is not significant: removal
//! swaps the last entry into the vacated slot.

use serde::{Deserialize, Serialize};

use crate::crypto::Sha256Digest;
use crate::error::TransitionError;
use crate::funding::LedgerSide;
use crate::types::AbsLocktime;

/// A pending hash-time-locked payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Htlc {
    pub amount_msat: u64,
    pub expiry: AbsLocktime,
    /// Digest of the payment preimage that settles this HTLC.
    pub r_hash: Sha256Digest,
}

impl LedgerSide {
    /// Position of the HTLC with the given hash, if present.
    pub fn find_htlc(&self, r_hash: &Sha256Digest) -> Option<usize> {
        self.htlcs.iter().position(|h| h.r_hash == *r_hash)
    }

    /// Register a new HTLC.
    pub fn add_htlc(&mut self, htlc: Htlc) -> Result<(), TransitionError> {
        if self.find_htlc(&htlc.r_hash).is_some() {
            return Err(TransitionError::DuplicateHash(htlc.r_hash));
        }
        self.htlcs.push(htlc);
        Ok(())
    }

    /// Remove the HTLC at `index`, moving the last HTLC into its place.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds. Callers get indices from
    /// [`LedgerSide::find_htlc`], so this is a programming error.
    pub fn remove_htlc(&mut self, index: usize) -> Htlc {
        assert!(
            index < self.htlcs.len(),
            "HTLC index {index} out of bounds ({} pending)",
            self.htlcs.len()
        );
        self.htlcs.swap_remove(index)
    }

    /// Sum of all pending HTLC amounts.
    pub fn htlcs_total_msat(&self) -> u64 {
        self.htlcs.iter().map(|h| h.amount_msat).sum()
    }
}
