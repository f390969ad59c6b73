//! One-way revocation hash chain.
//!
//! `shachain_from_seed(seed, index)` walks the bits of `index` from the most
//! significant down; for each set bit it flips that bit of the running value
//! and re-hashes. Values for later indices cannot be computed from earlier
//! ones without the seed.
//!
//! The value for an update is kept secret; its SHA-256 digest is what goes
//! into a message as the next revocation hash.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::{Preimage, Sha256Digest};

/// Secret seed for a party's revocation chain.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed(pub [u8; 32]);

impl Seed {
    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }

    /// The chain value for `index`, revealed when that state is revoked.
    pub fn preimage(&self, index: u64) -> Preimage {
        Preimage(shachain_from_seed(self, index))
    }

    /// The commitment for `index`, sent ahead of the state it protects.
    pub fn revocation_hash(&self, index: u64) -> Sha256Digest {
        self.preimage(index).digest()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Derive the chain value for `index` from `seed`.
pub fn shachain_from_seed(seed: &Seed, index: u64) -> [u8; 32] {
    let mut value = seed.0;
    for bit in (0..64usize).rev() {
        if (index >> bit) & 1 == 1 {
            value[bit / 8] ^= 1 << (bit % 8);
            value = Sha256Digest::hash(&value).0;
        }
    }
    value
}
