//! Golden revocation chain vectors.
//!
//! Any implementation deriving the same chain from the same seed must
//! produce these values bit for bit, or preimages it reveals will not open
//! the hashes its peer holds.

use chanreplay_core::{shachain_from_seed, Seed};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub seed: [u8; 32],
    pub index: u64,
    /// Expected chain value (hex).
    pub expected_value: &'static str,
    /// Expected revocation hash, SHA-256 of the value (hex).
    pub expected_hash: &'static str,
}

const COUNTING_SEED: [u8; 32] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f,
];

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "zero seed, index 0 is the seed itself",
            seed: [0x00; 32],
            index: 0,
            expected_value: "0000000000000000000000000000000000000000000000000000000000000000",
            expected_hash: "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925",
        },
        GoldenVector {
            name: "zero seed, index 1",
            seed: [0x00; 32],
            index: 1,
            expected_value: "01d0fabd251fcbbe2b93b4b927b26ad2a1a99077152e45ded1e678afa45dbec5",
            expected_hash: "7e59998584f83454a4095c90006b277c31ec7b447fee44f88bf57f10edf5ab14",
        },
        GoldenVector {
            name: "all-ones seed, index 1",
            seed: [0xff; 32],
            index: 1,
            expected_value: "019da9f8b93daf2ffbe0b46e64d0fb695532c36cc862228ce829aed641811322",
            expected_hash: "5cbbaa8e71ff93ef06c03e07737a18d2b81a18ef4b565b024e9199ec29723afb",
        },
        GoldenVector {
            name: "all-ones seed, index 3",
            seed: [0xff; 32],
            index: 3,
            expected_value: "527fd6ae17d52d9f0e5388a988018274633f82cf4633135643815245ca4d8ea3",
            expected_hash: "f445c52ced761e1388623cc946a2cb69912feb4b6026ff348e130ddafc3c9111",
        },
        GoldenVector {
            name: "counting seed, index 42",
            seed: COUNTING_SEED,
            index: 42,
            expected_value: "4b072683e25f8a25fc800ea11da9a98fde09ea3fd8a496bb1d1803c5db9af852",
            expected_hash: "605135f05b009e6306deade5bc09dead6ecf01f5b62f5c78d41bf3bc830c69f0",
        },
        GoldenVector {
            name: "counting seed, top bit only",
            seed: COUNTING_SEED,
            index: 1 << 63,
            expected_value: "e29f629e5028d90c03ea3ef84296a80bae3871f09dd26a59ac928e9a07561bd5",
            expected_hash: "704e6181c2748221356f64c17e69906f5cdfc4de8e41a32cd6d368161c65d2e1",
        },
    ]
}

/// Check every vector, returning the name of the first mismatch.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        let seed = Seed(vector.seed);
        let value = hex::encode(shachain_from_seed(&seed, vector.index));
        if value != vector.expected_value {
            return Err(format!("{}: value {value}", vector.name));
        }
        let hash = seed.revocation_hash(vector.index).to_hex();
        if hash != vector.expected_hash {
            return Err(format!("{}: hash {hash}", vector.name));
        }
    }
    Ok(())
}
