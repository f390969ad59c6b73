//! # Revocation CLI: inspect a party's revocation chain.
//!
//! ```bash
//! chanreplay revocation <seed-hex> 3            # hash for update 3
//! chanreplay revocation <seed-hex> 3 --preimage # the secret that opens it
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use chanreplay_core::Seed;

/// Arguments for `chanreplay revocation`.
#[derive(Args, Debug)]
pub struct RevocationArgs {
    /// Revocation chain seed (64 hex characters).
    pub seed: String,

    /// Chain index.
    pub index: u64,

    /// Print the preimage instead of its hash.
    #[arg(long)]
    pub preimage: bool,
}

/// Execute the revocation subcommand.
pub fn run_revocation(args: &RevocationArgs, stdout: &mut dyn Write) -> Result<u8> {
    let seed = Seed::from_hex(&args.seed)
        .with_context(|| format!("invalid seed '{}': need 256 hex bits", args.seed))?;

    let value = if args.preimage {
        hex::encode(seed.preimage(args.index).as_bytes())
    } else {
        seed.revocation_hash(args.index).to_hex()
    };
    writeln!(stdout, "{value}").context("writing output")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(seed: &str, index: u64, preimage: bool) -> Result<String> {
        let args = RevocationArgs {
            seed: seed.to_string(),
            index,
            preimage,
        };
        let mut out = Vec::new();
        run_revocation(&args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_hash_and_preimage() {
        let seed = "ff".repeat(32);
        assert_eq!(
            run(&seed, 3, false).unwrap().trim(),
            "f445c52ced761e1388623cc946a2cb69912feb4b6026ff348e130ddafc3c9111"
        );
        assert_eq!(
            run(&seed, 3, true).unwrap().trim(),
            "527fd6ae17d52d9f0e5388a988018274633f82cf4633135643815245ca4d8ea3"
        );
    }

    #[test]
    fn test_rejects_short_seed() {
        assert!(run("00", 1, false).is_err());
    }
}
