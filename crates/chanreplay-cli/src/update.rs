//! # Update CLI: build a balance update message.
//!
//! ```bash
//! # Pay the counterparty 5000 satoshi as our third update:
//! chanreplay update <seed-hex> 3 --to-them 5000 > update-3.pkt
//! ```
//!
//! The message carries the revocation hash for `update-number` derived from
//! the seed, so the matching preimage can be revealed once the state is
//! superseded.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use chanreplay_core::{encode_pkt, Pkt, Seed, Update, MSAT_PER_SAT};

/// Arguments for `chanreplay update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Revocation chain seed (64 hex characters).
    pub seed: String,

    /// Update number; the revocation hash at this index is used. Must not be 0.
    pub update_number: u64,

    /// Amount to pay them, in satoshi.
    #[arg(long, value_name = "SATOSHI", required_unless_present = "from_them")]
    pub to_them: Option<u64>,

    /// Amount they pay us, in satoshi.
    #[arg(long, value_name = "SATOSHI")]
    pub from_them: Option<u64>,

    /// Write the message here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Build the update message the arguments describe.
pub fn build_update(args: &UpdateArgs) -> Result<Update> {
    let seed = Seed::from_hex(&args.seed)
        .with_context(|| format!("invalid seed '{}': need 256 hex bits", args.seed))?;

    if args.update_number == 0 {
        bail!("update number 0 invalid: index 0 belongs to the open message");
    }

    let delta_satoshis = i128::from(args.from_them.unwrap_or(0)) - i128::from(args.to_them.unwrap_or(0));
    if delta_satoshis == 0 {
        bail!("delta must not be zero");
    }
    let delta_msat = i64::try_from(delta_satoshis * i128::from(MSAT_PER_SAT))
        .context("delta does not fit in a signed 64-bit millisatoshi amount")?;

    Ok(Update {
        revocation_hash: seed.revocation_hash(args.update_number),
        delta_msat,
    })
}

/// Execute the update subcommand.
pub fn run_update(args: &UpdateArgs, stdout: &mut dyn Write) -> Result<u8> {
    let update = build_update(args)?;
    tracing::debug!(
        update_number = args.update_number,
        delta_msat = update.delta_msat,
        revocation_hash = %update.revocation_hash,
        "built update"
    );

    let bytes = encode_pkt(&Pkt::Update(update)).context("encoding update")?;
    match &args.out {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("writing {}", path.display()))?,
        None => stdout.write_all(&bytes).context("writing out packet")?,
    }
    Ok(0)
}
