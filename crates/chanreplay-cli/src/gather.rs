//! # Gather CLI: replay a captured message log.
//!
//! ```bash
//! chanreplay gather --local-open open-a.pkt --remote-open open-b.pkt \
//!     --anchor anchor.pkt --fee 5000 --commit-sig \
//!     +update-1.pkt -accept-1.pkt +sig-1.pkt -complete-1.pkt
//! ```
//!
//! Each entry is `+path` for a message we sent or `-path` for one we
//! received. On success a JSON summary of the final channel state is
//! printed.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use chanreplay::log::FsSource;
use chanreplay::{gather_updates, ChannelParams, LedgerSide, ReplayConfig, ReplayOutcome};
use chanreplay_core::AbsLocktime;

/// Arguments for `chanreplay gather`.
#[derive(Args, Debug)]
pub struct GatherArgs {
    /// Our open message.
    #[arg(long, value_name = "PATH")]
    pub local_open: String,

    /// Their open message.
    #[arg(long, value_name = "PATH")]
    pub remote_open: String,

    /// The anchor message.
    #[arg(long, value_name = "PATH")]
    pub anchor: String,

    /// Commitment fee, in satoshi.
    #[arg(long, value_name = "SATOSHI", default_value_t = 0)]
    pub fee: u64,

    /// Require and report their latest commit signature.
    #[arg(long)]
    pub commit_sig: bool,

    /// Check conservation of funds after every message.
    #[arg(long)]
    pub check_each_step: bool,

    /// Resolve relative paths against this directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Log entries, in order: `+path` (sent) or `-path` (received).
    #[arg(allow_hyphen_values = true, value_name = "ENTRY")]
    pub entries: Vec<String>,
}

impl GatherArgs {
    fn config(&self) -> ReplayConfig {
        ReplayConfig {
            want_commit_sig: self.commit_sig,
            check_each_step: self.check_each_step,
        }
    }
}

/// JSON summary of a replayed channel.
#[derive(Debug, Serialize)]
pub struct GatherReport {
    pub update_count: u64,
    pub local: SideReport,
    pub remote: SideReport,
    pub total_msat: u64,
    pub local_revocation_hash: String,
    pub remote_revocation_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sig: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SideReport {
    pub pay_msat: u64,
    pub fee_msat: u64,
    pub htlcs: Vec<HtlcReport>,
}

#[derive(Debug, Serialize)]
pub struct HtlcReport {
    pub amount_msat: u64,
    pub r_hash: String,
    pub expiry: AbsLocktime,
}

impl From<&LedgerSide> for SideReport {
    fn from(side: &LedgerSide) -> Self {
        Self {
            pay_msat: side.pay_msat,
            fee_msat: side.fee_msat,
            htlcs: side
                .htlcs
                .iter()
                .map(|h| HtlcReport {
                    amount_msat: h.amount_msat,
                    r_hash: h.r_hash.to_hex(),
                    expiry: h.expiry,
                })
                .collect(),
        }
    }
}

impl From<&ReplayOutcome> for GatherReport {
    fn from(outcome: &ReplayOutcome) -> Self {
        Self {
            update_count: outcome.update_count,
            local: SideReport::from(&outcome.state.a),
            remote: SideReport::from(&outcome.state.b),
            total_msat: outcome.state.total_msat(),
            local_revocation_hash: outcome.local_revocation_hash.to_hex(),
            remote_revocation_hash: outcome.remote_revocation_hash.to_hex(),
            commit_sig: outcome.commit_sig.as_ref().map(|s| s.to_hex()),
        }
    }
}

/// Execute the gather subcommand.
pub fn run_gather(args: &GatherArgs, stdout: &mut dyn Write) -> Result<u8> {
    let source = match &args.root {
        Some(root) => FsSource::with_root(root),
        None => FsSource::new(),
    };

    let params = ChannelParams::load(
        &source,
        &args.local_open,
        &args.remote_open,
        &args.anchor,
        args.fee,
    )?;

    tracing::info!(entries = args.entries.len(), fee = args.fee, "replaying log");

    let outcome = gather_updates(&source, &params, &args.entries, args.config()).map_err(|e| {
        let class = e.class();
        anyhow::Error::new(e).context(format!("replay rejected ({class:?})"))
    })?;

    let report = GatherReport::from(&outcome);
    serde_json::to_writer_pretty(&mut *stdout, &report).context("writing report")?;
    writeln!(stdout).context("writing report")?;
    Ok(0)
}
