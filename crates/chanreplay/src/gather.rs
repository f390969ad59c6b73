//! Replay of a log whose entries name encoded messages in a source.

use chanreplay_log::{LogEntry, MessageSource, MessageSourceExt};

use crate::config::ReplayConfig;
use crate::engine::{ChannelParams, ReplayOutcome, Replayer};
use crate::error::GatherError;

impl ChannelParams {
    /// Load the opening packets from a source.
    pub fn load<S: MessageSource + ?Sized>(
        source: &S,
        local_open: &str,
        remote_open: &str,
        anchor: &str,
        fee_satoshis: u64,
    ) -> Result<Self, GatherError> {
        Ok(Self {
            local: source.load_open(local_open).map_err(GatherError::Open)?,
            remote: source.load_open(remote_open).map_err(GatherError::Open)?,
            anchor: source.load_anchor(anchor).map_err(GatherError::Open)?,
            fee_satoshis,
        })
    }
}

/// Replay every `+path` / `-path` entry in order.
///
/// Entries are loaded lazily, so a malformed entry late in the log is only
/// reported once everything before it has applied cleanly.
pub fn gather_updates<S, I, E>(
    source: &S,
    params: &ChannelParams,
    entries: I,
    config: ReplayConfig,
) -> Result<ReplayOutcome, GatherError>
where
    S: MessageSource + ?Sized,
    I: IntoIterator<Item = E>,
    E: AsRef<str>,
{
    let mut replayer =
        Replayer::new(params, config).map_err(|source| GatherError::Replay { path: None, source })?;

    for (index, raw) in entries.into_iter().enumerate() {
        let entry = LogEntry::parse(raw.as_ref())
            .and_then(|entry| entry.load(source))
            .map_err(|source| GatherError::Log { index, source })?;

        tracing::trace!(index, path = %entry.path, id = %entry.id, "loaded entry");

        replayer = replayer
            .apply(entry.direction, &entry.pkt)
            .map_err(|source| {
                tracing::warn!(index, path = %entry.path, error = %source, "replay rejected entry");
                GatherError::Replay {
                    path: Some(entry.path.clone()),
                    source,
                }
            })?;
    }

    replayer
        .finish()
        .map_err(|source| GatherError::Replay { path: None, source })
}
