//! Replay configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a replay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Require a decodable counterparty commit signature at the end of the log.
    pub want_commit_sig: bool,
    /// Check conservation of funds after every message, not only at the end.
    pub check_each_step: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            want_commit_sig: false,
            check_each_step: false,
        }
    }
}

impl ReplayConfig {
    /// Require the final commit signature.
    pub fn with_commit_sig(mut self) -> Self {
        self.want_commit_sig = true;
        self
    }

    /// Check conservation after every message.
    pub fn checked(mut self) -> Self {
        self.check_each_step = true;
        self
    }
}
