//! Log entries: a direction marker followed by the path of a message.
//!
//! `+path` marks a message we sent, `-path` one we received.

use chanreplay_core::{Direction, MessageId, Pkt};

use crate::error::{LogError, Result};
use crate::traits::MessageSourceExt;

/// One parsed, not yet loaded, log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub direction: Direction,
    pub path: String,
}

impl LogEntry {
    /// Parse an entry of the form `+path` or `-path`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut chars = raw.chars();
        let direction = chars
            .next()
            .and_then(Direction::from_marker)
            .ok_or_else(|| LogError::MalformedDirection(raw.to_string()))?;

        let path = chars.as_str();
        if path.is_empty() {
            return Err(LogError::EmptyPath(raw.to_string()));
        }

        Ok(Self {
            direction,
            path: path.to_string(),
        })
    }

    /// Load and decode the message this entry names.
    pub fn load<S: MessageSourceExt + ?Sized>(&self, source: &S) -> Result<DecodedEntry> {
        let (id, pkt) = source.decode(&self.path)?;
        Ok(DecodedEntry {
            direction: self.direction,
            path: self.path.clone(),
            id,
            pkt,
        })
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.direction.marker(), self.path)
    }
}

/// A log entry with its message decoded.
#[derive(Debug, Clone)]
pub struct DecodedEntry {
    pub direction: Direction,
    pub path: String,
    /// Content address of the encoded message.
    pub id: MessageId,
    pub pkt: Pkt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_sent_and_received() {
        let sent = LogEntry::parse("+msgs/update-1").unwrap();
        assert_eq!(sent.direction, Direction::Sent);
        assert_eq!(sent.path, "msgs/update-1");

        let received = LogEntry::parse("-msgs/accept-1").unwrap();
        assert_eq!(received.direction, Direction::Received);
        assert_eq!(received.to_string(), "-msgs/accept-1");
    }

    #[test]
    fn test_parse_rejects_missing_marker() {
        assert!(matches!(
            LogEntry::parse("msgs/update-1"),
            Err(LogError::MalformedDirection(_))
        ));
        assert!(matches!(LogEntry::parse(""), Err(LogError::MalformedDirection(_))));
    }

    #[test]
    fn test_parse_rejects_bare_marker() {
        assert!(matches!(LogEntry::parse("+"), Err(LogError::EmptyPath(_))));
    }

    proptest! {
        #[test]
        fn prop_display_reparses(sent in any::<bool>(), path in "[a-zA-Z0-9_./-]{1,40}") {
            let marker = if sent { '+' } else { '-' };
            let raw = format!("{marker}{path}");
            let entry = LogEntry::parse(&raw).unwrap();
            prop_assert_eq!(&entry.path, &path);
            prop_assert_eq!(entry.to_string(), raw);
        }
    }
}
