//! # Channel Replay Log
//!
//! Message log plumbing for channel replay. A log is an ordered list of
//! entries, each a direction marker (`+` sent, `-` received) followed by the
//! path of an encoded message.
//!
//! ## Key Types
//!
//! - [`MessageSource`] - Where encoded messages are loaded from
//! - [`FsSource`] - Files on disk
//! - [`MemorySource`] - In-memory map, for tests
//! - [`LogEntry`] - A parsed direction + path pair
//! - [`DecodedEntry`] - An entry with its message decoded
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chanreplay_log::{FsSource, LogEntry};
//!
//! let source = FsSource::with_root("capture");
//! let entry = LogEntry::parse("+update-1.pkt").unwrap();
//! let decoded = entry.load(&source).unwrap();
//! println!("{} {}", decoded.direction, decoded.pkt.kind());
//! ```

pub mod entry;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use entry::{DecodedEntry, LogEntry};
pub use error::{LogError, Result};
pub use fs::FsSource;
pub use memory::MemorySource;
pub use traits::{MessageSource, MessageSourceExt};
