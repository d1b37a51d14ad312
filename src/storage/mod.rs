//! Storage Module
//!
//! Record-at-a-time access to the store file.
//!
//! ## Responsibilities
//! - Open the record file in read, write-truncate or append mode
//! - Read and write exactly one block at a time
//! - Distinguish clean end-of-data from a truncated trailing block
//! - Flush and sync according to the configured `SyncStrategy`
//!
//! Partial reads and writes are never accepted: a block is either fully
//! transferred or the call fails.

mod file;

use std::fmt;

pub use file::{roll_back_append, RecordFile, Records};

/// How a record file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read from the start; the file must exist
    Read,

    /// Create or truncate, then write from the start
    WriteTruncate,

    /// Create if missing, every write lands at the end
    Append,
}

impl OpenMode {
    pub fn is_writable(self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpenMode::Read => "read",
            OpenMode::WriteTruncate => "write-truncate",
            OpenMode::Append => "append",
        };
        f.write_str(name)
    }
}
