//! Query Module
//!
//! Linear-scan queries over the store file.
//!
//! ## Responsibilities
//! - One predicate per field selector, shared by search and remove
//! - Full passes only: every scan reads to end of data and reports all matches
//! - Serial uniqueness check for new records
//! - Remove by filtered rewrite into a temp file plus one atomic rename
//!
//! ## Remove State Machine
//! ```text
//!                ┌──────────┐
//!                │ SCANNING │
//!                └────┬─────┘
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//!   ┌─────────────┐       ┌──────────┐
//!   │ MATCH_FOUND │       │ NO_MATCH │
//!   └──────┬──────┘       └────┬─────┘
//!          ▼                   ▼
//!   ┌─────────────┐       ┌──────────┐
//!   │   COMMIT    │       │ DISCARD  │
//!   │ (rename)    │       │ (unlink) │
//!   └─────────────┘       └──────────┘
//! ```

mod criterion;
mod rewrite;
mod scan;

pub use criterion::{parse_decimal, parse_hex, Criterion, Field};
pub use rewrite::{rewrite_excluding, RemoveOutcome};
pub use scan::{scan_all, scan_matching, serial_in_use};
