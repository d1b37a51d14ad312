//! # devstore
//!
//! A single-user record manager for fixed-format device records kept in a
//! flat binary file:
//! - Fixed-width record blocks with no header or free-list
//! - Linear-scan search by any record field
//! - Removal via filtered rewrite and a single atomic rename
//! - Serial numbers unique across the store
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Menu / CLI commands                       │
//! │               (prompts, parsing, reporting)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     DeviceStore                              │
//! │            (add / list / search / remove / verify)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Query    │          │   Storage   │
//!   │ (scan/rewr.)│─────────▶│ (RecordFile)│
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Record    │
//!                           │   (codec)   │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod query;
pub mod store;
pub mod menu;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DevStoreError, Result};
pub use config::{Config, SyncStrategy};
pub use record::{Device, DeviceText};
pub use query::{Criterion, Field, RemoveOutcome};
pub use store::{DeviceStore, VerifyReport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of devstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
