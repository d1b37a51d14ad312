//! Error types for devstore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::query::Field;
use crate::storage::OpenMode;

/// Result type alias using DevStoreError
pub type Result<T> = std::result::Result<T, DevStoreError>;

/// Unified error type for devstore operations
#[derive(Debug, Error)]
pub enum DevStoreError {
    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store path is empty")]
    EmptyPath,

    #[error("Store file not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("Cannot {operation} a record file opened in {mode} mode")]
    WrongMode { operation: &'static str, mode: OpenMode },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Truncated record at offset {offset}: {len} trailing bytes")]
    TruncatedRecord { offset: u64, len: usize },

    #[error("Short write: record block not fully written")]
    ShortWrite,

    #[error("Codec error: {0}")]
    Codec(String),

    // -------------------------------------------------------------------------
    // Input Validation Errors
    // -------------------------------------------------------------------------
    #[error("Text too long: {len} bytes (max {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("Invalid text: {0}")]
    InvalidText(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("Serial number {0} is already in use")]
    SerialInUse(u32),

    // -------------------------------------------------------------------------
    // Policy / Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Removal by {0} is not enabled")]
    SelectorNotAllowed(Field),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DevStoreError {
    /// True for errors caused by user input rather than the store
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DevStoreError::TextTooLong { .. }
                | DevStoreError::InvalidText(_)
                | DevStoreError::InvalidNumber(_)
                | DevStoreError::InvalidChoice(_)
        )
    }
}
