//! Store Module
//!
//! The record store facade that composes storage and query.
//!
//! ## Responsibilities
//! - Add with serial uniqueness, append-only
//! - List, search and remove over the configured store file
//! - Enforce the removal selector policy
//! - Verify store integrity on demand

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{DevStoreError, Result};
use crate::query::{self, Criterion, Field, RemoveOutcome};
use crate::record::{self, Device, RECORD_SIZE};
use crate::storage::{self, OpenMode, RecordFile};

/// The device record store
///
/// ## Access Model: single process, one operation at a time
///
/// Every operation opens the store file, runs to completion and closes it
/// before returning. Nothing is cached between operations, so the file is
/// always the only source of truth. No locking is done: the store assumes
/// no other process touches the file while an operation runs.
pub struct DeviceStore {
    /// Store configuration
    config: Config,

    /// Resolved rewrite target for remove
    temp_path: PathBuf,
}

impl DeviceStore {
    /// Create a store over the configured file
    ///
    /// Does no I/O: the file is created by the first `add`.
    pub fn open(config: Config) -> Result<Self> {
        if config.store_path.as_os_str().is_empty() {
            return Err(DevStoreError::EmptyPath);
        }

        let temp_path = config.temp_path();
        if temp_path == config.store_path {
            return Err(DevStoreError::Config(
                "rewrite path must differ from the store path".to_string(),
            ));
        }

        tracing::debug!(
            store = %config.store_path.display(),
            temp = %temp_path.display(),
            "device store opened"
        );

        Ok(Self { config, temp_path })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified store file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().store_path(path).build())
    }

    /// Append a new device
    ///
    /// Steps:
    /// 1. Scan the store for the candidate's serial
    /// 2. Open in append mode and write one block
    /// 3. Close (flush/sync)
    ///
    /// On any failure the store file is left as it was.
    pub fn add(&self, device: Device) -> Result<()> {
        let path = self.path();

        if query::serial_in_use(path, device.serial)? {
            tracing::warn!(serial = device.serial, "rejected add: serial already in use");
            return Err(DevStoreError::SerialInUse(device.serial));
        }

        let original_len = match fs::metadata(path) {
            Ok(meta) => Some(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = self.append(&device) {
            self.restore_length(original_len);
            return Err(e);
        }

        tracing::info!(
            serial = device.serial,
            name = %device.name,
            "device added"
        );
        Ok(())
    }

    /// All devices in on-disk order
    ///
    /// Returns `StoreNotFound` if nothing was ever added.
    pub fn list(&self) -> Result<Vec<Device>> {
        let mut file = self.open_for_read()?;
        let devices = query::scan_all(&mut file)?;
        file.close()?;

        tracing::debug!(count = devices.len(), "listed devices");
        Ok(devices)
    }

    /// All devices matching `criterion`, in on-disk order. Read-only.
    pub fn search(&self, criterion: &Criterion) -> Result<Vec<Device>> {
        let mut file = self.open_for_read()?;
        let matches = query::scan_matching(&mut file, criterion)?;
        file.close()?;

        tracing::debug!(%criterion, count = matches.len(), "search finished");
        Ok(matches)
    }

    /// Remove every device matching `criterion`
    ///
    /// Removal by serial is refused unless `allow_serial_removal` is set.
    pub fn remove(&self, criterion: &Criterion) -> Result<RemoveOutcome> {
        if criterion.field() == Field::Serial && !self.config.allow_serial_removal {
            return Err(DevStoreError::SelectorNotAllowed(Field::Serial));
        }

        let outcome = query::rewrite_excluding(
            self.path(),
            &self.temp_path,
            criterion,
            self.config.sync_strategy,
        )?;

        match outcome {
            RemoveOutcome::Removed { removed, kept } => {
                tracing::info!(%criterion, removed, kept, "devices removed");
            }
            RemoveOutcome::NoMatch => {
                tracing::debug!(%criterion, "nothing to remove");
            }
        }
        Ok(outcome)
    }

    /// Check the store file without modifying it
    ///
    /// Unlike the other operations this keeps going past bad blocks, so
    /// the report covers the whole file.
    pub fn verify(&self) -> Result<VerifyReport> {
        let bytes = fs::read(self.path()).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DevStoreError::StoreNotFound(self.path().to_path_buf()),
            _ => DevStoreError::Io(e),
        })?;

        let mut report = VerifyReport {
            file_size: bytes.len() as u64,
            checksum: crc32fast::hash(&bytes),
            ..VerifyReport::default()
        };

        let mut serials: BTreeMap<u32, usize> = BTreeMap::new();
        let mut blocks = bytes.chunks_exact(RECORD_SIZE);

        for (index, chunk) in blocks.by_ref().enumerate() {
            let block: &[u8; RECORD_SIZE] = chunk
                .try_into()
                .map_err(|_| DevStoreError::Codec("block size mismatch".to_string()))?;

            match record::decode(block) {
                Ok(device) => {
                    report.records += 1;
                    *serials.entry(device.serial).or_default() += 1;
                }
                Err(e) => {
                    report.corrupt_records += 1;
                    report.errors.push(format!("block {}: {}", index, e));
                }
            }
        }

        report.trailing_bytes = blocks.remainder().len();
        report.duplicate_serials = serials
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(serial, _)| serial)
            .collect();

        if !report.is_ok() {
            tracing::warn!(
                corrupt = report.corrupt_records,
                trailing = report.trailing_bytes,
                duplicates = report.duplicate_serials.len(),
                "store verification found problems"
            );
        }
        Ok(report)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.config.store_path
    }

    /// Get the rewrite file path
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_for_read(&self) -> Result<RecordFile> {
        RecordFile::open(self.path(), OpenMode::Read, self.config.sync_strategy)
    }

    fn append(&self, device: &Device) -> Result<()> {
        let mut file = RecordFile::open(self.path(), OpenMode::Append, self.config.sync_strategy)?;
        file.write_one(device)?;
        file.close()
    }

    /// Undo a failed append: cut the file back, or delete it if the append
    /// created it
    fn restore_length(&self, original_len: Option<u64>) {
        if let Err(e) = storage::roll_back_append(self.path(), original_len) {
            tracing::warn!(error = %e, path = %self.path().display(), "failed to roll back partial add");
        }
    }
}

/// Result of `DeviceStore::verify`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Store size in bytes
    pub file_size: u64,
    /// Blocks that decoded cleanly
    pub records: u64,
    /// Blocks that failed to decode
    pub corrupt_records: u64,
    /// Bytes after the last complete block
    pub trailing_bytes: usize,
    /// Serials used by more than one record, ascending
    pub duplicate_serials: Vec<u32>,
    /// CRC32 of the whole file
    pub checksum: u32,
    /// One message per corrupt block
    pub errors: Vec<String>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.corrupt_records == 0 && self.trailing_bytes == 0 && self.duplicate_serials.is_empty()
    }
}
