//! Full-pass scans over an open record file

use std::path::Path;

use crate::config::SyncStrategy;
use crate::error::{DevStoreError, Result};
use crate::record::Device;
use crate::storage::{OpenMode, RecordFile};

use super::Criterion;

/// Every remaining record, in on-disk order
pub fn scan_all(file: &mut RecordFile) -> Result<Vec<Device>> {
    file.records().collect()
}

/// Every remaining record matching `criterion`, in on-disk order.
///
/// Always reads to end of data.
pub fn scan_matching(file: &mut RecordFile, criterion: &Criterion) -> Result<Vec<Device>> {
    let mut matches = Vec::new();

    for device in file.records() {
        let device = device?;
        if criterion.matches(&device) {
            matches.push(device);
        }
    }

    Ok(matches)
}

/// Whether any record in the store at `path` already uses `serial`.
///
/// A store that does not exist yet uses no serials.
pub fn serial_in_use(path: &Path, serial: u32) -> Result<bool> {
    let mut file = match RecordFile::open(path, OpenMode::Read, SyncStrategy::OnClose) {
        Ok(file) => file,
        Err(DevStoreError::StoreNotFound(_)) => return Ok(false),
        Err(e) => return Err(e),
    };

    let mut in_use = false;
    for device in file.records() {
        if device?.serial == serial {
            in_use = true;
        }
    }

    file.close()?;
    Ok(in_use)
}
