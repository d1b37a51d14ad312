//! Remove via filtered rewrite
//!
//! Copies every record that does not match into a temp file, then either
//! renames the temp file over the store (something matched) or deletes it
//! (nothing matched). The rename replaces the store in one step, so there is
//! no window in which the store path is missing.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use crate::config::SyncStrategy;
use crate::error::{DevStoreError, Result};
use crate::storage::{OpenMode, RecordFile};

use super::Criterion;

/// Result of a remove pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// At least one record matched and the store was replaced
    Removed { removed: u64, kept: u64 },

    /// Nothing matched; the store was not touched
    NoMatch,
}

impl RemoveOutcome {
    pub fn removed(&self) -> u64 {
        match self {
            RemoveOutcome::Removed { removed, .. } => *removed,
            RemoveOutcome::NoMatch => 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RewritePhase {
    Scanning,
    MatchFound,
    NoMatch,
    Commit,
    Discard,
}

/// Rewrite `store` without the records matching `criterion`, using `temp`
/// as the rewrite target.
///
/// The store is replaced only after a complete, closed rewrite. Any error
/// before the rename removes the temp file and leaves the store as it was.
pub fn rewrite_excluding(
    store: &Path,
    temp: &Path,
    criterion: &Criterion,
    sync: SyncStrategy,
) -> Result<RemoveOutcome> {
    if store == temp {
        return Err(DevStoreError::Config(
            "rewrite path must differ from the store path".to_string(),
        ));
    }

    let mut source = RecordFile::open(store, OpenMode::Read, sync)?;
    // Blocks are buffered; `commit` syncs the finished file once before the rename
    let mut target = RecordFile::open(temp, OpenMode::WriteTruncate, SyncStrategy::OnClose)?;

    tracing::debug!(phase = ?RewritePhase::Scanning, %criterion, "rewrite started");
    let copied = copy_unmatched(&mut source, &mut target, criterion);

    if let Err(e) = source.close() {
        tracing::warn!(error = %e, "failed to close store after rewrite scan");
    }

    let (removed, kept) = match copied {
        Ok(counts) => counts,
        Err(e) => {
            abandon(target, temp);
            return Err(e);
        }
    };

    if removed == 0 {
        tracing::debug!(phase = ?RewritePhase::NoMatch, kept, "no record matched");
        abandon(target, temp);
        tracing::debug!(phase = ?RewritePhase::Discard, "rewrite discarded");
        return Ok(RemoveOutcome::NoMatch);
    }

    tracing::debug!(phase = ?RewritePhase::MatchFound, removed, kept, "records matched");
    if let Err(e) = commit(target, temp, store, sync) {
        discard_temp(temp);
        return Err(e);
    }
    tracing::debug!(phase = ?RewritePhase::Commit, "rewrite committed");

    Ok(RemoveOutcome::Removed { removed, kept })
}

// =============================================================================
// Private Helpers
// =============================================================================

/// Returns (removed, kept)
fn copy_unmatched(
    source: &mut RecordFile,
    target: &mut RecordFile,
    criterion: &Criterion,
) -> Result<(u64, u64)> {
    let mut removed = 0u64;
    let mut kept = 0u64;

    for device in source.records() {
        let device = device?;
        if criterion.matches(&device) {
            removed += 1;
        } else {
            target.write_one(&device)?;
            kept += 1;
        }
    }

    Ok((removed, kept))
}

fn commit(mut target: RecordFile, temp: &Path, store: &Path, sync: SyncStrategy) -> Result<()> {
    if sync == SyncStrategy::EveryWrite {
        target.sync()?;
    }
    target.close()?;

    fs::rename(temp, store)?;

    if sync == SyncStrategy::EveryWrite {
        sync_parent_dir(store);
    }
    Ok(())
}

fn abandon(target: RecordFile, temp: &Path) {
    if let Err(e) = target.close() {
        tracing::warn!(error = %e, path = %temp.display(), "failed to close rewrite file");
    }
    discard_temp(temp);
}

fn discard_temp(temp: &Path) {
    if let Err(e) = fs::remove_file(temp) {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(error = %e, path = %temp.display(), "failed to delete rewrite file");
        }
    }
}

/// Make the rename durable. Not every platform can open a directory; that
/// case is skipped.
fn sync_parent_dir(store: &Path) {
    let parent = match store.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    if let Ok(dir) = File::open(parent) {
        if let Err(e) = dir.sync_all() {
            tracing::warn!(error = %e, dir = %parent.display(), "failed to sync store directory");
        }
    }
}
