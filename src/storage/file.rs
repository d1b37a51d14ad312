//! Record file handle
//!
//! Opens the store (or a rewrite target) and moves single record blocks in
//! and out of it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{DevStoreError, Result};
use crate::record::{self, Device, RECORD_SIZE};

use super::OpenMode;

/// An open record file.
///
/// Dropping the handle releases the OS file on every path; `close()` is the
/// way to observe flush and sync failures.
pub struct RecordFile {
    /// Path the handle was opened with
    path: PathBuf,
    /// Mode the handle was opened with
    mode: OpenMode,
    /// When written blocks are synced
    sync: SyncStrategy,
    /// Buffered reader or writer, depending on mode
    inner: Inner,
    /// Complete blocks read so far (also the block index of the next read)
    records_read: u64,
    /// Complete blocks written so far
    records_written: u64,
}

enum Inner {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
}

impl RecordFile {
    /// Open a record file
    ///
    /// Fails with `EmptyPath` for an empty path and `StoreNotFound` when a
    /// file opened for reading does not exist.
    pub fn open(path: &Path, mode: OpenMode, sync: SyncStrategy) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(DevStoreError::EmptyPath);
        }

        let inner = match mode {
            OpenMode::Read => {
                let file = File::open(path).map_err(|e| match e.kind() {
                    ErrorKind::NotFound => DevStoreError::StoreNotFound(path.to_path_buf()),
                    _ => DevStoreError::Io(e),
                })?;
                Inner::Reader(BufReader::new(file))
            }
            OpenMode::WriteTruncate => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)?;
                Inner::Writer(BufWriter::new(file))
            }
            OpenMode::Append => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Inner::Writer(BufWriter::new(file))
            }
        };

        tracing::debug!(path = %path.display(), %mode, "opened record file");

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            sync,
            inner,
            records_read: 0,
            records_written: 0,
        })
    }

    /// Read the next record
    ///
    /// Returns:
    /// - `Ok(Some(device))` — one complete block decoded
    /// - `Ok(None)` — end of data at a block boundary
    /// - `Err(TruncatedRecord)` — the file ends inside a block
    pub fn read_one(&mut self) -> Result<Option<Device>> {
        let reader = match &mut self.inner {
            Inner::Reader(reader) => reader,
            Inner::Writer(_) => {
                return Err(DevStoreError::WrongMode {
                    operation: "read",
                    mode: self.mode,
                })
            }
        };

        let mut block = [0u8; RECORD_SIZE];
        let filled = read_block(reader, &mut block)?;

        match filled {
            0 => Ok(None),
            RECORD_SIZE => {
                let device = record::decode(&block)?;
                self.records_read += 1;
                Ok(Some(device))
            }
            len => Err(DevStoreError::TruncatedRecord {
                offset: self.records_read * RECORD_SIZE as u64,
                len,
            }),
        }
    }

    /// Write one record block
    pub fn write_one(&mut self, device: &Device) -> Result<()> {
        let writer = match &mut self.inner {
            Inner::Writer(writer) => writer,
            Inner::Reader(_) => {
                return Err(DevStoreError::WrongMode {
                    operation: "write",
                    mode: self.mode,
                })
            }
        };

        let block = record::encode(device)?;
        writer.write_all(&block).map_err(|e| match e.kind() {
            ErrorKind::WriteZero => DevStoreError::ShortWrite,
            _ => DevStoreError::Io(e),
        })?;

        if self.sync == SyncStrategy::EveryWrite {
            writer.flush()?;
            writer.get_ref().sync_data()?;
        }

        self.records_written += 1;
        Ok(())
    }

    /// Flush buffered blocks and force them to disk, regardless of strategy
    pub fn sync(&mut self) -> Result<()> {
        if let Inner::Writer(writer) = &mut self.inner {
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        Ok(())
    }

    /// Close the file, surfacing flush and sync errors
    pub fn close(self) -> Result<()> {
        let Self {
            path,
            mode,
            sync,
            inner,
            records_read,
            records_written,
        } = self;

        if let Inner::Writer(writer) = inner {
            let file = writer
                .into_inner()
                .map_err(|e| DevStoreError::Io(e.into_error()))?;
            if sync == SyncStrategy::EveryWrite {
                file.sync_all()?;
            }
        }

        tracing::debug!(
            path = %path.display(),
            %mode,
            records_read,
            records_written,
            "closed record file"
        );
        Ok(())
    }

    /// Iterate over the remaining records
    pub fn records(&mut self) -> Records<'_> {
        Records {
            file: self,
            done: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Complete blocks read so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Complete blocks written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

/// Iterator over the records of a `RecordFile`, in on-disk order.
///
/// Yields at most one error, then stops.
pub struct Records<'a> {
    file: &'a mut RecordFile,
    done: bool,
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Device>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.file.read_one() {
            Ok(Some(device)) => Some(Ok(device)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Undo a failed append to `path`
///
/// `original_len` is the file length before the append, or `None` if the
/// append created the file. The file is cut back to that length, or deleted.
pub fn roll_back_append(path: &Path, original_len: Option<u64>) -> Result<()> {
    match original_len {
        Some(len) => {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(len)?;
            file.sync_all()?;
        }
        None => match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        },
    }

    tracing::debug!(path = %path.display(), ?original_len, "rolled back append");
    Ok(())
}

/// Fill `block` as far as the file allows. Returns the number of bytes read.
fn read_block(reader: &mut impl Read, block: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        match reader.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
