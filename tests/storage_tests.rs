//! Tests for RecordFile
//!
//! These tests verify:
//! - Open contracts per mode (empty path, missing file, create)
//! - Exactly-one-block reads and writes
//! - End of data vs truncated trailing block
//! - Mode misuse and the records() iterator
//! - Rolling back a failed append

use std::fs;
use std::path::{Path, PathBuf};

use devstore::record::{Device, RECORD_SIZE};
use devstore::storage::{roll_back_append, OpenMode, RecordFile};
use devstore::{DevStoreError, SyncStrategy};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("devices.dat");
    (temp_dir, path)
}

fn device(serial: u32) -> Device {
    Device::try_new(&format!("dev{}", serial), "kind", serial * 2, 0x1, serial).unwrap()
}

fn write_devices(path: &Path, mode: OpenMode, devices: &[Device]) {
    let mut file = RecordFile::open(path, mode, SyncStrategy::EveryWrite).unwrap();
    for d in devices {
        file.write_one(d).unwrap();
    }
    file.close().unwrap();
}

fn read_all(path: &Path) -> Vec<Device> {
    let mut file = RecordFile::open(path, OpenMode::Read, SyncStrategy::OnClose).unwrap();
    let mut devices = Vec::new();
    while let Some(d) = file.read_one().unwrap() {
        devices.push(d);
    }
    file.close().unwrap();
    devices
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_empty_path() {
    let result = RecordFile::open(Path::new(""), OpenMode::Read, SyncStrategy::EveryWrite);
    assert!(matches!(result, Err(DevStoreError::EmptyPath)));
}

#[test]
fn test_open_read_missing_file() {
    let (_temp, path) = setup_temp_file();

    match RecordFile::open(&path, OpenMode::Read, SyncStrategy::EveryWrite) {
        Err(DevStoreError::StoreNotFound(p)) => assert_eq!(p, path),
        Err(e) => panic!("expected StoreNotFound, got {:?}", e),
        Ok(_) => panic!("expected StoreNotFound"),
    }
}

#[test]
fn test_open_append_creates_file() {
    let (_temp, path) = setup_temp_file();

    let file = RecordFile::open(&path, OpenMode::Append, SyncStrategy::EveryWrite).unwrap();
    file.close().unwrap();

    assert!(path.exists());
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_open_in_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no_such_dir").join("devices.dat");

    let result = RecordFile::open(&path, OpenMode::Append, SyncStrategy::EveryWrite);
    assert!(matches!(result, Err(DevStoreError::Io(_))));
}

// =============================================================================
// Read/Write Tests
// =============================================================================

#[test]
fn test_write_then_read_in_order() {
    let (_temp, path) = setup_temp_file();
    let devices = vec![device(1), device(2), device(3)];

    write_devices(&path, OpenMode::WriteTruncate, &devices);

    assert_eq!(fs::metadata(&path).unwrap().len(), 3 * RECORD_SIZE as u64);
    assert_eq!(read_all(&path), devices);
}

#[test]
fn test_read_empty_file_is_end_of_data() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, b"").unwrap();

    let mut file = RecordFile::open(&path, OpenMode::Read, SyncStrategy::EveryWrite).unwrap();
    assert!(file.read_one().unwrap().is_none());
    // Still at end of data
    assert!(file.read_one().unwrap().is_none());
}

#[test]
fn test_append_keeps_existing_records() {
    let (_temp, path) = setup_temp_file();

    write_devices(&path, OpenMode::Append, &[device(1)]);
    write_devices(&path, OpenMode::Append, &[device(2)]);

    assert_eq!(read_all(&path), vec![device(1), device(2)]);
}

#[test]
fn test_write_truncate_discards_existing_records() {
    let (_temp, path) = setup_temp_file();

    write_devices(&path, OpenMode::Append, &[device(1), device(2)]);
    write_devices(&path, OpenMode::WriteTruncate, &[device(9)]);

    assert_eq!(read_all(&path), vec![device(9)]);
}

#[test]
fn test_on_close_strategy_persists_after_close() {
    let (_temp, path) = setup_temp_file();

    let mut file = RecordFile::open(&path, OpenMode::Append, SyncStrategy::OnClose).unwrap();
    file.write_one(&device(5)).unwrap();
    file.close().unwrap();

    assert_eq!(read_all(&path), vec![device(5)]);
}

#[test]
fn test_counters() {
    let (_temp, path) = setup_temp_file();

    let mut writer = RecordFile::open(&path, OpenMode::Append, SyncStrategy::EveryWrite).unwrap();
    writer.write_one(&device(1)).unwrap();
    writer.write_one(&device(2)).unwrap();
    assert_eq!(writer.records_written(), 2);
    assert_eq!(writer.mode(), OpenMode::Append);
    assert_eq!(writer.path(), path.as_path());
    writer.close().unwrap();

    let mut reader = RecordFile::open(&path, OpenMode::Read, SyncStrategy::EveryWrite).unwrap();
    reader.read_one().unwrap();
    assert_eq!(reader.records_read(), 1);
}

// =============================================================================
// Truncation Tests
// =============================================================================

#[test]
fn test_truncated_trailing_block() {
    let (_temp, path) = setup_temp_file();
    write_devices(&path, OpenMode::WriteTruncate, &[device(1), device(2)]);

    let mut bytes = fs::read(&path).unwrap();
    bytes.truncate(RECORD_SIZE + 10);
    fs::write(&path, &bytes).unwrap();

    let mut file = RecordFile::open(&path, OpenMode::Read, SyncStrategy::EveryWrite).unwrap();
    assert_eq!(file.read_one().unwrap(), Some(device(1)));

    match file.read_one() {
        Err(DevStoreError::TruncatedRecord { offset, len }) => {
            assert_eq!(offset, RECORD_SIZE as u64);
            assert_eq!(len, 10);
        }
        other => panic!("expected TruncatedRecord, got {:?}", other),
    }
}

#[test]
fn test_records_iterator_stops_after_error() {
    let (_temp, path) = setup_temp_file();
    write_devices(&path, OpenMode::WriteTruncate, &[device(1)]);

    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(&[0u8; 5]);
    fs::write(&path, &bytes).unwrap();

    let mut file = RecordFile::open(&path, OpenMode::Read, SyncStrategy::EveryWrite).unwrap();
    let items: Vec<_> = file.records().collect();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), &device(1));
    assert!(matches!(
        items[1],
        Err(DevStoreError::TruncatedRecord { len: 5, .. })
    ));
}

// =============================================================================
// Rollback Tests
// =============================================================================

#[test]
fn test_roll_back_append_cuts_file_to_original_length() {
    let (_temp, path) = setup_temp_file();
    write_devices(&path, OpenMode::Append, &[device(1), device(2)]);
    let original = fs::read(&path).unwrap();

    // A second block plus a partial one, as left by an interrupted append
    let mut grown = original.clone();
    grown.extend_from_slice(&[0xAB; RECORD_SIZE + 10]);
    fs::write(&path, &grown).unwrap();

    roll_back_append(&path, Some(original.len() as u64)).unwrap();

    assert_eq!(fs::read(&path).unwrap(), original);
    assert_eq!(read_all(&path), vec![device(1), device(2)]);
}

#[test]
fn test_roll_back_append_deletes_created_file() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, &[0u8; 10]).unwrap();

    roll_back_append(&path, None).unwrap();
    assert!(!path.exists());

    // Nothing to delete is not an error
    roll_back_append(&path, None).unwrap();
}

#[test]
fn test_roll_back_append_missing_file() {
    let (_temp, path) = setup_temp_file();

    let result = roll_back_append(&path, Some(0));
    assert!(matches!(result, Err(DevStoreError::Io(_))));
}

// =============================================================================
// Mode Misuse Tests
// =============================================================================

#[test]
fn test_write_on_read_handle() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, b"").unwrap();

    let mut file = RecordFile::open(&path, OpenMode::Read, SyncStrategy::EveryWrite).unwrap();
    assert!(matches!(
        file.write_one(&device(1)),
        Err(DevStoreError::WrongMode { operation: "write", mode: OpenMode::Read })
    ));
}

#[test]
fn test_read_on_write_handle() {
    let (_temp, path) = setup_temp_file();

    let mut file = RecordFile::open(&path, OpenMode::Append, SyncStrategy::EveryWrite).unwrap();
    assert!(matches!(
        file.read_one(),
        Err(DevStoreError::WrongMode { operation: "read", mode: OpenMode::Append })
    ));
}
