//! Record codec
//!
//! Encoding and decoding of one fixed-size record block.
//!
//! The block is produced by bincode with fixed-width, native-endian integers
//! over a struct of fixed arrays, so bincode emits no length prefixes and the
//! output is exactly [`RECORD_SIZE`] bytes.

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::{DevStoreError, Result};

use super::{Device, DeviceText, RECORD_SIZE, TEXT_FIELD_SIZE};

/// On-disk field layout, in block order
#[derive(Serialize, Deserialize)]
struct RawDevice {
    name: [u8; TEXT_FIELD_SIZE],
    kind: [u8; TEXT_FIELD_SIZE],
    id: u32,
    vendor: u32,
    serial: u32,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_native_endian()
}

// =============================================================================
// Encoding/Decoding
// =============================================================================

/// Encode a device to one record block
pub fn encode(device: &Device) -> Result<[u8; RECORD_SIZE]> {
    let raw = RawDevice {
        name: pack_text(&device.name),
        kind: pack_text(&device.kind),
        id: device.id,
        vendor: device.vendor,
        serial: device.serial,
    };

    let bytes = options()
        .serialize(&raw)
        .map_err(|e| DevStoreError::Codec(e.to_string()))?;

    bytes.as_slice().try_into().map_err(|_| {
        DevStoreError::Codec(format!(
            "encoded record is {} bytes, expected {}",
            bytes.len(),
            RECORD_SIZE
        ))
    })
}

/// Decode one record block
///
/// Bytes after a text field's first NUL are ignored. Text bytes are taken
/// as-is, whatever their encoding.
pub fn decode(block: &[u8; RECORD_SIZE]) -> Result<Device> {
    let raw: RawDevice = options()
        .deserialize(block)
        .map_err(|e| DevStoreError::Codec(e.to_string()))?;

    Ok(Device {
        name: unpack_text(&raw.name, "name")?,
        kind: unpack_text(&raw.kind, "type")?,
        id: raw.id,
        vendor: raw.vendor,
        serial: raw.serial,
    })
}

// =============================================================================
// Private Helpers
// =============================================================================

/// Copy text into a zeroed slot. `DeviceText` guarantees it leaves room for NUL.
fn pack_text(text: &DeviceText) -> [u8; TEXT_FIELD_SIZE] {
    let mut slot = [0u8; TEXT_FIELD_SIZE];
    let bytes = text.as_bytes();
    slot[..bytes.len()].copy_from_slice(bytes);
    slot
}

fn unpack_text(slot: &[u8; TEXT_FIELD_SIZE], field: &str) -> Result<DeviceText> {
    let end = slot.iter().position(|&b| b == 0).ok_or_else(|| {
        DevStoreError::Codec(format!("{} field is not NUL-terminated", field))
    })?;

    DeviceText::new(&slot[..end])
}
