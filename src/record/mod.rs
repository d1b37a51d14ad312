//! Record Module
//!
//! The device record and its fixed-width on-disk encoding.
//!
//! ## Responsibilities
//! - Bounded text fields that reject overflow
//! - Encode/decode exactly one record block, bit-exact
//! - No framing, no versioning: the block size is the format
//!
//! ## Block Format (76 bytes, native endian)
//! ```text
//! ┌──────────────┬──────────────┬─────────┬─────────┬─────────┐
//! │ Name (32)    │ Type (32)    │ Id (4)  │Vendor(4)│Serial(4)│
//! │ NUL-padded   │ NUL-padded   │  u32    │  u32    │  u32    │
//! └──────────────┴──────────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! A store file is these blocks back to back. A file whose length is not a
//! multiple of [`RECORD_SIZE`] is corrupt from the first partial block on.

mod codec;
mod device;
mod text;

pub use codec::{decode, encode};
pub use device::Device;
pub use text::{DeviceText, MAX_TEXT_LEN};

// =============================================================================
// Shared Constants
// =============================================================================

/// Width of each text field, terminator included
pub const TEXT_FIELD_SIZE: usize = 32;

/// Width of each integer field
pub const INT_FIELD_SIZE: usize = std::mem::size_of::<u32>();

/// Block size: Name (32) + Type (32) + Id (4) + Vendor (4) + Serial (4) = 76 bytes
pub const RECORD_SIZE: usize = 2 * TEXT_FIELD_SIZE + 3 * INT_FIELD_SIZE;
