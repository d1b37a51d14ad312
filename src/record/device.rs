//! Device record definition

use std::fmt;

use crate::error::Result;

use super::DeviceText;

/// A single device record.
///
/// Immutable once stored: there is no update, only add and remove.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    pub name: DeviceText,

    /// The device type (`type` is reserved)
    pub kind: DeviceText,

    /// Entered in hex, not required to be unique
    pub id: u32,

    /// Entered in hex, not required to be unique
    pub vendor: u32,

    /// Entered in decimal, unique across the store
    pub serial: u32,
}

impl Device {
    /// Column header matching the `Display` row layout
    pub const HEADER: &'static str = "Name\t\tType\t\tId\t\tVendor\t\tSerial";

    pub fn new(name: DeviceText, kind: DeviceText, id: u32, vendor: u32, serial: u32) -> Self {
        Self {
            name,
            kind,
            id,
            vendor,
            serial,
        }
    }

    /// Build a record from raw strings, validating both text fields
    pub fn try_new(name: &str, kind: &str, id: u32, vendor: u32, serial: u32) -> Result<Self> {
        Ok(Self::new(
            DeviceText::new(name)?,
            DeviceText::new(kind)?,
            id,
            vendor,
            serial,
        ))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t\t{}\t\t0x{:X}\t\t0x{:X}\t\t{}",
            self.name, self.kind, self.id, self.vendor, self.serial
        )
    }
}
