//! Field selectors and match criteria

use std::fmt;
use std::str::FromStr;

use crate::error::{DevStoreError, Result};
use crate::record::{Device, DeviceText};

/// A record field that can be searched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Type,
    Id,
    Vendor,
    Serial,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Type,
        Field::Id,
        Field::Vendor,
        Field::Serial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Type => "type",
            Field::Id => "id",
            Field::Vendor => "vendor",
            Field::Serial => "serial",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = DevStoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "type" | "kind" => Ok(Field::Type),
            "id" => Ok(Field::Id),
            "vendor" => Ok(Field::Vendor),
            "serial" => Ok(Field::Serial),
            other => Err(DevStoreError::InvalidChoice(format!(
                "unknown field '{}' (expected name, type, id, vendor or serial)",
                other
            ))),
        }
    }
}

/// A field selector together with the value it must equal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Name(DeviceText),
    Type(DeviceText),
    Id(u32),
    Vendor(u32),
    Serial(u32),
}

impl Criterion {
    /// Parse a raw value for `field`: text as-is, id and vendor as hex,
    /// serial as decimal.
    pub fn parse(field: Field, raw: &str) -> Result<Self> {
        Ok(match field {
            Field::Name => Criterion::Name(DeviceText::new(raw)?),
            Field::Type => Criterion::Type(DeviceText::new(raw)?),
            Field::Id => Criterion::Id(parse_hex(raw)?),
            Field::Vendor => Criterion::Vendor(parse_hex(raw)?),
            Field::Serial => Criterion::Serial(parse_decimal(raw)?),
        })
    }

    pub fn field(&self) -> Field {
        match self {
            Criterion::Name(_) => Field::Name,
            Criterion::Type(_) => Field::Type,
            Criterion::Id(_) => Field::Id,
            Criterion::Vendor(_) => Field::Vendor,
            Criterion::Serial(_) => Field::Serial,
        }
    }

    /// Exact equality on the selected field (byte-for-byte for text)
    pub fn matches(&self, device: &Device) -> bool {
        match self {
            Criterion::Name(name) => device.name.as_bytes() == name.as_bytes(),
            Criterion::Type(kind) => device.kind.as_bytes() == kind.as_bytes(),
            Criterion::Id(id) => device.id == *id,
            Criterion::Vendor(vendor) => device.vendor == *vendor,
            Criterion::Serial(serial) => device.serial == *serial,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Name(text) | Criterion::Type(text) => {
                write!(f, "{} = \"{}\"", self.field(), text)
            }
            Criterion::Id(value) | Criterion::Vendor(value) => {
                write!(f, "{} = 0x{:X}", self.field(), value)
            }
            Criterion::Serial(value) => write!(f, "{} = {}", self.field(), value),
        }
    }
}

// =============================================================================
// Numeric Input
// =============================================================================

/// Parse a hex value, with or without a `0x` prefix
pub fn parse_hex(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(DevStoreError::InvalidNumber(format!(
            "'{}' is not a hex value",
            raw.trim_end()
        )));
    }

    u32::from_str_radix(digits, 16).map_err(|e| {
        DevStoreError::InvalidNumber(format!("'{}' is not a hex value: {}", trimmed, e))
    })
}

/// Parse an unsigned decimal value
pub fn parse_decimal(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    trimmed.parse::<u32>().map_err(|e| {
        DevStoreError::InvalidNumber(format!("'{}' is not a decimal value: {}", trimmed, e))
    })
}
