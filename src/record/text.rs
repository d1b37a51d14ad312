//! Bounded text
//!
//! Text fields are stored in a 32-byte slot with a mandatory NUL terminator,
//! which leaves 31 bytes of content. Content is raw bytes: stores written by
//! other tools may hold any encoding, and matching is byte-for-byte.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::{DevStoreError, Result};

use super::TEXT_FIELD_SIZE;

/// Maximum content length of a text field, in bytes
pub const MAX_TEXT_LEN: usize = TEXT_FIELD_SIZE - 1;

/// Text that fits a record text field.
///
/// Construction rejects overflow instead of truncating, and rejects interior
/// NUL bytes since NUL terminates the field on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceText(Vec<u8>);

impl DeviceText {
    pub fn new(text: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = text.into();

        if bytes.len() > MAX_TEXT_LEN {
            return Err(DevStoreError::TextTooLong {
                len: bytes.len(),
                max: MAX_TEXT_LEN,
            });
        }
        if bytes.contains(&0) {
            return Err(DevStoreError::InvalidText(
                "text must not contain NUL bytes".to_string(),
            ));
        }

        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The text as UTF-8, with invalid sequences replaced
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for DeviceText {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for DeviceText {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for DeviceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl FromStr for DeviceText {
    type Err = DevStoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for DeviceText {
    type Error = DevStoreError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for DeviceText {
    type Error = DevStoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<&[u8]> for DeviceText {
    type Error = DevStoreError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes)
    }
}
