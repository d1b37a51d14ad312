//! Line-oriented prompts
//!
//! Each prompt writes its label, reads one line and validates it. The line
//! terminator is stripped; nothing else is trimmed from text input. Text
//! input keeps its raw bytes; every other prompt needs UTF-8 and reports
//! anything else as invalid input.

use std::io::{self, BufRead, Write};

use crate::error::{DevStoreError, Result};
use crate::query::{parse_decimal, parse_hex};
use crate::record::DeviceText;

/// Prompt reader/writer pair
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Bounded text; overflow is rejected, not truncated
    pub fn text(&mut self, label: &str) -> Result<DeviceText> {
        let line = self.raw_line(label)?;
        DeviceText::new(line)
    }

    /// Hex value, `0x` prefix optional
    pub fn hex(&mut self, label: &str) -> Result<u32> {
        let line = self.line(label)?;
        parse_hex(&line)
    }

    pub fn decimal(&mut self, label: &str) -> Result<u32> {
        let line = self.line(label)?;
        parse_decimal(&line)
    }

    /// Menu number in `0..=max`
    pub fn choice(&mut self, label: &str, max: u8) -> Result<u8> {
        let line = self.line(label)?;
        let trimmed = line.trim();

        match trimmed.parse::<u8>() {
            Ok(choice) if choice <= max => Ok(choice),
            _ => Err(DevStoreError::InvalidChoice(format!(
                "'{}' (expected 0-{})",
                trimmed, max
            ))),
        }
    }

    /// Read one UTF-8 line after printing `label`
    ///
    /// End of input is reported as `UnexpectedEof`. A line that is not UTF-8
    /// has still been consumed and is reported as `InvalidText`.
    pub fn line(&mut self, label: &str) -> Result<String> {
        let line = self.raw_line(label)?;
        String::from_utf8(line)
            .map_err(|_| DevStoreError::InvalidText("input is not valid UTF-8".to_string()))
    }

    /// Read one line of raw bytes after printing `label`
    pub fn raw_line(&mut self, label: &str) -> Result<Vec<u8>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Err(DevStoreError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input",
            )));
        }

        if line.ends_with(b"\n") {
            line.pop();
            if line.ends_with(b"\r") {
                line.pop();
            }
        }
        Ok(line)
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// True when `err` means the input stream is exhausted
pub fn is_end_of_input(err: &DevStoreError) -> bool {
    matches!(err, DevStoreError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
}
