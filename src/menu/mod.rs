//! Menu Module
//!
//! The interactive front end: numbered menus, field prompts and
//! user-facing reporting over any `BufRead`/`Write` pair.
//!
//! ## Menus
//! ```text
//! Main                       Field
//! ──────────────────         ──────────────────
//! 1. Add device              1. Name
//! 2. List devices            2. Type
//! 3. Search device           3. Id
//! 4. Remove device           4. Vendor
//! 0. Exit                    5. Serial   (search; remove only if enabled)
//!                            0. Back to main menu
//! ```
//!
//! Every failure inside one operation is reported and the loop continues.
//! Only end of input or a failure to write output ends the loop.

mod prompt;

use std::io::{BufRead, Write};

use crate::error::{DevStoreError, Result};
use crate::query::{Criterion, Field, RemoveOutcome};
use crate::record::Device;
use crate::store::DeviceStore;

pub use prompt::{is_end_of_input, Prompt};

const RULE: &str = "-----------------------------";

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    Exit,
    Add,
    List,
    Search,
    Remove,
}

impl TryFrom<u8> for MainAction {
    type Error = DevStoreError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MainAction::Exit),
            1 => Ok(MainAction::Add),
            2 => Ok(MainAction::List),
            3 => Ok(MainAction::Search),
            4 => Ok(MainAction::Remove),
            other => Err(DevStoreError::InvalidChoice(other.to_string())),
        }
    }
}

/// Field menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChoice {
    Back,
    Name,
    Type,
    Id,
    Vendor,
    Serial,
}

impl FieldChoice {
    /// The selected field, or `None` for Back
    pub fn field(self) -> Option<Field> {
        match self {
            FieldChoice::Back => None,
            FieldChoice::Name => Some(Field::Name),
            FieldChoice::Type => Some(Field::Type),
            FieldChoice::Id => Some(Field::Id),
            FieldChoice::Vendor => Some(Field::Vendor),
            FieldChoice::Serial => Some(Field::Serial),
        }
    }
}

impl TryFrom<u8> for FieldChoice {
    type Error = DevStoreError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(FieldChoice::Back),
            1 => Ok(FieldChoice::Name),
            2 => Ok(FieldChoice::Type),
            3 => Ok(FieldChoice::Id),
            4 => Ok(FieldChoice::Vendor),
            5 => Ok(FieldChoice::Serial),
            other => Err(DevStoreError::InvalidChoice(other.to_string())),
        }
    }
}

/// Interactive menu loop
pub struct Menu<R, W> {
    prompt: Prompt<R, W>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            prompt: Prompt::new(input, output),
        }
    }

    /// Run until Exit or end of input
    pub fn run(&mut self, store: &DeviceStore) -> Result<()> {
        write!(self.out(), "Device Management System")?;

        loop {
            let action = match self.select_main_action() {
                Ok(action) => action,
                Err(e) if is_end_of_input(&e) => break,
                Err(e) if e.is_input_error() => {
                    writeln!(self.out(), "Invalid choice!")?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let result = match action {
                MainAction::Exit => {
                    writeln!(self.out(), "Exiting...")?;
                    break;
                }
                MainAction::Add => self.add(store),
                MainAction::List => self.list(store),
                MainAction::Search => self.search(store),
                MainAction::Remove => self.remove(store),
            };

            if let Err(e) = result {
                if is_end_of_input(&e) {
                    break;
                }
                self.report(&e)?;
            }
        }

        Ok(())
    }

    pub fn select_main_action(&mut self) -> Result<MainAction> {
        let out = self.out();
        writeln!(out, "\nMenu")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "1. Add device")?;
        writeln!(out, "2. List devices")?;
        writeln!(out, "3. Search device")?;
        writeln!(out, "4. Remove device")?;
        writeln!(out, "0. Exit")?;

        let choice = self.prompt.choice("Enter choice: ", 4)?;
        MainAction::try_from(choice)
    }

    /// Field menu; Serial is listed only when `with_serial` is set
    pub fn select_field_criterion(&mut self, with_serial: bool) -> Result<FieldChoice> {
        let out = self.out();
        writeln!(out, "1. Name")?;
        writeln!(out, "2. Type")?;
        writeln!(out, "3. Id")?;
        writeln!(out, "4. Vendor")?;
        if with_serial {
            writeln!(out, "5. Serial")?;
        }
        writeln!(out, "0. Back to main menu")?;

        let max = if with_serial { 5 } else { 4 };
        let choice = self.prompt.choice("Enter choice: ", max)?;
        FieldChoice::try_from(choice)
    }

    pub fn into_inner(self) -> (R, W) {
        self.prompt.into_inner()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    fn add(&mut self, store: &DeviceStore) -> Result<()> {
        writeln!(self.out(), "\nAdd device\n{}", RULE)?;

        let name = self.prompt.text("Enter the device name : ")?;
        let kind = self.prompt.text("Enter the device type : ")?;
        let id = self.prompt.hex("Enter the device Id : ")?;
        let vendor = self.prompt.hex("Enter the device vendor : ")?;
        let serial = self.prompt.decimal("Enter the device Serial : ")?;

        store.add(Device::new(name, kind, id, vendor, serial))?;
        writeln!(self.out(), "Device added")?;
        Ok(())
    }

    fn list(&mut self, store: &DeviceStore) -> Result<()> {
        let devices = store.list()?;

        writeln!(self.out(), "\nList devices\n{}", RULE)?;
        if devices.is_empty() {
            writeln!(self.out(), "No devices found")?;
            return Ok(());
        }
        self.print_devices(&devices)
    }

    fn search(&mut self, store: &DeviceStore) -> Result<()> {
        writeln!(self.out(), "\nSearch device\n{}", RULE)?;
        writeln!(self.out(), "Select the search criteria:")?;

        let Some(criterion) = self.read_criterion(true)? else {
            return Ok(());
        };

        let matches = store.search(&criterion)?;
        if matches.is_empty() {
            writeln!(self.out(), "No matching device found")?;
            return Ok(());
        }
        self.print_devices(&matches)
    }

    fn remove(&mut self, store: &DeviceStore) -> Result<()> {
        writeln!(self.out(), "\nRemove device\n{}", RULE)?;
        writeln!(self.out(), "Select the removal criteria:")?;

        let with_serial = store.config().allow_serial_removal;
        let Some(criterion) = self.read_criterion(with_serial)? else {
            return Ok(());
        };

        match store.remove(&criterion)? {
            RemoveOutcome::Removed { removed, .. } => {
                writeln!(self.out(), "Removed {} device(s)", removed)?;
            }
            RemoveOutcome::NoMatch => {
                writeln!(self.out(), "No match found to remove")?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// `None` when the user picks Back
    fn read_criterion(&mut self, with_serial: bool) -> Result<Option<Criterion>> {
        let Some(field) = self.select_field_criterion(with_serial)?.field() else {
            return Ok(None);
        };

        let criterion = match field {
            Field::Name => Criterion::Name(self.prompt.text("Enter Name: ")?),
            Field::Type => Criterion::Type(self.prompt.text("Enter Type: ")?),
            Field::Id => Criterion::Id(self.prompt.hex("Enter Id: ")?),
            Field::Vendor => Criterion::Vendor(self.prompt.hex("Enter Vendor: ")?),
            Field::Serial => Criterion::Serial(self.prompt.decimal("Enter Serial: ")?),
        };
        Ok(Some(criterion))
    }

    fn print_devices(&mut self, devices: &[Device]) -> Result<()> {
        let out = self.out();
        writeln!(out, "{}", Device::HEADER)?;
        for device in devices {
            writeln!(out, "{}", device)?;
        }
        Ok(())
    }

    fn report(&mut self, err: &DevStoreError) -> Result<()> {
        let message = match err {
            DevStoreError::SerialInUse(_) => "Serial number already in use".to_string(),
            DevStoreError::StoreNotFound(_) => "No devices found".to_string(),
            e if e.is_input_error() => format!("Invalid input: {}", e),
            e => {
                tracing::warn!(error = %e, "operation failed");
                format!("Error: {}", e)
            }
        };
        writeln!(self.out(), "{}", message)?;
        Ok(())
    }

    fn out(&mut self) -> &mut W {
        self.prompt.output()
    }
}
