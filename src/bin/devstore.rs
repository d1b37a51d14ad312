//! devstore binary
//!
//! Interactive device record manager, plus one-shot subcommands for scripts.

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use devstore::menu::Menu;
use devstore::query::{parse_hex, Criterion, Field};
use devstore::{Config, DevStoreError, Device, DeviceStore, RemoveOutcome, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// devstore
#[derive(Parser, Debug)]
#[command(name = "devstore")]
#[command(about = "Device record manager over a flat binary file")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = "devices.dat")]
    file: PathBuf,

    /// Accept serial as a removal criterion
    #[arg(long)]
    allow_serial_removal: bool,

    /// Flush on close only, without fsync
    #[arg(long)]
    no_sync: bool,

    /// Run one command instead of the interactive menu
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a device
    Add {
        /// Device name (max 31 bytes)
        #[arg(long)]
        name: String,

        /// Device type (max 31 bytes)
        #[arg(long = "type")]
        kind: String,

        /// Device id, hex
        #[arg(long, value_parser = parse_hex)]
        id: u32,

        /// Vendor id, hex
        #[arg(long, value_parser = parse_hex)]
        vendor: u32,

        /// Serial number, decimal, unique
        #[arg(long)]
        serial: u32,
    },

    /// List all devices
    List,

    /// Search devices by field
    Search {
        /// name, type, id, vendor or serial
        field: Field,

        /// Value to match (hex for id and vendor)
        value: String,
    },

    /// Remove devices by field
    Remove {
        /// name, type, id or vendor (serial needs --allow-serial-removal)
        field: Field,

        /// Value to match (hex for id and vendor)
        value: String,
    },

    /// Check the store file for corruption and duplicate serials
    Verify,
}

fn main() {
    // Logs go to stderr so they never mix with menu output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,devstore=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("devstore v{}", devstore::VERSION);

    let sync_strategy = if args.no_sync {
        SyncStrategy::OnClose
    } else {
        SyncStrategy::EveryWrite
    };

    let config = Config::builder()
        .store_path(&args.file)
        .sync_strategy(sync_strategy)
        .allow_serial_removal(args.allow_serial_removal)
        .build();

    let store = match DeviceStore::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        // Interactive mode always exits 0; failures were reported in the loop
        None => {
            let stdin = io::stdin();
            let mut menu = Menu::new(stdin.lock(), io::stdout());
            if let Err(e) = menu.run(&store) {
                tracing::error!("Menu stopped: {}", e);
            }
        }
        Some(command) => match run_command(&store, command) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Returns `Ok(false)` when the command ran but found problems
fn run_command(store: &DeviceStore, command: Commands) -> devstore::Result<bool> {
    match command {
        Commands::Add {
            name,
            kind,
            id,
            vendor,
            serial,
        } => {
            store.add(Device::try_new(&name, &kind, id, vendor, serial)?)?;
            println!("Device added");
        }

        Commands::List => {
            let devices = not_found_as_empty(store.list())?;
            print_devices(&devices, "No devices found");
        }

        Commands::Search { field, value } => {
            let criterion = Criterion::parse(field, &value)?;
            let matches = not_found_as_empty(store.search(&criterion))?;
            print_devices(&matches, "No matching device found");
        }

        Commands::Remove { field, value } => {
            let criterion = Criterion::parse(field, &value)?;
            let outcome = match store.remove(&criterion) {
                Err(DevStoreError::StoreNotFound(_)) => RemoveOutcome::NoMatch,
                other => other?,
            };
            match outcome {
                RemoveOutcome::Removed { removed, .. } => println!("Removed {} device(s)", removed),
                RemoveOutcome::NoMatch => println!("No match found to remove"),
            }
        }

        Commands::Verify => {
            let report = store.verify()?;
            println!("Store:            {}", store.path().display());
            println!("Size:             {} bytes", report.file_size);
            println!("Records:          {}", report.records);
            println!("Corrupt records:  {}", report.corrupt_records);
            println!("Trailing bytes:   {}", report.trailing_bytes);
            println!("Duplicate serials: {:?}", report.duplicate_serials);
            println!("CRC32:            {:08x}", report.checksum);
            for error in &report.errors {
                println!("  {}", error);
            }

            if report.is_ok() {
                println!("✓ Store verification passed");
            } else {
                println!("✗ Store verification failed");
                return Ok(false);
            }
        }
    }

    Ok(true)
}

/// A store that was never created holds no devices
fn not_found_as_empty(result: devstore::Result<Vec<Device>>) -> devstore::Result<Vec<Device>> {
    match result {
        Err(DevStoreError::StoreNotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

fn print_devices(devices: &[Device], empty_message: &str) {
    if devices.is_empty() {
        println!("{}", empty_message);
        return;
    }

    println!("{}", Device::HEADER);
    for device in devices {
        println!("{}", device);
    }
}
