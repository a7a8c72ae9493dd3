//! # switch-inventory
//!
//! Batch inventory collection from network switches over SSH.
//!
//! For every device in a roster the collector opens a session, runs the
//! dialect's version and interface status commands, extracts the serial
//! number and model, and emits one row per port. Rows are grouped by device
//! family; families without any row are left out of the result.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, with prompt detection and explicit timeouts
//! - Family tag to dialect mapping (Cisco IOS and Arista EOS built in)
//! - Per-device fault isolation: timeouts, auth failures and malformed output
//!   only skip the device
//! - Optional bounded concurrency with results kept in roster order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use switch_inventory::{
//!     BatchDriver, CollectorConfig, DeviceCollector, DialectRegistry, Inventory, Logger,
//!     SessionConfig, SshConnector,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), switch_inventory::Error> {
//!     let log = Logger::global();
//!     let inventory = Inventory::load("config.json")?;
//!
//!     let connector = SshConnector::new(SessionConfig::default(), log.clone());
//!     let collector = DeviceCollector::new(connector, CollectorConfig::default(), log.clone());
//!     let driver = BatchDriver::new(collector, DialectRegistry::with_builtins(), log);
//!
//!     let result = driver.run(&inventory).await?;
//!     for (family, table) in &result {
//!         println!("{}: {} rows", family, table.rows().len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod collector;
pub mod config;
pub mod dialect;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod parse;
pub mod session;

// Re-export main types for convenience
pub use batch::BatchDriver;
pub use collector::{CollectorConfig, DeviceCollector, DeviceOutcome, SkipReason};
pub use config::{Credentials, Inventory, Roster};
pub use dialect::{Dialect, DialectRegistry};
pub use error::Error;
pub use export::{CsvExportSink, ExportSink};
pub use logging::Logger;
pub use model::{BatchResult, DeviceFacts, FamilyTable, InventoryRow, PortRecord};
pub use session::{CommandOutput, Connector, Session, SessionConfig, SshConnector};
