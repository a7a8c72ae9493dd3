//! Text-to-record extraction.
//!
//! Pure functions over command output: identity facts from version text,
//! port records from the interface status table.

mod facts;
mod ports;
pub mod textfsm;

pub use facts::{FactKind, FactRules, extract_fact, extract_facts};
pub use ports::{InterfaceRecord, PortTableError, normalize_port_table};
