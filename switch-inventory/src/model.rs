//! Inventory records and per-family result tables.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::Credentials;

/// Placeholder used when a fact cannot be extracted from device output.
pub const NO_DATA: &str = "No data";

/// Header row of every exported family table.
pub const HEADER: [&str; 5] = ["Host", "SerialNumber", "Model", "Port", "PortStatus"];

/// One device to collect from.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    /// Family tag: output grouping key and dialect selector.
    pub family: String,

    /// Management address or hostname.
    pub host: String,

    /// Credentials shared by the whole batch.
    pub credentials: Arc<Credentials>,
}

impl DeviceDescriptor {
    pub fn new(
        family: impl Into<String>,
        host: impl Into<String>,
        credentials: Arc<Credentials>,
    ) -> Self {
        Self {
            family: family.into(),
            host: host.into(),
            credentials,
        }
    }
}

/// Identity facts read from the version command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFacts {
    pub serial_number: String,
    pub model: String,
}

impl DeviceFacts {
    /// Facts with both fields set to [`NO_DATA`].
    pub fn unknown() -> Self {
        Self {
            serial_number: NO_DATA.to_string(),
            model: NO_DATA.to_string(),
        }
    }
}

/// A single interface as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub port_name: String,
    pub status: String,
}

impl PortRecord {
    pub fn new(port_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            status: status.into(),
        }
    }
}

/// Device facts joined with one port: the unit of export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    pub host: String,
    pub serial_number: String,
    pub model: String,
    pub port_name: String,
    pub status: String,
}

impl InventoryRow {
    /// Build one row per port, preserving port order.
    pub fn for_ports(host: &str, facts: &DeviceFacts, ports: Vec<PortRecord>) -> Vec<Self> {
        ports
            .into_iter()
            .map(|port| Self {
                host: host.to_string(),
                serial_number: facts.serial_number.clone(),
                model: facts.model.clone(),
                port_name: port.port_name,
                status: port.status,
            })
            .collect()
    }

    /// Fields in export order.
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.host,
            &self.serial_number,
            &self.model,
            &self.port_name,
            &self.status,
        ]
    }
}

/// Rows collected for one family, header first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyTable {
    rows: Vec<InventoryRow>,
}

impl FamilyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows after the existing ones.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = InventoryRow>) {
        self.rows.extend(rows);
    }

    /// The fixed header row.
    pub fn header(&self) -> [&'static str; 5] {
        HEADER
    }

    /// Data rows, without the header.
    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    /// Whether any device contributed a row.
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// All records as strings, header first.
    pub fn records(&self) -> Vec<Vec<String>> {
        std::iter::once(HEADER.map(str::to_string).to_vec())
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.fields().map(str::to_string).to_vec()),
            )
            .collect()
    }
}

/// Family tag to table, only for families that produced data.
pub type BatchResult = IndexMap<String, FamilyTable>;
