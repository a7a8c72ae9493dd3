//! Interface status table to port records.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::PortRecord;
use crate::session::CommandOutput;

/// One parsed row of an interface status table, keyed by lowercase field.
pub type InterfaceRecord = HashMap<String, String>;

const PORT_FIELD: &str = "port";
const STATUS_FIELD: &str = "status";

/// Why an interface table could not be normalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortTableError {
    /// The device output was not parsed into records
    #[error("interface output is unstructured text")]
    Unstructured,

    /// A record lacks a required field
    #[error("interface record {index} has no '{field}' field")]
    MissingField { index: usize, field: &'static str },
}

/// Turn interface records into port records, in reported order.
///
/// Every record is kept, down and disabled ports included. The table is
/// all-or-nothing: one malformed record rejects the whole response.
pub fn normalize_port_table(output: &CommandOutput) -> Result<Vec<PortRecord>, PortTableError> {
    let records = match output {
        CommandOutput::Records(records) => records,
        CommandOutput::Text(_) => return Err(PortTableError::Unstructured),
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let field = |field: &'static str| {
                record
                    .get(field)
                    .ok_or(PortTableError::MissingField { index, field })
            };
            Ok(PortRecord::new(field(PORT_FIELD)?, field(STATUS_FIELD)?))
        })
        .collect()
}
