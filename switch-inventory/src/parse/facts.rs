//! Serial number and model extraction from version output.
//!
//! Both rules scan every line and keep the value from the *last* matching
//! line, so a later line overrides an earlier one.

use std::fmt;

use crate::logging::Logger;
use crate::model::{DeviceFacts, NO_DATA};

/// Which fact to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactKind {
    Serial,
    Model,
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactKind::Serial => f.write_str("serial"),
            FactKind::Model => f.write_str("model"),
        }
    }
}

/// Marker phrases for recognizing fact lines.
///
/// - serial: a line containing any serial marker (case-sensitive); the value
///   is the line's last whitespace-delimited token.
/// - model: a line containing the vendor marker and any hardware marker
///   (both case-insensitive); the value is the line's second token, and lines
///   with fewer than two tokens are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRules {
    serial_markers: Vec<String>,
    vendor_marker: String,
    hardware_markers: Vec<String>,
}

impl FactRules {
    /// Rules from serial markers, a vendor marker and hardware markers.
    pub fn new(
        serial_markers: impl IntoIterator<Item = impl Into<String>>,
        vendor_marker: impl Into<String>,
        hardware_markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            serial_markers: serial_markers.into_iter().map(Into::into).collect(),
            vendor_marker: vendor_marker.into().to_lowercase(),
            hardware_markers: hardware_markers
                .into_iter()
                .map(|m| m.into().to_lowercase())
                .collect(),
        }
    }

    /// Extract a fact, or `None` when no line matches.
    pub fn extract<'a>(&self, text: &'a str, kind: FactKind) -> Option<&'a str> {
        match kind {
            FactKind::Serial => text
                .lines()
                .filter(|line| self.is_serial_line(line))
                .filter_map(|line| line.split_whitespace().last())
                .last(),
            FactKind::Model => text
                .lines()
                .filter(|line| self.is_model_line(line))
                .filter_map(|line| line.split_whitespace().nth(1))
                .last(),
        }
    }

    fn is_serial_line(&self, line: &str) -> bool {
        self.serial_markers
            .iter()
            .any(|marker| line.contains(marker.as_str()))
    }

    fn is_model_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        lower.contains(&self.vendor_marker)
            && self
                .hardware_markers
                .iter()
                .any(|marker| lower.contains(marker.as_str()))
    }
}

impl Default for FactRules {
    /// Cisco `show version` markers.
    fn default() -> Self {
        Self::new(
            ["System Serial Number", "System serial"],
            "cisco",
            ["processor", "chassis"],
        )
    }
}

/// Extract a fact with the default rules, substituting [`NO_DATA`].
pub fn extract_fact(text: &str, kind: FactKind) -> String {
    FactRules::default()
        .extract(text, kind)
        .unwrap_or(NO_DATA)
        .to_string()
}

/// Extract serial and model independently, logging each outcome.
pub fn extract_facts(text: &str, rules: &FactRules, log: &Logger) -> DeviceFacts {
    let mut facts = DeviceFacts::unknown();
    for kind in [FactKind::Serial, FactKind::Model] {
        let value = match rules.extract(text, kind) {
            Some(value) => {
                log::info!(logger: log, "> device {}: {}", kind, value);
                value.to_string()
            }
            None => {
                log::warn!(logger: log, "> no {} info found within obtained version info", kind);
                log::debug!(logger: log, "> version output: {:?}", text);
                NO_DATA.to_string()
            }
        };
        match kind {
            FactKind::Serial => facts.serial_number = value,
            FactKind::Model => facts.model = value,
        }
    }
    facts
}
