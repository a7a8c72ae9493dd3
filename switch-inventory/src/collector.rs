//! Per-device collection.
//!
//! [`DeviceCollector::collect`] drives one device end to end and never
//! returns an error: every fault is logged and folded into a
//! [`DeviceOutcome`], so one bad device cannot stop the batch.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::dialect::Dialect;
use crate::error::{Error, TransportError};
use crate::logging::Logger;
use crate::model::{DeviceDescriptor, DeviceFacts, InventoryRow, PortRecord};
use crate::parse::{extract_facts, normalize_port_table};
use crate::session::{Connector, Session, SessionTarget};

/// Why a device produced no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The connection attempt timed out.
    ConnectTimeout,

    /// The device rejected the credentials.
    AuthenticationFailed,

    /// Any other failure while opening the session.
    Transport(String),

    /// The family tag does not map to a known dialect.
    UnknownDialect(String),

    /// The session worked but no port records were obtained.
    NoPorts,

    /// The collection task died.
    Aborted(String),
}

impl SkipReason {
    /// Classify a session-open failure.
    pub fn from_connect_error(error: &Error) -> Self {
        match error {
            Error::Transport(TransportError::Timeout(_)) => SkipReason::ConnectTimeout,
            Error::Transport(TransportError::AuthenticationFailed { .. }) => {
                SkipReason::AuthenticationFailed
            }
            other => SkipReason::Transport(other.to_string()),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ConnectTimeout => f.write_str("connection timed out"),
            SkipReason::AuthenticationFailed => {
                f.write_str("authentication failed, please re-check credentials")
            }
            SkipReason::Transport(message) => write!(f, "unspecified exception: {}", message),
            SkipReason::UnknownDialect(family) => {
                write!(f, "no dialect registered for family '{}'", family)
            }
            SkipReason::NoPorts => f.write_str("no ports info obtained"),
            SkipReason::Aborted(message) => write!(f, "collection aborted: {}", message),
        }
    }
}

/// Result of collecting one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOutcome {
    /// One row per port, in port order. Never empty.
    Collected(Vec<InventoryRow>),

    /// No usable data.
    Skipped(SkipReason),
}

impl DeviceOutcome {
    /// Rows contributed by this device.
    pub fn rows(&self) -> &[InventoryRow] {
        match self {
            DeviceOutcome::Collected(rows) => rows,
            DeviceOutcome::Skipped(_) => &[],
        }
    }

    /// Whether the device contributed rows.
    pub fn is_collected(&self) -> bool {
        matches!(self, DeviceOutcome::Collected(_))
    }
}

/// Settings for per-device collection.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Pause after each successful device.
    pub pacing: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(5),
        }
    }
}

/// Collects inventory rows from one device at a time.
pub struct DeviceCollector<C> {
    connector: C,
    config: CollectorConfig,
    log: Logger,
}

impl<C: Connector> DeviceCollector<C> {
    /// Create a collector opening sessions through `connector`.
    pub fn new(connector: C, config: CollectorConfig, log: Logger) -> Self {
        Self {
            connector,
            config,
            log,
        }
    }

    /// The connector sessions are opened with.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Collect rows from one device.
    pub async fn collect(&self, device: &DeviceDescriptor, dialect: Arc<Dialect>) -> DeviceOutcome {
        let target = SessionTarget {
            device: device.clone(),
            dialect,
        };

        let mut session = match self.connector.connect(&target).await {
            Ok(session) => session,
            Err(e) => {
                let reason = SkipReason::from_connect_error(&e);
                log::warn!(logger: self.log, "> {}", reason);
                log::debug!(logger: self.log, "> {}: {}", device.host, e);
                return DeviceOutcome::Skipped(reason);
            }
        };
        log::debug!(logger: self.log, "> session opened to {}", device.host);

        let facts = self.request_facts(&mut session, &target.dialect).await;
        let ports = self.request_ports(&mut session, &target.dialect).await;

        match session.close().await {
            Ok(()) => log::debug!(logger: self.log, "> session closed to {}", device.host),
            Err(e) => log::warn!(logger: self.log, "> error while closing session: {}", e),
        }

        if ports.is_empty() {
            log::warn!(logger: self.log, "> {}", SkipReason::NoPorts);
            return DeviceOutcome::Skipped(SkipReason::NoPorts);
        }

        let rows = InventoryRow::for_ports(&device.host, &facts, ports);
        log::info!(logger: self.log, "device details obtained: {} port(s)", rows.len());

        if !self.config.pacing.is_zero() {
            tokio::time::sleep(self.config.pacing).await;
        }

        DeviceOutcome::Collected(rows)
    }

    async fn request_facts(&self, session: &mut C::Session, dialect: &Dialect) -> DeviceFacts {
        match session.send_command(&dialect.version_command).await {
            Ok(output) => extract_facts(&output, &dialect.fact_rules, &self.log),
            Err(e) => {
                log::warn!(logger: self.log, "> cannot obtain version info: {}", e);
                DeviceFacts::unknown()
            }
        }
    }

    async fn request_ports(&self, session: &mut C::Session, dialect: &Dialect) -> Vec<PortRecord> {
        let output = match session
            .send_command_structured(&dialect.interfaces_command)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                log::warn!(logger: self.log, "> cannot obtain interfaces output: {}", e);
                return Vec::new();
            }
        };

        match normalize_port_table(&output) {
            Ok(ports) => ports,
            Err(e) => {
                log::warn!(logger: self.log, "> cannot read interfaces output: {}", e);
                Vec::new()
            }
        }
    }
}
