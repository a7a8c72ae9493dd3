//! Remote command sessions.
//!
//! The collection pipeline only depends on the [`Connector`] and [`Session`]
//! traits. [`SshConnector`] is the production implementation.

mod buffer;
pub mod config;
mod ssh;

pub use buffer::PatternBuffer;
pub use config::{HostKeyPolicy, SessionConfig};
pub use ssh::{SshConnector, SshSession};

use std::future::Future;
use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::model::DeviceDescriptor;
use crate::parse::InterfaceRecord;

/// Output of a command that may have been parsed into records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Raw text, when no template applies or parsing failed.
    Text(String),

    /// One record per table row.
    Records(Vec<InterfaceRecord>),
}

/// Everything needed to open a session to one device.
#[derive(Debug, Clone)]
pub struct SessionTarget {
    pub device: DeviceDescriptor,
    pub dialect: Arc<Dialect>,
}

/// An open command session to one device.
pub trait Session: Send {
    /// Send a command and return its normalized output.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Send a command and parse the output with the dialect's template.
    fn send_command_structured(
        &mut self,
        command: &str,
    ) -> impl Future<Output = Result<CommandOutput>> + Send;

    /// Close the session and release the connection.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens sessions.
///
/// Failures must be distinguishable: connection timeouts surface as
/// [`TransportError::Timeout`](crate::error::TransportError::Timeout),
/// rejected credentials as
/// [`TransportError::AuthenticationFailed`](crate::error::TransportError::AuthenticationFailed).
pub trait Connector: Send + Sync {
    type Session: Session + 'static;

    /// Connect, authenticate and prepare a shell on the target.
    fn connect(&self, target: &SessionTarget)
    -> impl Future<Output = Result<Self::Session>> + Send;
}

#[cfg(test)]
pub(crate) mod mock;
