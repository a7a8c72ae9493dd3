//! Scripted connector for pipeline tests.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{CommandOutput, Connector, Session, SessionTarget};
use crate::error::{ChannelError, Result, TransportError};
use crate::parse::InterfaceRecord;

/// Scripted behavior of one host.
#[derive(Debug, Clone)]
pub enum MockDevice {
    Timeout,
    AuthFailure,
    Refused,
    Panics,
    Responds {
        version: Option<String>,
        interfaces: Option<CommandOutput>,
    },
}

impl MockDevice {
    /// Cisco-style version text and a well-formed port table.
    pub fn with_ports(serial: &str, model: &str, ports: &[(&str, &str)]) -> Self {
        let version = format!(
            "Cisco IOS Software, Version 15.2(7)E3\n\
             cisco {model} (APM86XXX) processor (revision B0) with 524288K bytes of memory.\n\
             System Serial Number : {serial}\n"
        );
        MockDevice::Responds {
            version: Some(version),
            interfaces: Some(CommandOutput::Records(
                ports
                    .iter()
                    .map(|(port, status)| record(port, status))
                    .collect(),
            )),
        }
    }
}

pub fn record(port: &str, status: &str) -> InterfaceRecord {
    HashMap::from([
        ("port".to_string(), port.to_string()),
        ("status".to_string(), status.to_string()),
    ])
}

/// Everything the mock saw, in order.
#[derive(Debug, Default, Clone)]
pub struct Journal {
    pub connects: Vec<String>,
    pub commands: Vec<(String, String)>,
    pub closes: Vec<String>,
}

#[derive(Default, Clone)]
pub struct MockConnector {
    devices: HashMap<String, MockDevice>,
    journal: Arc<Mutex<Journal>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, host: &str, device: MockDevice) -> Self {
        self.devices.insert(host.to_string(), device);
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    async fn connect(&self, target: &SessionTarget) -> Result<MockSession> {
        let host = target.device.host.clone();
        self.journal.lock().unwrap().connects.push(host.clone());

        match self.devices.get(&host).cloned() {
            Some(MockDevice::Timeout) => {
                Err(TransportError::Timeout(Duration::from_secs(30)).into())
            }
            Some(MockDevice::AuthFailure) => Err(TransportError::AuthenticationFailed {
                user: target.device.credentials.username.clone(),
            }
            .into()),
            Some(MockDevice::Refused) | None => Err(TransportError::ConnectionFailed {
                host,
                port: 22,
                source: io::ErrorKind::ConnectionRefused.into(),
            }
            .into()),
            Some(MockDevice::Panics) => panic!("scripted panic for {}", host),
            Some(MockDevice::Responds {
                version,
                interfaces,
            }) => Ok(MockSession {
                host,
                version,
                interfaces,
                journal: self.journal.clone(),
            }),
        }
    }
}

pub struct MockSession {
    host: String,
    version: Option<String>,
    interfaces: Option<CommandOutput>,
    journal: Arc<Mutex<Journal>>,
}

impl MockSession {
    fn record_command(&self, command: &str) {
        self.journal
            .lock()
            .unwrap()
            .commands
            .push((self.host.clone(), command.to_string()));
    }
}

impl Session for MockSession {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        self.record_command(command);
        self.version
            .clone()
            .ok_or_else(|| ChannelError::PatternTimeout(Duration::from_secs(30)).into())
    }

    async fn send_command_structured(&mut self, command: &str) -> Result<CommandOutput> {
        self.record_command(command);
        self.interfaces.clone().ok_or_else(|| {
            ChannelError::CommandFailed {
                command: command.to_string(),
                message: "% Invalid input detected".to_string(),
            }
            .into()
        })
    }

    async fn close(self) -> Result<()> {
        self.journal.lock().unwrap().closes.push(self.host);
        Ok(())
    }
}
