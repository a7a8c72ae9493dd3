//! Roster and credentials configuration.
//!
//! The config document is JSON:
//!
//! ```json
//! {
//!     "username": "admin",
//!     "password": "secret",
//!     "devices": {
//!         "cisco_ios": ["192.168.1.1", "192.168.1.2"]
//!     }
//! }
//! ```
//!
//! Family order and host order inside a family are kept as declared.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::DeviceDescriptor;

/// Family tag to ordered host list.
pub type Roster = IndexMap<String, Vec<String>>;

/// Username and password shared by every device in a batch.
pub struct Credentials {
    pub username: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials; the password is kept as a secret.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// The password in clear text, for handing to the SSH layer.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Both username and password are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize)]
struct RawInventory {
    username: String,
    password: String,
    devices: Roster,
}

/// A validated roster plus credentials, ready for a batch run.
#[derive(Debug, Clone)]
pub struct Inventory {
    credentials: Arc<Credentials>,
    roster: Roster,
}

impl Inventory {
    /// Build and validate an inventory.
    pub fn new(credentials: Credentials, roster: Roster) -> Result<Self, ConfigError> {
        let inventory = Self {
            credentials: Arc::new(credentials),
            roster,
        };
        inventory.validate()?;
        Ok(inventory)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let raw: RawInventory = serde_json::from_str(content)?;
        Self::new(Credentials::new(raw.username, raw.password), raw.devices)
    }

    /// Check the preconditions of a run: complete credentials, no blank hosts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.credentials.is_complete() {
            return Err(ConfigError::MissingCredentials);
        }
        for (family, hosts) in &self.roster {
            if hosts.iter().any(|host| host.trim().is_empty()) {
                return Err(ConfigError::BlankHost {
                    family: family.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Number of devices across all families.
    pub fn device_count(&self) -> usize {
        self.roster.values().map(Vec::len).sum()
    }

    /// Every device in declaration order, family by family.
    pub fn devices(&self) -> impl Iterator<Item = DeviceDescriptor> + '_ {
        self.roster.iter().flat_map(move |(family, hosts)| {
            hosts.iter().map(move |host| {
                DeviceDescriptor::new(family.as_str(), host.trim(), self.credentials.clone())
            })
        })
    }
}
