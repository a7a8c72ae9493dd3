//! SSH session configuration.

use std::path::PathBuf;
use std::time::Duration;

/// How to treat the server's host key.
#[derive(Debug, Clone, Default)]
pub enum HostKeyPolicy {
    /// Accept any key. Switch fleets are commonly reached by address
    /// without a maintained known_hosts file.
    #[default]
    AcceptAny,

    /// Require the key to be present in known_hosts (the user's default
    /// file, or the given path).
    KnownHosts(Option<PathBuf>),
}

/// Settings applied to every session of a batch.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// SSH port (default: 22).
    pub port: u16,

    /// Timeout for TCP connect, handshake and authentication.
    pub connect_timeout: Duration,

    /// Timeout for each command to return to the prompt.
    pub command_timeout: Duration,

    /// Bytes from the end of the buffer searched for the prompt.
    pub search_depth: usize,

    /// Host key policy.
    pub host_key_policy: HostKeyPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: 22,
            connect_timeout: Duration::from_secs(30),
            command_timeout: Duration::from_secs(30),
            search_depth: 1000,
            host_key_policy: HostKeyPolicy::default(),
        }
    }
}
