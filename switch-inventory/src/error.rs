//! Error types for switch-inventory.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for switch-inventory operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors, fatal before any device is contacted
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Export sink errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Configuration errors (roster and credentials).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config content is not a valid roster document
    #[error("Malformed config: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Username or password missing
    #[error("Credentials not provided")]
    MissingCredentials,

    /// A roster entry has an empty host
    #[error("Empty host entry in family '{family}'")]
    BlankHost { family: String },
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Server host key was not accepted
    #[error("Host key for {host}:{port} rejected")]
    HostKeyRejected { host: String, port: u16 },

    /// Connection attempt timed out
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (prompt matching, command execution).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to open the PTY shell channel
    #[error("Failed to open shell channel: {0}")]
    OpenFailed(russh::Error),

    /// Prompt was not seen within the command timeout
    #[error("Prompt not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Device output matched one of the dialect's failure patterns
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Invalid prompt pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Structured output parsing errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The TextFSM template itself is invalid
    #[error("Invalid template: {0}")]
    Template(#[from] textfsm_rust::TemplateError),

    /// The output does not fit the template
    #[error("Output rejected by template: {0}")]
    Output(#[from] textfsm_rust::ParseError),
}

/// Export sink errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Output directory or file could not be written
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Two families map to the same file
    #[error("Families '{first}' and '{second}' would both be written to {path}")]
    NameCollision {
        first: String,
        second: String,
        path: PathBuf,
    },
}

/// Result type alias using switch-inventory's Error.
pub type Result<T> = std::result::Result<T, Error>;
