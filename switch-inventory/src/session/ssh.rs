//! SSH sessions using russh.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use russh::client::{self, Handle, Msg};
use russh::keys::PublicKey;
use russh::{Channel, ChannelMsg, Disconnect};

use super::buffer::PatternBuffer;
use super::config::{HostKeyPolicy, SessionConfig};
use super::{CommandOutput, Connector, Session, SessionTarget};
use crate::config::Credentials;
use crate::dialect::Dialect;
use crate::error::{ChannelError, Result, TransportError};
use crate::logging::Logger;
use crate::parse::textfsm;

/// Opens interactive SSH shells on switches.
#[derive(Debug, Clone)]
pub struct SshConnector {
    config: SessionConfig,
    log: Logger,
}

impl SshConnector {
    /// Create a connector applying `config` to every session.
    pub fn new(config: SessionConfig, log: Logger) -> Self {
        Self { config, log }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Connector for SshConnector {
    type Session = SshSession;

    async fn connect(&self, target: &SessionTarget) -> Result<SshSession> {
        SshSession::open(target, &self.config, self.log.clone()).await
    }
}

/// An authenticated SSH connection with a PTY shell.
pub struct SshSession {
    /// The russh session handle.
    handle: Handle<SshHandler>,

    /// The shell channel commands are written to.
    channel: Channel<Msg>,

    /// Output accumulated since the last prompt.
    buffer: PatternBuffer,

    dialect: Arc<Dialect>,
    command_timeout: Duration,
    host: String,
    log: Logger,
}

impl SshSession {
    /// Connect, authenticate, open a shell and run the dialect's on-open
    /// commands.
    ///
    /// Once the connection is up, a failure in any later step disconnects
    /// before the error is returned.
    pub async fn open(target: &SessionTarget, config: &SessionConfig, log: Logger) -> Result<Self> {
        let host = target.device.host.clone();
        let dialect = target.dialect.clone();

        log::debug!(
            logger: log,
            "> opening ssh session to {}:{} ({})",
            host,
            config.port,
            dialect.name
        );

        let handle = tokio::time::timeout(
            config.connect_timeout,
            Self::authenticate(&host, config, &target.device.credentials, &log),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.connect_timeout))??;

        let channel = match Self::open_shell(&handle, &dialect).await {
            Ok(channel) => channel,
            Err(e) => {
                Self::abandon(&handle, &host, &log).await;
                return Err(e);
            }
        };

        let mut session = Self {
            handle,
            channel,
            buffer: PatternBuffer::new(config.search_depth),
            dialect,
            command_timeout: config.command_timeout,
            host,
            log,
        };

        if let Err(e) = session.prepare().await {
            Self::abandon(&session.handle, &session.host, &session.log).await;
            return Err(e);
        }

        log::debug!(logger: session.log, "> ssh session to {} ready", session.host);
        Ok(session)
    }

    async fn authenticate(
        host: &str,
        config: &SessionConfig,
        credentials: &Credentials,
        log: &Logger,
    ) -> Result<Handle<SshHandler>> {
        let mut handle = Self::connect(host, config).await?;

        let accepted = handle
            .authenticate_password(&credentials.username, credentials.password())
            .await
            .map(|auth| auth.success());
        match accepted {
            Ok(true) => Ok(handle),
            Ok(false) => {
                Self::abandon(&handle, host, log).await;
                Err(TransportError::AuthenticationFailed {
                    user: credentials.username.clone(),
                }
                .into())
            }
            Err(e) => {
                Self::abandon(&handle, host, log).await;
                Err(TransportError::Ssh(e).into())
            }
        }
    }

    async fn open_shell(handle: &Handle<SshHandler>, dialect: &Dialect) -> Result<Channel<Msg>> {
        let channel = handle
            .channel_open_session()
            .await
            .map_err(ChannelError::OpenFailed)?;
        channel
            .request_pty(
                true,
                "xterm",
                dialect.terminal_width,
                dialect.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(ChannelError::OpenFailed)?;
        channel
            .request_shell(true)
            .await
            .map_err(ChannelError::OpenFailed)?;
        Ok(channel)
    }

    /// Wait for the first prompt, then run the on-open commands.
    async fn prepare(&mut self) -> Result<()> {
        self.read_until_prompt().await?;
        for command in self.dialect.on_open_commands.clone() {
            self.send_command(&command).await?;
        }
        Ok(())
    }

    /// Disconnect after a failed setup step.
    async fn abandon(handle: &Handle<SshHandler>, host: &str, log: &Logger) {
        if let Err(e) = handle.disconnect(Disconnect::ByApplication, "", "en").await {
            log::debug!(logger: log, "> disconnect from {} failed: {}", host, e);
        }
    }

    async fn connect(host: &str, config: &SessionConfig) -> Result<Handle<SshHandler>> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.command_timeout * 2),
            ..Default::default()
        });

        let rejected = Arc::new(Mutex::new(false));
        let handler = SshHandler {
            host: host.to_string(),
            port: config.port,
            policy: config.host_key_policy.clone(),
            rejected: rejected.clone(),
        };

        client::connect(ssh_config, (host, config.port), handler)
            .await
            .map_err(|e| {
                let error = if *rejected.lock().unwrap_or_else(|p| p.into_inner()) {
                    TransportError::HostKeyRejected {
                        host: host.to_string(),
                        port: config.port,
                    }
                } else {
                    match e {
                        russh::Error::IO(source) => TransportError::ConnectionFailed {
                            host: host.to_string(),
                            port: config.port,
                            source,
                        },
                        other => TransportError::Ssh(other),
                    }
                };
                error.into()
            })
    }

    /// Read channel output until the prompt appears in the buffer tail.
    async fn read_until_prompt(&mut self) -> Result<Vec<u8>> {
        let deadline = tokio::time::Instant::now() + self.command_timeout;

        loop {
            if self.buffer.tail_contains(&self.dialect.prompt_pattern) {
                return Ok(self.buffer.take().to_vec());
            }

            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ChannelError::PatternTimeout(self.command_timeout))?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => self.buffer.extend(data),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => self.buffer.extend(data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(ChannelError::Closed.into());
                }
                Some(_) => {}
            }
        }
    }

    /// Strip the command echo and the trailing prompt line.
    fn normalize_output(raw: &[u8], command: &str) -> String {
        let text = String::from_utf8_lossy(raw).replace('\r', "");
        let text = text.trim_start_matches('\n');
        let text = text
            .strip_prefix(command)
            .unwrap_or(text)
            .trim_start_matches('\n');

        match memchr::memrchr(b'\n', text.as_bytes()) {
            Some(pos) => text[..pos].to_string(),
            None => String::new(),
        }
    }
}

impl Session for SshSession {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        let start = Instant::now();
        self.buffer.clear();

        self.channel
            .data(format!("{}\n", command).as_bytes())
            .await
            .map_err(ChannelError::Ssh)?;

        let raw = self.read_until_prompt().await?;
        let output = Self::normalize_output(&raw, command);

        log::debug!(
            logger: self.log,
            "> {}: '{}' returned {} bytes in {:?}",
            self.host,
            command,
            output.len(),
            start.elapsed()
        );

        if let Some(pattern) = self.dialect.detect_failure(&output) {
            return Err(ChannelError::CommandFailed {
                command: command.to_string(),
                message: pattern.to_string(),
            }
            .into());
        }

        Ok(output)
    }

    async fn send_command_structured(&mut self, command: &str) -> Result<CommandOutput> {
        let output = self.send_command(command).await?;

        let Some(template) = self.dialect.template_for(command) else {
            return Ok(CommandOutput::Text(output));
        };

        match textfsm::parse_records(template, &output) {
            Ok(records) => Ok(CommandOutput::Records(records)),
            Err(e) => {
                log::debug!(
                    logger: self.log,
                    "> {}: cannot parse '{}' output: {}",
                    self.host,
                    command,
                    e
                );
                Ok(CommandOutput::Text(output))
            }
        }
    }

    async fn close(self) -> Result<()> {
        if let Err(e) = self.channel.eof().await {
            log::debug!(logger: self.log, "> {}: cannot send eof: {}", self.host, e);
        }
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        log::debug!(logger: self.log, "> ssh session to {} closed", self.host);
        Ok(())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
    /// Set when the host key was refused, so connect() can report it
    /// instead of the generic russh::Error::UnknownKey.
    rejected: Arc<Mutex<bool>>,
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        let accepted = match &self.policy {
            HostKeyPolicy::AcceptAny => true,
            HostKeyPolicy::KnownHosts(Some(path)) => {
                russh::keys::check_known_hosts_path(&self.host, self.port, server_public_key, path)
                    .unwrap_or(false)
            }
            HostKeyPolicy::KnownHosts(None) => {
                russh::keys::check_known_hosts(&self.host, self.port, server_public_key)
                    .unwrap_or(false)
            }
        };

        if !accepted {
            *self.rejected.lock().unwrap_or_else(|p| p.into_inner()) = true;
        }
        Ok(accepted)
    }
}
