//! Command dialects for device families.
//!
//! A family tag in the roster selects a [`Dialect`]: how to recognize the
//! prompt, which commands disable paging, which commands return the version
//! and interface tables, and how to read facts out of them.

mod registry;
pub mod vendors;

pub use registry::DialectRegistry;

use std::collections::HashMap;
use std::fmt;

use regex::bytes::Regex;

use crate::error::ChannelError;
use crate::parse::FactRules;

/// Vendor-specific session and command profile.
#[derive(Clone)]
pub struct Dialect {
    /// Dialect name (e.g., "cisco_ios", "arista_eos").
    pub name: String,

    /// Pattern matching any operational prompt.
    pub prompt_pattern: Regex,

    /// Commands run right after the shell opens.
    pub on_open_commands: Vec<String>,

    /// Substrings that mark a command as failed.
    pub failed_when_contains: Vec<String>,

    /// Command returning the identity/version text.
    pub version_command: String,

    /// Command returning the interface status table.
    pub interfaces_command: String,

    /// Marker phrases for serial and model extraction.
    pub fact_rules: FactRules,

    /// TextFSM templates keyed by the command they parse.
    pub templates: HashMap<String, &'static str>,

    /// Terminal width for the PTY.
    pub terminal_width: u32,

    /// Terminal height for the PTY.
    pub terminal_height: u32,
}

impl Dialect {
    /// Create a dialect with defaults for everything but the name and prompt.
    pub fn new(name: impl Into<String>, prompt_pattern: &str) -> Result<Self, ChannelError> {
        Ok(Self {
            name: name.into(),
            prompt_pattern: Regex::new(prompt_pattern)?,
            on_open_commands: vec![],
            failed_when_contains: vec![],
            version_command: "show version".to_string(),
            interfaces_command: "show interfaces status".to_string(),
            fact_rules: FactRules::default(),
            templates: HashMap::new(),
            terminal_width: 511,
            terminal_height: 24,
        })
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Set the version command.
    pub fn with_version_command(mut self, command: impl Into<String>) -> Self {
        self.version_command = command.into();
        self
    }

    /// Set the interface status command.
    pub fn with_interfaces_command(mut self, command: impl Into<String>) -> Self {
        self.interfaces_command = command.into();
        self
    }

    /// Set the fact extraction rules.
    pub fn with_fact_rules(mut self, rules: FactRules) -> Self {
        self.fact_rules = rules;
        self
    }

    /// Register a TextFSM template for a command.
    pub fn with_template(mut self, command: impl Into<String>, template: &'static str) -> Self {
        self.templates.insert(command.into(), template);
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Template for a command, if any.
    pub fn template_for(&self, command: &str) -> Option<&'static str> {
        self.templates.get(command.trim()).copied()
    }

    /// First failure pattern contained in the output.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("prompt_pattern", &self.prompt_pattern.as_str())
            .field("on_open_commands", &self.on_open_commands)
            .field("failed_when_contains", &self.failed_when_contains)
            .field("version_command", &self.version_command)
            .field("interfaces_command", &self.interfaces_command)
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dialect = Dialect::new("generic", r"[>#]\s*$").unwrap();
        assert_eq!(dialect.version_command, "show version");
        assert_eq!(dialect.interfaces_command, "show interfaces status");
        assert!(dialect.on_open_commands.is_empty());
        assert!(dialect.template_for("show version").is_none());
    }

    #[test]
    fn test_detect_failure() {
        let dialect = Dialect::new("generic", r"[>#]\s*$")
            .unwrap()
            .with_failure_pattern("% Invalid input");

        assert_eq!(
            dialect.detect_failure("   ^\n% Invalid input detected at '^' marker."),
            Some("% Invalid input")
        );
        assert_eq!(dialect.detect_failure("Gi0/1 connected"), None);
    }

    #[test]
    fn test_template_lookup_trims_command() {
        let dialect = Dialect::new("generic", r"#\s*$")
            .unwrap()
            .with_template("show interfaces status", "Value X (\\S+)\n\nStart\n");
        assert!(dialect.template_for(" show interfaces status ").is_some());
    }

    #[test]
    fn test_invalid_prompt_pattern() {
        assert!(matches!(
            Dialect::new("broken", r"(["),
            Err(ChannelError::InvalidPattern(_))
        ));
    }
}
