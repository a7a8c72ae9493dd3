//! Cisco IOS / IOS-XE dialect.
//!
//! Collection stays in user EXEC or privileged EXEC, whichever the login
//! lands in; both `show` commands work from either.
//!
//! # Prompt Examples
//!
//! ```text
//! switch>                            # exec
//! switch#                            # privilege_exec
//! switch(config)#                    # configuration (not matched)
//! ```

use crate::dialect::Dialect;
use crate::parse::FactRules;

const SHOW_INTERFACES_STATUS: &str =
    include_str!("../templates/cisco_ios_show_interfaces_status.textfsm");

/// Create the Cisco IOS dialect.
pub fn dialect() -> Dialect {
    Dialect::new("cisco_ios", r"(?mi)^[\w.\-@/:]{1,63}[>#]\s?$")
        .unwrap()
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input detected")
        .with_failure_pattern("% Unknown command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_version_command("show version")
        .with_interfaces_command("show interfaces status")
        .with_fact_rules(FactRules::default())
        .with_template("show interfaces status", SHOW_INTERFACES_STATUS)
        .with_terminal_size(511, 24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::parse::textfsm;

    #[test]
    fn test_cisco_dialect() {
        let dialect = dialect();
        assert_eq!(dialect.name, "cisco_ios");
        assert_eq!(dialect.on_open_commands, ["terminal length 0", "terminal width 511"]);
        assert!(dialect.template_for("show interfaces status").is_some());
    }

    #[test]
    fn test_prompt_match() {
        let prompt = dialect().prompt_pattern;
        assert!(prompt.is_match(b"switch>"));
        assert!(prompt.is_match(b"switch#"));
        assert!(prompt.is_match(b"core-sw01.lab# "));
        assert!(prompt.is_match(b"show version\r\nCisco IOS Software\r\nswitch#"));
        assert!(!prompt.is_match(b"switch(config)#"));
        assert!(!prompt.is_match(b"Password:"));
    }

    #[test]
    fn test_interfaces_template() {
        let output = "\
Port      Name               Status       Vlan       Duplex  Speed Type
Gi1/0/1   uplink to core     connected    trunk      a-full a-1000 10/100/1000BaseTX
Gi1/0/2                      notconnect   1            auto   auto 10/100/1000BaseTX
Gi1/0/3   printer            disabled     20           auto   auto 10/100/1000BaseTX
";
        let records = textfsm::parse_records(SHOW_INTERFACES_STATUS, output).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["port"], "Gi1/0/1");
        assert_eq!(records[0]["status"], "connected");
        assert_eq!(records[0]["name"], "uplink to core");
        assert_eq!(records[1]["port"], "Gi1/0/2");
        assert_eq!(records[1]["status"], "notconnect");
        assert_eq!(records[2]["status"], "disabled");
        assert_eq!(records[2]["vlan"], "20");
    }

    #[test]
    fn test_interfaces_template_keeps_every_row() {
        let output = "\
Port      Name               Status       Vlan       Duplex  Speed Type
Gi1/0/1                      connected    1          a-full a-1000 10/100/1000BaseTX
Gi1/0/2                      faulty       1            auto   auto 10/100/1000BaseTX
Gi1/0/3                      err-disabled 1            auto   auto 10/100/1000BaseTX

Gi1/0/4                      notconnect   1            auto   auto 10/100/1000BaseTX
";
        let records = textfsm::parse_records(SHOW_INTERFACES_STATUS, output).unwrap();
        let statuses: Vec<&str> = records.iter().map(|r| r["status"].as_str()).collect();
        assert_eq!(statuses, ["connected", "faulty", "err-disabled", "notconnect"]);
    }

    #[test]
    fn test_interfaces_template_rejects_unknown_row() {
        let output = "\
Port      Name               Status       Vlan       Duplex  Speed Type
Gi1/0/1                      connected    1          a-full a-1000 10/100/1000BaseTX
Gi1/0/2                      monitor      1            auto   auto 10/100/1000BaseTX
Gi1/0/3                      notconnect   1            auto   auto 10/100/1000BaseTX
";
        assert!(matches!(
            textfsm::parse_records(SHOW_INTERFACES_STATUS, output),
            Err(ParseError::Output(_))
        ));
    }
}
