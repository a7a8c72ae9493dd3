//! Arista EOS dialect.
//!
//! Prompt pattern adapted from scrapli's EOS driver. `show version` on EOS
//! reports `Serial number:` and a model line such as `Arista DCS-7050TX-64-R`.

use crate::dialect::Dialect;
use crate::parse::FactRules;

const SHOW_INTERFACES_STATUS: &str =
    include_str!("../templates/arista_eos_show_interfaces_status.textfsm");

/// Create the Arista EOS dialect.
pub fn dialect() -> Dialect {
    let rules = FactRules::new(["Serial number"], "arista", ["dcs-", "ccs-", "veos"]);

    Dialect::new("arista_eos", r"(?mi)^[\w.\-@()/: ]{1,63}[>#]\s?$")
        .unwrap()
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Error")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Unavailable command")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 32767")
        .with_fact_rules(rules)
        .with_template("show interfaces status", SHOW_INTERFACES_STATUS)
        .with_terminal_size(32767, 24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::parse::{FactKind, textfsm};

    const SHOW_VERSION: &str = "\
Arista DCS-7050TX-64-R
Hardware version:    01.11
Serial number:       JPE15071234
System MAC address:  001c.7312.3456

Software image version: 4.21.1F
";

    #[test]
    fn test_arista_dialect() {
        let dialect = dialect();
        assert_eq!(dialect.name, "arista_eos");
        assert_eq!(dialect.version_command, "show version");
        assert_eq!(dialect.terminal_width, 32767);
    }

    #[test]
    fn test_prompt_match() {
        let prompt = dialect().prompt_pattern;
        assert!(prompt.is_match(b"leaf1>"));
        assert!(prompt.is_match(b"leaf1#"));
        assert!(prompt.is_match(b"admin@leaf1# "));
    }

    #[test]
    fn test_fact_rules() {
        let rules = dialect().fact_rules;
        assert_eq!(rules.extract(SHOW_VERSION, FactKind::Serial), Some("JPE15071234"));
        assert_eq!(rules.extract(SHOW_VERSION, FactKind::Model), Some("DCS-7050TX-64-R"));
    }

    #[test]
    fn test_interfaces_template() {
        let output = "\
Port       Name        Status       Vlan     Duplex Speed  Type            Flags Encapsulation
Et1        spine1      connected    routed   full   10G    10GBASE-T
Et2                    errdisabled  1        full   10G    10GBASE-T
Ma1                    connected    routed   a-full a-1G   10/100/1000
";
        let records = textfsm::parse_records(SHOW_INTERFACES_STATUS, output).unwrap();
        let ports: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r["port"].as_str(), r["status"].as_str()))
            .collect();
        assert_eq!(
            ports,
            vec![("Et1", "connected"), ("Et2", "errdisabled"), ("Ma1", "connected")]
        );
    }

    #[test]
    fn test_interfaces_template_rejects_unknown_row() {
        let output = "\
Port       Name        Status       Vlan     Duplex Speed  Type            Flags Encapsulation
Et1        spine1      connected    routed   full   10G    10GBASE-T
Et2                    linkflapped  1        full   10G    10GBASE-T
Et3                    notconnect   1        full   10G    10GBASE-T
";
        assert!(matches!(
            textfsm::parse_records(SHOW_INTERFACES_STATUS, output),
            Err(ParseError::Output(_))
        ));
    }
}
