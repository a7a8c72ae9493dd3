//! TextFSM parsing of tabular command output.

use textfsm_rust::Template;

use super::InterfaceRecord;
use crate::error::ParseError;

/// Parse command output with a TextFSM template.
///
/// Field names are lowercased so records can be addressed the same way
/// regardless of how the template spells its `Value` names. A line the
/// template rejects with an `Error` rule fails the whole parse.
pub fn parse_records(template: &str, output: &str) -> Result<Vec<InterfaceRecord>, ParseError> {
    let template = Template::parse_str(template)?;
    let mut parser = template.parser();
    let records = parser.parse_text_to_dicts(output)?;

    Ok(records
        .into_iter()
        .map(|record| {
            record
                .into_iter()
                .map(|(field, value)| (field.to_lowercase(), value))
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
Value PORT (\\S+)
Value STATUS (up|down)

Start
  ^${PORT}\\s+${STATUS}\\s*$$ -> Record
";

    #[test]
    fn test_parse_records() {
        let records = parse_records(TEMPLATE, "Gi0/1 up\nGi0/2 down\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["port"], "Gi0/1");
        assert_eq!(records[1]["status"], "down");
    }

    #[test]
    fn test_no_matching_lines() {
        let records = parse_records(TEMPLATE, "% Invalid input detected\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_template() {
        assert!(matches!(
            parse_records("this is not a template", ""),
            Err(ParseError::Template(_))
        ));
    }

    #[test]
    fn test_error_rule_fails_whole_output() {
        let strict = format!("{}  ^. -> Error \"unexpected line\"\n", TEMPLATE);
        assert_eq!(parse_records(&strict, "Gi0/1 up\n").unwrap().len(), 1);
        assert!(matches!(
            parse_records(&strict, "Gi0/1 up\nGi0/2 testing\nGi0/3 down\n"),
            Err(ParseError::Output(_))
        ));
    }
}
