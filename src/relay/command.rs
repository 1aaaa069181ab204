//! Chat command grammar.
//!
//! Parsing is total: every message maps to exactly one [`Command`]. The rules
//! are tried in a fixed order and the first match wins:
//!
//! 1. create case: exactly six lines, a marker line followed by the five
//!    `key:value` fields `subject`, `body`, `serviceCode`, `categoryCode`,
//!    `severityCode` in any order
//! 2. lookup: the lowercased text contains `查找servicecode`
//! 3. resolve: the text contains `释放`
//! 4. anything else is unrecognized

use std::collections::HashMap;

use crate::types::{CaseFields, Command};

pub const LOOKUP_KEYWORD: &str = "查找servicecode";
pub const RESOLVE_KEYWORD: &str = "释放";

const CASE_LINES: usize = 6;
const CASE_KEYS: [&str; 5] = [
    "subject",
    "body",
    "serviceCode",
    "categoryCode",
    "severityCode",
];

pub fn parse(message_text: &str) -> Command {
    let text = message_text.trim();

    if let Some(fields) = parse_case_fields(text) {
        return Command::CreateCase(fields);
    }

    let lowered = text.to_lowercase();
    if lowered.contains(LOOKUP_KEYWORD) {
        return match second_segment(text) {
            Some(service_name) => Command::LookupServiceCode { service_name },
            None => Command::Unrecognized,
        };
    }
    if lowered.contains(RESOLVE_KEYWORD) {
        return match second_segment(text) {
            Some(case_id) => Command::ResolveCase { case_id },
            None => Command::Unrecognized,
        };
    }

    Command::Unrecognized
}

fn parse_case_fields(text: &str) -> Option<CaseFields> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() != CASE_LINES {
        return None;
    }

    let mut fields: HashMap<&str, &str> = HashMap::new();
    for &line in &lines[1..] {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (key, value) = line.split_once(':')?;
        if !CASE_KEYS.contains(&key) || fields.insert(key, value).is_some() {
            return None;
        }
    }

    // Five distinct known keys over five lines means the set is exact.
    let mut take = |key: &str| fields.remove(key).map(str::to_string);
    Some(CaseFields {
        subject: take("subject")?,
        body: take("body")?,
        service_code: take("serviceCode")?,
        category_code: take("categoryCode")?,
        severity_code: take("severityCode")?,
    })
}

/// The text between the first and second `:`.
fn second_segment(text: &str) -> Option<String> {
    text.split(':').nth(1).map(|segment| segment.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATE: &str = "提工单\nsubject:Test\nbody:desc\nseverityCode:low\nserviceCode:s3\ncategoryCode:general-guidance";

    #[test]
    fn parses_create_case() {
        assert_eq!(
            parse(CREATE),
            Command::CreateCase(CaseFields {
                subject: "Test".to_string(),
                body: "desc".to_string(),
                service_code: "s3".to_string(),
                category_code: "general-guidance".to_string(),
                severity_code: "low".to_string(),
            })
        );
    }

    #[test]
    fn create_case_accepts_any_field_order_and_crlf() {
        let text = "提工单\r\ncategoryCode:other\r\nseverityCode:high\r\nbody:it broke: badly\r\nsubject:Outage\r\nserviceCode:amazon-ec2";
        match parse(text) {
            Command::CreateCase(fields) => {
                assert_eq!(fields.subject, "Outage");
                assert_eq!(fields.body, "it broke: badly");
                assert_eq!(fields.category_code, "other");
                assert_eq!(fields.severity_code, "high");
                assert_eq!(fields.service_code, "amazon-ec2");
            }
            other => panic!("expected CreateCase, got {:?}", other),
        }
    }

    #[test]
    fn create_case_with_missing_key_is_unrecognized() {
        let text = "提工单\nsubject:Test\nbody:desc\nseverityCode:low\nserviceCode:s3";
        assert_eq!(parse(text), Command::Unrecognized);
    }

    #[test]
    fn create_case_with_unknown_key_is_unrecognized() {
        let text = "提工单\nsubject:Test\nbody:desc\nseverityCode:low\nserviceCode:s3\npriority:high";
        assert_eq!(parse(text), Command::Unrecognized);
    }

    #[test]
    fn create_case_with_duplicate_key_is_unrecognized() {
        let text = "提工单\nsubject:Test\nsubject:Again\nseverityCode:low\nserviceCode:s3\ncategoryCode:x";
        assert_eq!(parse(text), Command::Unrecognized);
    }

    #[test]
    fn create_case_keys_must_match_exactly() {
        let text = "提工单\n subject :Test\nbody:desc\nseverityCode:low\nserviceCode:s3\ncategoryCode:x";
        assert_eq!(parse(text), Command::Unrecognized);
        let text = "提工单\nSubject:Test\nbody:desc\nseverityCode:low\nserviceCode:s3\ncategoryCode:x";
        assert_eq!(parse(text), Command::Unrecognized);
    }

    #[test]
    fn create_case_line_without_colon_is_unrecognized() {
        let text = "提工单\nsubject Test\nbody:desc\nseverityCode:low\nserviceCode:s3\ncategoryCode:x";
        assert_eq!(parse(text), Command::Unrecognized);
    }

    #[test]
    fn parses_lookup_case_insensitively() {
        assert_eq!(
            parse("查找ServiceCode:lambda"),
            Command::LookupServiceCode {
                service_name: "lambda".to_string()
            }
        );
        assert_eq!(
            parse("查找servicecode:S3"),
            Command::LookupServiceCode {
                service_name: "S3".to_string()
            }
        );
    }

    #[test]
    fn parses_resolve() {
        assert_eq!(
            parse("释放case，case_id:case-123"),
            Command::ResolveCase {
                case_id: "case-123".to_string()
            }
        );
        assert_eq!(
            parse("释放，case_id:case-123"),
            Command::ResolveCase {
                case_id: "case-123".to_string()
            }
        );
    }

    #[test]
    fn lookup_takes_precedence_over_resolve() {
        assert_eq!(
            parse("查找servicecode:释放"),
            Command::LookupServiceCode {
                service_name: "释放".to_string()
            }
        );
    }

    #[test]
    fn keyword_without_segment_is_unrecognized() {
        assert_eq!(parse("查找ServiceCode"), Command::Unrecognized);
        assert_eq!(parse("释放case"), Command::Unrecognized);
    }

    #[test]
    fn other_text_is_unrecognized() {
        assert_eq!(parse(""), Command::Unrecognized);
        assert_eq!(parse("hello"), Command::Unrecognized);
        assert_eq!(parse("subject:Test"), Command::Unrecognized);
    }

    #[test]
    fn parsing_is_deterministic() {
        for text in [CREATE, "查找ServiceCode:lambda", "释放case，case_id:1", "hi", ""] {
            assert_eq!(parse(text), parse(text));
        }
    }
}
