// Identifier Normalizer
//
// Job ids and call list ids come from different conventions, so each family
// has its own rule:
// - CallListID: "CL001" == "CL01" == "CL1" (comparison only, never rewritten)
// - JobID: "J7" / "JOB007" → "JOB0007" (materialized and returned)
// - CandidateIDs: a delimited list stored in one cell

use regex::Regex;
use std::sync::OnceLock;

fn job_id_re() -> &'static Regex {
    static JOB_ID_RE: OnceLock<Regex> = OnceLock::new();
    JOB_ID_RE.get_or_init(|| {
        Regex::new(r"^(?:J([0-9]+)|JOB([0-9]{3}))$").expect("valid job id regex")
    })
}

fn candidate_delimiter_re() -> &'static Regex {
    static DELIMITER_RE: OnceLock<Regex> = OnceLock::new();
    DELIMITER_RE.get_or_init(|| Regex::new(r"[;,\s]+").expect("valid delimiter regex"))
}

/// Comparison key for a CallListID.
///
/// Strips a literal `CL` prefix and any zeros that follow it; an all-zero
/// suffix keys as `"0"` and a bare `CL` keys as `""`. Values without the
/// prefix are compared as-is (trimmed), so `"1"` and `"CL1"` share a key.
pub fn call_list_key(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("CL") {
        Some(rest) => {
            let digits = rest.trim_start_matches('0');
            if digits.is_empty() && !rest.is_empty() {
                "0"
            } else {
                digits
            }
        }
        None => trimmed,
    }
}

/// True when two CallListIDs name the same list. Ids with an empty key
/// (blank, or a bare `CL`) never match.
pub fn call_list_ids_match(a: &str, b: &str) -> bool {
    let (a, b) = (call_list_key(a), call_list_key(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b
}

/// Canonical JobID.
///
/// `J<digits>` and `JOB<3 digits>` become `JOB` + digits zero-padded to four.
/// Anything else (including already-canonical `JOB0007`) passes through
/// trimmed.
pub fn normalize_job_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match job_id_re().captures(trimmed) {
        Some(caps) => {
            let digits = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or("");
            format!("JOB{:0>4}", digits)
        }
        None => trimmed.to_string(),
    }
}

/// True when two JobIDs are equal after canonicalization. Blank ids never match.
pub fn job_ids_match(a: &str, b: &str) -> bool {
    if a.trim().is_empty() || b.trim().is_empty() {
        return false;
    }
    normalize_job_id(a) == normalize_job_id(b)
}

/// Parse the denormalized CandidateIDs cell of a call list.
///
/// Surrounding quotes are stripped; newlines, whitespace, `,` and `;` runs
/// all act as one delimiter. Order and duplicates are preserved. Garbage
/// degrades to an empty list.
pub fn parse_candidate_ids(raw: &str) -> Vec<String> {
    let unquoted = raw.trim().trim_matches(|c: char| c == '"' || c == '\'');

    candidate_delimiter_re()
        .split(unquoted)
        .map(|id| id.trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_list_key_strips_prefix_and_padding() {
        assert_eq!(call_list_key("CL1"), "1");
        assert_eq!(call_list_key("CL01"), "1");
        assert_eq!(call_list_key("CL001"), "1");
        assert_eq!(call_list_key("CL0001"), "1");
        assert_eq!(call_list_key(" CL010 "), "10");
    }

    #[test]
    fn test_call_list_ids_match_all_paddings() {
        for form in ["CL1", "CL01", "CL001", "CL0001"] {
            assert!(call_list_ids_match(form, "CL001"), "{} should match", form);
        }
        assert!(!call_list_ids_match("CL1", "CL10"));
        assert!(!call_list_ids_match("CL1", "CL2"));
    }

    #[test]
    fn test_call_list_ids_edge_cases() {
        assert!(!call_list_ids_match("", ""));
        assert!(!call_list_ids_match("CL1", "  "));
        // prefix is literal
        assert!(!call_list_ids_match("cl1", "CL1"));
        // no prefix compares the raw value
        assert!(call_list_ids_match("1", "CL001"));
    }

    #[test]
    fn test_call_list_zero_and_bare_prefix() {
        assert_eq!(call_list_key("CL0"), "0");
        assert_eq!(call_list_key("CL000"), "0");
        assert_eq!(call_list_key("CL"), "");

        assert!(call_list_ids_match("CL0", "CL000"));
        assert!(!call_list_ids_match("CL", "CL0"));
        assert!(!call_list_ids_match("CL", "CL"));
        assert!(!call_list_ids_match("CL0", "CL1"));
    }

    #[test]
    fn test_normalize_job_id_short_form() {
        assert_eq!(normalize_job_id("J7"), "JOB0007");
        assert_eq!(normalize_job_id("J001"), "JOB0001");
        assert_eq!(normalize_job_id("J12345"), "JOB12345");
    }

    #[test]
    fn test_normalize_job_id_three_digit_form() {
        assert_eq!(normalize_job_id("JOB007"), "JOB0007");
        assert_eq!(normalize_job_id("JOB123"), "JOB0123");
    }

    #[test]
    fn test_normalize_job_id_idempotent() {
        assert_eq!(normalize_job_id("JOB0007"), "JOB0007");
        let once = normalize_job_id("J7");
        assert_eq!(normalize_job_id(&once), once);
    }

    #[test]
    fn test_normalize_job_id_pass_through() {
        assert_eq!(normalize_job_id(""), "");
        assert_eq!(normalize_job_id("JOB07"), "JOB07");
        assert_eq!(normalize_job_id("job7"), "job7");
        assert_eq!(normalize_job_id("X-99"), "X-99");
        assert_eq!(normalize_job_id(" J7 "), "JOB0007");
    }

    #[test]
    fn test_normalize_job_id_ascii_digits_only() {
        // Arabic-Indic and fullwidth digits
        assert_eq!(normalize_job_id("J\u{0667}"), "J\u{0667}");
        assert_eq!(normalize_job_id("JOB\u{FF10}\u{FF10}\u{FF17}"), "JOB\u{FF10}\u{FF10}\u{FF17}");
        assert!(!job_ids_match("J\u{0667}", "JOB0007"));
    }

    #[test]
    fn test_job_ids_match() {
        assert!(job_ids_match("J7", "JOB0007"));
        assert!(job_ids_match("JOB007", "J7"));
        assert!(!job_ids_match("", ""));
        assert!(!job_ids_match("J7", "J8"));
    }

    #[test]
    fn test_parse_candidate_ids_mixed_delimiters() {
        assert_eq!(parse_candidate_ids("C1; C2,C3\nC4"), vec!["C1", "C2", "C3", "C4"]);
    }

    #[test]
    fn test_parse_candidate_ids_quotes_and_trailing_delimiter() {
        assert_eq!(parse_candidate_ids("\"C1, C2,\""), vec!["C1", "C2"]);
        assert_eq!(parse_candidate_ids("'C9;'"), vec!["C9"]);
        assert_eq!(parse_candidate_ids("C1;\r\n\r\nC2;;"), vec!["C1", "C2"]);
    }

    #[test]
    fn test_parse_candidate_ids_preserves_duplicates() {
        assert_eq!(parse_candidate_ids("C1,C1;C2"), vec!["C1", "C1", "C2"]);
    }

    #[test]
    fn test_parse_candidate_ids_garbage_is_empty() {
        assert!(parse_candidate_ids("").is_empty());
        assert!(parse_candidate_ids("\"\"").is_empty());
        assert!(parse_candidate_ids(" ;, \n ").is_empty());
    }
}
