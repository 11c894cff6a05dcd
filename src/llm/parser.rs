use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ErrorStatus, Extracted, ReviewReport};

lazy_static! {
    static ref FENCED_BLOCK: Regex =
        Regex::new(r"(?s)```[^\n]*\n(.*?)\n```").expect("fenced block pattern");
    static ref TIME_COMPLEXITY: Regex =
        Regex::new(r"(?i)TIME\s+COMPLEXITY[:\s\*]+O\(([^)]+)\)").expect("time complexity pattern");
    static ref SPACE_COMPLEXITY: Regex =
        Regex::new(r"(?i)SPACE\s+COMPLEXITY[:\s\*]+O\(([^)]+)\)").expect("space complexity pattern");
}

/// Best-effort extraction of the structured fields from a review reply.
/// This never fails: fields the reply does not yield come back tagged
/// `Unparsed`, and the raw text is always preserved.
pub fn parse_review(raw_text: &str) -> ReviewReport {
    ReviewReport {
        raw_text: raw_text.to_string(),
        status: classify_status(raw_text),
        corrected_code: extract_corrected_code(raw_text),
        time_complexity: extract_complexity(&TIME_COMPLEXITY, raw_text),
        space_complexity: extract_complexity(&SPACE_COMPLEXITY, raw_text),
        summary: summarize(raw_text),
        completed_at: Utc::now(),
    }
}

/// Substring heuristic: clean only when the reply says "NO ERRORS" and
/// never says "ERRORS FOUND". A reply that quotes both phrases (the
/// requested template does) is classified as errors found.
fn classify_status(reply: &str) -> ErrorStatus {
    if reply.trim().is_empty() {
        return ErrorStatus::Unknown;
    }
    let upper = reply.to_uppercase();
    if upper.contains("NO ERRORS") && !upper.contains("ERRORS FOUND") {
        ErrorStatus::NoErrors
    } else {
        ErrorStatus::ErrorsFound
    }
}

/// The first fenced code block, verbatim. A block that just restates
/// "no corrections needed" is not a correction.
fn extract_corrected_code(reply: &str) -> Extracted<String> {
    match FENCED_BLOCK.captures(reply) {
        Some(captures) => {
            let block = captures[1].trim().to_string();
            if block.to_lowercase().contains("no correction") || block.is_empty() {
                Extracted::Unparsed
            } else {
                Extracted::Parsed(block)
            }
        }
        None => Extracted::Unparsed,
    }
}

fn extract_complexity(pattern: &Regex, reply: &str) -> Extracted<String> {
    match pattern.captures(reply) {
        Some(captures) => Extracted::Parsed(format!("O({})", captures[1].trim())),
        None => Extracted::Unparsed,
    }
}

/// Heuristic preview: scan the first ten lines, keep up to five
/// non-empty non-fence lines, note the truncation.
fn summarize(reply: &str) -> String {
    let mut summary_lines = Vec::new();
    for line in reply.lines().take(10) {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("```") {
            summary_lines.push(line);
            if summary_lines.len() >= 5 {
                break;
            }
        }
    }
    format!(
        "{}\n\n...(See full analysis above)",
        summary_lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_REPLY: &str = "\
**ERROR STATUS:** NO ERRORS

**ISSUES:** None

**CORRECTED CODE:**
```python
def add(a, b):
    return a + b
```

**TIME COMPLEXITY:** O(1)
**SPACE COMPLEXITY:** O(1)

**EXPLANATION:** The function is correct.";

    #[test]
    fn clean_reply_extracts_block_and_no_errors_status() {
        let report = parse_review(CLEAN_REPLY);

        assert_eq!(report.status, ErrorStatus::NoErrors);
        assert_eq!(
            report.corrected_code,
            Extracted::Parsed("def add(a, b):\n    return a + b".to_string())
        );
        assert_eq!(report.time_complexity, Extracted::Parsed("O(1)".to_string()));
        assert_eq!(report.space_complexity, Extracted::Parsed("O(1)".to_string()));
    }

    #[test]
    fn mentioning_both_phrases_classifies_as_errors_found() {
        // Blind spot of the substring heuristic: a reply that quotes the
        // template ("NO ERRORS / ERRORS FOUND") while declaring the code
        // clean still comes out as errors found.
        let reply = "Result: NO ERRORS. The template offered NO ERRORS / ERRORS FOUND.";
        assert_eq!(parse_review(reply).status, ErrorStatus::ErrorsFound);
    }

    #[test]
    fn status_check_is_case_insensitive() {
        assert_eq!(
            parse_review("everything fine, no errors here").status,
            ErrorStatus::NoErrors
        );
    }

    #[test]
    fn empty_reply_is_unknown() {
        assert_eq!(parse_review("   \n").status, ErrorStatus::Unknown);
    }

    #[test]
    fn missing_fields_come_back_unparsed() {
        let report = parse_review("Looks broken to me.");

        assert_eq!(report.status, ErrorStatus::ErrorsFound);
        assert_eq!(report.corrected_code, Extracted::Unparsed);
        assert_eq!(report.time_complexity, Extracted::Unparsed);
        assert_eq!(report.space_complexity, Extracted::Unparsed);
    }

    #[test]
    fn no_corrections_block_is_not_a_correction() {
        let reply = "**CORRECTED CODE:**\n```python\nNo corrections needed\n```";
        assert_eq!(parse_review(reply).corrected_code, Extracted::Unparsed);
    }

    #[test]
    fn complexity_regex_tolerates_markdown_bold() {
        let reply = "**TIME COMPLEXITY:** O(n log n)\n**SPACE COMPLEXITY:** O( n )";
        let report = parse_review(reply);
        assert_eq!(
            report.time_complexity,
            Extracted::Parsed("O(n log n)".to_string())
        );
        assert_eq!(report.space_complexity, Extracted::Parsed("O(n)".to_string()));
    }

    #[test]
    fn summary_skips_fences_and_caps_at_five_lines() {
        let reply = "line one\n```\ncode\n```\nline two\n\nline three\nline four\nline five\nline six";
        let summary = summarize(reply);

        assert!(summary.contains("line one"));
        assert!(!summary.contains("```"));
        // ten-line scan window stops before "line six"
        assert!(!summary.contains("line six"));
        assert!(summary.ends_with("...(See full analysis above)"));
    }
}
