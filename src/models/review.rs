use chrono::{DateTime, Utc};
use serde::Serialize;

/// Verdict read out of the model's reply by substring heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorStatus {
    NoErrors,
    ErrorsFound,
    Unknown,
}

impl ErrorStatus {
    pub fn headline(&self) -> &'static str {
        match self {
            ErrorStatus::NoErrors => "No errors detected",
            ErrorStatus::ErrorsFound => "Errors found",
            ErrorStatus::Unknown => "Analysis inconclusive",
        }
    }
}

/// A field pulled out of free text. `Unparsed` means the reply did not
/// match the expected shape, which is not the same as the model saying
/// there was nothing to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    Parsed(T),
    Unparsed,
}

impl<T> Extracted<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Extracted::Parsed(_))
    }
}

impl Extracted<String> {
    pub fn display_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self {
            Extracted::Parsed(value) => value.as_str(),
            Extracted::Unparsed => placeholder,
        }
    }
}

/// Structured view of one analysis reply. Derived purely from the reply
/// text; the raw text is kept alongside the extracted fields.
#[derive(Debug, Clone)]
pub struct ReviewReport {
    pub raw_text: String,
    pub status: ErrorStatus,
    pub corrected_code: Extracted<String>,
    pub time_complexity: Extracted<String>,
    pub space_complexity: Extracted<String>,
    pub summary: String,
    pub completed_at: DateTime<Utc>,
}
