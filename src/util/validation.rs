use chrono::NaiveDate;
use error_stack::Report;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::types::error::FieldIssue;

// the pattern is a constant and known to compile
#[allow(clippy::expect_used)]
static HANDLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("compile handle regex"));

const HANDLE_MIN: usize = 3;
const HANDLE_MAX: usize = 40;

/// Handles become public URL path segments, so the alphabet stays
/// restricted to letters, digits and dashes. Mixed case is accepted on
/// input; persistence lowercases before writing.
pub fn is_valid_handle(handle: &str) -> bool {
    (HANDLE_MIN..=HANDLE_MAX).contains(&handle.len()) && HANDLE_REGEX.is_match(handle)
}

pub fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn is_valid_handle_str(value: &str) -> Result<(), ValidationError> {
    if is_valid_handle(value) {
        Ok(())
    } else {
        Err(invalid(
            "handle",
            "must be 3-40 characters of letters, numbers and dashes",
        ))
    }
}

pub fn is_absolute_url_str(value: &str) -> Result<(), ValidationError> {
    if is_absolute_url(value) {
        Ok(())
    } else {
        Err(invalid("url", "must be a valid absolute URL"))
    }
}

/// Link fields accept the empty string as "no link", matching the way
/// the edit form clears them.
pub fn is_link_url_str(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Ok(())
    } else {
        is_absolute_url_str(value)
    }
}

pub fn is_valid_date_str(value: &str) -> Result<(), ValidationError> {
    if parse_date(value).is_some() {
        Ok(())
    } else {
        Err(invalid("date", "must be a date in YYYY-MM-DD form"))
    }
}

/// Flattens nested [`ValidationErrors`] into field-level issues with
/// dotted and indexed paths, e.g. `experiences[1].start_date`.
pub fn collect_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    fn walk(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldIssue>) {
        for (field, kind) in errors.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            };

            match kind {
                ValidationErrorsKind::Field(list) => {
                    for err in list {
                        let message = err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string());
                        out.push(FieldIssue {
                            field: path.clone(),
                            message,
                        });
                    }
                }
                ValidationErrorsKind::Struct(inner) => walk(&path, inner, out),
                ValidationErrorsKind::List(map) => {
                    for (index, inner) in map {
                        walk(&format!("{path}[{index}]"), inner, out);
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    walk("", errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

#[derive(Debug, Error)]
#[error("Invalid given data")]
pub struct InvalidData;

pub trait IntoValidationReport<T> {
    fn into_validation_report(self) -> error_stack::Result<T, InvalidData>;
}

impl<T> IntoValidationReport<T> for Result<T, ValidationErrors> {
    fn into_validation_report(self) -> error_stack::Result<T, InvalidData> {
        self.map_err(|errors| {
            let mut report = Report::new(InvalidData);
            for issue in collect_issues(&errors) {
                report = report.attach_printable(format!("{}: {}", issue.field, issue.message));
            }
            report
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{is_absolute_url, is_valid_handle, parse_date};

    #[test]
    fn test_is_valid_handle() {
        assert!(is_valid_handle("ada-dev"));
        assert!(is_valid_handle("Ada-Dev"));
        assert!(is_valid_handle("a-1"));

        assert!(!is_valid_handle("ab"));
        assert!(!is_valid_handle("ada dev"));
        assert!(!is_valid_handle("ada_dev"));
        assert!(!is_valid_handle(&"a".repeat(41)));
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://example.com/jobs/1"));
        assert!(!is_absolute_url("/jobs/1"));
        assert!(!is_absolute_url("not a url"));
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2022-01-01").is_some());
        assert!(parse_date("2022-13-01").is_none());
        assert!(parse_date("January 1st").is_none());
    }
}
