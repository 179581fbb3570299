use serde::Serialize;
use thiserror::Error;

/// One rejected field from a form submission, addressed with a dotted
/// and indexed path such as `experiences[1].start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Client-visible error taxonomy. Every failure leaving the HTTP layer
/// maps to exactly one of these; the wire shape is `{"code": ...}` with
/// an optional `issues` list for rejected form bodies.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Error {
    #[error("Internal server error")]
    Internal,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Resource not found")]
    NotFound,
    #[error("Handle already taken")]
    HandleTaken,
    #[error("Invalid form body")]
    InvalidFormBody { issues: Vec<FieldIssue> },
    #[error("Upstream service failed")]
    Upstream,
}

impl Error {
    #[must_use]
    pub fn invalid_form(issues: Vec<FieldIssue>) -> Self {
        Self::InvalidFormBody { issues }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let value = serde_json::to_value(&Error::HandleTaken).unwrap();
        assert_eq!(value, serde_json::json!({ "code": "handle_taken" }));

        let value = serde_json::to_value(&Error::invalid_form(vec![FieldIssue::new(
            "handle",
            "too short",
        )]))
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "code": "invalid_form_body",
                "issues": [{ "field": "handle", "message": "too short" }],
            })
        );
    }
}
