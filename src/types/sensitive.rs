use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use validator::ValidateLength;

/// Keeps raw credential material in memory without letting it leak
/// through `Debug` or `Display` output. Span fields, error reports and
/// dumped configuration all render it as `<hidden>`.
#[derive(Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T: AsRef<str>> Sensitive<T> {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl<T> Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("<hidden>").finish()
    }
}

impl<T> Display for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("<hidden>").finish()
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl From<&str> for Sensitive<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// lets length rules from the validator derive apply to wrapped secrets
impl ValidateLength<u64> for Sensitive<String> {
    fn length(&self) -> Option<u64> {
        Some(self.0.chars().count() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::Sensitive;

    #[test]
    fn formatting_hides_the_value() {
        let value = Sensitive::new("hunter2".to_string());
        assert_eq!(format!("{value:?}"), "<hidden>");
        assert_eq!(value.to_string(), "<hidden>");
        assert_eq!(value.as_str(), "hunter2");
    }

    #[test]
    fn deserializes_transparently() {
        let value: Sensitive<String> = serde_json::from_str("\"hunter2\"").unwrap();
        assert_eq!(value.as_str(), "hunter2");
    }
}
