use serde_json::{Map, Value};
use thiserror::Error;

/// Raw JSON object as received from a client.
pub type Fields = Map<String, Value>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unexpected fields not allowed: {}", .0.join(", "))]
    ExtraFields(Vec<String>),

    #[error("{0}")]
    ImmutableField(&'static str),

    #[error("{0}")]
    MissingField(&'static str),

    #[error("Validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ValidationError {
    /// Individual rule messages, empty for the allow-list failures.
    pub fn messages(&self) -> &[String] {
        match self {
            ValidationError::Invalid(messages) => messages,
            _ => &[],
        }
    }
}

/// Collects rule failures while a document is being checked.
#[derive(Default)]
pub(crate) struct Report {
    errors: Vec<String>,
}

impl Report {
    pub fn fail(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Trimmed string field. Missing, null and blank all count as absent.
    pub fn text(&mut self, value: Option<&Value>, label: &str) -> Option<String> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Some(_) => {
                self.fail(format!("{label} must be a string"));
                None
            }
        }
    }

    pub fn required_text(
        &mut self,
        value: Option<&Value>,
        label: &str,
        missing: &str,
    ) -> Option<String> {
        let text = self.text(value, label);
        let was_invalid_type = matches!(value, Some(v) if !v.is_string() && !v.is_null());

        if text.is_none() && !was_invalid_type {
            self.fail(missing);
        }

        text
    }

    pub fn length(&mut self, text: &str, min: usize, max: usize, too_short: &str, too_long: &str) {
        let count = text.chars().count();

        if count < min {
            self.fail(too_short);
        } else if count > max {
            self.fail(too_long);
        }
    }

    /// Number field, also accepting numeric strings.
    pub fn number(&mut self, value: Option<&Value>, invalid: &str) -> Option<f64> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => {
                    self.fail(invalid);
                    None
                }
            },
            Some(_) => {
                self.fail(invalid);
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_trims_and_treats_blank_as_missing() {
        let mut report = Report::default();

        assert_eq!(report.text(Some(&json!("  hi  ")), "Title"), Some("hi".into()));
        assert_eq!(report.text(Some(&json!("   ")), "Title"), None);
        assert_eq!(report.text(None, "Title"), None);
        assert!(report.finish().is_ok());
    }

    #[test]
    fn test_required_text_reports_type_once() {
        let mut report = Report::default();

        assert_eq!(report.required_text(Some(&json!(42)), "Title", "Title is required"), None);

        assert_eq!(
            report.finish(),
            Err(ValidationError::Invalid(vec!["Title must be a string".into()]))
        );
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let mut report = Report::default();

        assert_eq!(report.number(Some(&json!("12.5")), "bad"), Some(12.5));
        assert_eq!(report.number(Some(&json!(3)), "bad"), Some(3.0));
        assert_eq!(report.number(Some(&json!("abc")), "bad"), None);
        assert_eq!(report.finish(), Err(ValidationError::Invalid(vec!["bad".into()])));
    }

    #[test]
    fn test_error_messages() {
        let extra = ValidationError::ExtraFields(vec!["a".into(), "b".into()]);
        assert_eq!(extra.to_string(), "Unexpected fields not allowed: a, b");
        assert!(extra.messages().is_empty());

        let invalid = ValidationError::Invalid(vec!["x".into(), "y".into()]);
        assert_eq!(invalid.to_string(), "Validation failed: x; y");
        assert_eq!(invalid.messages().len(), 2);
    }
}
