//! Date and datetime format validators.

use chrono::{NaiveDate, NaiveDateTime};
use trellis_core::{CustomValidator, ErrorKind, Node, Value, ValidationError};

/// Validate that the value is a string matching a datetime format.
#[derive(Debug, Clone)]
pub struct Datetime {
    format: String,
    msg: Option<String>,
}

impl Datetime {
    /// ISO-8601-ish default: `%Y-%m-%dT%H:%M:%S%.fZ`.
    pub const DEFAULT_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%.fZ";

    /// Use the default format.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: Self::DEFAULT_FORMAT.to_string(),
            msg: None,
        }
    }

    /// Use a custom chrono format string.
    #[must_use]
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            msg: None,
        }
    }

    /// Replace the failure message.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Default for Datetime {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Datetime> for Node {
    fn from(validator: Datetime) -> Node {
        Node::Custom(CustomValidator::new("datetime", move |value: &Value| {
            let ok = value
                .as_str()
                .is_some_and(|s| NaiveDateTime::parse_from_str(s, &validator.format).is_ok());
            if ok {
                Ok(value.clone())
            } else {
                let message = validator.msg.clone().unwrap_or_else(|| {
                    format!(
                        "value does not match expected format {}",
                        validator.format
                    )
                });
                Err(ValidationError::new(ErrorKind::Pattern, message).into())
            }
        }))
    }
}

/// Validate that the value is a string matching a date format.
#[derive(Debug, Clone)]
pub struct Date {
    format: String,
    msg: Option<String>,
}

impl Date {
    /// The default format: `%Y-%m-%d`.
    pub const DEFAULT_FORMAT: &'static str = "%Y-%m-%d";

    /// Use the default format.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: Self::DEFAULT_FORMAT.to_string(),
            msg: None,
        }
    }

    /// Use a custom chrono format string.
    #[must_use]
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            msg: None,
        }
    }

    /// Replace the failure message.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Date> for Node {
    fn from(validator: Date) -> Node {
        Node::Custom(CustomValidator::new("date", move |value: &Value| {
            let ok = value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, &validator.format).is_ok());
            if ok {
                Ok(value.clone())
            } else {
                let message = validator.msg.clone().unwrap_or_else(|| {
                    format!(
                        "value does not match expected format {}",
                        validator.format
                    )
                });
                Err(ValidationError::new(ErrorKind::Pattern, message).into())
            }
        }))
    }
}

/// Shorthand for the default datetime validator.
#[must_use]
pub fn datetime() -> Node {
    Datetime::new().into()
}

/// Shorthand for the default date validator.
#[must_use]
pub fn date() -> Node {
    Date::new().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;

    #[test]
    fn datetime_parses_default_format() {
        let schema = Schema::new(datetime()).unwrap();
        assert!(schema
            .validate(&Value::from("2024-01-01T10:00:00.123Z"))
            .is_ok());
        assert!(schema.validate(&Value::from("not a date")).is_err());
        assert!(schema.validate(&Value::Int(1)).is_err());
    }

    #[test]
    fn date_supports_custom_formats() {
        let schema = Schema::new(Node::from(Date::with_format("%d/%m/%Y"))).unwrap();
        assert!(schema.validate(&Value::from("31/12/2024")).is_ok());
        assert!(schema.validate(&Value::from("2024-12-31")).is_err());
    }
}
