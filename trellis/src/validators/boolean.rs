//! Truthiness validators and human-readable boolean folding.

use trellis_core::{CustomValidator, ErrorKind, Node, Value, ValidationError};

/// Adapt a predicate into a validator: the value passes through unchanged
/// when the predicate holds, and fails with "not a valid value" otherwise.
pub fn truthy<F>(name: &'static str, predicate: F) -> Node
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Node::Custom(CustomValidator::new(name, move |value: &Value| {
        if predicate(value) {
            Ok(value.clone())
        } else {
            Err(ValidationError::new(ErrorKind::Value, "not a valid value").into())
        }
    }))
}

/// Assert that a value is truthy: empty containers, zero, the empty
/// string and null all fail.
#[must_use]
pub fn is_true() -> Node {
    Node::Custom(CustomValidator::new("is_true", |value: &Value| {
        if value.is_truthy() {
            Ok(value.clone())
        } else {
            Err(ValidationError::new(ErrorKind::Value, "value was not true").into())
        }
    }))
}

/// Assert that a value is falsy.
#[must_use]
pub fn is_false() -> Node {
    Node::Custom(CustomValidator::new("is_false", |value: &Value| {
        if value.is_truthy() {
            Err(ValidationError::new(ErrorKind::Value, "value was not false").into())
        } else {
            Ok(value.clone())
        }
    }))
}

/// Convert human-readable boolean values to a bool.
///
/// Accepted strings are `1`, `true`, `yes`, `on`, `enable` and their
/// negatives (`0`, `false`, `no`, `off`, `disable`), case-insensitively;
/// non-string values fold by truthiness.
#[must_use]
pub fn boolean() -> Node {
    Node::Custom(CustomValidator::new("boolean", |value: &Value| {
        match value {
            Value::Str(s) => match s.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" | "enable" => Ok(Value::Bool(true)),
                "0" | "false" | "no" | "off" | "disable" => Ok(Value::Bool(false)),
                _ => Err(ValidationError::new(ErrorKind::Coerce, "expected boolean").into()),
            },
            other => Ok(Value::Bool(other.is_truthy())),
        }
    }))
}
