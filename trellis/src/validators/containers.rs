//! Membership, equality, uniqueness and set-building validators.

use std::collections::BTreeSet;
use trellis_core::{CustomValidator, ErrorKind, Node, Value, ValidationError};

fn sorted_rendering(values: &[Value]) -> String {
    let mut sorted = values.to_vec();
    sorted.sort();
    let items: Vec<String> = sorted.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// The value must be a member of the container.
#[derive(Debug, Clone)]
pub struct In {
    container: Vec<Value>,
    msg: Option<String>,
}

impl In {
    /// Accept any of the given values.
    pub fn new<I>(container: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            container: container.into_iter().map(Into::into).collect(),
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

impl From<In> for Node {
    fn from(validator: In) -> Node {
        Node::Custom(CustomValidator::new("in", move |value: &Value| {
            if validator.container.contains(value) {
                Ok(value.clone())
            } else {
                let message = validator.msg.clone().unwrap_or_else(|| {
                    format!(
                        "value must be one of {}",
                        sorted_rendering(&validator.container)
                    )
                });
                Err(ValidationError::new(ErrorKind::Value, message).into())
            }
        }))
    }
}

/// The value must not be a member of the container.
#[derive(Debug, Clone)]
pub struct NotIn {
    container: Vec<Value>,
    msg: Option<String>,
}

impl NotIn {
    /// Reject any of the given values.
    pub fn new<I>(container: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            container: container.into_iter().map(Into::into).collect(),
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

impl From<NotIn> for Node {
    fn from(validator: NotIn) -> Node {
        Node::Custom(CustomValidator::new("not_in", move |value: &Value| {
            if validator.container.contains(value) {
                let message = validator.msg.clone().unwrap_or_else(|| {
                    format!(
                        "value must not be one of {}",
                        sorted_rendering(&validator.container)
                    )
                });
                Err(ValidationError::new(ErrorKind::Value, message).into())
            } else {
                Ok(value.clone())
            }
        }))
    }
}

/// The value (a sequence, set or string) must contain the given item.
#[derive(Debug, Clone)]
pub struct Contains {
    item: Value,
    msg: Option<String>,
}

impl Contains {
    /// Require the given item to be present.
    pub fn new(item: impl Into<Value>) -> Self {
        Self {
            item: item.into(),
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

impl From<Contains> for Node {
    fn from(validator: Contains) -> Node {
        Node::Custom(CustomValidator::new("contains", move |value: &Value| {
            let found = match value {
                Value::List(items)
                | Value::Tuple(items)
                | Value::Set(items)
                | Value::FrozenSet(items) => items.contains(&validator.item),
                Value::Str(s) => validator
                    .item
                    .as_str()
                    .map_or(false, |needle| s.contains(needle)),
                _ => false,
            };
            if found {
                Ok(value.clone())
            } else {
                let message = validator
                    .msg
                    .clone()
                    .unwrap_or_else(|| "value is not allowed".to_string());
                Err(ValidationError::new(ErrorKind::Value, message).into())
            }
        }))
    }
}

/// The value must equal the target exactly (no validator semantics: the
/// target is a plain value, never a schema).
#[derive(Debug, Clone)]
pub struct Equal {
    target: Value,
    msg: Option<String>,
}

impl Equal {
    /// Require equality with the target.
    pub fn new(target: impl Into<Value>) -> Self {
        Self {
            target: target.into(),
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

impl From<Equal> for Node {
    fn from(validator: Equal) -> Node {
        Node::Custom(CustomValidator::new("equal", move |value: &Value| {
            if *value == validator.target {
                Ok(value.clone())
            } else {
                let message = validator
                    .msg
                    .clone()
                    .unwrap_or_else(|| format!("value is not equal to {}", validator.target));
                Err(ValidationError::new(ErrorKind::Value, message).into())
            }
        }))
    }
}

/// Ensure a sequence (or string) contains no duplicate items.
#[must_use]
pub fn unique() -> Node {
    Node::Custom(CustomValidator::new("unique", |value: &Value| {
        let items: Vec<Value> = match value {
            Value::List(items) | Value::Tuple(items) => items.clone(),
            Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
            Value::Set(_) | Value::FrozenSet(_) => return Ok(value.clone()),
            _ => {
                return Err(ValidationError::new(
                    ErrorKind::Value,
                    "invalid value or type (must be iterable)",
                )
                .into())
            }
        };
        let mut seen: BTreeSet<&Value> = BTreeSet::new();
        let mut dupes: Vec<Value> = Vec::new();
        for item in &items {
            if !seen.insert(item) && !dupes.contains(item) {
                dupes.push(item.clone());
            }
        }
        if dupes.is_empty() {
            Ok(value.clone())
        } else {
            Err(ValidationError::new(
                ErrorKind::Value,
                format!("contains duplicate items: {}", sorted_rendering(&dupes)),
            )
            .into())
        }
    }))
}

/// Convert a list or tuple into a set value.
#[must_use]
pub fn to_set() -> Node {
    Node::Custom(CustomValidator::new("to_set", |value: &Value| {
        match value {
            Value::List(items) | Value::Tuple(items) => Ok(Value::set(items.clone())),
            Value::Set(_) => Ok(value.clone()),
            Value::FrozenSet(items) => Ok(Value::set(items.clone())),
            _ => Err(
                ValidationError::new(ErrorKind::Coerce, "cannot be presented as set").into(),
            ),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;

    #[test]
    fn in_reports_sorted_container() {
        let schema = Schema::new(In::new(["red", "blue", "yellow"])).unwrap();
        assert!(schema.validate(&Value::from("blue")).is_ok());
        let errors = schema.validate(&Value::from("orange")).unwrap_err();
        assert_eq!(
            errors.message(),
            "value must be one of ['blue', 'red', 'yellow']"
        );
    }

    #[test]
    fn unique_reports_duplicates() {
        let schema = Schema::new(unique()).unwrap();
        assert!(schema.validate(&Value::list([1, 2])).is_ok());
        let errors = schema.validate(&Value::list([1, 1, 2])).unwrap_err();
        assert_eq!(errors.message(), "contains duplicate items: [1]");
        let errors = schema.validate(&Value::from("aabbc")).unwrap_err();
        assert_eq!(errors.message(), "contains duplicate items: ['a', 'b']");
    }

    #[test]
    fn to_set_converts_lists() {
        let schema = Schema::new(to_set()).unwrap();
        assert_eq!(
            schema.validate(&Value::list([2, 1, 2])),
            Ok(Value::set([1, 2]))
        );
        assert!(schema.validate(&Value::Int(3)).is_err());
    }
}
