//! Default substitution validators.

use trellis_core::{CustomValidator, DefaultValue, Node, Value};

/// Substitute a default when the input is null; anything else passes
/// through unchanged.
#[derive(Debug, Clone)]
pub struct DefaultTo {
    default: DefaultValue,
}

impl DefaultTo {
    /// Use a stored value as the default.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            default: DefaultValue::Value(value.into()),
        }
    }

    /// Use a factory as the default, producing a fresh value per use.
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            default: DefaultValue::Factory(std::sync::Arc::new(factory)),
        }
    }
}

impl From<DefaultTo> for Node {
    fn from(validator: DefaultTo) -> Node {
        Node::Custom(CustomValidator::new("default_to", move |value: &Value| {
            if value.is_null() {
                Ok(validator.default.produce())
            } else {
                Ok(value.clone())
            }
        }))
    }
}

/// Replace the value unconditionally, ignoring the input.
#[derive(Debug, Clone)]
pub struct SetTo {
    value: DefaultValue,
}

impl SetTo {
    /// Always produce this value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: DefaultValue::Value(value.into()),
        }
    }
}

impl From<SetTo> for Node {
    fn from(validator: SetTo) -> Node {
        Node::Custom(CustomValidator::new("set_to", move |_: &Value| {
            Ok(validator.value.produce())
        }))
    }
}
