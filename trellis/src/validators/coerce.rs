//! Type coercion.

use super::text_of;
use trellis_core::{CustomValidator, ErrorKind, Kind, Node, Value, ValidationError};

/// Coerce a value to a target kind instead of merely checking it:
/// `Coerce::new(Kind::Int)` turns `"10"` into `10`.
#[derive(Debug, Clone)]
pub struct Coerce {
    kind: Kind,
    msg: Option<String>,
}

impl Coerce {
    /// Coerce to the given kind.
    #[must_use]
    pub fn new(kind: Kind) -> Self {
        Self { kind, msg: None }
    }

    /// Replace the failure message.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl From<Coerce> for Node {
    fn from(coerce: Coerce) -> Node {
        let Coerce { kind, msg } = coerce;
        Node::Custom(CustomValidator::new("coerce", move |value: &Value| {
            coerce_value(kind, value).ok_or_else(|| {
                let message = msg
                    .clone()
                    .unwrap_or_else(|| format!("expected {}", kind.display_name()));
                ValidationError::new(ErrorKind::Coerce, message).into()
            })
        }))
    }
}

/// Shorthand for [`Coerce::new`] as a node.
#[must_use]
pub fn coerce(kind: Kind) -> Node {
    Coerce::new(kind).into()
}

fn coerce_value(kind: Kind, value: &Value) -> Option<Value> {
    match kind {
        Kind::Int => match value {
            Value::Int(i) => Some(Value::Int(*i)),
            Value::Bool(b) => Some(Value::Int(i64::from(*b))),
            Value::Float(f) if f.is_finite() => Some(Value::Int(*f as i64)),
            Value::Str(s) => s.trim().parse::<i64>().ok().map(Value::Int),
            _ => None,
        },
        Kind::Float => match value {
            Value::Float(f) => Some(Value::Float(*f)),
            Value::Int(i) => Some(Value::Float(*i as f64)),
            Value::Bool(b) => Some(Value::Float(f64::from(u8::from(*b)))),
            Value::Str(s) => s.trim().parse::<f64>().ok().map(Value::Float),
            _ => None,
        },
        Kind::Str => Some(Value::Str(text_of(value))),
        Kind::Bool => Some(Value::Bool(value.is_truthy())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_strings_to_integers() {
        assert_eq!(coerce_value(Kind::Int, &Value::from("10")), Some(Value::Int(10)));
        assert_eq!(coerce_value(Kind::Int, &Value::from("x")), None);
        assert_eq!(coerce_value(Kind::Int, &Value::Float(3.7)), Some(Value::Int(3)));
    }

    #[test]
    fn coerces_anything_to_string() {
        assert_eq!(
            coerce_value(Kind::Str, &Value::Int(5)),
            Some(Value::from("5"))
        );
        assert_eq!(
            coerce_value(Kind::Str, &Value::from("hi")),
            Some(Value::from("hi"))
        );
    }
}
