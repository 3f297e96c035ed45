//! serde_json interop.
//!
//! JSON maps into the value model losslessly; the reverse direction is
//! lossy where JSON has no counterpart: tuples and sets become arrays,
//! instances become objects, and non-string mapping keys are stringified.

use crate::value::Value;
use indexmap::IndexMap;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => {
                let map: IndexMap<Value, Value> = fields
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect();
                Value::Map(map)
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Str(s) => serde_json::Value::String(s),
            Value::List(v) | Value::Tuple(v) | Value::Set(v) | Value::FrozenSet(v) => {
                serde_json::Value::Array(v.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(m) => {
                let mut fields = serde_json::Map::with_capacity(m.len());
                for (k, v) in m {
                    let key = match k {
                        Value::Str(s) => s,
                        other => other.to_string(),
                    };
                    fields.insert(key, serde_json::Value::from(v));
                }
                serde_json::Value::Object(fields)
            }
            Value::Object(o) => {
                let mut fields = serde_json::Map::with_capacity(o.attrs().len());
                for (k, v) in o.attrs() {
                    fields.insert(k.clone(), serde_json::Value::from(v.clone()));
                }
                serde_json::Value::Object(fields)
            }
        }
    }
}
