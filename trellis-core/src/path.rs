//! Data-path tracking.
//!
//! Every validation error carries the absolute path of the failing value
//! within the input, as a sequence of segments. Paths render in the
//! familiar `data['a'][0]` form; synthetic group segments (used by
//! exclusion/inclusion group errors) render as `[<group>]`.

use crate::value::Value;
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// One step into the nested input data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key (or an object attribute name).
    Key(Value),
    /// A sequence index.
    Index(usize),
    /// A synthetic segment naming a cross-key group.
    Group(String),
}

impl PathSegment {
    /// Shorthand for a string key segment.
    #[must_use]
    pub fn key(k: impl Into<Value>) -> Self {
        PathSegment::Key(k.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(v) => write!(f, "[{v}]"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Group(g) => write!(f, "[<{g}>]"),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        PathSegment::Key(Value::from(s))
    }
}

/// Render a path as `data['a'][0]`; the empty path renders as the empty
/// string so error messages can append it unconditionally.
#[must_use]
pub fn format_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::from("data");
    for segment in path {
        out.push_str(&segment.to_string());
    }
    out
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathSegment::Key(v) => v.serialize(serializer),
            PathSegment::Index(i) => serializer.serialize_u64(*i as u64),
            PathSegment::Group(g) => serializer.serialize_str(&format!("<{g}>")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_keys_and_indexes() {
        let path = vec![
            PathSegment::key("a"),
            PathSegment::Index(0),
            PathSegment::Key(Value::Int(3)),
        ];
        assert_eq!(format_path(&path), "data['a'][0][3]");
    }

    #[test]
    fn renders_group_segments() {
        let path = vec![PathSegment::Group("stuff".into())];
        assert_eq!(format_path(&path), "data[<stuff>]");
    }

    #[test]
    fn empty_path_is_empty() {
        assert_eq!(format_path(&[]), "");
    }
}
