//! Mapping-key markers and the `Extra` sentinel.
//!
//! A marker wraps a mapping (or object) schema key and adds handling:
//! required/optional with defaults, removal from the output, and
//! cross-key exclusion/inclusion groups. Markers are one variant type with
//! a kind tag; they order deterministically by the canonical string form
//! of their wrapped key, so required-key errors and merges are stable.

use crate::node::Node;
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// What a marker does to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkerKind {
    /// A bare key: required only when the schema compiles with
    /// required-by-default.
    Plain,
    /// The key must appear, unless a default synthesizes it.
    Required,
    /// The key may be absent; a default synthesizes it when given.
    Optional,
    /// A matched key (and its value) is dropped from the output.
    Remove,
    /// At most one key of the named group may appear.
    Exclusive,
    /// Either all keys of the named group appear, or none.
    Inclusive,
}

/// A default for an absent key: an eager value or a factory invoked per
/// validation call.
#[derive(Clone)]
pub enum DefaultValue {
    /// A stored value, cloned on use.
    Value(Value),
    /// A factory producing a fresh value on each use.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produce the default value.
    #[must_use]
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Value(v) => v.clone(),
            DefaultValue::Factory(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(v) => write!(f, "DefaultValue::Value({v})"),
            DefaultValue::Factory(_) => f.write_str("DefaultValue::Factory(..)"),
        }
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DefaultValue::Value(a), DefaultValue::Value(b)) => a == b,
            (DefaultValue::Factory(a), DefaultValue::Factory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A marked mapping-schema key.
#[derive(Debug, Clone)]
pub struct Marker {
    kind: MarkerKind,
    key: Box<Node>,
    msg: Option<String>,
    default: Option<DefaultValue>,
    group: Option<String>,
    description: Option<String>,
}

impl Marker {
    /// Wrap a key schema with a marker kind.
    #[must_use]
    pub fn new(kind: MarkerKind, key: impl Into<Node>) -> Self {
        Self {
            kind,
            key: Box::new(key.into()),
            msg: None,
            default: None,
            group: None,
            description: None,
        }
    }

    /// Replace shallow failure messages (and the required-key message)
    /// with a custom one.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    /// Synthesize this value when the key is absent.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Synthesize a factory-produced value when the key is absent.
    #[must_use]
    pub fn default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Factory(Arc::new(factory)));
        self
    }

    /// Attach a human-readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The marker kind.
    #[must_use]
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// The wrapped key schema.
    #[must_use]
    pub fn key_node(&self) -> &Node {
        &self.key
    }

    /// The custom message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    /// The default, if any.
    #[must_use]
    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// The exclusion/inclusion group name, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// The description, if any.
    #[must_use]
    pub fn describe(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The literal key value, when the wrapped key schema is a literal.
    #[must_use]
    pub fn literal_key(&self) -> Option<&Value> {
        match self.key_node() {
            Node::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// The canonical string form of the wrapped key, used for ordering,
    /// merge matching and duplicate detection.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        self.key_node().to_string()
    }

    fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.key == other.key
            && self.msg == other.msg
            && self.default == other.default
            && self.group == other.group
    }
}

impl Eq for Marker {}

impl Hash for Marker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.canonical_key().hash(state);
        self.msg.hash(state);
        self.group.hash(state);
    }
}

impl PartialOrd for Marker {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Marker {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_key()
            .cmp(&other.canonical_key())
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.msg.cmp(&other.msg))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key_node())
    }
}

/// Mark a key as required.
#[must_use]
pub fn required(key: impl Into<Node>) -> Marker {
    Marker::new(MarkerKind::Required, key)
}

/// Mark a key as optional.
#[must_use]
pub fn optional(key: impl Into<Node>) -> Marker {
    Marker::new(MarkerKind::Optional, key)
}

/// Mark a key for removal from the output.
#[must_use]
pub fn remove(key: impl Into<Node>) -> Marker {
    Marker::new(MarkerKind::Remove, key)
}

/// Mark a key as a member of an exclusion group: at most one member of the
/// group may appear.
#[must_use]
pub fn exclusive(key: impl Into<Node>, group: impl Into<String>) -> Marker {
    Marker::new(MarkerKind::Exclusive, key).with_group(group)
}

/// Mark a key as a member of an inclusion group: either all members appear
/// or none.
#[must_use]
pub fn inclusive(key: impl Into<Node>, group: impl Into<String>) -> Marker {
    Marker::new(MarkerKind::Inclusive, key).with_group(group)
}

/// A mapping-schema key: the pass-through `Extra` sentinel, or a marked
/// key schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Accepts any key not matched by other candidates, passing key and
    /// value through unchanged. Usable only as a mapping key.
    Extra,
    /// A marked key schema; bare keys wrap as [`MarkerKind::Plain`].
    Marker(Marker),
}

impl Key {
    /// The marker, unless this is the `Extra` sentinel.
    #[must_use]
    pub fn marker(&self) -> Option<&Marker> {
        match self {
            Key::Extra => None,
            Key::Marker(m) => Some(m),
        }
    }

    /// The literal key value, when this is a literal-keyed marker.
    #[must_use]
    pub fn literal(&self) -> Option<&Value> {
        self.marker().and_then(Marker::literal_key)
    }

    /// Canonical string form used for merge matching.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Key::Extra => "<extra>".to_string(),
            Key::Marker(m) => m.canonical_key(),
        }
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Extra => 0u8.hash(state),
            Key::Marker(m) => {
                1u8.hash(state);
                m.hash(state);
            }
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Extra, Key::Extra) => Ordering::Equal,
            // Extra always sorts (and is tried) last.
            (Key::Extra, Key::Marker(_)) => Ordering::Greater,
            (Key::Marker(_), Key::Extra) => Ordering::Less,
            (Key::Marker(a), Key::Marker(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Extra => f.write_str("Extra"),
            Key::Marker(m) => write!(f, "{m}"),
        }
    }
}

impl From<Marker> for Key {
    fn from(marker: Marker) -> Self {
        Key::Marker(marker)
    }
}

impl From<Node> for Key {
    fn from(node: Node) -> Self {
        Key::Marker(Marker::new(MarkerKind::Plain, node))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::from(Node::Literal(Value::from(s)))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::from(Node::Literal(Value::from(s)))
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::from(Node::Literal(Value::from(i)))
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::from(Node::Literal(Value::from(i)))
    }
}

impl From<Value> for Key {
    fn from(v: Value) -> Self {
        Key::from(Node::Literal(v))
    }
}

impl From<crate::value::Kind> for Key {
    fn from(kind: crate::value::Kind) -> Self {
        Key::from(Node::Type(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_sort_alphabetically_by_key() {
        let foo = required("foo");
        let bar = required("bar");
        let mut items = vec![foo.clone(), bar.clone()];
        items.sort();
        assert_eq!(items, vec![bar, foo]);
    }

    #[test]
    fn extra_sorts_last() {
        let mut keys = vec![Key::Extra, Key::from("toaster")];
        keys.sort();
        assert_eq!(keys.last(), Some(&Key::Extra));
        assert_eq!(keys[0].canonical(), "'toaster'");
    }

    #[test]
    fn marker_equality_tracks_kind() {
        assert_eq!(required("x"), required("x"));
        assert_ne!(required("x"), required("y"));
        assert_ne!(required("x"), optional("x"));
    }

    #[test]
    fn defaults_produce_values() {
        let m = optional("k").default_value(5);
        assert_eq!(m.default().unwrap().produce(), Value::Int(5));
        let f = optional("k").default_factory(|| Value::list(Vec::<Value>::new()));
        assert_eq!(f.default().unwrap().produce(), Value::List(vec![]));
    }
}
