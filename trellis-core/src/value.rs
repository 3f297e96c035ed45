//! The dynamic value model validated by the engine.
//!
//! `Value` is a closed tagged union rather than `serde_json::Value` because
//! validation distinguishes lists from tuples, sets from frozen sets, and
//! allows non-string mapping keys. Numeric values compare across variants
//! (`true == 1 == 1.0`) with `Eq`, `Ord` and `Hash` kept mutually
//! consistent, so literal schemas and mapping-key lookups behave the same
//! way everywhere.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Type tags for [`Value`] variants, used by type-reference schema nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// The null value
    Null,
    /// Booleans
    Bool,
    /// 64-bit signed integers
    Int,
    /// 64-bit floats
    Float,
    /// Strings
    Str,
    /// Ordered, growable sequences
    List,
    /// Fixed sequences
    Tuple,
    /// Unordered unique collections
    Set,
    /// Immutable unordered unique collections
    FrozenSet,
    /// Ordered key-value mappings
    Map,
    /// Attribute-bearing instances
    Object,
}

impl Kind {
    /// Human-readable name used in "expected ..." error messages.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Kind::Null => "a null value",
            Kind::Bool => "a boolean",
            Kind::Int => "an integer",
            Kind::Float => "a float",
            Kind::Str => "a string",
            Kind::List => "a list",
            Kind::Tuple => "a tuple",
            Kind::Set => "a set",
            Kind::FrozenSet => "a frozenset",
            Kind::Map => "a dictionary",
            Kind::Object => "an object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An attribute-bearing instance: the attribute-based analogue of a mapping,
/// optionally tagged with a class name.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    class: Option<String>,
    attrs: IndexMap<String, Value>,
}

impl Instance {
    /// Create an instance with no class tag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance tagged with a class name.
    #[must_use]
    pub fn of_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            attrs: IndexMap::new(),
        }
    }

    /// Add an attribute, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set an attribute in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// The class tag, if any.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// The ordered attribute map.
    #[must_use]
    pub fn attrs(&self) -> &IndexMap<String, Value> {
        &self.attrs
    }

    /// Rebuild an instance from a validated attribute set, keeping the
    /// class tag.
    #[must_use]
    pub fn rebuilt(&self, attrs: IndexMap<String, Value>) -> Self {
        Self {
            class: self.class.clone(),
            attrs,
        }
    }

    fn sorted_attrs(&self) -> Vec<(&String, &Value)> {
        let mut pairs: Vec<_> = self.attrs.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.attrs == other.attrs
    }
}

impl Eq for Instance {}

impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        hash_unordered(self.attrs.iter(), state);
    }
}

impl PartialOrd for Instance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class
            .cmp(&other.class)
            .then_with(|| self.sorted_attrs().cmp(&other.sorted_attrs()))
    }
}

/// A dynamic value: the data being validated and the result of validation.
///
/// Mappings preserve insertion order; sets are held in a normalized
/// (sorted, deduplicated) form so equality is order-insensitive.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null value
    Null,
    /// A boolean
    Bool(bool),
    /// A 64-bit signed integer
    Int(i64),
    /// A 64-bit float
    Float(f64),
    /// A string
    Str(String),
    /// An ordered sequence
    List(Vec<Value>),
    /// A fixed sequence
    Tuple(Vec<Value>),
    /// An unordered unique collection
    Set(Vec<Value>),
    /// An immutable unordered unique collection
    FrozenSet(Vec<Value>),
    /// An ordered key-value mapping
    Map(IndexMap<Value, Value>),
    /// An attribute-bearing instance
    Object(Instance),
}

impl Value {
    /// The type tag of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Tuple(_) => Kind::Tuple,
            Value::Set(_) => Kind::Set,
            Value::FrozenSet(_) => Kind::FrozenSet,
            Value::Map(_) => Kind::Map,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Build a normalized set value.
    pub fn set<I>(items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Set(normalize_set(items))
    }

    /// Build a normalized frozenset value.
    pub fn frozen_set<I>(items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::FrozenSet(normalize_set(items))
    }

    /// Build a list value.
    pub fn list<I>(items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a tuple value.
    pub fn tuple<I>(items: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a mapping value from key-value pairs, keeping their order.
    pub fn map<K, V, I>(pairs: I) -> Value
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether the value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness: null, `false`, zero, the empty string and empty
    /// containers are falsy; everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(v) | Value::Tuple(v) | Value::Set(v) | Value::FrozenSet(v) => !v.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// The length of a string or container, if the value has one.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(v) | Value::Tuple(v) | Value::Set(v) | Value::FrozenSet(v) => Some(v.len()),
            Value::Map(m) => Some(m.len()),
            Value::Object(o) => Some(o.attrs().len()),
            _ => None,
        }
    }

    /// Borrow the value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the value as a mapping.
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the value as sequence elements (lists and tuples).
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) | Value::Tuple(v) => Some(v),
            _ => None,
        }
    }

    /// The numeric interpretation of booleans, integers and floats.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The exact integer interpretation: booleans, integers, and floats
    /// with no fractional part.
    fn canonical_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            Value::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => 1,
            Value::Str(_) => 2,
            Value::List(_) => 3,
            Value::Tuple(_) => 4,
            Value::Set(_) => 5,
            Value::FrozenSet(_) => 6,
            Value::Map(_) => 7,
            Value::Object(_) => 8,
        }
    }
}

fn normalize_set<I>(items: I) -> Vec<Value>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let mut elems: Vec<Value> = items.into_iter().map(Into::into).collect();
    elems.sort();
    elems.dedup();
    elems
}

/// Total order over floats: NaN compares equal to itself and after
/// everything else.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ord) => ord,
        None => match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => Ordering::Equal,
        },
    }
}

fn hash_unordered<'a, K, V, I, H>(pairs: I, state: &mut H)
where
    K: Hash + 'a,
    V: Hash + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
    H: Hasher,
{
    let mut acc: u64 = 0;
    for (k, v) in pairs {
        let mut h = DefaultHasher::new();
        k.hash(&mut h);
        v.hash(&mut h);
        acc = acc.wrapping_add(h.finish());
    }
    acc.hash(state);
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.rank() == 1 && other.rank() == 1 {
            return match (self.canonical_int(), other.canonical_int()) {
                (Some(a), Some(b)) => a == b,
                _ => {
                    let (a, b) = (
                        self.as_number().unwrap_or(f64::NAN),
                        other.as_number().unwrap_or(f64::NAN),
                    );
                    cmp_f64(a, b) == Ordering::Equal
                }
            };
        }
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b))
            | (Value::Tuple(a), Value::Tuple(b))
            | (Value::Set(a), Value::Set(b))
            | (Value::FrozenSet(a), Value::FrozenSet(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.rank() == 1 {
            // Numeric values that compare equal must hash equal, whatever
            // their variant.
            if let Some(i) = self.canonical_int() {
                (1u8, i).hash(state);
            } else if let Some(f) = self.as_number() {
                let bits = if f.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    f.to_bits()
                };
                (2u8, bits).hash(state);
            }
            return;
        }
        match self {
            Value::Null => 0u8.hash(state),
            Value::Str(s) => (3u8, s).hash(state),
            Value::List(v) => {
                4u8.hash(state);
                v.hash(state);
            }
            Value::Tuple(v) => {
                5u8.hash(state);
                v.hash(state);
            }
            Value::Set(v) => {
                6u8.hash(state);
                v.hash(state);
            }
            Value::FrozenSet(v) => {
                7u8.hash(state);
                v.hash(state);
            }
            Value::Map(m) => {
                8u8.hash(state);
                hash_unordered(m.iter(), state);
            }
            Value::Object(o) => {
                9u8.hash(state);
                o.hash(state);
            }
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => unreachable!(),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ra, rb) = (self.rank(), other.rank());
        if ra != rb {
            return ra.cmp(&rb);
        }
        if ra == 1 {
            return match (self.canonical_int(), other.canonical_int()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => cmp_f64(
                    self.as_number().unwrap_or(f64::NAN),
                    other.as_number().unwrap_or(f64::NAN),
                ),
            };
        }
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b))
            | (Value::Tuple(a), Value::Tuple(b))
            | (Value::Set(a), Value::Set(b))
            | (Value::FrozenSet(a), Value::FrozenSet(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => {
                let mut pa: Vec<_> = a.iter().collect();
                let mut pb: Vec<_> = b.iter().collect();
                pa.sort_by(|x, y| x.0.cmp(y.0));
                pb.sort_by(|x, y| x.0.cmp(y.0));
                pa.cmp(&pb)
            }
            (Value::Object(a), Value::Object(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "'{s}'"),
            Value::List(v) => write_seq(f, "[", v, "]"),
            Value::Tuple(v) => write_seq(f, "(", v, ")"),
            Value::Set(v) => write_seq(f, "{", v, "}"),
            Value::FrozenSet(v) => write_seq(f, "frozenset({", v, "})"),
            Value::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Object(o) => {
                f.write_str(o.class_name().unwrap_or("object"))?;
                f.write_str("(")?;
                for (i, (k, v)) in o.attrs().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Instance> for Value {
    fn from(o: Instance) -> Self {
        Value::Object(o)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(v) | Value::Tuple(v) | Value::Set(v) | Value::FrozenSet(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for item in v {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    match k {
                        Value::Str(s) => map.serialize_entry(s, v)?,
                        other => map.serialize_entry(&other.to_string(), v)?,
                    }
                }
                map.end()
            }
            Value::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.attrs().len()))?;
                for (k, v) in o.attrs() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn numeric_equality_crosses_variants() {
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(false), Value::Int(0));
        assert_ne!(Value::Bool(true), Value::Int(2));
        assert_ne!(Value::Int(1), Value::Float(1.5));
    }

    #[test]
    fn numeric_hash_is_consistent_with_equality() {
        assert_eq!(hash_of(&Value::Bool(true)), hash_of(&Value::Int(1)));
        assert_eq!(hash_of(&Value::Int(3)), hash_of(&Value::Float(3.0)));
    }

    #[test]
    fn map_lookup_uses_numeric_equality() {
        let m = Value::map([(Value::Int(1), Value::from("one"))]);
        let map = m.as_map().unwrap();
        assert_eq!(map.get(&Value::Bool(true)), Some(&Value::from("one")));
        assert_eq!(map.get(&Value::Float(1.0)), Some(&Value::from("one")));
    }

    #[test]
    fn sets_normalize_on_construction() {
        let a = Value::set([3, 1, 2, 1]);
        let b = Value::set([1, 2, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::list(Vec::<Value>::new()).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::Float(0.5).is_truthy());
    }

    #[test]
    fn map_equality_ignores_order() {
        let a = Value::map([("a", 1), ("b", 2)]);
        let b = Value::map([("b", 2), ("a", 1)]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::from("hi").to_string(), "'hi'");
        assert_eq!(Value::list([1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::tuple([1, 2]).to_string(), "(1, 2)");
        assert_eq!(Value::map([("a", 1)]).to_string(), "{'a': 1}");
    }
}
