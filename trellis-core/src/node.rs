//! The schema-node tree.
//!
//! A schema is a tree of [`Node`]s built programmatically: literals compare
//! by equality, type references check the value kind, custom validators are
//! named functions that may transform the value, and composite nodes
//! (mappings, sequences, sets, objects) recurse. Combinators layer on top:
//! sequential AND (`all`), first-match OR (`any`/`union`), N-of-M
//! (`some_of`), multiset matching (`unordered`), positional matching
//! (`exact_sequence`), message overrides (`msg`) and self-reference
//! (`self_ref`).
//!
//! The tree is a closed enum compiled by exhaustive match; there is no
//! runtime type probing.

use crate::error::{SchemaError, ValidationErrors};
use crate::marker::{Key, Marker};
use crate::value::{Kind, Value};
use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The callable-validator contract: a function from value to transformed
/// value or structured errors. Error paths are relative to the validated
/// value; the engine prepends the enclosing path. A plain failure is a
/// single error converted with `.into()`; an embedded schema propagates its
/// whole aggregate.
pub type ValidatorFn = dyn Fn(&Value) -> Result<Value, ValidationErrors> + Send + Sync;

/// A named custom validator. Two custom validators compare equal when they
/// share both name and function identity.
#[derive(Clone)]
pub struct CustomValidator {
    name: Cow<'static, str>,
    func: Arc<ValidatorFn>,
}

impl CustomValidator {
    /// Wrap a function as a named validator.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ValidationErrors> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The validator name, used in schema rendering.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the validator.
    ///
    /// # Errors
    ///
    /// Returns the validator's own errors; the caller extends their paths.
    pub fn invoke(&self, value: &Value) -> Result<Value, ValidationErrors> {
        (self.func)(value)
    }

    fn func_addr(&self) -> usize {
        Arc::as_ptr(&self.func).cast::<()>() as usize
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomValidator({})", self.name)
    }
}

impl PartialEq for CustomValidator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

impl Eq for CustomValidator {}

impl Hash for CustomValidator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.func_addr().hash(state);
    }
}

/// Shared payload of the simple combinators: wrapped schemas, an optional
/// message override, and the required-by-default flag the sub-schemas are
/// compiled under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combinator {
    /// The wrapped schemas, in trial order.
    pub schemas: Vec<Node>,
    /// Message replacing shallow failures, when set.
    pub msg: Option<String>,
    /// Required-by-default flag for compiling the wrapped schemas.
    pub required: bool,
}

impl Combinator {
    fn new(schemas: Vec<Node>) -> Self {
        Self {
            schemas,
            msg: None,
            required: false,
        }
    }
}

/// A discriminant narrows a union's candidate list before alternatives are
/// tried: given the value and the candidate schemas, it returns the indices
/// worth trying. A disambiguation hook, not a correctness requirement.
#[derive(Clone)]
pub struct Discriminant(Arc<dyn Fn(&Value, &[Node]) -> Vec<usize> + Send + Sync>);

impl Discriminant {
    /// Wrap a narrowing function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Node]) -> Vec<usize> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Apply the narrowing function.
    #[must_use]
    pub fn narrow(&self, value: &Value, schemas: &[Node]) -> Vec<usize> {
        (self.0)(value, schemas)
    }
}

impl fmt::Debug for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Discriminant(..)")
    }
}

impl PartialEq for Discriminant {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Discriminant {}

/// First-match OR with an optional discriminant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionSchema {
    /// The alternatives, in trial order.
    pub schemas: Vec<Node>,
    /// Message replacing the best underlying error, when set.
    pub msg: Option<String>,
    /// Required-by-default flag for compiling the alternatives.
    pub required: bool,
    /// Optional candidate narrowing.
    pub discriminant: Option<Discriminant>,
}

impl UnionSchema {
    /// Attach a discriminant, builder style.
    #[must_use]
    pub fn with_discriminant(mut self, discriminant: Discriminant) -> Self {
        self.discriminant = Some(discriminant);
        self
    }
}

/// N-of-M: at least `min_valid` and at most `max_valid` of the wrapped
/// validators must pass. At least one bound must be given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SomeOfSchema {
    /// The validators, all of which run.
    pub schemas: Vec<Node>,
    /// Minimum number of validators that must pass.
    pub min_valid: Option<usize>,
    /// Maximum number of validators that may pass.
    pub max_valid: Option<usize>,
    /// Message replacing the default failure report, when set.
    pub msg: Option<String>,
    /// Required-by-default flag for compiling the validators.
    pub required: bool,
}

/// An attribute-based mapping schema, optionally restricted to a class.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    /// Required class tag of the instance, if restricted.
    pub class: Option<String>,
    /// Attribute schema entries.
    pub entries: Vec<(Key, Node)>,
}

/// One unit of the validation specification tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An exact value, compared by (cross-variant numeric) equality.
    Literal(Value),
    /// A type reference, checked strictly by value kind.
    Type(Kind),
    /// A named callable validator.
    Custom(CustomValidator),
    /// A marker used outside key position (e.g. `remove` inside a list).
    Marker(Box<Marker>),
    /// An ordered mapping schema.
    Mapping(Vec<(Key, Node)>),
    /// A list schema: alternatives acceptable for each element.
    List(Vec<Node>),
    /// A tuple schema: alternatives acceptable for each element.
    Tuple(Vec<Node>),
    /// A set schema: allowed element shapes.
    Set(Vec<Node>),
    /// A frozenset schema: allowed element shapes.
    FrozenSet(Vec<Node>),
    /// An attribute-based mapping schema.
    Object(ObjectSchema),
    /// Sequential AND: pipe the value through every schema.
    All(Combinator),
    /// First-match OR with deepest-error tie-breaking.
    Any(Combinator),
    /// First-match OR with optional discriminant narrowing.
    Union(UnionSchema),
    /// N-of-M combinator.
    SomeOf(SomeOfSchema),
    /// Fixed-length multiset matching.
    Unordered(Combinator),
    /// Positional fixed-length matching.
    ExactSequence(Combinator),
    /// Replace shallow failures of the wrapped schema with a message.
    Msg {
        /// The wrapped schema.
        node: Box<Node>,
        /// The replacement message.
        message: String,
    },
    /// A reference to the enclosing schema's root, resolved at validation
    /// time through the compiled facade.
    SelfRef,
}

impl Node {
    /// Build a mapping schema from ordered key/value pairs.
    pub fn mapping<K, N, I>(entries: I) -> Node
    where
        K: Into<Key>,
        N: Into<Node>,
        I: IntoIterator<Item = (K, N)>,
    {
        Node::Mapping(
            entries
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        )
    }

    /// Build a list schema from element alternatives.
    pub fn list<I>(items: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        Node::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a tuple schema from element alternatives.
    pub fn tuple<I>(items: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        Node::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a set schema from allowed element shapes.
    pub fn set<I>(items: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        Node::Set(items.into_iter().map(Into::into).collect())
    }

    /// Build a frozenset schema from allowed element shapes.
    pub fn frozen_set<I>(items: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        Node::FrozenSet(items.into_iter().map(Into::into).collect())
    }

    /// Build an attribute-based schema with no class restriction.
    pub fn object<K, N, I>(entries: I) -> Node
    where
        K: Into<Key>,
        N: Into<Node>,
        I: IntoIterator<Item = (K, N)>,
    {
        Node::Object(ObjectSchema {
            class: None,
            entries: entries
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        })
    }

    /// Build an attribute-based schema restricted to a class.
    pub fn object_of_class<K, N, I>(class: impl Into<String>, entries: I) -> Node
    where
        K: Into<Key>,
        N: Into<Node>,
        I: IntoIterator<Item = (K, N)>,
    {
        Node::Object(ObjectSchema {
            class: Some(class.into()),
            entries: entries
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        })
    }

    /// Set the message override on a combinator; any other node is wrapped
    /// in a message node.
    #[must_use]
    pub fn with_msg(self, message: impl Into<String>) -> Node {
        let message = message.into();
        match self {
            Node::All(mut c) => {
                c.msg = Some(message);
                Node::All(c)
            }
            Node::Any(mut c) => {
                c.msg = Some(message);
                Node::Any(c)
            }
            Node::Union(mut u) => {
                u.msg = Some(message);
                Node::Union(u)
            }
            Node::SomeOf(mut s) => {
                s.msg = Some(message);
                Node::SomeOf(s)
            }
            Node::Unordered(mut c) => {
                c.msg = Some(message);
                Node::Unordered(c)
            }
            Node::ExactSequence(mut c) => {
                c.msg = Some(message);
                Node::ExactSequence(c)
            }
            node => Node::Msg {
                node: Box::new(node),
                message,
            },
        }
    }

    /// Set the required-by-default flag under which a combinator's
    /// sub-schemas compile. No effect on other nodes.
    #[must_use]
    pub fn with_required(self, required: bool) -> Node {
        match self {
            Node::All(mut c) => {
                c.required = required;
                Node::All(c)
            }
            Node::Any(mut c) => {
                c.required = required;
                Node::Any(c)
            }
            Node::Union(mut u) => {
                u.required = required;
                Node::Union(u)
            }
            Node::SomeOf(mut s) => {
                s.required = required;
                Node::SomeOf(s)
            }
            Node::Unordered(mut c) => {
                c.required = required;
                Node::Unordered(c)
            }
            Node::ExactSequence(mut c) => {
                c.required = required;
                Node::ExactSequence(c)
            }
            node => node,
        }
    }

    /// Merge another mapping schema into this one: right-hand entries match
    /// left-hand entries by canonical key (marker kind ignored for the
    /// match, right-hand marker wins), nested mappings merge recursively,
    /// anything else is replaced; unmatched right-hand entries append.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ExtendNonMapping`] unless both nodes are
    /// mapping schemas.
    pub fn extend_mapping(&self, other: &Node) -> Result<Node, SchemaError> {
        match (self, other) {
            (Node::Mapping(left), Node::Mapping(right)) => {
                Ok(Node::Mapping(merge_entries(left, right)))
            }
            _ => Err(SchemaError::ExtendNonMapping),
        }
    }
}

fn merge_entries(left: &[(Key, Node)], right: &[(Key, Node)]) -> Vec<(Key, Node)> {
    let mut result: Vec<(Key, Node)> = left.to_vec();
    for (rk, rv) in right {
        let canonical = rk.canonical();
        if let Some(pos) = result.iter().position(|(k, _)| k.canonical() == canonical) {
            let merged = match (&result[pos].1, rv) {
                (Node::Mapping(lv), Node::Mapping(rn)) => Node::Mapping(merge_entries(lv, rn)),
                _ => rv.clone(),
            };
            result[pos] = (rk.clone(), merged);
        } else {
            result.push((rk.clone(), rv.clone()));
        }
    }
    result
}

/// Sequential AND: pipe the value through every schema in order.
pub fn all<I>(schemas: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::All(Combinator::new(schemas.into_iter().map(Into::into).collect()))
}

/// First-match OR: the first schema that accepts the value wins; on total
/// failure the deepest underlying error surfaces.
pub fn any<I>(schemas: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::Any(Combinator::new(schemas.into_iter().map(Into::into).collect()))
}

/// First-match OR with optional discriminant narrowing; see
/// [`UnionSchema::with_discriminant`].
pub fn union<I>(schemas: I) -> UnionSchema
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    UnionSchema {
        schemas: schemas.into_iter().map(Into::into).collect(),
        msg: None,
        required: false,
        discriminant: None,
    }
}

/// N-of-M: between `min_valid` and `max_valid` of the validators must pass.
/// Omitting both bounds is a compile-time schema error.
pub fn some_of<I>(
    schemas: I,
    min_valid: impl Into<Option<usize>>,
    max_valid: impl Into<Option<usize>>,
) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::SomeOf(SomeOfSchema {
        schemas: schemas.into_iter().map(Into::into).collect(),
        min_valid: min_valid.into(),
        max_valid: max_valid.into(),
        msg: None,
        required: false,
    })
}

/// Fixed-length multiset matching: every element must match a distinct
/// schema slot, in any order. Put the most specific schemas first.
pub fn unordered<I>(schemas: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::Unordered(Combinator::new(schemas.into_iter().map(Into::into).collect()))
}

/// Positional fixed-length matching: element `i` validates against schema
/// `i`; a length mismatch is an error.
pub fn exact_sequence<I>(schemas: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    Node::ExactSequence(Combinator::new(
        schemas.into_iter().map(Into::into).collect(),
    ))
}

/// Accept null or the wrapped schema.
pub fn maybe(node: impl Into<Node>) -> Node {
    any([Node::Literal(Value::Null), node.into()])
}

/// Replace shallow failures of the wrapped schema with a message.
pub fn msg(node: impl Into<Node>, message: impl Into<String>) -> Node {
    node.into().with_msg(message)
}

/// A reference to the enclosing schema's root.
#[must_use]
pub fn self_ref() -> Node {
    Node::SelfRef
}

impl From<UnionSchema> for Node {
    fn from(u: UnionSchema) -> Self {
        Node::Union(u)
    }
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        Node::Literal(v)
    }
}

impl From<Kind> for Node {
    fn from(k: Kind) -> Self {
        Node::Type(k)
    }
}

impl From<CustomValidator> for Node {
    fn from(v: CustomValidator) -> Self {
        Node::Custom(v)
    }
}

impl From<Marker> for Node {
    fn from(m: Marker) -> Self {
        Node::Marker(Box::new(m))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Literal(Value::from(b))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Literal(Value::from(i))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Literal(Value::from(i))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Literal(Value::from(f))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Literal(Value::from(s))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Literal(Value::from(s))
    }
}

fn entries_eq(a: &[(Key, Node)], b: &[(Key, Node)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    for (ka, na) in a {
        let mut found = false;
        for (i, (kb, nb)) in b.iter().enumerate() {
            if !used[i] && ka == kb && na == nb {
                used[i] = true;
                found = true;
                break;
            }
        }
        if !found {
            return false;
        }
    }
    true
}

fn hash_entries_unordered<H: Hasher>(entries: &[(Key, Node)], state: &mut H) {
    let mut acc: u64 = 0;
    for (k, n) in entries {
        let mut h = DefaultHasher::new();
        k.hash(&mut h);
        n.hash(&mut h);
        acc = acc.wrapping_add(h.finish());
    }
    entries.len().hash(state);
    acc.hash(state);
}

impl PartialEq for ObjectSchema {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && entries_eq(&self.entries, &other.entries)
    }
}

impl Eq for ObjectSchema {}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Literal(a), Node::Literal(b)) => a == b,
            (Node::Type(a), Node::Type(b)) => a == b,
            (Node::Custom(a), Node::Custom(b)) => a == b,
            (Node::Marker(a), Node::Marker(b)) => a == b,
            // Mapping equality is order-insensitive, like the mappings it
            // validates.
            (Node::Mapping(a), Node::Mapping(b)) => entries_eq(a, b),
            (Node::List(a), Node::List(b))
            | (Node::Tuple(a), Node::Tuple(b))
            | (Node::Set(a), Node::Set(b))
            | (Node::FrozenSet(a), Node::FrozenSet(b)) => a == b,
            (Node::Object(a), Node::Object(b)) => a == b,
            (Node::All(a), Node::All(b))
            | (Node::Any(a), Node::Any(b))
            | (Node::Unordered(a), Node::Unordered(b))
            | (Node::ExactSequence(a), Node::ExactSequence(b)) => a == b,
            (Node::Union(a), Node::Union(b)) => a == b,
            (Node::SomeOf(a), Node::SomeOf(b)) => a == b,
            (
                Node::Msg { node: a, message: ma },
                Node::Msg { node: b, message: mb },
            ) => a == b && ma == mb,
            (Node::SelfRef, Node::SelfRef) => true,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Node::Literal(v) => v.hash(state),
            Node::Type(k) => k.hash(state),
            Node::Custom(c) => c.hash(state),
            Node::Marker(m) => m.hash(state),
            Node::Mapping(entries) => hash_entries_unordered(entries, state),
            Node::List(v) | Node::Tuple(v) | Node::Set(v) | Node::FrozenSet(v) => v.hash(state),
            Node::Object(o) => {
                o.class.hash(state);
                hash_entries_unordered(&o.entries, state);
            }
            Node::All(c) | Node::Any(c) | Node::Unordered(c) | Node::ExactSequence(c) => {
                c.hash(state);
            }
            Node::Union(u) => {
                u.schemas.hash(state);
                u.msg.hash(state);
                u.required.hash(state);
            }
            Node::SomeOf(s) => s.hash(state),
            Node::Msg { node, message } => {
                node.hash(state);
                message.hash(state);
            }
            Node::SelfRef => {}
        }
    }
}

fn write_nodes(f: &mut fmt::Formatter<'_>, name: &str, nodes: &[Node]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, n) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{n}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(v) => write!(f, "{v}"),
            Node::Type(k) => f.write_str(k.display_name()),
            Node::Custom(c) => f.write_str(c.name()),
            Node::Marker(m) => write!(f, "{m}"),
            Node::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Node::List(v) => write_nodes(f, "list", v),
            Node::Tuple(v) => write_nodes(f, "tuple", v),
            Node::Set(v) => write_nodes(f, "set", v),
            Node::FrozenSet(v) => write_nodes(f, "frozenset", v),
            Node::Object(o) => {
                if let Some(class) = &o.class {
                    write!(f, "object<{class}>")?;
                } else {
                    f.write_str("object")?;
                }
                f.write_str("{")?;
                for (i, (k, v)) in o.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Node::All(c) => write_nodes(f, "all", &c.schemas),
            Node::Any(c) => write_nodes(f, "any", &c.schemas),
            Node::Union(u) => write_nodes(f, "union", &u.schemas),
            Node::SomeOf(s) => write_nodes(f, "some_of", &s.schemas),
            Node::Unordered(c) => write_nodes(f, "unordered", &c.schemas),
            Node::ExactSequence(c) => write_nodes(f, "exact_sequence", &c.schemas),
            Node::Msg { node, .. } => write!(f, "{node}"),
            Node::SelfRef => f.write_str("self"),
        }
    }
}
