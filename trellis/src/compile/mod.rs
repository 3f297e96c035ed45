//! The schema compiler and the compiled-node tree.
//!
//! A schema [`Node`] tree compiles once, by exhaustive match, into a tree
//! of [`Compiled`] nodes owned as boxes; a node's identity is its address,
//! which the per-call memo cache uses as a key. Every compiled node
//! validates through the same signature: it receives the mutable per-call
//! state, the facade's compiled root (for self-references), the current
//! path, and the borrowed data node, and returns either a transformed
//! value, the removal sentinel, or the collected errors.

pub(crate) mod combinators;
pub(crate) mod mapping;
pub(crate) mod object;
pub(crate) mod scalar;
pub(crate) mod sequence;

use crate::state::ValidationState;
use trellis_core::{Kind, Node, Options, PathSegment, SchemaError, Value, ValidationErrors};

/// The result of one compiled-node invocation: a transformed value, or the
/// sentinel produced by a matched `remove` marker.
#[derive(Debug, Clone)]
pub(crate) enum Checked {
    Value(Value),
    Removed,
}

pub(crate) type Outcome = Result<Checked, ValidationErrors>;

/// Compilation context: the facade options plus the current
/// required-by-default flag, which combinators override for their
/// sub-schemas.
pub(crate) struct Compiler {
    pub(crate) options: Options,
    pub(crate) required: bool,
}

impl Compiler {
    pub(crate) fn new(options: Options) -> Self {
        Self {
            options,
            required: options.required,
        }
    }

    /// Compile nodes under a combinator's own required flag, restoring the
    /// enclosing flag afterwards.
    pub(crate) fn with_required<T>(
        &mut self,
        required: bool,
        f: impl FnOnce(&mut Self) -> Result<T, SchemaError>,
    ) -> Result<T, SchemaError> {
        let saved = self.required;
        self.required = required;
        let result = f(self);
        self.required = saved;
        result
    }
}

/// The compiled form of a schema node.
pub(crate) enum Compiled {
    Literal(Value),
    Type(Kind),
    Custom(trellis_core::CustomValidator),
    Marker(scalar::CompiledMarker),
    Msg(scalar::CompiledMsg),
    Mapping(mapping::CompiledMapping),
    Object(object::CompiledObject),
    Sequence(sequence::CompiledSequence),
    SetOf(sequence::CompiledSet),
    All(combinators::CompiledAll),
    Any(combinators::CompiledAny),
    SomeOf(combinators::CompiledSomeOf),
    Unordered(combinators::CompiledUnordered),
    ExactSequence(combinators::CompiledExact),
    SelfRef,
}

pub(crate) fn compile(node: &Node, ctx: &mut Compiler) -> Result<Compiled, SchemaError> {
    match node {
        Node::Literal(v) => Ok(Compiled::Literal(v.clone())),
        Node::Type(k) => Ok(Compiled::Type(*k)),
        Node::Custom(c) => Ok(Compiled::Custom(c.clone())),
        Node::Marker(m) => Ok(Compiled::Marker(scalar::CompiledMarker::build(m, ctx)?)),
        Node::Msg { node, message } => Ok(Compiled::Msg(scalar::CompiledMsg::build(
            node,
            message.clone(),
            ctx,
        )?)),
        Node::Mapping(entries) => Ok(Compiled::Mapping(mapping::CompiledMapping::build(
            entries,
            "dictionary value",
            ctx,
        )?)),
        Node::Object(schema) => Ok(Compiled::Object(object::CompiledObject::build(schema, ctx)?)),
        Node::List(items) => Ok(Compiled::Sequence(sequence::CompiledSequence::build(
            items,
            Kind::List,
            ctx,
        )?)),
        Node::Tuple(items) => Ok(Compiled::Sequence(sequence::CompiledSequence::build(
            items,
            Kind::Tuple,
            ctx,
        )?)),
        Node::Set(items) => Ok(Compiled::SetOf(sequence::CompiledSet::build(
            items,
            Kind::Set,
            ctx,
        )?)),
        Node::FrozenSet(items) => Ok(Compiled::SetOf(sequence::CompiledSet::build(
            items,
            Kind::FrozenSet,
            ctx,
        )?)),
        Node::All(c) => Ok(Compiled::All(combinators::CompiledAll::build(c, ctx)?)),
        Node::Any(c) => Ok(Compiled::Any(combinators::CompiledAny::build(
            &c.schemas, &c.msg, c.required, None, ctx,
        )?)),
        Node::Union(u) => Ok(Compiled::Any(combinators::CompiledAny::build(
            &u.schemas,
            &u.msg,
            u.required,
            u.discriminant.clone(),
            ctx,
        )?)),
        Node::SomeOf(s) => Ok(Compiled::SomeOf(combinators::CompiledSomeOf::build(s, ctx)?)),
        Node::Unordered(c) => Ok(Compiled::Unordered(combinators::CompiledUnordered::build(
            c, ctx,
        )?)),
        Node::ExactSequence(c) => Ok(Compiled::ExactSequence(combinators::CompiledExact::build(
            c, ctx,
        )?)),
        Node::SelfRef => Ok(Compiled::SelfRef),
    }
}

impl Compiled {
    /// Stable identity of this compiled node for the memo cache.
    pub(crate) fn addr(&self) -> usize {
        std::ptr::from_ref(self) as usize
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        match self {
            Compiled::Literal(expected) => scalar::check_literal(expected, path, data),
            Compiled::Type(kind) => scalar::check_type(*kind, path, data),
            Compiled::Custom(validator) => scalar::check_custom(validator, path, data),
            Compiled::Marker(marker) => marker.validate(st, root, path, data),
            Compiled::Msg(wrapper) => wrapper.validate(st, root, path, data),
            Compiled::Mapping(mapping) => mapping.validate(st, root, path, data),
            Compiled::Object(object) => object.validate(st, root, path, data),
            Compiled::Sequence(sequence) => sequence.validate(st, root, path, data),
            Compiled::SetOf(set) => set.validate(st, root, path, data),
            Compiled::All(chain) => chain.validate(st, root, path, data),
            Compiled::Any(alternatives) => alternatives.validate(st, root, path, data),
            Compiled::SomeOf(some_of) => some_of.validate(st, root, path, data),
            Compiled::Unordered(unordered) => unordered.validate(st, root, path, data),
            Compiled::ExactSequence(exact) => exact.validate(st, root, path, data),
            Compiled::SelfRef => combinators::validate_self(st, root, path, data),
        }
    }
}
