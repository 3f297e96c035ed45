//! The public schema facade.
//!
//! A [`Schema`] owns the raw node tree (kept for introspection, equality
//! and extension), the options it compiled under, and the compiled root.
//! Compilation happens once at construction; every validation call walks
//! the compiled tree with a fresh per-call state, so a schema is safe to
//! share and use from multiple threads.

use crate::compile::{self, Checked, Compiled, Compiler};
use crate::state::ValidationState;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, trace};
use trellis_core::{
    required, CustomValidator, ExtraPolicy, Key, Node, Options, SchemaError, Value,
    ValidationErrors,
};

/// A compiled validation schema.
#[derive(Clone)]
pub struct Schema {
    node: Node,
    options: Options,
    compiled: Arc<Compiled>,
}

impl Schema {
    /// Compile a schema tree with default options (bare keys optional,
    /// extra keys forbidden).
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the tree is malformed.
    pub fn new(node: impl Into<Node>) -> Result<Self, SchemaError> {
        Self::compile(node, Options::default())
    }

    /// Compile a schema tree with explicit options.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the tree is malformed.
    pub fn compile(node: impl Into<Node>, options: Options) -> Result<Self, SchemaError> {
        let node = node.into();
        if matches!(node, Node::SelfRef) {
            return Err(SchemaError::SelfReferenceOnly);
        }
        let mut compiler = Compiler::new(options);
        let compiled = compile::compile(&node, &mut compiler)?;
        debug!(required = options.required, "compiled schema");
        Ok(Self {
            node,
            options,
            compiled: Arc::new(compiled),
        })
    }

    /// Validate (and transform) a value against this schema.
    ///
    /// On success the returned value is the validated output: a new tree
    /// of the same concrete container shapes, with validator
    /// transformations and synthesized defaults applied. The input is
    /// never mutated.
    ///
    /// # Errors
    ///
    /// Returns every independent failure found, in traversal order.
    pub fn validate(&self, data: &Value) -> Result<Value, ValidationErrors> {
        trace!("validating value");
        let mut state = ValidationState::new();
        let mut path = Vec::new();
        match self
            .compiled
            .validate(&mut state, &self.compiled, &mut path, data)
        {
            Ok(Checked::Value(value)) => Ok(value),
            // A top-level removal degrades to identity.
            Ok(Checked::Removed) => Ok(data.clone()),
            Err(errors) => Err(errors),
        }
    }

    /// The raw schema tree.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The options this schema compiled under.
    #[must_use]
    pub fn options(&self) -> Options {
        self.options
    }

    /// Extend this mapping schema with another, keeping these options.
    /// Neither input is mutated; see [`Node::extend_mapping`] for the
    /// merge rules.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] unless both schemas are mappings.
    pub fn extend(&self, other: impl Into<Node>) -> Result<Schema, SchemaError> {
        self.extend_with(other, None, None)
    }

    /// Extend with per-flag option overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] unless both schemas are mappings.
    pub fn extend_with(
        &self,
        other: impl Into<Node>,
        required: Option<bool>,
        extra: Option<ExtraPolicy>,
    ) -> Result<Schema, SchemaError> {
        let merged = self.node.extend_mapping(&other.into())?;
        let options = Options {
            required: required.unwrap_or(self.options.required),
            extra: extra.unwrap_or(self.options.extra),
        };
        Self::compile(merged, options)
    }

    /// Build a schema from example data with default options: mapping keys
    /// become required, values become their inferred types.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when compilation fails.
    pub fn infer(example: &Value) -> Result<Schema, SchemaError> {
        Self::infer_with(example, Options::default())
    }

    /// Build a schema from example data with explicit options.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when compilation fails.
    pub fn infer_with(example: &Value, options: Options) -> Result<Schema, SchemaError> {
        Self::compile(infer_node(example), options)
    }
}

fn infer_node(example: &Value) -> Node {
    match example {
        Value::Map(map) if !map.is_empty() => Node::Mapping(
            map.iter()
                .map(|(k, v)| (Key::from(required(k.clone())), infer_node(v)))
                .collect(),
        ),
        Value::List(items) if !items.is_empty() => {
            let mut alternatives: Vec<Node> = Vec::new();
            for item in items {
                let inferred = infer_node(item);
                if !alternatives.contains(&inferred) {
                    alternatives.push(inferred);
                }
            }
            Node::List(alternatives)
        }
        other => Node::Type(other.kind()),
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.options == other.options
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
        self.options.hash(state);
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("node", &self.node)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema({})", self.node)
    }
}

/// A compiled schema embeds as a node: it validates with its own options
/// and its own root (self-references inside it resolve to it), and its
/// errors propagate with the embedding path prepended.
impl From<Schema> for Node {
    fn from(schema: Schema) -> Node {
        Node::Custom(CustomValidator::new("schema", move |value: &Value| {
            schema.validate(value)
        }))
    }
}
