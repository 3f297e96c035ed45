//! Sequence and set matchers.
//!
//! A list or tuple schema is an ordered list of acceptable element shapes:
//! each input element takes the first alternative that accepts it. Sets
//! have no element order or index, so their matcher reports at most one
//! aggregate error for the whole container.

use super::{compile, Checked, Compiled, Compiler, Outcome};
use crate::state::ValidationState;
use trellis_core::{
    ErrorKind, Kind, Node, PathSegment, SchemaError, Value, ValidationError, ValidationErrors,
};

pub(crate) struct CompiledSequence {
    elements: Vec<Compiled>,
    kind: Kind,
}

impl CompiledSequence {
    pub(crate) fn build(
        items: &[Node],
        kind: Kind,
        ctx: &mut Compiler,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            elements: items
                .iter()
                .map(|n| compile(n, ctx))
                .collect::<Result<_, _>>()?,
            kind,
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let items = match (self.kind, data) {
            (Kind::List, Value::List(items)) | (Kind::Tuple, Value::Tuple(items)) => items,
            _ => {
                return Err(ValidationError::at(
                    ErrorKind::Type,
                    format!("expected {}", self.kind.display_name()),
                    path.to_vec(),
                )
                .into())
            }
        };

        // An empty schema sequence accepts any value of this container
        // type unchanged.
        if self.elements.is_empty() {
            return Ok(Checked::Value(data.clone()));
        }

        let container_name = match self.kind {
            Kind::Tuple => "tuple",
            _ => "list",
        };
        let mut out = Vec::with_capacity(items.len());
        let mut errors: Vec<ValidationError> = Vec::new();

        for (index, element) in items.iter().enumerate() {
            path.push(PathSegment::Index(index));
            let element_depth = path.len();
            let mut deepest: Option<ValidationErrors> = None;
            let mut matched = false;

            for alternative in &self.elements {
                match alternative.validate(st, root, path, element) {
                    Ok(Checked::Value(value)) => {
                        out.push(value);
                        matched = true;
                        break;
                    }
                    Ok(Checked::Removed) => {
                        // A matched remove marker drops the element.
                        matched = true;
                        break;
                    }
                    Err(alternative_errors) => {
                        let deeper = deepest
                            .as_ref()
                            .map_or(true, |best| alternative_errors.depth() > best.depth());
                        if deeper {
                            deepest = Some(alternative_errors);
                        }
                    }
                }
            }

            if !matched {
                // The recorded error wins when it is at least as specific
                // as the element itself; a shallower one is replaced by
                // the synthesized container message.
                match deepest {
                    Some(best) if best.depth() >= element_depth => errors.extend(best),
                    _ => errors.push(ValidationError::at(
                        ErrorKind::Sequence,
                        format!("invalid {container_name} value"),
                        path.clone(),
                    )),
                }
            }
            path.pop();
        }

        match ValidationErrors::from_vec(errors) {
            Some(errors) => Err(errors),
            None => Ok(Checked::Value(match self.kind {
                Kind::Tuple => Value::Tuple(out),
                _ => Value::List(out),
            })),
        }
    }
}

pub(crate) struct CompiledSet {
    elements: Vec<Compiled>,
    kind: Kind,
}

impl CompiledSet {
    pub(crate) fn build(
        items: &[Node],
        kind: Kind,
        ctx: &mut Compiler,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            elements: items
                .iter()
                .map(|n| compile(n, ctx))
                .collect::<Result<_, _>>()?,
            kind,
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let (items, frozen) = match (self.kind, data) {
            (Kind::Set, Value::Set(items)) => (items, false),
            (Kind::FrozenSet, Value::FrozenSet(items)) => (items, true),
            _ => {
                return Err(ValidationError::at(
                    ErrorKind::Type,
                    format!("expected {}", self.kind.display_name()),
                    path.to_vec(),
                )
                .into())
            }
        };

        if self.elements.is_empty() {
            return Ok(Checked::Value(data.clone()));
        }

        let mut out: Vec<Value> = Vec::with_capacity(items.len());
        let mut any_failed = false;

        for element in items {
            let mut matched = false;
            for alternative in &self.elements {
                match alternative.validate(st, root, path, element) {
                    Ok(Checked::Value(value)) => {
                        out.push(value);
                        matched = true;
                        break;
                    }
                    Ok(Checked::Removed) => {
                        matched = true;
                        break;
                    }
                    Err(_) => {}
                }
            }
            if !matched {
                any_failed = true;
            }
        }

        if any_failed {
            // Sets carry no per-element index, so all failures collapse
            // into one error at the container.
            let container_name = if frozen { "frozenset" } else { "set" };
            return Err(ValidationError::at(
                ErrorKind::Value,
                format!("invalid value in {container_name}"),
                path.to_vec(),
            )
            .into());
        }

        Ok(Checked::Value(if frozen {
            Value::frozen_set(out)
        } else {
            Value::set(out)
        }))
    }
}
