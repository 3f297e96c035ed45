//! Combinators layered on the core matcher: sequential AND, first-match
//! OR with deepest-error tie-breaking, N-of-M, multiset and positional
//! sequence matching, and the self-reference indirection.

use super::{compile, Checked, Compiled, Compiler, Outcome};
use crate::state::ValidationState;
use trellis_core::{
    Combinator, Discriminant, ErrorKind, Node, PathSegment, SchemaError, SomeOfSchema, Value,
    ValidationError, ValidationErrors,
};

fn compile_all_nodes(
    nodes: &[Node],
    required: bool,
    ctx: &mut Compiler,
) -> Result<Vec<Compiled>, SchemaError> {
    ctx.with_required(required, |ctx| {
        nodes.iter().map(|n| compile(n, ctx)).collect()
    })
}

/// Sequential AND: the output of each schema is the input of the next.
pub(crate) struct CompiledAll {
    steps: Vec<Compiled>,
    msg: Option<String>,
}

impl CompiledAll {
    pub(crate) fn build(combinator: &Combinator, ctx: &mut Compiler) -> Result<Self, SchemaError> {
        Ok(Self {
            steps: compile_all_nodes(&combinator.schemas, combinator.required, ctx)?,
            msg: combinator.msg.clone(),
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let mut current = data.clone();
        for step in &self.steps {
            match step.validate(st, root, path, &current) {
                Ok(Checked::Value(value)) => current = value,
                Ok(Checked::Removed) => return Ok(Checked::Removed),
                Err(errors) => {
                    return Err(match &self.msg {
                        Some(msg) => {
                            ValidationError::at(ErrorKind::Custom, msg.clone(), path.clone()).into()
                        }
                        None => errors,
                    })
                }
            }
        }
        Ok(Checked::Value(current))
    }
}

/// First-match OR: the first alternative that accepts the value wins; on
/// total failure the deepest underlying error surfaces (first seen wins
/// ties). An optional discriminant narrows the candidate list first.
pub(crate) struct CompiledAny {
    alternatives: Vec<Compiled>,
    nodes: Vec<Node>,
    msg: Option<String>,
    discriminant: Option<Discriminant>,
}

impl CompiledAny {
    pub(crate) fn build(
        schemas: &[Node],
        msg: &Option<String>,
        required: bool,
        discriminant: Option<Discriminant>,
        ctx: &mut Compiler,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            alternatives: compile_all_nodes(schemas, required, ctx)?,
            nodes: schemas.to_vec(),
            msg: msg.clone(),
            discriminant,
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let indices: Vec<usize> = match &self.discriminant {
            Some(discriminant) => discriminant.narrow(data, &self.nodes),
            None => (0..self.alternatives.len()).collect(),
        };

        let mut best: Option<ValidationErrors> = None;
        for index in indices {
            let Some(alternative) = self.alternatives.get(index) else {
                continue;
            };
            match alternative.validate(st, root, path, data) {
                Ok(checked) => return Ok(checked),
                Err(errors) => {
                    let deeper = best
                        .as_ref()
                        .map_or(true, |current| errors.depth() > current.depth());
                    if deeper {
                        best = Some(errors);
                    }
                }
            }
        }

        match (&self.msg, best) {
            (Some(msg), _) => {
                Err(ValidationError::at(ErrorKind::Custom, msg.clone(), path.clone()).into())
            }
            (None, Some(best)) => Err(best),
            (None, None) => Err(ValidationError::at(
                ErrorKind::Value,
                "no valid value found",
                path.clone(),
            )
            .into()),
        }
    }
}

/// N-of-M: every validator runs (threading the value through successes);
/// the count of passing validators must land within the configured bounds.
pub(crate) struct CompiledSomeOf {
    validators: Vec<Compiled>,
    min_valid: usize,
    max_valid: usize,
    msg: Option<String>,
}

impl CompiledSomeOf {
    pub(crate) fn build(schema: &SomeOfSchema, ctx: &mut Compiler) -> Result<Self, SchemaError> {
        if schema.min_valid.is_none() && schema.max_valid.is_none() {
            return Err(SchemaError::SomeOfWithoutBounds);
        }
        Ok(Self {
            validators: compile_all_nodes(&schema.schemas, schema.required, ctx)?,
            min_valid: schema.min_valid.unwrap_or(0),
            max_valid: schema.max_valid.unwrap_or(schema.schemas.len()),
            msg: schema.msg.clone(),
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let mut current = data.clone();
        let mut failures: Vec<ValidationErrors> = Vec::new();
        for validator in &self.validators {
            match validator.validate(st, root, path, &current) {
                Ok(Checked::Value(value)) => current = value,
                Ok(Checked::Removed) => {}
                Err(errors) => failures.push(errors),
            }
        }

        let passed = self.validators.len() - failures.len();
        if passed >= self.min_valid && passed <= self.max_valid {
            return Ok(Checked::Value(current));
        }

        let message = self.msg.clone().unwrap_or_else(|| {
            failures
                .iter()
                .map(|errors| errors.message().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        });
        let kind = if passed > self.max_valid {
            ErrorKind::TooManyValid
        } else {
            ErrorKind::NotEnoughValid
        };
        Err(ValidationError::at(kind, message, path.clone()).into())
    }
}

/// Fixed-length multiset matching: greedy, leftmost-schema-first, each
/// schema slot consumed at most once. The input passes through unchanged.
pub(crate) struct CompiledUnordered {
    slots: Vec<Compiled>,
    msg: Option<String>,
}

impl CompiledUnordered {
    pub(crate) fn build(combinator: &Combinator, ctx: &mut Compiler) -> Result<Self, SchemaError> {
        Ok(Self {
            slots: compile_all_nodes(&combinator.schemas, combinator.required, ctx)?,
            msg: combinator.msg.clone(),
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let Some(items) = data.as_sequence() else {
            return Err(ValidationError::at(
                ErrorKind::Type,
                self.msg.clone().unwrap_or_else(|| "expected a sequence".to_string()),
                path.clone(),
            )
            .into());
        };
        if items.len() != self.slots.len() {
            return Err(ValidationError::at(
                ErrorKind::Length,
                self.msg.clone().unwrap_or_else(|| {
                    format!(
                        "expected a sequence of {} elements, got {}",
                        self.slots.len(),
                        items.len()
                    )
                }),
                path.clone(),
            )
            .into());
        }

        let mut consumed = vec![false; self.slots.len()];
        let mut unmatched: Vec<ValidationError> = Vec::new();
        for (index, element) in items.iter().enumerate() {
            let mut found = false;
            for (slot, taken) in self.slots.iter().zip(consumed.iter_mut()) {
                if *taken {
                    continue;
                }
                if slot.validate(st, root, path, element).is_ok() {
                    *taken = true;
                    found = true;
                    break;
                }
            }
            if !found {
                unmatched.push(ValidationError::at(
                    ErrorKind::Value,
                    self.msg.clone().unwrap_or_else(|| {
                        format!("element #{index} ({element}) is not valid against any validator")
                    }),
                    path.clone(),
                ));
            }
        }

        match ValidationErrors::from_vec(unmatched) {
            Some(errors) => Err(errors),
            None => Ok(Checked::Value(data.clone())),
        }
    }
}

/// Positional fixed-length matching: element `i` validates against schema
/// `i`, and a length mismatch is an explicit error.
pub(crate) struct CompiledExact {
    elements: Vec<Compiled>,
    msg: Option<String>,
}

impl CompiledExact {
    pub(crate) fn build(combinator: &Combinator, ctx: &mut Compiler) -> Result<Self, SchemaError> {
        Ok(Self {
            elements: compile_all_nodes(&combinator.schemas, combinator.required, ctx)?,
            msg: combinator.msg.clone(),
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let Some(items) = data.as_sequence() else {
            return Err(ValidationError::at(
                ErrorKind::Type,
                self.msg
                    .clone()
                    .unwrap_or_else(|| "expected an exact sequence".to_string()),
                path.clone(),
            )
            .into());
        };
        if items.len() != self.elements.len() {
            return Err(ValidationError::at(
                ErrorKind::Length,
                self.msg.clone().unwrap_or_else(|| {
                    format!("expected a sequence of {} elements", self.elements.len())
                }),
                path.clone(),
            )
            .into());
        }

        let mut out = Vec::with_capacity(items.len());
        for (index, (element, schema)) in items.iter().zip(&self.elements).enumerate() {
            path.push(PathSegment::Index(index));
            match schema.validate(st, root, path, element) {
                Ok(Checked::Value(value)) => out.push(value),
                Ok(Checked::Removed) => {}
                Err(errors) => {
                    path.pop();
                    return Err(match &self.msg {
                        Some(msg) => {
                            ValidationError::at(ErrorKind::Custom, msg.clone(), path.clone()).into()
                        }
                        None => errors,
                    });
                }
            }
            path.pop();
        }

        Ok(Checked::Value(match data {
            Value::Tuple(_) => Value::Tuple(out),
            _ => Value::List(out),
        }))
    }
}

/// Self-reference: validate through the enclosing facade's compiled root,
/// consulting the per-call memo cache so recursive schemas over shared
/// substructure stay linear.
pub(crate) fn validate_self(
    st: &mut ValidationState,
    root: &Compiled,
    path: &mut Vec<PathSegment>,
    data: &Value,
) -> Outcome {
    if let Some(cached) = st.lookup(root.addr(), data) {
        return Ok(Checked::Value(cached));
    }
    match root.validate(st, root, path, data) {
        Ok(Checked::Value(value)) => {
            st.store(root.addr(), data, value.clone());
            Ok(Checked::Value(value))
        }
        other => other,
    }
}
