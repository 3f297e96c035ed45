//! Leaf compilation: literals, type references, custom validators, and the
//! marker/message wrappers.

use super::{compile, Checked, Compiled, Compiler, Outcome};
use crate::state::ValidationState;
use trellis_core::{
    CustomValidator, ErrorKind, Kind, Marker, MarkerKind, Node, PathSegment, SchemaError, Value,
    ValidationError,
};

/// Literal schema: accept exactly this value (numeric equality crosses
/// variants, so the literal `true` accepts the integer `1`).
pub(crate) fn check_literal(expected: &Value, path: &[PathSegment], data: &Value) -> Outcome {
    if data == expected {
        Ok(Checked::Value(data.clone()))
    } else {
        Err(ValidationError::at(ErrorKind::Value, "not a valid value", path.to_vec()).into())
    }
}

/// Type-reference schema: strict kind check, no numeric cross-acceptance.
pub(crate) fn check_type(kind: Kind, path: &[PathSegment], data: &Value) -> Outcome {
    if data.kind() == kind {
        Ok(Checked::Value(data.clone()))
    } else {
        Err(ValidationError::at(
            ErrorKind::Type,
            format!("expected {}", kind.display_name()),
            path.to_vec(),
        )
        .into())
    }
}

/// Custom validator: the returned value replaces the input; errors carry
/// paths relative to the validated value and get the enclosing path
/// prepended here.
pub(crate) fn check_custom(
    validator: &CustomValidator,
    path: &[PathSegment],
    data: &Value,
) -> Outcome {
    match validator.invoke(data) {
        Ok(value) => Ok(Checked::Value(value)),
        Err(mut errors) => {
            errors.prepend_path(path);
            Err(errors)
        }
    }
}

/// A marker compiled outside key position (and the key side of mapping
/// entries): validates against the wrapped key schema, applies the custom
/// message to shallow failures, and turns `remove` matches into the
/// removal sentinel.
pub(crate) struct CompiledMarker {
    kind: MarkerKind,
    msg: Option<String>,
    inner: Box<Compiled>,
}

impl CompiledMarker {
    pub(crate) fn build(marker: &Marker, ctx: &mut Compiler) -> Result<Self, SchemaError> {
        Ok(Self {
            kind: marker.kind(),
            msg: marker.message().map(str::to_string),
            inner: Box::new(compile(marker.key_node(), ctx)?),
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        match self.inner.validate(st, root, path, data) {
            Ok(Checked::Value(value)) => {
                if self.kind == MarkerKind::Remove {
                    Ok(Checked::Removed)
                } else {
                    Ok(Checked::Value(value))
                }
            }
            Ok(Checked::Removed) => Ok(Checked::Removed),
            Err(errors) => match &self.msg {
                // Custom messages apply to direct failures only, not to
                // failures from deeper within the wrapped schema.
                Some(msg) if errors.depth() <= path.len() + 1 => Err(ValidationError::at(
                    ErrorKind::Custom,
                    msg.clone(),
                    path.to_vec(),
                )
                .into()),
                _ => Err(errors),
            },
        }
    }
}

/// Message wrapper: replace shallow failures of the wrapped schema.
pub(crate) struct CompiledMsg {
    inner: Box<Compiled>,
    message: String,
}

impl CompiledMsg {
    pub(crate) fn build(
        node: &Node,
        message: String,
        ctx: &mut Compiler,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            inner: Box::new(compile(node, ctx)?),
            message,
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        match self.inner.validate(st, root, path, data) {
            Ok(checked) => Ok(checked),
            Err(errors) if errors.depth() <= path.len() + 1 => Err(ValidationError::at(
                ErrorKind::Custom,
                self.message.clone(),
                path.to_vec(),
            )
            .into()),
            Err(errors) => Err(errors),
        }
    }
}
