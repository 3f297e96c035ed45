//! Attribute-based mapping: the mapping matcher applied to an instance's
//! attributes instead of dictionary keys.

use super::mapping::CompiledMapping;
use super::{Checked, Compiled, Compiler, Outcome};
use crate::state::ValidationState;
use indexmap::IndexMap;
use trellis_core::{
    ErrorKind, ObjectSchema, PathSegment, SchemaError, Value, ValidationError, ValidationErrors,
};

pub(crate) struct CompiledObject {
    class: Option<String>,
    mapping: CompiledMapping,
}

impl CompiledObject {
    pub(crate) fn build(schema: &ObjectSchema, ctx: &mut Compiler) -> Result<Self, SchemaError> {
        Ok(Self {
            class: schema.class.clone(),
            mapping: CompiledMapping::build(&schema.entries, "object value", ctx)?,
        })
    }

    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let Value::Object(instance) = data else {
            return Err(
                ValidationError::at(ErrorKind::Type, "expected an object", path.to_vec()).into(),
            );
        };
        if let Some(class) = &self.class {
            if instance.class_name() != Some(class.as_str()) {
                return Err(ValidationError::at(
                    ErrorKind::Type,
                    format!("expected an instance of '{class}'"),
                    path.to_vec(),
                )
                .into());
            }
        }

        // Unset (null) attributes are treated as absent.
        let pairs: Vec<(Value, Value)> = instance
            .attrs()
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (Value::from(k.as_str()), v.clone()))
            .collect();

        let mut out = IndexMap::new();
        let errors = self.mapping.validate_entries(
            st,
            root,
            path,
            pairs.iter().map(|(k, v)| (k, v)),
            &mut out,
        )?;
        if let Some(errors) = ValidationErrors::from_vec(errors) {
            return Err(errors);
        }

        let mut attrs = IndexMap::with_capacity(out.len());
        for (key, value) in out {
            let name = match key {
                Value::Str(s) => s,
                other => other.to_string(),
            };
            attrs.insert(name, value);
        }
        Ok(Checked::Value(Value::Object(instance.rebuilt(attrs))))
    }
}
