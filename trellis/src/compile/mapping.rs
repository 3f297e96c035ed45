//! The mapping matcher.
//!
//! Compilation partitions schema entries into a literal-key hash table and
//! an ordered wildcard list (type/callable keys in schema order, with the
//! `Extra` sentinel conceptually last). At validation time every input
//! pair looks up its literal candidate in O(1) and only falls back to the
//! wildcards, so matching N input keys against N schema keys stays linear.
//!
//! Matching backtracks on keys only: a key mismatch records the best
//! (deepest-path) candidate error and the search continues; once a key
//! matches, its value either validates or the pair's errors are final.

use super::{Checked, Compiled, Compiler, Outcome};
use crate::state::ValidationState;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use trellis_core::{
    DefaultValue, ErrorKind, Key, MarkerKind, Node, PathSegment, SchemaError, Value,
    ValidationError, ValidationErrors,
};

pub(crate) struct MappingEntry {
    key: Compiled,
    value: Compiled,
    literal: Option<Value>,
    canonical: String,
    msg: Option<String>,
    default: Option<DefaultValue>,
    required: bool,
}

pub(crate) struct CompiledMapping {
    entries: Vec<MappingEntry>,
    by_literal: HashMap<Value, usize>,
    wildcards: Vec<usize>,
    has_extra: bool,
    exclusive_groups: Vec<(String, Vec<usize>)>,
    inclusive_groups: Vec<(String, Vec<usize>)>,
    context: &'static str,
    allow_extra: bool,
    remove_extra: bool,
}

/// How one input pair fared against the candidates.
enum PairOutcome {
    /// A candidate took the pair (successfully or with final value errors).
    Matched,
    /// A remove candidate matched; the pair is dropped.
    Dropped,
    /// No candidate took the pair.
    Unmatched,
}

impl CompiledMapping {
    pub(crate) fn build(
        schema_entries: &[(Key, Node)],
        context: &'static str,
        ctx: &mut Compiler,
    ) -> Result<Self, SchemaError> {
        let mut entries = Vec::new();
        let mut by_literal = HashMap::new();
        let mut wildcards = Vec::new();
        let mut has_extra = false;
        let mut exclusive: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut inclusive: IndexMap<String, Vec<usize>> = IndexMap::new();

        for (key, value_node) in schema_entries {
            let marker = match key {
                Key::Extra => {
                    has_extra = true;
                    continue;
                }
                Key::Marker(m) => m,
            };
            let index = entries.len();
            let literal = marker.literal_key().cloned();
            match &literal {
                Some(lit) => {
                    if by_literal.insert(lit.clone(), index).is_some() {
                        return Err(SchemaError::DuplicateKey {
                            key: lit.to_string(),
                        });
                    }
                }
                None => wildcards.push(index),
            }
            if let Some(group) = marker.group() {
                match marker.kind() {
                    MarkerKind::Exclusive => {
                        exclusive.entry(group.to_string()).or_default().push(index);
                    }
                    MarkerKind::Inclusive => {
                        inclusive.entry(group.to_string()).or_default().push(index);
                    }
                    _ => {}
                }
            }
            let required = match marker.kind() {
                MarkerKind::Required => true,
                MarkerKind::Plain => ctx.required,
                _ => false,
            };
            entries.push(MappingEntry {
                key: Compiled::Marker(super::scalar::CompiledMarker::build(marker, ctx)?),
                value: super::compile(value_node, ctx)?,
                literal,
                canonical: marker.canonical_key(),
                msg: marker.message().map(str::to_string),
                default: match marker.kind() {
                    MarkerKind::Remove | MarkerKind::Plain => None,
                    _ => marker.default().cloned(),
                },
                required,
            });
        }

        Ok(Self {
            entries,
            by_literal,
            wildcards,
            has_extra,
            exclusive_groups: exclusive.into_iter().collect(),
            inclusive_groups: inclusive.into_iter().collect(),
            context,
            allow_extra: matches!(ctx.options.extra, trellis_core::ExtraPolicy::Allow),
            remove_extra: matches!(ctx.options.extra, trellis_core::ExtraPolicy::Remove),
        })
    }

    /// Validate a `Map` value: container check, group checks against the
    /// raw input, then the candidate loop.
    pub(crate) fn validate(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        data: &Value,
    ) -> Outcome {
        let Value::Map(input) = data else {
            return Err(ValidationError::at(
                ErrorKind::Type,
                "expected a dictionary",
                path.to_vec(),
            )
            .into());
        };

        if let Some(errors) = self.check_groups(input, path) {
            return Err(errors);
        }

        let mut out = IndexMap::with_capacity(input.len());
        let errors = self.validate_entries(st, root, path, input.iter(), &mut out)?;
        match ValidationErrors::from_vec(errors) {
            Some(errors) => Err(errors),
            None => Ok(Checked::Value(Value::Map(out))),
        }
    }

    /// Exclusion and inclusion groups are judged on the raw input, before
    /// any matching or defaulting: a half-present inclusion group fails
    /// even when the absent member carries a default.
    fn check_groups(
        &self,
        input: &IndexMap<Value, Value>,
        path: &[PathSegment],
    ) -> Option<ValidationErrors> {
        let mut errors = Vec::new();
        for (label, members) in &self.exclusive_groups {
            let present: Vec<&MappingEntry> = members
                .iter()
                .map(|&i| &self.entries[i])
                .filter(|e| e.literal.as_ref().is_some_and(|lit| input.contains_key(lit)))
                .collect();
            if present.len() > 1 {
                let msg = present
                    .iter()
                    .find_map(|e| e.msg.clone())
                    .unwrap_or_else(|| {
                        format!("two or more values in the same group of exclusion '{label}'")
                    });
                let mut group_path = path.to_vec();
                group_path.push(PathSegment::Group(label.clone()));
                errors.push(ValidationError::at(ErrorKind::Exclusion, msg, group_path));
            }
        }
        if let Some(errors) = ValidationErrors::from_vec(errors) {
            return Some(errors);
        }

        let mut errors = Vec::new();
        for (label, members) in &self.inclusive_groups {
            let present = members
                .iter()
                .filter(|&&i| {
                    self.entries[i]
                        .literal
                        .as_ref()
                        .is_some_and(|lit| input.contains_key(lit))
                })
                .count();
            if present > 0 && present < members.len() {
                let msg = members
                    .iter()
                    .find_map(|&i| self.entries[i].msg.clone())
                    .unwrap_or_else(|| {
                        format!("some but not all values in the same group of inclusion '{label}'")
                    });
                let mut group_path = path.to_vec();
                group_path.push(PathSegment::Group(label.clone()));
                errors.push(ValidationError::at(ErrorKind::Inclusion, msg, group_path));
            }
        }
        ValidationErrors::from_vec(errors)
    }

    /// The candidate loop, shared by mapping and object validation.
    ///
    /// Returns the collected errors; an `Err` means a key error deeper
    /// than the key itself aborted the whole mapping.
    pub(crate) fn validate_entries<'a, I>(
        &self,
        st: &mut ValidationState,
        root: &Compiled,
        path: &mut Vec<PathSegment>,
        pairs: I,
        out: &mut IndexMap<Value, Value>,
    ) -> Result<Vec<ValidationError>, ValidationErrors>
    where
        I: Iterator<Item = (&'a Value, &'a Value)>,
    {
        let mut required: HashSet<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.required)
            .map(|(i, _)| i)
            .collect();
        let mut pending_defaults: HashSet<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.default.is_some())
            .map(|(i, _)| i)
            .collect();
        let mut errors: Vec<ValidationError> = Vec::new();

        for (key, value) in pairs {
            path.push(PathSegment::Key(key.clone()));
            let key_depth = path.len();
            let mut best_key_error: Option<ValidationErrors> = None;
            let mut outcome = PairOutcome::Unmatched;

            let candidates = self
                .by_literal
                .get(key)
                .copied()
                .into_iter()
                .chain(self.wildcards.iter().copied());
            for index in candidates {
                let entry = &self.entries[index];
                let checked_key = match entry.key.validate(st, root, path, key) {
                    Ok(checked) => checked,
                    Err(key_errors) => {
                        if key_errors.depth() > key_depth {
                            // The key itself failed somewhere deeper; the
                            // whole mapping aborts with that error.
                            path.pop();
                            return Err(key_errors);
                        }
                        let deeper = best_key_error
                            .as_ref()
                            .map_or(true, |best| key_errors.depth() > best.depth());
                        if deeper {
                            best_key_error = Some(key_errors);
                        }
                        continue;
                    }
                };
                let is_remove = matches!(checked_key, Checked::Removed);

                match entry.value.validate(st, root, path, value) {
                    Ok(Checked::Value(new_value)) => {
                        if is_remove {
                            outcome = PairOutcome::Dropped;
                        } else if let Checked::Value(new_key) = checked_key {
                            out.insert(new_key, new_value);
                            outcome = PairOutcome::Matched;
                        }
                        required.remove(&index);
                        pending_defaults.remove(&index);
                        break;
                    }
                    Ok(Checked::Removed) => {
                        outcome = PairOutcome::Dropped;
                        required.remove(&index);
                        pending_defaults.remove(&index);
                        break;
                    }
                    Err(value_errors) => {
                        if is_remove {
                            // A remove candidate whose value does not match
                            // falls through to later candidates.
                            continue;
                        }
                        for mut error in value_errors {
                            if error.depth() <= key_depth {
                                error.decorate(self.context);
                            }
                            errors.push(error);
                        }
                        // The key was provided; a required marker must not
                        // also report it missing.
                        required.remove(&index);
                        pending_defaults.remove(&index);
                        outcome = PairOutcome::Matched;
                        break;
                    }
                }
            }

            if matches!(outcome, PairOutcome::Unmatched) {
                if self.has_extra || self.allow_extra {
                    out.insert(key.clone(), value.clone());
                } else if self.remove_extra {
                    // Dropped silently.
                } else if let Some(best) = best_key_error {
                    errors.extend(best);
                } else {
                    errors.push(ValidationError::at(
                        ErrorKind::Extra,
                        "extra keys not allowed",
                        path.clone(),
                    ));
                }
            }
            path.pop();
        }

        self.finish_missing(&required, &pending_defaults, path, out, &mut errors);
        Ok(errors)
    }

    /// Post-pass over unmatched schema keys in canonical (alphabetic)
    /// order: synthesize defaults, then report missing required keys.
    fn finish_missing(
        &self,
        required: &HashSet<usize>,
        pending_defaults: &HashSet<usize>,
        path: &[PathSegment],
        out: &mut IndexMap<Value, Value>,
        errors: &mut Vec<ValidationError>,
    ) {
        let mut leftovers: Vec<usize> = required.union(pending_defaults).copied().collect();
        leftovers.sort_by(|&a, &b| self.entries[a].canonical.cmp(&self.entries[b].canonical));

        for index in leftovers {
            let entry = &self.entries[index];
            let synthesized = match (&entry.literal, &entry.default) {
                (Some(literal), Some(default)) => {
                    out.insert(literal.clone(), default.produce());
                    true
                }
                _ => false,
            };
            if !synthesized && required.contains(&index) {
                let msg = entry
                    .msg
                    .clone()
                    .unwrap_or_else(|| "required key not provided".to_string());
                let mut key_path = path.to_vec();
                key_path.push(match &entry.literal {
                    Some(literal) => PathSegment::Key(literal.clone()),
                    None => PathSegment::Group(entry.canonical.clone()),
                });
                errors.push(ValidationError::at(ErrorKind::Required, msg, key_path));
            }
        }
    }
}
