//! Error model: single failures, ordered aggregates, and schema-definition
//! errors.
//!
//! Validation reports *every* independent failure, not just the first: leaf
//! checks produce a [`ValidationError`], composite validators collect them
//! and surface one [`ValidationErrors`] aggregate per top-level call. The
//! aggregate delegates `message`/`path`/`kind` to its first element so
//! single-error call sites stay simple.
//!
//! [`SchemaError`] is different in nature: the schema tree itself is
//! malformed. It is raised at compile time and never recovered.

use crate::path::{format_path, PathSegment};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Classification of a single validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The value has the wrong type.
    Type,
    /// The value does not match a literal or allowed value.
    Value,
    /// The value could not be coerced to the requested type.
    Coerce,
    /// The value does not match a pattern.
    Pattern,
    /// The value is outside a numeric range.
    Range,
    /// The value has an invalid length.
    Length,
    /// A required mapping key was not provided.
    Required,
    /// A mapping key is not allowed by the schema.
    Extra,
    /// Two or more keys of an exclusion group were provided.
    Exclusion,
    /// Only part of an inclusion group was provided.
    Inclusion,
    /// No sequence alternative accepted an element.
    Sequence,
    /// Fewer validators passed than an N-of-M combinator requires.
    NotEnoughValid,
    /// More validators passed than an N-of-M combinator allows.
    TooManyValid,
    /// A custom validator failed.
    Custom,
}

/// A single validation failure: classification, raw message, absolute data
/// path and an optional context decoration added when the error crosses a
/// composite boundary (e.g. "dictionary value").
///
/// The raw message stays accessible through [`ValidationError::message`]
/// independently of the decorated `Display` rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    kind: ErrorKind,
    message: String,
    path: Vec<PathSegment>,
    context: Option<&'static str>,
}

impl ValidationError {
    /// Create an error with an empty path.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: Vec::new(),
            context: None,
        }
    }

    /// Create an error at a path.
    #[must_use]
    pub fn at(kind: ErrorKind, message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            kind,
            message: message.into(),
            path,
            context: None,
        }
    }

    /// Attach a path, builder style.
    #[must_use]
    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// Prepend enclosing path segments; used when an error raised with a
    /// relative path crosses into its parent's scope.
    pub fn prepend_path(&mut self, prefix: &[PathSegment]) {
        if prefix.is_empty() {
            return;
        }
        let mut path = prefix.to_vec();
        path.append(&mut self.path);
        self.path = path;
    }

    /// Decorate with the enclosing container context ("dictionary value",
    /// "object value"). Only the rendering changes; the raw message stays.
    pub fn decorate(&mut self, context: &'static str) {
        self.context = Some(context);
    }

    /// The failure classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The raw, undecorated message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The absolute path of the failing value.
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// How deep in the input the failure occurred.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(context) = self.context {
            write!(f, " for {context}")?;
        }
        let rendered = format_path(&self.path);
        if !rendered.is_empty() {
            write!(f, " @ {rendered}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// An ordered, append-only aggregate of validation failures.
///
/// Errors appear in traversal encounter order. The aggregate is never
/// empty; `message()`, `path()` and `kind()` delegate to the first error,
/// and `Display` renders it, so callers that only care about one failure
/// can treat the aggregate like a single error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Wrap a single error.
    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Build from a non-empty list of errors.
    ///
    /// Returns `None` when the list is empty.
    #[must_use]
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    /// Append another error, preserving order.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// The first error.
    #[must_use]
    pub fn first(&self) -> &ValidationError {
        &self.errors[0]
    }

    /// The first error's raw message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.first().message()
    }

    /// The first error's path.
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        self.first().path()
    }

    /// The first error's classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.first().kind()
    }

    /// The first error's depth; used for deepest-error tie-breaking.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.first().depth()
    }

    /// Number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; kept for iterator-style call sites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all errors in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Prepend enclosing path segments to every collected error.
    pub fn prepend_path(&mut self, prefix: &[PathSegment]) {
        for error in &mut self.errors {
            error.prepend_path(prefix);
        }
    }

    /// Consume into the underlying list.
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first())
    }
}

impl std::error::Error for ValidationErrors {}

/// The schema tree itself is malformed. Raised at compile time, fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The same literal key appears twice in one mapping schema.
    #[error("duplicate key {key} in mapping schema")]
    DuplicateKey {
        /// Rendering of the duplicated key
        key: String,
    },

    /// An N-of-M combinator was built without either bound.
    #[error("some_of requires at least one of min_valid and max_valid")]
    SomeOfWithoutBounds,

    /// The whole schema is a self-reference; it could never terminate.
    #[error("a schema cannot consist solely of a self-reference")]
    SelfReferenceOnly,

    /// `extend` was called on or with a non-mapping schema.
    #[error("only mapping schemas can be extended")]
    ExtendNonMapping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;

    #[test]
    fn display_includes_path_and_context() {
        let mut err = ValidationError::at(
            ErrorKind::Type,
            "expected an integer",
            vec![PathSegment::key("a"), PathSegment::Index(0)],
        );
        assert_eq!(err.to_string(), "expected an integer @ data['a'][0]");
        err.decorate("dictionary value");
        assert_eq!(
            err.to_string(),
            "expected an integer for dictionary value @ data['a'][0]"
        );
        assert_eq!(err.message(), "expected an integer");
    }

    #[test]
    fn display_without_path() {
        let err = ValidationError::new(ErrorKind::Value, "not a valid value");
        assert_eq!(err.to_string(), "not a valid value");
    }

    #[test]
    fn aggregate_delegates_to_first() {
        let first = ValidationError::at(
            ErrorKind::Required,
            "required key not provided",
            vec![PathSegment::key("q")],
        );
        let mut errors = ValidationErrors::single(first.clone());
        errors.push(ValidationError::new(ErrorKind::Value, "not a valid value"));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message(), "required key not provided");
        assert_eq!(errors.path(), first.path());
        assert_eq!(errors.to_string(), "required key not provided @ data['q']");
    }
}
