//! Core types for the trellis schema-validation engine.
//!
//! This crate defines the data model shared by schema authors and the
//! validation engine:
//!
//! - [`Value`] — the dynamic value tree being validated
//! - [`PathSegment`] — data-path segments attached to every error
//! - [`ValidationError`] / [`ValidationErrors`] — the error model
//! - [`Marker`] / [`Key`] — mapping-key markers (required, optional,
//!   remove, exclusion/inclusion groups) and the `Extra` sentinel
//! - [`Node`] — the schema-node tree compiled by the engine
//! - [`Options`] — compile-time configuration
//!
//! The engine itself lives in the `trellis` crate, which re-exports
//! everything here.

pub mod error;
pub mod json;
pub mod marker;
pub mod node;
pub mod options;
pub mod path;
pub mod value;

pub use error::{ErrorKind, SchemaError, ValidationError, ValidationErrors};
pub use marker::{
    exclusive, inclusive, optional, remove, required, DefaultValue, Key, Marker, MarkerKind,
};
pub use node::{
    all, any, exact_sequence, maybe, msg, self_ref, some_of, union, unordered, Combinator,
    CustomValidator, Discriminant, Node, ObjectSchema, SomeOfSchema, UnionSchema,
};
pub use options::{ExtraPolicy, Options};
pub use path::{format_path, PathSegment};
pub use value::{Instance, Kind, Value};
