//! Declarative schema validation.
//!
//! A schema is a programmatic tree of typed nodes: literal values, type
//! references, callable validators, mapping/sequence/set/object shapes and
//! combinators. [`Schema::new`] compiles the tree once; each
//! [`Schema::validate`] call walks the compiled tree and the data tree in
//! lockstep, transforming values along the way (coercion, defaulting,
//! trimming, case folding) and reporting *every* violation found with a
//! precise data path — not just the first.
//!
//! ```
//! use trellis::{required, Key, Kind, Node, Schema, Value};
//!
//! # fn main() -> Result<(), trellis::SchemaError> {
//! let schema = Schema::new(Node::mapping([
//!     (Key::from(required("name")), Node::Type(Kind::Str)),
//!     (Key::from("age"), Node::Type(Kind::Int)),
//! ]))?;
//!
//! let valid = Value::map([
//!     ("name", Value::from("ada")),
//!     ("age", Value::Int(36)),
//! ]);
//! assert_eq!(schema.validate(&valid).unwrap(), valid);
//!
//! let errors = schema.validate(&Value::map([("age", 36)])).unwrap_err();
//! assert_eq!(errors.to_string(), "required key not provided @ data['name']");
//! # Ok(())
//! # }
//! ```
//!
//! Validation is synchronous and single-threaded per call; a compiled
//! [`Schema`] is immutable and safe to invoke concurrently because all
//! per-call state (the data path and the memo cache that keeps recursive
//! schemas linear) is allocated fresh for every call.

mod compile;
pub mod schema;
mod state;
pub mod validators;

pub use schema::Schema;
pub use trellis_core::*;

/// The common imports for building and running schemas.
pub mod prelude {
    pub use crate::schema::Schema;
    pub use trellis_core::{
        all, any, exact_sequence, exclusive, inclusive, maybe, msg, optional, remove, required,
        self_ref, some_of, union, unordered, ErrorKind, ExtraPolicy, Instance, Key, Kind, Marker,
        Node, Options, PathSegment, SchemaError, Value, ValidationError, ValidationErrors,
    };
}
