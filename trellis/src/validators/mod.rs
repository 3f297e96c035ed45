//! The scalar validator library.
//!
//! Every validator here conforms to the single callable contract: a
//! function from value to transformed value or errors, wrapped as a named
//! [`CustomValidator`](trellis_core::CustomValidator) node. Configurable
//! validators are builder structs convertible into [`Node`]; simple ones
//! are plain constructor functions.

pub mod boolean;
pub mod coerce;
pub mod containers;
pub mod datetime;
pub mod defaults;
pub mod fs;
pub mod net;
pub mod numbers;
pub mod strings;

pub use boolean::{boolean, is_false, is_true, truthy};
pub use coerce::{coerce, Coerce};
pub use containers::{to_set, unique, Contains, Equal, In, NotIn};
pub use datetime::{date, datetime, Date, Datetime};
pub use defaults::{DefaultTo, SetTo};
pub use fs::{is_dir, is_file, path_exists};
pub use net::{email, fqdn_url, url};
pub use numbers::{Clamp, Length, Range};
pub use strings::{capitalize, lower, strip, title, upper, Match, Replace};

use trellis_core::Value;

/// The plain-text rendering of a value: strings unquoted, everything else
/// as displayed. Used by the coercion and string-transform validators.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
