//! Filesystem validators. These perform synchronous I/O; the engine
//! treats them as opaque callables like any other validator.

use std::path::Path;
use trellis_core::{CustomValidator, ErrorKind, Node, Value, ValidationError};

fn check_path(name: &'static str, message: &'static str, test: fn(&Path) -> bool) -> Node {
    Node::Custom(CustomValidator::new(name, move |value: &Value| {
        let ok = value.as_str().is_some_and(|s| test(Path::new(s)));
        if ok {
            Ok(value.clone())
        } else {
            Err(ValidationError::new(ErrorKind::Value, message).into())
        }
    }))
}

/// Verify the value names an existing file.
#[must_use]
pub fn is_file() -> Node {
    check_path("is_file", "not a file", Path::is_file)
}

/// Verify the value names an existing directory.
#[must_use]
pub fn is_dir() -> Node {
    check_path("is_dir", "not a directory", Path::is_dir)
}

/// Verify the value names an existing path of any type.
#[must_use]
pub fn path_exists() -> Node {
    check_path("path_exists", "path does not exist", Path::exists)
}
