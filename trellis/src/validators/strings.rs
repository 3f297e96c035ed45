//! Regex matching, substitution, and string transforms.

use super::text_of;
use regex::Regex;
use trellis_core::{CustomValidator, ErrorKind, Node, Value, ValidationError};

/// The value must be a string matching the regular expression at its
/// start (anchor with `$` for a full match).
#[derive(Debug, Clone)]
pub struct Match {
    pattern: Regex,
    msg: Option<String>,
}

impl Match {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    /// Use an already-compiled pattern.
    #[must_use]
    pub fn from_regex(pattern: Regex) -> Self {
        Self { pattern, msg: None }
    }

    /// Replace the failure message.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl From<Match> for Node {
    fn from(matcher: Match) -> Node {
        Node::Custom(CustomValidator::new("match", move |value: &Value| {
            let Value::Str(s) = value else {
                return Err(
                    ValidationError::new(ErrorKind::Pattern, "expected string or buffer").into(),
                );
            };
            let matched = matcher
                .pattern
                .find(s)
                .map_or(false, |m| m.start() == 0);
            if matched {
                Ok(value.clone())
            } else {
                let message = matcher
                    .msg
                    .clone()
                    .unwrap_or_else(|| "does not match regular expression".to_string());
                Err(ValidationError::new(ErrorKind::Pattern, message).into())
            }
        }))
    }
}

/// Regex substitution: replaces every occurrence of the pattern.
#[derive(Debug, Clone)]
pub struct Replace {
    pattern: Regex,
    substitution: String,
}

impl Replace {
    /// Compile a pattern and its substitution.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error.
    pub fn new(pattern: &str, substitution: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            substitution: substitution.into(),
        })
    }
}

impl From<Replace> for Node {
    fn from(replace: Replace) -> Node {
        Node::Custom(CustomValidator::new("replace", move |value: &Value| {
            let Value::Str(s) = value else {
                return Err(
                    ValidationError::new(ErrorKind::Pattern, "expected string or buffer").into(),
                );
            };
            Ok(Value::Str(
                replace
                    .pattern
                    .replace_all(s, replace.substitution.as_str())
                    .into_owned(),
            ))
        }))
    }
}

fn transform(name: &'static str, f: fn(&str) -> String) -> Node {
    Node::Custom(CustomValidator::new(name, move |value: &Value| {
        Ok(Value::Str(f(&text_of(value))))
    }))
}

/// Lower-case the value (non-strings are stringified first).
#[must_use]
pub fn lower() -> Node {
    transform("lower", |s| s.to_lowercase())
}

/// Upper-case the value.
#[must_use]
pub fn upper() -> Node {
    transform("upper", |s| s.to_uppercase())
}

/// Capitalize the first character and lower-case the rest.
#[must_use]
pub fn capitalize() -> Node {
    transform("capitalize", |s| {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            }
            None => String::new(),
        }
    })
}

/// Title-case the value: each alphabetic run starts upper-cased.
#[must_use]
pub fn title() -> Node {
    transform("title", |s| {
        let mut out = String::with_capacity(s.len());
        let mut in_word = false;
        for c in s.chars() {
            if c.is_alphabetic() {
                if in_word {
                    out.extend(c.to_lowercase());
                } else {
                    out.extend(c.to_uppercase());
                }
                in_word = true;
            } else {
                out.push(c);
                in_word = false;
            }
        }
        out
    })
}

/// Strip leading and trailing whitespace.
#[must_use]
pub fn strip() -> Node {
    transform("strip", |s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;

    #[test]
    fn transforms_apply() {
        assert_eq!(
            Schema::new(lower()).unwrap().validate(&Value::from("HI")),
            Ok(Value::from("hi"))
        );
        assert_eq!(
            Schema::new(title())
                .unwrap()
                .validate(&Value::from("hello world")),
            Ok(Value::from("Hello World"))
        );
        assert_eq!(
            Schema::new(capitalize())
                .unwrap()
                .validate(&Value::from("hello World")),
            Ok(Value::from("Hello world"))
        );
        assert_eq!(
            Schema::new(strip())
                .unwrap()
                .validate(&Value::from("  x  ")),
            Ok(Value::from("x"))
        );
    }

    #[test]
    fn transforms_stringify_non_strings() {
        assert_eq!(
            Schema::new(upper()).unwrap().validate(&Value::Int(3)),
            Ok(Value::from("3"))
        );
    }
}
