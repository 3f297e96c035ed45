//! Range, clamp and length constraints.

use std::cmp::Ordering;
use trellis_core::{CustomValidator, ErrorKind, Node, Value, ValidationError};

const UNORDERABLE: &str = "invalid value or type (must have a partial ordering)";

/// Compare a value against a bound. Numbers compare with numbers (NaN with
/// nothing), strings with strings; anything else has no ordering and must
/// fail rather than pass.
fn compare(value: &Value, bound: &Value) -> Option<Ordering> {
    match (value.as_number(), bound.as_number()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => match (value, bound) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => None,
        },
    }
}

/// Limit a value to a range; either bound may be omitted or excluded.
#[derive(Debug, Clone, Default)]
pub struct Range {
    min: Option<Value>,
    max: Option<Value>,
    min_excluded: bool,
    max_excluded: bool,
    msg: Option<String>,
}

impl Range {
    /// An unbounded range; add bounds with the builder methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound.
    #[must_use]
    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Inclusive upper bound.
    #[must_use]
    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Exclude the lower bound from the accepted values.
    #[must_use]
    pub fn min_excluded(mut self) -> Self {
        self.min_excluded = true;
        self
    }

    /// Exclude the upper bound from the accepted values.
    #[must_use]
    pub fn max_excluded(mut self) -> Self {
        self.max_excluded = true;
        self
    }

    /// Replace the failure message.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if let Some(min) = &self.min {
            let Some(ordering) = compare(value, min) else {
                return Err(UNORDERABLE.to_string());
            };
            if self.min_excluded {
                if ordering != Ordering::Greater {
                    return Err(format!("value must be higher than {min}"));
                }
            } else if ordering == Ordering::Less {
                return Err(format!("value must be at least {min}"));
            }
        }
        if let Some(max) = &self.max {
            let Some(ordering) = compare(value, max) else {
                return Err(UNORDERABLE.to_string());
            };
            if self.max_excluded {
                if ordering != Ordering::Less {
                    return Err(format!("value must be lower than {max}"));
                }
            } else if ordering == Ordering::Greater {
                return Err(format!("value must be at most {max}"));
            }
        }
        Ok(())
    }
}

impl From<Range> for Node {
    fn from(range: Range) -> Node {
        Node::Custom(CustomValidator::new("range", move |value: &Value| {
            match range.check(value) {
                Ok(()) => Ok(value.clone()),
                Err(default_msg) => {
                    let message = range.msg.clone().unwrap_or(default_msg);
                    Err(ValidationError::new(ErrorKind::Range, message).into())
                }
            }
        }))
    }
}

/// Clamp a value into a range instead of failing; either bound may be
/// omitted. Unorderable values still fail.
#[derive(Debug, Clone, Default)]
pub struct Clamp {
    min: Option<Value>,
    max: Option<Value>,
    msg: Option<String>,
}

impl Clamp {
    /// An unbounded clamp; add bounds with the builder methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound.
    #[must_use]
    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Upper bound.
    #[must_use]
    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Replace the failure message.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl From<Clamp> for Node {
    fn from(clamp: Clamp) -> Node {
        Node::Custom(CustomValidator::new("clamp", move |value: &Value| {
            let mut current = value.clone();
            if let Some(min) = &clamp.min {
                match compare(&current, min) {
                    Some(Ordering::Less) => current = min.clone(),
                    Some(_) => {}
                    None => {
                        let message = clamp.msg.clone().unwrap_or_else(|| UNORDERABLE.to_string());
                        return Err(ValidationError::new(ErrorKind::Range, message).into());
                    }
                }
            }
            if let Some(max) = &clamp.max {
                match compare(&current, max) {
                    Some(Ordering::Greater) => current = max.clone(),
                    Some(_) => {}
                    None => {
                        let message = clamp.msg.clone().unwrap_or_else(|| UNORDERABLE.to_string());
                        return Err(ValidationError::new(ErrorKind::Range, message).into());
                    }
                }
            }
            Ok(current)
        }))
    }
}

/// Constrain the length of a string or container.
#[derive(Debug, Clone, Default)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
    msg: Option<String>,
}

impl Length {
    /// An unbounded length check; add bounds with the builder methods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum length.
    #[must_use]
    pub fn min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Maximum length.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Replace the failure message.
    #[must_use]
    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl From<Length> for Node {
    fn from(length: Length) -> Node {
        Node::Custom(CustomValidator::new("length", move |value: &Value| {
            let failure = match value.length() {
                None => Some("invalid value or type (must have a length)".to_string()),
                Some(len) => {
                    if let Some(min) = length.min.filter(|&min| len < min) {
                        Some(format!("length of value must be at least {min}"))
                    } else if let Some(max) = length.max.filter(|&max| len > max) {
                        Some(format!("length of value must be at most {max}"))
                    } else {
                        None
                    }
                }
            };
            match failure {
                None => Ok(value.clone()),
                Some(default_msg) => {
                    let message = length.msg.clone().unwrap_or(default_msg);
                    Err(ValidationError::new(ErrorKind::Length, message).into())
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_unorderable() {
        assert_eq!(compare(&Value::Float(f64::NAN), &Value::Int(1)), None);
    }

    #[test]
    fn strings_compare_with_strings_only() {
        assert_eq!(
            compare(&Value::from("b"), &Value::from("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(compare(&Value::from("b"), &Value::Int(1)), None);
    }
}
