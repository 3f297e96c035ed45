//! Compile-time configuration.
//!
//! Options are passed explicitly when a schema compiles and stored
//! immutably on the compiled schema; there are no process-wide mutable
//! defaults.

/// What happens to input keys no schema candidate matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExtraPolicy {
    /// Reject with "extra keys not allowed".
    #[default]
    Forbid,
    /// Copy through unchanged.
    Allow,
    /// Silently drop.
    Remove,
}

/// Schema-wide compilation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Options {
    /// Whether bare (unmarked) mapping keys are required.
    pub required: bool,
    /// Policy for unmatched input keys.
    pub extra: ExtraPolicy,
}

impl Options {
    /// The defaults: bare keys optional, extra keys forbidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set required-by-default for bare keys.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the extra-key policy.
    #[must_use]
    pub fn extra(mut self, extra: ExtraPolicy) -> Self {
        self.extra = extra;
        self
    }
}
