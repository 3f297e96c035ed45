//! Per-call validation state.
//!
//! One `ValidationState` exists per top-level validation call and is
//! dropped when the call returns; it is never stored on the schema. This
//! is what makes a compiled schema safe to use from multiple threads: the
//! memo cache is the only mutable structure reachable during validation.
//!
//! The cache memoizes successful validations of a data node through a
//! schema root, keyed by (root identity, data address). Self-referential
//! schemas consult it at the recursion point, which keeps re-validation of
//! shared substructure linear instead of exponential. Failures are not
//! cached; they are rare on the recursive path and carry positional
//! context that must be rebuilt.

use std::collections::HashMap;
use trellis_core::Value;

#[derive(Default)]
pub(crate) struct ValidationState {
    memo: HashMap<(usize, usize), Value>,
}

impl ValidationState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lookup(&self, root: usize, data: &Value) -> Option<Value> {
        self.memo.get(&(root, data_addr(data))).cloned()
    }

    pub(crate) fn store(&mut self, root: usize, data: &Value, result: Value) {
        self.memo.insert((root, data_addr(data)), result);
    }
}

fn data_addr(data: &Value) -> usize {
    std::ptr::from_ref(data) as usize
}
