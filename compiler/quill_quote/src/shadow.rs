//! Variables bound inside the tree being quoted.
//!
//! Each binding construct the quoter is currently inside contributes one
//! set. A variable in any set is local to the quoted tree: it is not a
//! capture, even if some hoisted frame also knows it. Identity, not name, is
//! the key, so the order of the sets does not matter for lookup.

use quill_ir::VarId;
use rustc_hash::FxHashSet;

/// Stack of shadow sets, innermost last.
#[derive(Debug, Default)]
pub struct ShadowStack {
    sets: Vec<FxHashSet<VarId>>,
}

impl ShadowStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a binding construct.
    pub fn push(&mut self, vars: impl IntoIterator<Item = VarId>) {
        self.sets.push(vars.into_iter().collect());
    }

    /// Leave the innermost binding construct.
    pub fn pop(&mut self) {
        let popped = self.sets.pop();
        debug_assert!(popped.is_some(), "unbalanced shadow stack pop");
    }

    /// Returns `true` if an enclosing construct binds `var`.
    pub fn is_shadowed(&self, var: VarId) -> bool {
        self.sets.iter().rev().any(|set| set.contains(&var))
    }

    /// Number of binding constructs currently entered.
    pub fn depth(&self) -> usize {
        self.sets.len()
    }
}
