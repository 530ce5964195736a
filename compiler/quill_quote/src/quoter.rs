//! The quoting rewriter.
//!
//! [`ExpressionQuoter`] is a [`Rewriter`] over the expression arena. It
//! tracks which variables the tree binds for itself (the shadow stack) and
//! resolves every other variable to its hoisted cell.
//!
//! # Rewrites
//!
//! | Node | Result |
//! |---|---|
//! | `Variable(v)`, `v` captured | `CellValue(Constant(cell))` |
//! | `Variable(v)`, `v` bound in the tree | unchanged |
//! | `RuntimeVariables`, none captured | unchanged |
//! | `RuntimeVariables`, all captured | `Constant(BoxedVariables)` |
//! | `RuntimeVariables`, mixed | `Intrinsic(MergeRuntimeVariables, [RuntimeVariables(locals), Constant(BoxedVariables), Constant(indexes)])` |
//! | `Lambda` / `Block` / handler | children quoted with the construct's variables shadowed |
//! | anything else | children quoted |

use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use quill_ir::ast::{CatchBlock, Intrinsic};
use quill_ir::rewrite::{walk_block, walk_catch_block, walk_expr, walk_lambda};
use quill_ir::{ExprArena, ExprId, ExprRange, Name, Rewriter, VarId, VarRange};
use quill_runtime::{BoxedVariables, Slot, StrongBox, Value, VariablesRef};
use smallvec::SmallVec;

use crate::scope::{resolve_cell, HoistedLocals, HoistedScope};
use crate::shadow::ShadowStack;
use crate::stack::ensure_sufficient_stack;
use crate::QuoteError;

/// Counters describing what a quote rewrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuoteStats {
    /// Variable references replaced by cell loads.
    pub variables: usize,
    /// Variable lists replaced by a constant view over cells.
    pub boxed_lists: usize,
    /// Variable lists split into cells and locals and merged.
    pub merged_lists: usize,
}

/// Rewrites a closure's tree so that captures address their cells directly.
///
/// One quoter serves one traversal: its shadow stack is private state and
/// is never shared between concurrent quotes.
pub struct ExpressionQuoter<'a> {
    scope: HoistedScope<'a>,
    locals: HoistedLocals<'a>,
    shadowed: ShadowStack,
    stats: QuoteStats,
}

impl<'a> ExpressionQuoter<'a> {
    /// Create a quoter for trees captured in `scope`, backed by `locals`.
    pub fn new(scope: HoistedScope<'a>, locals: HoistedLocals<'a>) -> Self {
        ExpressionQuoter {
            scope,
            locals,
            shadowed: ShadowStack::new(),
            stats: QuoteStats::default(),
        }
    }

    /// Quote the tree rooted at `root`.
    pub fn quote(&mut self, arena: &mut ExprArena, root: ExprId) -> Result<ExprId, QuoteError> {
        self.rewrite_expr(arena, root)
    }

    /// What has been rewritten so far.
    pub fn stats(&self) -> QuoteStats {
        self.stats
    }

    /// Current shadow stack depth.
    pub fn shadow_depth(&self) -> usize {
        self.shadowed.depth()
    }

    /// The cell backing `var`, or `None` if the tree binds `var` itself.
    ///
    /// Shadowing is checked first: a variable bound by an enclosing lambda,
    /// block, or handler of the tree is never looked up in the hoisted
    /// frames.
    pub fn get_box(&self, var: VarId) -> Result<Option<StrongBox>, QuoteError> {
        if self.shadowed.is_shadowed(var) {
            return Ok(None);
        }
        match resolve_cell(self.scope, self.locals, var) {
            Ok(resolved) => {
                tracing::trace!(
                    ?var,
                    frame = ?resolved.frame,
                    depth = resolved.depth,
                    "captured"
                );
                Ok(Some(resolved.cell))
            }
            Err(err) => {
                tracing::error!(%err, "quote aborted");
                Err(err)
            }
        }
    }

    /// Shadow `vars` until the returned guard is dropped.
    fn shadowed(&mut self, vars: impl IntoIterator<Item = VarId>) -> Shadowed<'_, 'a> {
        self.shadowed.push(vars);
        Shadowed { quoter: self }
    }
}

impl Rewriter for ExpressionQuoter<'_> {
    type Error = QuoteError;

    fn rewrite_expr(&mut self, arena: &mut ExprArena, id: ExprId) -> Result<ExprId, QuoteError> {
        ensure_sufficient_stack(|| walk_expr(self, arena, id))
    }

    fn rewrite_variable(
        &mut self,
        arena: &mut ExprArena,
        id: ExprId,
        var: VarId,
    ) -> Result<ExprId, QuoteError> {
        let Some(cell) = self.get_box(var)? else {
            return Ok(id);
        };
        self.stats.variables += 1;
        let cell = arena.constant_expr(Value::Cell(cell));
        Ok(arena.cell_value(cell))
    }

    fn rewrite_lambda(
        &mut self,
        arena: &mut ExprArena,
        id: ExprId,
        name: Name,
        params: VarRange,
        body: ExprId,
    ) -> Result<ExprId, QuoteError> {
        let mut scoped = self.shadowed(arena.get_var_list(params).iter().copied());
        walk_lambda(&mut *scoped, arena, id, name, params, body)
    }

    fn rewrite_block(
        &mut self,
        arena: &mut ExprArena,
        id: ExprId,
        vars: VarRange,
        exprs: ExprRange,
    ) -> Result<ExprId, QuoteError> {
        if vars.is_empty() {
            return walk_block(self, arena, id, vars, exprs);
        }
        let mut scoped = self.shadowed(arena.get_var_list(vars).iter().copied());
        walk_block(&mut *scoped, arena, id, vars, exprs)
    }

    fn rewrite_catch_block(
        &mut self,
        arena: &mut ExprArena,
        block: CatchBlock,
    ) -> Result<CatchBlock, QuoteError> {
        // The caught variable is in scope for the filter as well as the body.
        let Some(var) = block.variable else {
            return walk_catch_block(self, arena, block);
        };
        let mut scoped = self.shadowed([var]);
        walk_catch_block(&mut *scoped, arena, block)
    }

    fn rewrite_runtime_variables(
        &mut self,
        arena: &mut ExprArena,
        id: ExprId,
        vars: VarRange,
    ) -> Result<ExprId, QuoteError> {
        let vars: SmallVec<[VarId; 8]> = arena.get_var_list(vars).iter().copied().collect();
        let mut boxes: SmallVec<[StrongBox; 8]> = SmallVec::new();
        let mut locals: SmallVec<[VarId; 8]> = SmallVec::new();
        let mut indexes = Vec::with_capacity(vars.len());

        for &var in &vars {
            if let Some(cell) = self.get_box(var)? {
                indexes.push(Slot::Second(boxes.len()).encode());
                boxes.push(cell);
            } else {
                indexes.push(Slot::First(locals.len()).encode());
                locals.push(var);
            }
        }

        // Nothing captured: nothing to quote.
        if boxes.is_empty() {
            return Ok(id);
        }

        tracing::trace!(captured = boxes.len(), local = locals.len(), "quoting variable list");
        let view = VariablesRef::new(BoxedVariables::new(boxes.into_vec()));
        let boxed = arena.constant_expr(Value::Variables(view));
        if locals.is_empty() {
            self.stats.boxed_lists += 1;
            return Ok(boxed);
        }

        self.stats.merged_lists += 1;
        let locals = arena.runtime_variables(&locals);
        let indexes = arena.constant_expr(Value::Indexes(Rc::from(indexes)));
        Ok(arena.intrinsic(Intrinsic::MergeRuntimeVariables, &[locals, boxed, indexes]))
    }
}

/// RAII guard that pops the quoter's innermost shadow set on drop.
///
/// Holds `&mut ExpressionQuoter` and derefs to it, so the quoter can keep
/// rewriting through the guard.
struct Shadowed<'guard, 'a> {
    quoter: &'guard mut ExpressionQuoter<'a>,
}

impl Drop for Shadowed<'_, '_> {
    fn drop(&mut self) {
        self.quoter.shadowed.pop();
    }
}

impl<'a> Deref for Shadowed<'_, 'a> {
    type Target = ExpressionQuoter<'a>;

    fn deref(&self) -> &Self::Target {
        self.quoter
    }
}

impl DerefMut for Shadowed<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.quoter
    }
}
