//! Structure-sharing tree rewrites.
//!
//! A [`Rewriter`] maps a tree to a new tree in the same arena. Default
//! implementations call `walk_*` functions that rewrite children and rebuild
//! the parent only if some child came back with a different `ExprId`. An
//! unchanged subtree is returned as-is, so rewriting a tree with nothing to
//! rewrite allocates nothing and returns the original root.
//!
//! Override the `rewrite_*` hooks to add behavior at specific node kinds and
//! call the matching `walk_*` function to continue into children.
//!
//! # Example
//!
//! ```text
//! /// Substitute one variable with a fixed expression.
//! struct Substitute {
//!     var: VarId,
//!     with: ExprId,
//! }
//!
//! impl Rewriter for Substitute {
//!     type Error = Infallible;
//!
//!     fn rewrite_variable(&mut self, _: &mut ExprArena, id: ExprId, var: VarId) -> Result<ExprId, Infallible> {
//!         Ok(if var == self.var { self.with } else { id })
//!     }
//! }
//! ```

use smallvec::SmallVec;

use crate::ast::{CatchBlock, ExprKind};
use crate::{CatchRange, ExprArena, ExprId, ExprRange, Name, VarId, VarRange};

/// Tree rewriter.
///
/// Hooks receive the node's `ExprId` and its already-destructured fields.
/// Returning the given `id` means "unchanged".
pub trait Rewriter: Sized {
    /// Error that aborts the whole rewrite.
    type Error;

    /// Rewrite any expression.
    fn rewrite_expr(&mut self, arena: &mut ExprArena, id: ExprId) -> Result<ExprId, Self::Error> {
        walk_expr(self, arena, id)
    }

    /// Rewrite a variable reference. Leaves it unchanged by default.
    fn rewrite_variable(
        &mut self,
        _arena: &mut ExprArena,
        id: ExprId,
        _var: VarId,
    ) -> Result<ExprId, Self::Error> {
        Ok(id)
    }

    /// Rewrite a lambda.
    fn rewrite_lambda(
        &mut self,
        arena: &mut ExprArena,
        id: ExprId,
        name: Name,
        params: VarRange,
        body: ExprId,
    ) -> Result<ExprId, Self::Error> {
        walk_lambda(self, arena, id, name, params, body)
    }

    /// Rewrite a block.
    fn rewrite_block(
        &mut self,
        arena: &mut ExprArena,
        id: ExprId,
        vars: VarRange,
        exprs: ExprRange,
    ) -> Result<ExprId, Self::Error> {
        walk_block(self, arena, id, vars, exprs)
    }

    /// Rewrite one exception handler of a `Try` node.
    fn rewrite_catch_block(
        &mut self,
        arena: &mut ExprArena,
        block: CatchBlock,
    ) -> Result<CatchBlock, Self::Error> {
        walk_catch_block(self, arena, block)
    }

    /// Rewrite a variable-list node. Leaves it unchanged by default.
    fn rewrite_runtime_variables(
        &mut self,
        _arena: &mut ExprArena,
        id: ExprId,
        _vars: VarRange,
    ) -> Result<ExprId, Self::Error> {
        Ok(id)
    }
}

/// Dispatch on the node kind and rewrite children.
pub fn walk_expr<R: Rewriter>(
    rewriter: &mut R,
    arena: &mut ExprArena,
    id: ExprId,
) -> Result<ExprId, R::Error> {
    let kind = *arena.kind(id);
    match kind {
        ExprKind::Constant(_) => Ok(id),
        ExprKind::Variable(var) => rewriter.rewrite_variable(arena, id, var),
        ExprKind::RuntimeVariables(vars) => rewriter.rewrite_runtime_variables(arena, id, vars),
        ExprKind::Lambda { name, params, body } => {
            rewriter.rewrite_lambda(arena, id, name, params, body)
        }
        ExprKind::Block { vars, exprs } => rewriter.rewrite_block(arena, id, vars, exprs),
        ExprKind::Try {
            body,
            handlers,
            finally,
        } => {
            let new_body = rewriter.rewrite_expr(arena, body)?;
            let new_handlers = walk_catch_blocks(rewriter, arena, handlers)?;
            let new_finally = walk_optional(rewriter, arena, finally)?;
            if new_body == body && new_handlers == handlers && new_finally == finally {
                return Ok(id);
            }
            Ok(arena.push(ExprKind::Try {
                body: new_body,
                handlers: new_handlers,
                finally: new_finally,
            }))
        }
        ExprKind::CellValue(operand) => {
            let new_operand = rewriter.rewrite_expr(arena, operand)?;
            Ok(rebuild_if(arena, id, new_operand != operand, || {
                ExprKind::CellValue(new_operand)
            }))
        }
        ExprKind::Quote(operand) => {
            let new_operand = rewriter.rewrite_expr(arena, operand)?;
            Ok(rebuild_if(arena, id, new_operand != operand, || {
                ExprKind::Quote(new_operand)
            }))
        }
        ExprKind::Unary { op, operand } => {
            let new_operand = rewriter.rewrite_expr(arena, operand)?;
            Ok(rebuild_if(arena, id, new_operand != operand, || {
                ExprKind::Unary {
                    op,
                    operand: new_operand,
                }
            }))
        }
        ExprKind::Binary { op, left, right } => {
            let new_left = rewriter.rewrite_expr(arena, left)?;
            let new_right = rewriter.rewrite_expr(arena, right)?;
            let changed = new_left != left || new_right != right;
            Ok(rebuild_if(arena, id, changed, || ExprKind::Binary {
                op,
                left: new_left,
                right: new_right,
            }))
        }
        ExprKind::Assign { target, value } => {
            let new_target = rewriter.rewrite_expr(arena, target)?;
            let new_value = rewriter.rewrite_expr(arena, value)?;
            let changed = new_target != target || new_value != value;
            Ok(rebuild_if(arena, id, changed, || ExprKind::Assign {
                target: new_target,
                value: new_value,
            }))
        }
        ExprKind::Conditional {
            cond,
            then_branch,
            else_branch,
        } => {
            let new_cond = rewriter.rewrite_expr(arena, cond)?;
            let new_then = rewriter.rewrite_expr(arena, then_branch)?;
            let new_else = rewriter.rewrite_expr(arena, else_branch)?;
            let changed = new_cond != cond || new_then != then_branch || new_else != else_branch;
            Ok(rebuild_if(arena, id, changed, || ExprKind::Conditional {
                cond: new_cond,
                then_branch: new_then,
                else_branch: new_else,
            }))
        }
        ExprKind::Invoke { callee, args } => {
            let new_callee = rewriter.rewrite_expr(arena, callee)?;
            let new_args = walk_expr_list(rewriter, arena, args)?;
            let changed = new_callee != callee || new_args != args;
            Ok(rebuild_if(arena, id, changed, || ExprKind::Invoke {
                callee: new_callee,
                args: new_args,
            }))
        }
        ExprKind::Intrinsic { op, args } => {
            let new_args = walk_expr_list(rewriter, arena, args)?;
            Ok(rebuild_if(arena, id, new_args != args, || {
                ExprKind::Intrinsic { op, args: new_args }
            }))
        }
    }
}

/// Rewrite a lambda's body; the name and parameter list are kept.
pub fn walk_lambda<R: Rewriter>(
    rewriter: &mut R,
    arena: &mut ExprArena,
    id: ExprId,
    name: Name,
    params: VarRange,
    body: ExprId,
) -> Result<ExprId, R::Error> {
    let new_body = rewriter.rewrite_expr(arena, body)?;
    Ok(rebuild_if(arena, id, new_body != body, || ExprKind::Lambda {
        name,
        params,
        body: new_body,
    }))
}

/// Rewrite a block's statements; the local variable list is kept.
pub fn walk_block<R: Rewriter>(
    rewriter: &mut R,
    arena: &mut ExprArena,
    id: ExprId,
    vars: VarRange,
    exprs: ExprRange,
) -> Result<ExprId, R::Error> {
    let new_exprs = walk_expr_list(rewriter, arena, exprs)?;
    Ok(rebuild_if(arena, id, new_exprs != exprs, || ExprKind::Block {
        vars,
        exprs: new_exprs,
    }))
}

/// Rewrite a handler's body and filter; the caught variable is kept.
pub fn walk_catch_block<R: Rewriter>(
    rewriter: &mut R,
    arena: &mut ExprArena,
    block: CatchBlock,
) -> Result<CatchBlock, R::Error> {
    let body = rewriter.rewrite_expr(arena, block.body)?;
    let filter = walk_optional(rewriter, arena, block.filter)?;
    Ok(CatchBlock {
        variable: block.variable,
        body,
        filter,
    })
}

/// Rewrite every expression in a list. Returns the original range when no
/// element changed.
pub fn walk_expr_list<R: Rewriter>(
    rewriter: &mut R,
    arena: &mut ExprArena,
    range: ExprRange,
) -> Result<ExprRange, R::Error> {
    let old: SmallVec<[ExprId; 8]> = arena.get_expr_list(range).iter().copied().collect();
    let mut new: SmallVec<[ExprId; 8]> = SmallVec::with_capacity(old.len());
    for &id in &old {
        new.push(rewriter.rewrite_expr(arena, id)?);
    }
    if new == old {
        return Ok(range);
    }
    Ok(arena.push_expr_list(&new))
}

fn walk_catch_blocks<R: Rewriter>(
    rewriter: &mut R,
    arena: &mut ExprArena,
    range: CatchRange,
) -> Result<CatchRange, R::Error> {
    let old: SmallVec<[CatchBlock; 4]> = arena.get_catch_blocks(range).iter().copied().collect();
    let mut new: SmallVec<[CatchBlock; 4]> = SmallVec::with_capacity(old.len());
    for &block in &old {
        new.push(rewriter.rewrite_catch_block(arena, block)?);
    }
    if new == old {
        return Ok(range);
    }
    Ok(arena.push_catch_blocks(&new))
}

/// Rewrite an optional child, passing `ExprId::INVALID` through.
fn walk_optional<R: Rewriter>(
    rewriter: &mut R,
    arena: &mut ExprArena,
    id: ExprId,
) -> Result<ExprId, R::Error> {
    match id.valid() {
        Some(id) => rewriter.rewrite_expr(arena, id),
        None => Ok(id),
    }
}

#[inline]
fn rebuild_if(
    arena: &mut ExprArena,
    id: ExprId,
    changed: bool,
    kind: impl FnOnce() -> ExprKind,
) -> ExprId {
    if changed {
        arena.push(kind())
    } else {
        id
    }
}

#[cfg(test)]
mod tests;
