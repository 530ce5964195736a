use std::convert::Infallible;

use super::*;
use crate::ast::BinaryOp;
use crate::StringInterner;
use pretty_assertions::assert_eq;
use quill_runtime::Value;

/// Substitute one variable with a fixed expression.
struct Substitute {
    var: VarId,
    with: ExprId,
}

impl Rewriter for Substitute {
    type Error = Infallible;

    fn rewrite_variable(
        &mut self,
        _arena: &mut ExprArena,
        id: ExprId,
        var: VarId,
    ) -> Result<ExprId, Infallible> {
        Ok(if var == self.var { self.with } else { id })
    }
}

fn substitute(arena: &mut ExprArena, root: ExprId, var: VarId, with: ExprId) -> ExprId {
    let mut rewriter = Substitute { var, with };
    match rewriter.rewrite_expr(arena, root) {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

#[test]
fn test_unchanged_tree_returns_same_root() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let x = arena.new_variable(interner.intern("x"));
    let y = arena.new_variable(interner.intern("y"));
    let read_x = arena.variable_expr(x);
    let one = arena.constant_expr(Value::Int(1));
    let sum = arena.binary(BinaryOp::Add, read_x, one);
    let root = arena.block(&[], &[sum]);
    let replacement = arena.constant_expr(Value::Int(0));

    let before = arena.len();
    let out = substitute(&mut arena, root, y, replacement);
    assert_eq!(out, root);
    assert_eq!(arena.len(), before, "no nodes allocated");
}

#[test]
fn test_changed_child_rebuilds_only_its_spine() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let x = arena.new_variable(interner.intern("x"));
    let read_x = arena.variable_expr(x);
    let one = arena.constant_expr(Value::Int(1));
    let sum = arena.binary(BinaryOp::Add, read_x, one);
    let untouched = arena.constant_expr(Value::Int(2));
    let root = arena.block(&[], &[untouched, sum]);
    let replacement = arena.constant_expr(Value::Int(40));

    let out = substitute(&mut arena, root, x, replacement);
    assert_ne!(out, root);

    let ExprKind::Block { exprs, .. } = *arena.kind(out) else {
        panic!("expected block");
    };
    let stmts = arena.get_expr_list(exprs).to_vec();
    assert_eq!(stmts[0], untouched, "unchanged sibling is shared");
    let ExprKind::Binary { left, right, .. } = *arena.kind(stmts[1]) else {
        panic!("expected binary");
    };
    assert_eq!(left, replacement);
    assert_eq!(right, one);
}

#[test]
fn test_lambda_rebuild_keeps_name_and_params() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let name = interner.intern("f");
    let p = arena.new_variable(interner.intern("p"));
    let x = arena.new_variable(interner.intern("x"));
    let body = arena.variable_expr(x);
    let lambda = arena.lambda(name, &[p], body);
    let replacement = arena.constant_expr(Value::Unit);

    let out = substitute(&mut arena, lambda, x, replacement);
    let ExprKind::Lambda {
        name: new_name,
        params,
        body: new_body,
    } = *arena.kind(out)
    else {
        panic!("expected lambda");
    };
    assert_eq!(new_name, name);
    assert_eq!(arena.get_var_list(params), &[p]);
    assert_eq!(new_body, replacement);
}

#[test]
fn test_try_visits_handlers_filters_and_finally() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let x = arena.new_variable(interner.intern("x"));
    let body = arena.constant_expr(Value::Unit);
    let handler_body = arena.constant_expr(Value::Unit);
    let filter = arena.variable_expr(x);
    let finally = arena.variable_expr(x);
    let root = arena.try_expr(
        body,
        &[CatchBlock::new(None, handler_body, Some(filter))],
        Some(finally),
    );
    let replacement = arena.constant_expr(Value::Bool(true));

    let out = substitute(&mut arena, root, x, replacement);
    let ExprKind::Try {
        body: new_body,
        handlers,
        finally: new_finally,
    } = *arena.kind(out)
    else {
        panic!("expected try");
    };
    assert_eq!(new_body, body);
    assert_eq!(new_finally, replacement);
    let handler = arena.get_catch_blocks(handlers)[0];
    assert_eq!(handler.body, handler_body);
    assert_eq!(handler.filter(), Some(replacement));
}

#[test]
fn test_invoke_args_rewritten() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let x = arena.new_variable(interner.intern("x"));
    let f = arena.new_variable(interner.intern("f"));
    let callee = arena.variable_expr(f);
    let arg = arena.variable_expr(x);
    let call = arena.invoke(callee, &[arg]);
    let replacement = arena.constant_expr(Value::Int(3));

    let out = substitute(&mut arena, call, x, replacement);
    let ExprKind::Invoke {
        callee: new_callee,
        args,
    } = *arena.kind(out)
    else {
        panic!("expected invoke");
    };
    assert_eq!(new_callee, callee);
    assert_eq!(arena.get_expr_list(args), &[replacement]);
}
