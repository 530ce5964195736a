use super::*;
use crate::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn test_same_name_distinct_variables() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let x = interner.intern("x");

    let a = arena.new_variable(x);
    let b = arena.new_variable(x);
    assert_ne!(a, b);
    assert_eq!(arena.variable(a).name, arena.variable(b).name);
}

#[test]
fn test_block_lists() {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let v = arena.new_variable(interner.intern("v"));
    let read = arena.variable_expr(v);
    let one = arena.constant_expr(Value::Int(1));
    let block = arena.block(&[v], &[one, read]);

    let ExprKind::Block { vars, exprs } = *arena.kind(block) else {
        panic!("expected block, got {:?}", arena.kind(block));
    };
    assert_eq!(arena.get_var_list(vars), &[v]);
    assert_eq!(arena.get_expr_list(exprs), &[one, read]);
}

#[test]
fn test_empty_lists_use_empty_range() {
    let mut arena = ExprArena::new();
    assert_eq!(arena.push_expr_list(&[]), ExprRange::EMPTY);
    assert_eq!(arena.push_var_list(&[]), VarRange::EMPTY);
    assert_eq!(arena.push_catch_blocks(&[]), CatchRange::EMPTY);
    assert!(arena.get_var_list(VarRange::EMPTY).is_empty());
}

#[test]
fn test_try_optional_children() {
    let mut arena = ExprArena::new();
    let body = arena.constant_expr(Value::Unit);
    let handler_body = arena.constant_expr(Value::Int(0));
    let try_id = arena.try_expr(body, &[CatchBlock::new(None, handler_body, None)], None);

    let ExprKind::Try {
        handlers, finally, ..
    } = *arena.kind(try_id)
    else {
        panic!("expected try");
    };
    assert!(!finally.is_valid());
    let handlers = arena.get_catch_blocks(handlers);
    assert_eq!(handlers.len(), 1);
    assert_eq!(handlers[0].filter(), None);
    assert_eq!(handlers[0].body, handler_body);
}

#[test]
fn test_constants_are_not_deduplicated() {
    let mut arena = ExprArena::new();
    let a = arena.push_constant(Value::Int(1));
    let b = arena.push_constant(Value::Int(1));
    assert_ne!(a, b);
    assert_eq!(arena.constant(a), arena.constant(b));
}
