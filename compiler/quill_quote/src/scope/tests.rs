use super::*;
use pretty_assertions::assert_eq;
use quill_ir::{ExprArena, StringInterner};
use quill_runtime::Value;

/// `depth` nested frames, one hoisted variable each, with one live activation
/// per frame. `vars[0]` lives in the outermost frame.
struct Nested {
    vars: Vec<VarId>,
    chain: ScopeChain,
    locals: LocalsArena,
    frame: FrameId,
    array: ArrayId,
}

fn nested(depth: usize) -> Nested {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let mut chain = ScopeChain::new();
    let mut locals = LocalsArena::new();
    let mut vars = Vec::new();
    let (mut frame, mut array) = (None, None);
    for i in 0..depth {
        let var = arena.new_variable(interner.intern(&format!("v{i}")));
        vars.push(var);
        let f = chain.push_frame(frame, &[var]);
        let a = locals.activate(1, array);
        if let Some(cell) = locals.cell(a, 0) {
            cell.set(Value::Int(i64::try_from(i).unwrap_or_default()));
        }
        frame = Some(f);
        array = Some(a);
    }
    let (Some(frame), Some(array)) = (frame, array) else {
        panic!("depth must be at least 1");
    };
    Nested {
        vars,
        chain,
        locals,
        frame,
        array,
    }
}

fn resolve(n: &Nested, var: VarId) -> Result<Resolved, QuoteError> {
    resolve_cell(
        HoistedScope::new(&n.chain, n.frame),
        HoistedLocals::new(&n.locals, n.array),
        var,
    )
}

#[test]
fn test_resolves_in_innermost_frame() {
    let n = nested(4);
    let Ok(found) = resolve(&n, n.vars[3]) else {
        panic!("innermost variable resolves");
    };
    assert_eq!(found.depth, 0);
    assert_eq!(found.frame, n.frame);
    assert_eq!(found.cell.get(), Value::Int(3));
}

#[test]
fn test_resolves_three_frames_up() {
    let n = nested(4);
    let Ok(found) = resolve(&n, n.vars[0]) else {
        panic!("outermost variable resolves");
    };
    assert_eq!(found.depth, 3);
    assert_eq!(found.cell.get(), Value::Int(0));
    assert_eq!(
        n.chain.ancestors(n.frame).last(),
        Some(found.frame),
        "found in the root frame"
    );
}

#[test]
fn test_resolved_cell_is_the_live_cell() {
    let n = nested(2);
    let Ok(found) = resolve(&n, n.vars[0]) else {
        panic!("variable resolves");
    };
    found.cell.set(Value::Int(99));

    let Some(outer) = n.locals.parent(n.array) else {
        panic!("inner array has a parent");
    };
    assert_eq!(n.locals.cell(outer, 0).map(StrongBox::get), Some(Value::Int(99)));
}

#[test]
fn test_unbound_variable_is_internal_error() {
    let n = nested(3);
    let stray = VarId::new(1000);

    let err = resolve(&n, stray).err();
    assert_eq!(
        err,
        Some(QuoteError::UnboundVariable {
            var: stray,
            frame: n.frame
        })
    );
    assert!(err.is_some_and(|e| e.is_internal()));
}

#[test]
fn test_detached_locals() {
    let n = nested(1);
    let mut chain = n.chain.clone();
    let inner = chain.push_frame(Some(n.frame), &[]);
    // An inner activation with no parent array.
    let mut locals = n.locals.clone();
    let orphan = locals.activate(0, None);

    let err = resolve_cell(
        HoistedScope::new(&chain, inner),
        HoistedLocals::new(&locals, orphan),
        n.vars[0],
    )
    .err();
    assert_eq!(err, Some(QuoteError::DetachedLocals { frame: n.frame }));
}

#[test]
fn test_missing_slot() {
    let n = nested(1);
    let mut locals = n.locals.clone();
    let short = locals.activate(0, None);

    let err = resolve_cell(
        HoistedScope::new(&n.chain, n.frame),
        HoistedLocals::new(&locals, short),
        n.vars[0],
    )
    .err();
    assert_eq!(
        err,
        Some(QuoteError::MissingSlot {
            var: n.vars[0],
            frame: n.frame,
            slot: 0
        })
    );
}
