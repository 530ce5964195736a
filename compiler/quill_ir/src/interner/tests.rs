use super::*;

#[test]
fn test_intern_dedups() {
    let interner = StringInterner::new();
    let a = interner.intern("x");
    let b = interner.intern("x");
    let c = interner.intern("y");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 3);
}

#[test]
fn test_lookup_roundtrip() {
    let interner = StringInterner::new();
    let name = interner.intern("counter");
    assert_eq!(interner.lookup(name), "counter");
}

#[test]
fn test_empty_is_preinterned() {
    let interner = StringInterner::default();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}
