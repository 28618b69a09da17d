use super::*;

#[test]
fn test_intern_dedupes() {
    let interner = ShardedInterner::new();
    let a1 = interner.intern("Node");
    let a2 = interner.intern("Node");
    let b = interner.intern("List");
    assert_eq!(a1, a2);
    assert_ne!(a1, b);
    assert_eq!(&*interner.resolve(a1), "Node");
    assert_eq!(&*interner.resolve(b), "List");
}

#[test]
fn test_empty_string_is_none() {
    let interner = ShardedInterner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(&*interner.resolve(Atom::NONE), "");
    assert!(interner.is_empty());
}

#[test]
fn test_no_real_string_maps_to_none() {
    let interner = ShardedInterner::new();
    interner.intern_predeclared();
    for name in ["int", "string", "any", "T", "U", "elem"] {
        let atom = interner.intern(name);
        assert!(!atom.is_none(), "{name} interned to NONE");
        assert_eq!(&*interner.resolve(atom), name);
    }
}

#[test]
fn test_concurrent_interning_agrees() {
    let interner = ShardedInterner::new();
    let atoms: Vec<Atom> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| interner.intern("shared")))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("interner thread panicked"))
            .collect()
    });
    assert!(atoms.windows(2).all(|w| w[0] == w[1]));
}
