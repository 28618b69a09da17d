use super::*;

#[test]
fn test_basic_types_are_preregistered() {
    let arena = TypeArena::new();
    assert_eq!(arena.get(TypeId::INT), Some(TypeData::Basic(BasicKind::Int)));
    assert_eq!(arena.get(TypeId::STRING), Some(TypeData::Basic(BasicKind::String)));
    assert!(TypeId::UNTYPED_NIL.is_basic());
    assert_eq!(arena.type_count(), BasicKind::ALL.len());
}

#[test]
fn test_alloc_hands_out_fresh_handles() {
    let arena = TypeArena::new();
    let a = arena.slice(TypeId::INT);
    let b = arena.slice(TypeId::INT);
    assert_ne!(a, b, "structurally equal types keep distinct identities");
    assert!(!a.is_basic());
    assert_eq!(arena.get(a), arena.get(b));
}

#[test]
fn test_declare_named_links_symbol_and_type() {
    let arena = TypeArena::new();
    let node = arena.declare_named("Node", None);
    let shape = arena.named_shape(node).expect("named type");
    let obj = shape.obj.expect("declared name");
    let symbol = arena.symbol(obj).expect("symbol exists");
    assert_eq!(symbol.ty, node);
    assert_eq!(symbol.kind, SymbolKind::TypeName);
    assert_eq!(&*arena.resolve_atom(symbol.name), "Node");
    assert_eq!(shape.underlying, TypeId::INVALID);
}

#[test]
fn test_self_referential_named_type() {
    let arena = TypeArena::new();
    let node = arena.declare_named("Node", None);
    let next = arena.new_field("next", arena.pointer(node), false);
    let body = arena.struct_type(StructShape {
        fields: vec![next],
        ..StructShape::default()
    });
    arena.set_underlying(node, body);

    assert_eq!(arena.underlying(node), body);
    let Some(TypeData::Struct(shape)) = arena.get(body) else {
        panic!("expected struct");
    };
    let field_ty = arena.symbol_type(shape.fields[0]).expect("field type");
    assert_eq!(arena.get(field_ty), Some(TypeData::Pointer { base: node }));
}

#[test]
fn test_type_param_carries_context_and_constraint() {
    let arena = TypeArena::new();
    let list = arena.declare_named("List", None);
    let any = arena.empty_interface();
    let (obj, t) = arena.declare_type_param("T", any, Some(list));
    let shape = arena.named_shape(t).expect("named");
    assert_eq!(shape.obj, Some(obj));
    assert_eq!(shape.context, Some(list));
    assert_eq!(arena.underlying(t), any);
}

#[test]
fn test_interface_method_set_includes_embedded() {
    let arena = TypeArena::new();
    let sig = arena.signature(SignatureShape::default());
    let close = arena.new_func("Close", sig);
    let read = arena.new_func("Read", sig);

    let closer = arena.declare_named("Closer", None);
    let closer_iface = arena.interface_with_methods(vec![close], vec![]);
    arena.set_underlying(closer, closer_iface);

    let read_closer = arena.interface_with_methods(vec![read], vec![closer]);
    let Some(TypeData::Interface(shape)) = arena.get(read_closer) else {
        panic!("expected interface");
    };
    let names: Vec<String> = shape
        .all_methods
        .iter()
        .map(|&m| arena.symbol_name(m).to_string())
        .collect();
    assert_eq!(names, vec!["Close", "Read"]);
    assert_eq!(shape.methods, vec![read]);
    assert_eq!(shape.embeddeds, vec![closer]);
}

#[test]
fn test_symbol_with_type_keeps_metadata() {
    let arena = TypeArena::new();
    let id = arena.declare(
        SymbolKind::Var(VarInfo {
            is_field: true,
            used: true,
            ..VarInfo::default()
        }),
        "count",
        TypeId::INT,
        Some(ScopeId(3)),
        Some(PackageId(1)),
        Pos(42),
        7,
    );
    let original = arena.symbol(id).expect("symbol");
    let copy = original.with_type(TypeId::INT64);
    assert_eq!(copy.ty, TypeId::INT64);
    assert_eq!(copy.pos, Pos(42));
    assert_eq!(copy.order, 7);
    assert_eq!(copy.parent, Some(ScopeId(3)));
    assert_eq!(copy.pkg, Some(PackageId(1)));
    assert!(copy.is_field());
    assert_eq!(arena.symbol(id).expect("original").ty, TypeId::INT);
}
