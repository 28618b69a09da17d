use super::*;
use crate::types::{SignatureShape, StructShape};

#[test]
fn test_formats_composite_types() {
    let arena = TypeArena::new();
    let ty = arena.map(TypeId::STRING, arena.slice(arena.pointer(TypeId::INT)));
    assert_eq!(format_type(&arena, ty), "map[string][]*int");

    let arr = arena.array(3, TypeId::UINT8);
    assert_eq!(format_type(&arena, arr), "[3]uint8");

    let recv = arena.chan(ChanDir::RECV, TypeId::BOOL);
    let send = arena.chan(ChanDir::SEND, TypeId::BOOL);
    let both = arena.chan(ChanDir::BOTH, TypeId::BOOL);
    assert_eq!(format_type(&arena, recv), "<-chan bool");
    assert_eq!(format_type(&arena, send), "chan<- bool");
    assert_eq!(format_type(&arena, both), "chan bool");
}

#[test]
fn test_formats_signatures() {
    let arena = TypeArena::new();
    let params = arena.tuple(vec![
        arena.new_var("sep", TypeId::STRING),
        arena.new_var("parts", arena.slice(TypeId::STRING)),
    ]);
    let results = arena.tuple(vec![arena.new_var("", TypeId::STRING)]);
    let sig = arena.signature(SignatureShape {
        params: Some(params),
        results: Some(results),
        variadic: true,
        ..SignatureShape::default()
    });
    assert_eq!(
        format_type(&arena, sig),
        "func(sep string, parts ...string) string"
    );
}

#[test]
fn test_formats_struct_with_tags_and_embedded_fields() {
    let arena = TypeArena::new();
    let base = arena.declare_named("Base", None);
    let shape = StructShape {
        fields: vec![
            arena.new_field("Base", base, true),
            arena.new_field("Name", TypeId::STRING, false),
        ],
        tags: vec![None, Some("json:\"name\"".to_string())],
        ..StructShape::default()
    };
    let ty = arena.struct_type(shape);
    assert_eq!(
        format_type(&arena, ty),
        "struct{Base; Name string \"json:\\\"name\\\"\"}"
    );
}

#[test]
fn test_recursive_named_type_prints_finitely() {
    let arena = TypeArena::new();
    let node = arena.declare_named("Node", None);
    let underlying = arena.struct_type(StructShape {
        fields: vec![arena.new_field("next", arena.pointer(node), false)],
        ..StructShape::default()
    });
    arena.set_underlying(node, underlying);
    assert_eq!(format_type(&arena, underlying), "struct{next *Node}");
}

#[test]
fn test_formats_interface_method_set() {
    let arena = TypeArena::new();
    let sig = arena.signature(SignatureShape {
        results: Some(arena.tuple(vec![arena.new_var("", TypeId::STRING)])),
        ..SignatureShape::default()
    });
    let iface = arena.interface_with_methods(vec![arena.new_func("String", sig)], Vec::new());
    assert_eq!(format_type(&arena, iface), "interface{String() string}");
    assert_eq!(format_type(&arena, arena.empty_interface()), "interface{}");
}
