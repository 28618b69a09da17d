use super::*;
use genus_solver::{StructShape, SymbolKind, VarInfo, format_type};
use genus_syntax::ast::{Field, FieldList};

/// Go spelling of a lowered type expression.
fn spell(expr: &Expr) -> String {
    match expr {
        Expr::Ident(ident) => ident.name.clone(),
        Expr::BasicLit(lit) => lit.value.clone(),
        Expr::Selector { x, sel } => format!("{}.{}", spell(x), sel.name),
        Expr::Star { x, .. } => format!("*{}", spell(x)),
        Expr::Ellipsis { elt, .. } => format!("...{}", elt.as_deref().map(spell).unwrap_or_default()),
        Expr::ArrayType { len, elt, .. } => format!(
            "[{}]{}",
            len.as_deref().map(spell).unwrap_or_default(),
            spell(elt)
        ),
        Expr::MapType { key, value, .. } => format!("map[{}]{}", spell(key), spell(value)),
        Expr::ChanType { dir, value, .. } => match dir {
            ChanDir::Send => format!("chan<- {}", spell(value)),
            ChanDir::Recv => format!("<-chan {}", spell(value)),
            ChanDir::Both => format!("chan {}", spell(value)),
        },
        Expr::FuncType(ft) => format!("func{}", spell_signature(ft)),
        other => panic!("no spelling for {other:?}"),
    }
}

fn spell_fields(list: &FieldList) -> String {
    list.list
        .iter()
        .map(|field: &Field| {
            let names: Vec<&str> = field.names.iter().map(|n| n.name.as_str()).collect();
            if names.is_empty() {
                spell(&field.ty)
            } else {
                format!("{} {}", names.join(", "), spell(&field.ty))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn spell_signature(ft: &FuncType) -> String {
    let mut out = format!("({})", spell_fields(&ft.params));
    if let Some(results) = &ft.results {
        match results.list.as_slice() {
            [only] if only.names.is_empty() => {
                out.push(' ');
                out.push_str(&spell(&only.ty));
            }
            _ => out.push_str(&format!(" ({})", spell_fields(results))),
        }
    }
    out
}

fn tuple(arena: &TypeArena, vars: &[(&str, TypeId)]) -> TypeId {
    arena.tuple(vars.iter().map(|&(name, ty)| arena.new_var(name, ty)).collect())
}

#[test]
fn test_basic_and_named_types_lower_to_identifiers() {
    let arena = TypeArena::new();
    let celsius = arena.declare_named("Celsius", None);
    arena.set_underlying(celsius, TypeId::FLOAT64);

    assert_eq!(type_to_expr(&arena, TypeId::INT), Expr::ident("int"));
    assert_eq!(type_to_expr(&arena, celsius), Expr::ident("Celsius"));
    assert_eq!(type_to_expr(&arena, TypeId::INVALID), Expr::ident("invalid"));
    assert_eq!(spell(&type_to_expr(&arena, TypeId::UNSAFE_POINTER)), "unsafe.Pointer");
}

#[test]
fn test_lowering_spells_like_formatter() {
    let arena = TypeArena::new();
    let types = [
        arena.map(TypeId::STRING, arena.slice(arena.pointer(TypeId::INT))),
        arena.array(3, TypeId::UINT8),
        arena.chan(genus_solver::ChanDir::RECV, TypeId::BOOL),
        arena.chan(genus_solver::ChanDir::SEND, TypeId::BOOL),
        arena.chan(genus_solver::ChanDir::BOTH, TypeId::BOOL),
        arena.signature(SignatureShape {
            params: Some(tuple(
                &arena,
                &[("sep", TypeId::STRING), ("parts", arena.slice(TypeId::STRING))],
            )),
            results: Some(tuple(&arena, &[("", TypeId::STRING)])),
            variadic: true,
            ..SignatureShape::default()
        }),
        arena.signature(SignatureShape {
            params: Some(tuple(&arena, &[("", TypeId::INT)])),
            results: Some(tuple(&arena, &[("n", TypeId::INT), ("err", TypeId::STRING)])),
            ..SignatureShape::default()
        }),
    ];

    for ty in types {
        assert_eq!(spell(&type_to_expr(&arena, ty)), format_type(&arena, ty));
    }
}

#[test]
fn test_struct_fields_embedding_and_tags() {
    let arena = TypeArena::new();
    let base = arena.declare_named("Base", None);
    arena.set_underlying(base, arena.struct_type(StructShape::default()));
    let embedded = arena.new_field("Base", base, true);
    let name = arena.new_field("Name", TypeId::STRING, false);
    let shape = StructShape {
        fields: vec![embedded, name],
        tags: vec![None, Some("json:\"name\"".to_string())],
        ..StructShape::default()
    };
    let ty = arena.struct_type(shape);

    let Expr::StructType {
        fields,
        type_params,
        ..
    } = type_to_expr(&arena, ty)
    else {
        panic!("expected struct type");
    };
    assert!(type_params.is_none());
    assert_eq!(fields.list.len(), 2);
    assert_eq!(fields.num_fields(), 2);
    assert!(fields.list[0].names.is_empty());
    assert_eq!(fields.list[0].ty, Expr::ident("Base"));
    assert_eq!(fields.list[1].names[0].name, "Name");
    assert!(fields.list[0].tag.is_none());
    assert_eq!(
        fields.list[1].tag.as_ref().map(|t| t.value.as_str()),
        Some("\"json:\\\"name\\\"\"")
    );
    assert!(matches!(
        arena.symbol(embedded).map(|s| s.kind),
        Some(SymbolKind::Var(VarInfo { anonymous: true, .. }))
    ));
}

#[test]
fn test_interface_embeddeds_then_methods() {
    let arena = TypeArena::new();
    let stringer = arena.declare_named("Stringer", None);
    let string_sig = arena.signature(SignatureShape {
        results: Some(tuple(&arena, &[("", TypeId::STRING)])),
        ..SignatureShape::default()
    });
    let string_method = arena.new_func("String", string_sig);
    arena.set_underlying(stringer, arena.interface_with_methods(vec![string_method], Vec::new()));

    let close_sig = arena.signature(SignatureShape::default());
    let close = arena.new_func("Close", close_sig);
    let iface = arena.interface_with_methods(vec![close], vec![stringer]);

    let Expr::InterfaceType { methods, .. } = type_to_expr(&arena, iface) else {
        panic!("expected interface type");
    };
    assert_eq!(methods.list.len(), 2);
    assert!(methods.list[0].names.is_empty());
    assert_eq!(methods.list[0].ty, Expr::ident("Stringer"));
    assert_eq!(methods.list[1].names[0].name, "Close");
    assert_eq!(spell(&methods.list[1].ty), "func()");
}

#[test]
fn test_generic_signature_lists_type_params() {
    let arena = TypeArena::new();
    let context = arena.declare_named("Map", None);
    let any = arena.empty_interface();
    let (k, k_ty) = arena.declare_type_param("K", any, Some(context));
    let sig = arena.signature(SignatureShape {
        params: Some(tuple(&arena, &[("key", k_ty)])),
        type_params: vec![k],
        ..SignatureShape::default()
    });

    let Expr::FuncType(ft) = type_to_expr(&arena, sig) else {
        panic!("expected func type");
    };
    let params = ft.type_params.expect("type params lowered");
    assert_eq!(params.names().map(|n| n.name.as_str()).collect::<Vec<_>>(), ["K"]);
    assert_eq!(params.list[0].bound, Expr::ident("any"));
    assert_eq!(spell_fields(&ft.params), "key K");
}

#[test]
fn test_pathological_nesting_cut_off() {
    let arena = TypeArena::new();
    let mut ty = TypeId::INT;
    for _ in 0..300 {
        ty = arena.slice(ty);
    }

    let mut expr = type_to_expr(&arena, ty);
    let mut levels = 0;
    while let Expr::ArrayType { elt, .. } = expr {
        expr = *elt;
        levels += 1;
    }
    assert!(levels < 300);
    assert_eq!(expr, Expr::ident("invalid"));
}
