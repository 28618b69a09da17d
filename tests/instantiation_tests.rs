//! End-to-end instantiation: substitute a generic signature against a call
//! site, monomorphize the body, then run further rewrites over the result.

use genus::common::Pos;
use genus::solver::{ChanDir, SignatureShape, SymbolId, format_type};
use genus::syntax::ast::{
    BlockStmt, CallExpr, Expr, Field, FieldList, FuncDecl, FuncType, Ident, NodeRef, Stmt, Token,
    TypeParam, TypeParamList,
};
use genus::syntax::transform::StmtList;
use genus::tracing_config::LogFormat;
use genus::{
    Rewriter, TypeAliases, TypeArena, TypeId, contains_unresolved_generic, inspect,
    instantiate_func, is_composite_generic, transform_stmt,
};
use rayon::prelude::*;

fn ident(name: &str) -> Ident {
    Ident::new(Pos::NONE, name)
}

fn slice_of(elt: Expr) -> Expr {
    Expr::ArrayType {
        lbrack: Pos::NONE,
        len: None,
        elt: Box::new(elt),
    }
}

fn call(fun: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        fun: Box::new(Expr::ident(fun)),
        lparen: Pos::NONE,
        args,
        ellipsis: Pos::NONE,
        rparen: Pos::NONE,
    })
}

fn tuple(arena: &TypeArena, vars: &[(&str, TypeId)]) -> TypeId {
    arena.tuple(vars.iter().map(|&(name, ty)| arena.new_var(name, ty)).collect())
}

/// `func Map[T, U any](xs []T, f func(T) U) []U`
struct MapFunc {
    context: TypeId,
    t: SymbolId,
    u: SymbolId,
    template: TypeId,
    decl: FuncDecl,
}

fn declare_map(arena: &TypeArena) -> MapFunc {
    let context = arena.declare_named("Map", None);
    let any = arena.empty_interface();
    let (t, t_ty) = arena.declare_type_param("T", any, Some(context));
    let (u, u_ty) = arena.declare_type_param("U", any, Some(context));
    let callback = arena.signature(SignatureShape {
        params: Some(tuple(arena, &[("", t_ty)])),
        results: Some(tuple(arena, &[("", u_ty)])),
        ..SignatureShape::default()
    });
    let template = arena.signature(SignatureShape {
        params: Some(tuple(arena, &[("xs", arena.slice(t_ty)), ("f", callback)])),
        results: Some(tuple(arena, &[("", arena.slice(u_ty))])),
        type_params: vec![t, u],
        ..SignatureShape::default()
    });

    // out := make([]U, 0, len(xs))
    // for i := 0; i < len(xs); i++ { out = append(out, f(xs[i])) }
    // return out
    let body = BlockStmt::new(vec![
        Stmt::Assign {
            lhs: vec![Expr::ident("out")],
            tok_pos: Pos::NONE,
            tok: Token::Define,
            rhs: vec![call(
                "make",
                vec![
                    slice_of(Expr::ident("U")),
                    Expr::BasicLit(genus::syntax::ast::BasicLit {
                        pos: Pos::NONE,
                        kind: Token::Int,
                        value: "0".to_string(),
                    }),
                    call("len", vec![Expr::ident("xs")]),
                ],
            )],
        },
        Stmt::For {
            for_pos: Pos::NONE,
            init: Some(Box::new(Stmt::Assign {
                lhs: vec![Expr::ident("i")],
                tok_pos: Pos::NONE,
                tok: Token::Define,
                rhs: vec![Expr::ident("zero")],
            })),
            cond: Some(Expr::Binary {
                x: Box::new(Expr::ident("i")),
                op_pos: Pos::NONE,
                op: Token::Lss,
                y: Box::new(call("len", vec![Expr::ident("xs")])),
            }),
            post: Some(Box::new(Stmt::IncDec {
                x: Expr::ident("i"),
                tok_pos: Pos::NONE,
                tok: Token::Inc,
            })),
            body: BlockStmt::new(vec![Stmt::Assign {
                lhs: vec![Expr::ident("out")],
                tok_pos: Pos::NONE,
                tok: Token::Assign,
                rhs: vec![call(
                    "append",
                    vec![
                        Expr::ident("out"),
                        call(
                            "f",
                            vec![Expr::Index {
                                x: Box::new(Expr::ident("xs")),
                                lbrack: Pos::NONE,
                                index: Box::new(Expr::ident("i")),
                                rbrack: Pos::NONE,
                            }],
                        ),
                    ],
                )],
            }]),
        },
        Stmt::Return {
            return_pos: Pos::NONE,
            results: vec![Expr::ident("out")],
        },
    ]);

    let decl = FuncDecl {
        doc: None,
        recv: None,
        name: ident("Map"),
        ty: FuncType {
            func: Pos::NONE,
            type_params: Some(TypeParamList::new(vec![TypeParam::new(
                vec![ident("T"), ident("U")],
                Expr::ident("any"),
            )])),
            params: FieldList::new(vec![
                Field::new(vec![ident("xs")], slice_of(Expr::ident("T"))),
                Field::new(
                    vec![ident("f")],
                    Expr::FuncType(FuncType {
                        func: Pos::NONE,
                        type_params: None,
                        params: FieldList::new(vec![Field::new(Vec::new(), Expr::ident("T"))]),
                        results: Some(FieldList::new(vec![Field::new(
                            Vec::new(),
                            Expr::ident("U"),
                        )])),
                    }),
                ),
            ]),
            results: Some(FieldList::new(vec![Field::new(
                Vec::new(),
                slice_of(Expr::ident("U")),
            )])),
        },
        body: Some(body),
    };

    MapFunc {
        context,
        t,
        u,
        template,
        decl,
    }
}

/// Signature of `Map(xs, f)` at a call site with `xs []elem` and
/// `f func(elem) out`.
fn call_site(arena: &TypeArena, elem: TypeId, out: TypeId) -> TypeId {
    let callback = arena.signature(SignatureShape {
        params: Some(tuple(arena, &[("", elem)])),
        results: Some(tuple(arena, &[("", out)])),
        ..SignatureShape::default()
    });
    arena.signature(SignatureShape {
        params: Some(tuple(arena, &[("xs", arena.slice(elem)), ("f", callback)])),
        results: Some(tuple(arena, &[("", arena.slice(out))])),
        ..SignatureShape::default()
    })
}

fn identifiers(stmts: &[Stmt]) -> Vec<String> {
    let mut names = Vec::new();
    for stmt in stmts {
        inspect(NodeRef::stmt(stmt), |node| {
            if let Some(NodeRef::Ident(ident)) = node {
                names.push(ident.name.clone());
            }
            true
        });
    }
    names
}

#[test]
fn test_monomorphize_map_for_int_to_string() {
    let arena = TypeArena::new();
    let map = declare_map(&arena);
    assert!(contains_unresolved_generic(&arena, map.template));
    assert!(is_composite_generic(&arena, map.template));

    let site = call_site(&arena, TypeId::INT, TypeId::STRING);
    let mut aliases = TypeAliases::new();
    let inst = instantiate_func(
        &arena,
        &map.decl,
        map.template,
        map.context,
        Some(site),
        &mut aliases,
        "_int_string",
    )
    .unwrap();

    assert!(inst.is_complete(), "unbound: {:?}", inst.unbound);
    assert_eq!(aliases.get(map.t), Some(TypeId::INT));
    assert_eq!(aliases.get(map.u), Some(TypeId::STRING));
    assert_eq!(
        format_type(&arena, inst.signature),
        "func(xs []int, f func(int) string) []string"
    );
    assert!(!contains_unresolved_generic(&arena, inst.signature));

    assert_eq!(inst.decl.name.name, "Map_int_string");
    assert!(inst.decl.ty.type_params.is_none());
    let body = &inst.decl.body.as_ref().expect("body").list;
    let names = identifiers(body);
    assert!(names.contains(&"string".to_string()));
    assert!(!names.iter().any(|n| n == "T" || n == "U"));
}

/// Hoists the init of every `for` loop into a separate statement, the way a
/// lowering pass would before emitting a target without init clauses.
struct HoistLoopInit;

impl Rewriter for HoistLoopInit {
    fn rewrite_stmt(&mut self, _old: &Stmt, new: Stmt) -> StmtList {
        match new {
            Stmt::For {
                for_pos,
                init: Some(init),
                cond,
                post,
                body,
            } => StmtList::from_vec(vec![
                *init,
                Stmt::For {
                    for_pos,
                    init: None,
                    cond,
                    post,
                    body,
                },
            ]),
            other => StmtList::from_elem(other, 1),
        }
    }
}

#[test]
fn test_rewrite_instantiated_body() {
    let arena = TypeArena::new();
    let map = declare_map(&arena);
    let site = call_site(&arena, TypeId::FLOAT64, TypeId::BOOL);
    let mut aliases = TypeAliases::new();
    let inst = instantiate_func(
        &arena,
        &map.decl,
        map.template,
        map.context,
        Some(site),
        &mut aliases,
        "_f64",
    )
    .unwrap();

    let body = Stmt::Block(inst.decl.body.clone().expect("body"));
    let out = transform_stmt(&mut HoistLoopInit, &body).unwrap();
    assert_eq!(out.len(), 1);
    let Stmt::Block(block) = &out[0] else {
        panic!("expected block");
    };
    let kinds: Vec<&str> = block
        .list
        .iter()
        .map(|stmt| NodeRef::stmt(stmt).kind_name())
        .collect();
    assert_eq!(kinds, ["AssignStmt", "AssignStmt", "ForStmt", "ReturnStmt"]);
}

#[test]
fn test_parallel_instantiations_share_one_arena() {
    let arena = TypeArena::new();
    let map = declare_map(&arena);
    let elems = [
        TypeId::INT,
        TypeId::STRING,
        TypeId::BOOL,
        TypeId::FLOAT32,
        TypeId::UINT8,
        TypeId::INT64,
    ];
    let sites: Vec<(TypeId, TypeId)> = elems
        .iter()
        .map(|&elem| {
            let chan = arena.chan(ChanDir::RECV, elem);
            (elem, call_site(&arena, elem, chan))
        })
        .collect();

    let results: Vec<(TypeId, String, Option<TypeId>)> = sites
        .par_iter()
        .map(|&(elem, site)| {
            let mut aliases = TypeAliases::new();
            let inst = instantiate_func(
                &arena,
                &map.decl,
                map.template,
                map.context,
                Some(site),
                &mut aliases,
                "_inst",
            )
            .unwrap();
            (elem, format_type(&arena, inst.signature), aliases.get(map.t))
        })
        .collect();

    for (elem, signature, bound) in results {
        let elem_name = format_type(&arena, elem);
        assert_eq!(bound, Some(elem));
        assert_eq!(
            signature,
            format!("func(xs []{elem_name}, f func({elem_name}) <-chan {elem_name}) []<-chan {elem_name}")
        );
    }
}

#[test]
fn test_report_serializes_for_tooling() {
    let arena = TypeArena::new();
    let map = declare_map(&arena);
    let mut aliases = TypeAliases::new();
    let inst = instantiate_func(
        &arena,
        &map.decl,
        map.template,
        map.context,
        None,
        &mut aliases,
        "_none",
    )
    .unwrap();

    assert_eq!(inst.unbound, ["T", "U"]);
    let json = serde_json::to_value(&inst.report).unwrap();
    assert_eq!(json["depth_exceeded"], false);
    assert!(json["unresolved"].as_array().is_some_and(|u| !u.is_empty()));
}

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("bogus"), LogFormat::Text);
}
