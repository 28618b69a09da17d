use super::*;
use crate::ast::{
    BasicLit, BlockStmt, CallExpr, Comment, CommentGroup, Decl, Expr, Field, FieldList, File,
    FuncDecl, FuncType, Ident, NodeRef, Package, Stmt, Token,
};
use genus_common::Pos;
use std::sync::Arc;

fn int(value: &str) -> Expr {
    Expr::BasicLit(BasicLit {
        pos: Pos::NONE,
        kind: Token::Int,
        value: value.to_string(),
    })
}

fn define(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        lhs: vec![Expr::ident(name)],
        tok_pos: Pos::NONE,
        tok: Token::Define,
        rhs: vec![value],
    }
}

fn func(name: &str, body: Vec<Stmt>) -> Decl {
    Decl::Func(FuncDecl {
        doc: None,
        recv: None,
        name: Ident::new(Pos::NONE, name),
        ty: FuncType {
            func: Pos::NONE,
            type_params: None,
            params: FieldList::default(),
            results: None,
        },
        body: Some(BlockStmt::new(body)),
    })
}

fn file(name: &str, decls: Vec<Decl>) -> File {
    File {
        doc: None,
        package: Pos::NONE,
        name: Ident::new(Pos::NONE, name),
        decls,
        comments: Vec::new(),
    }
}

/// Kind names in visit order, with `/` for each end-of-children call.
fn trace(node: NodeRef<'_>) -> Vec<String> {
    let mut events = Vec::new();
    inspect(node, |node| {
        match node {
            Some(node) => events.push(node.kind_name().to_string()),
            None => events.push("/".to_string()),
        }
        true
    });
    events
}

#[test]
fn test_preorder_with_end_notifications() {
    let stmt = define("x", int("1"));
    assert_eq!(
        trace(NodeRef::stmt(&stmt)),
        ["AssignStmt", "Ident", "/", "BasicLit", "/", "/"]
    );
}

#[test]
fn test_for_children_in_source_order() {
    let stmt = Stmt::For {
        for_pos: Pos::NONE,
        init: Some(Box::new(define("i", int("0")))),
        cond: Some(Expr::Binary {
            x: Box::new(Expr::ident("i")),
            op_pos: Pos::NONE,
            op: Token::Lss,
            y: Box::new(Expr::ident("n")),
        }),
        post: Some(Box::new(Stmt::IncDec {
            x: Expr::ident("i"),
            tok_pos: Pos::NONE,
            tok: Token::Inc,
        })),
        body: BlockStmt::new(vec![Stmt::Expr(Expr::ident("work"))]),
    };

    let opened: Vec<String> = trace(NodeRef::stmt(&stmt))
        .into_iter()
        .filter(|event| event != "/")
        .collect();
    assert_eq!(
        opened,
        [
            "ForStmt",
            "AssignStmt",
            "Ident",
            "BasicLit",
            "BinaryExpr",
            "Ident",
            "Ident",
            "IncDecStmt",
            "Ident",
            "BlockStmt",
            "ExprStmt",
            "Ident",
        ]
    );
}

#[test]
fn test_skip_prunes_subtree_without_end_notification() {
    let lit = Expr::FuncLit {
        ty: FuncType {
            func: Pos::NONE,
            type_params: None,
            params: FieldList::default(),
            results: None,
        },
        body: BlockStmt::new(vec![define("hidden", int("1"))]),
    };
    let stmt = Stmt::Assign {
        lhs: vec![Expr::ident("f")],
        tok_pos: Pos::NONE,
        tok: Token::Define,
        rhs: vec![lit],
    };

    let mut events = Vec::new();
    inspect(NodeRef::stmt(&stmt), |node| match node {
        Some(node) => {
            events.push(node.kind_name().to_string());
            node.kind_name() != "FuncLit"
        }
        None => {
            events.push("/".to_string());
            true
        }
    });

    assert_eq!(events, ["AssignStmt", "Ident", "/", "FuncLit", "/"]);
}

#[test]
fn test_end_notifications_balance() {
    struct Depth {
        current: usize,
        max: usize,
    }

    impl<'ast> Visitor<'ast> for Depth {
        fn visit(&mut self, node: Option<NodeRef<'ast>>) -> Visit {
            match node {
                Some(_) => {
                    self.current += 1;
                    self.max = self.max.max(self.current);
                }
                None => self.current -= 1,
            }
            Visit::Children
        }
    }

    let f = file(
        "p",
        vec![func(
            "main",
            vec![Stmt::Block(BlockStmt::new(vec![define("x", int("1"))]))],
        )],
    );
    let mut depth = Depth { current: 0, max: 0 };
    walk(&mut depth, NodeRef::File(&f));

    assert_eq!(depth.current, 0);
    // File > FuncDecl > BlockStmt (body) > BlockStmt > AssignStmt > Ident
    assert_eq!(depth.max, 6);
}

#[test]
fn test_scope_stack_restored_by_end_notification() {
    /// Block nesting of every identifier. One entry per continued node
    /// records whether that node opened a scope.
    #[derive(Default)]
    struct Scopes {
        opened: Vec<bool>,
        blocks: usize,
        seen: Vec<(String, usize)>,
    }

    impl<'ast> Visitor<'ast> for Scopes {
        fn visit(&mut self, node: Option<NodeRef<'ast>>) -> Visit {
            match node {
                Some(node) => {
                    if let NodeRef::Ident(ident) = node {
                        self.seen.push((ident.name.clone(), self.blocks));
                    }
                    let is_block = matches!(node, NodeRef::Block(_));
                    self.blocks += usize::from(is_block);
                    self.opened.push(is_block);
                }
                None => {
                    if self.opened.pop() == Some(true) {
                        self.blocks -= 1;
                    }
                }
            }
            Visit::Children
        }
    }

    let f = file(
        "p",
        vec![func(
            "main",
            vec![
                define("a", int("1")),
                Stmt::Block(BlockStmt::new(vec![define("b", int("2"))])),
                define("c", int("3")),
            ],
        )],
    );
    let mut scopes = Scopes::default();
    walk(&mut scopes, NodeRef::File(&f));

    let seen: Vec<(&str, usize)> = scopes.seen.iter().map(|(n, d)| (n.as_str(), *d)).collect();
    assert_eq!(seen, [("p", 0), ("main", 0), ("a", 1), ("b", 2), ("c", 1)]);
    assert!(scopes.opened.is_empty());
    assert_eq!(scopes.blocks, 0);
}

#[test]
fn test_file_comment_list_not_walked() {
    let doc = Arc::new(CommentGroup {
        list: vec![Comment {
            slash: Pos(1),
            text: "// Package p.".to_string(),
        }],
    });
    let stray = Arc::new(CommentGroup {
        list: vec![Comment {
            slash: Pos(40),
            text: "// trailing".to_string(),
        }],
    });
    let mut f = file("p", Vec::new());
    f.doc = Some(doc.clone());
    f.comments = vec![doc, stray];

    let comments: Vec<String> = {
        let mut texts = Vec::new();
        inspect(NodeRef::File(&f), |node| {
            if let Some(NodeRef::Comment(comment)) = node {
                texts.push(comment.text.clone());
            }
            true
        });
        texts
    };

    assert_eq!(comments, ["// Package p."]);
}

#[test]
fn test_field_parts_in_order() {
    let field = Field {
        doc: None,
        names: vec![Ident::new(Pos::NONE, "a"), Ident::new(Pos::NONE, "b")],
        ty: Expr::ident("int"),
        tag: Some(BasicLit::string(Pos::NONE, "json")),
        comment: None,
    };
    let opened: Vec<String> = trace(NodeRef::Field(&field))
        .into_iter()
        .filter(|event| event != "/")
        .collect();
    assert_eq!(opened, ["Field", "Ident", "Ident", "Ident", "BasicLit"]);
}

#[test]
fn test_go_stmt_presents_call() {
    let stmt = Stmt::Go {
        go: Pos::NONE,
        call: CallExpr {
            fun: Box::new(Expr::ident("run")),
            lparen: Pos::NONE,
            args: vec![int("3")],
            ellipsis: Pos::NONE,
            rparen: Pos::NONE,
        },
    };
    let opened: Vec<String> = trace(NodeRef::stmt(&stmt))
        .into_iter()
        .filter(|event| event != "/")
        .collect();
    assert_eq!(opened, ["GoStmt", "CallExpr", "Ident", "BasicLit"]);
}

#[test]
fn test_package_files_in_insertion_order() {
    let mut package = Package {
        name: "p".to_string(),
        ..Package::default()
    };
    package
        .files
        .insert("z.go".to_string(), file("p", vec![func("last", Vec::new())]));
    package
        .files
        .insert("a.go".to_string(), file("p", vec![func("first", Vec::new())]));

    let mut names = Vec::new();
    inspect(NodeRef::Package(&package), |node| {
        if let Some(NodeRef::Decl(Decl::Func(func))) = node {
            names.push(func.name.name.clone());
        }
        true
    });

    assert_eq!(names, ["last", "first"]);
}
