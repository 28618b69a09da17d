//! Read-only depth-first traversal.
//!
//! [`walk`] calls `visitor.visit(Some(node))`; when that returns
//! [`Visit::Children`] every present child is walked in source order and
//! the visitor then receives exactly one `visit(None)`. The same visitor
//! continues into the children; visitors that keep a stack (scopes,
//! enclosing declarations) hold it in `self` and pop it on the `None` call.
//!
//! A file's comment list is not walked: each group is reached through the
//! node it documents.

use crate::ast::{
    BasicLit, BlockStmt, CallExpr, Decl, Doc, Expr, Field, FieldList, FuncType,
    Ident, NodeRef, Spec, Stmt, TypeParamList,
};
use genus_common::limits::{STACK_GROWTH, STACK_RED_ZONE};

/// What to do after visiting a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visit {
    /// Walk the node's children, then send the `None` notification.
    Children,
    /// Do not descend; no `None` notification follows.
    Skip,
}

pub trait Visitor<'ast> {
    /// Called with `Some(node)` before a node's children and with `None`
    /// once they are done. The return value of a `None` call is ignored.
    fn visit(&mut self, node: Option<NodeRef<'ast>>) -> Visit;
}

/// Traverse `node` depth-first.
pub fn walk<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, node: NodeRef<'ast>) {
    if visitor.visit(Some(node)) == Visit::Skip {
        return;
    }
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || walk_children(visitor, node));
    visitor.visit(None);
}

struct Inspector<F>(F);

impl<'ast, F> Visitor<'ast> for Inspector<F>
where
    F: FnMut(Option<NodeRef<'ast>>) -> bool,
{
    fn visit(&mut self, node: Option<NodeRef<'ast>>) -> Visit {
        if (self.0)(node) {
            Visit::Children
        } else {
            Visit::Skip
        }
    }
}

/// Traverse `node` depth-first, calling `f` for each node. Children are
/// visited while `f` returns true; `f(None)` follows the children of every
/// node for which it returned true.
pub fn inspect<'ast, F>(node: NodeRef<'ast>, f: F)
where
    F: FnMut(Option<NodeRef<'ast>>) -> bool,
{
    walk(&mut Inspector(f), node);
}

fn walk_children<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, node: NodeRef<'ast>) {
    match node {
        NodeRef::Comment(_) | NodeRef::Ident(_) | NodeRef::BasicLit(_) => {}
        NodeRef::CommentGroup(group) => {
            for comment in &group.list {
                walk(v, NodeRef::Comment(comment));
            }
        }
        NodeRef::Field(field) => walk_field(v, field),
        NodeRef::FieldList(list) => walk_field_list(v, list),
        NodeRef::TypeParam(param) => {
            walk_doc(v, &param.doc);
            walk_idents(v, &param.names);
            walk(v, NodeRef::expr(&param.bound));
            walk_lit(v, param.tag.as_ref());
            walk_doc(v, &param.comment);
        }
        NodeRef::TypeParamList(list) => walk_type_params(v, list),
        NodeRef::Call(call) => walk_call(v, call),
        NodeRef::FuncType(ft) => walk_func_type(v, ft),
        NodeRef::Expr(expr) => walk_expr(v, expr),
        NodeRef::Block(block) => walk_block(v, block),
        NodeRef::Stmt(stmt) => walk_stmt(v, stmt),
        NodeRef::Spec(spec) => walk_spec(v, spec),
        NodeRef::Decl(decl) => walk_decl(v, decl),
        NodeRef::File(file) => {
            walk_doc(v, &file.doc);
            walk(v, NodeRef::Ident(&file.name));
            for decl in &file.decls {
                walk(v, NodeRef::Decl(decl));
            }
        }
        NodeRef::Package(package) => {
            for file in package.files.values() {
                walk(v, NodeRef::File(file));
            }
        }
    }
}

fn walk_doc<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, doc: &'ast Doc) {
    if let Some(group) = doc {
        walk(v, NodeRef::CommentGroup(group));
    }
}

fn walk_lit<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, lit: Option<&'ast BasicLit>) {
    if let Some(lit) = lit {
        walk(v, NodeRef::BasicLit(lit));
    }
}

fn walk_idents<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, idents: &'ast [Ident]) {
    for ident in idents {
        walk(v, NodeRef::Ident(ident));
    }
}

fn walk_exprs<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, exprs: &'ast [Expr]) {
    for expr in exprs {
        walk(v, NodeRef::expr(expr));
    }
}

fn walk_opt_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: Option<&'ast Expr>) {
    if let Some(expr) = expr {
        walk(v, NodeRef::expr(expr));
    }
}

fn walk_stmts<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmts: &'ast [Stmt]) {
    for stmt in stmts {
        walk(v, NodeRef::stmt(stmt));
    }
}

fn walk_opt_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: Option<&'ast Stmt>) {
    if let Some(stmt) = stmt {
        walk(v, NodeRef::stmt(stmt));
    }
}

fn walk_field<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, field: &'ast Field) {
    walk_doc(v, &field.doc);
    walk_idents(v, &field.names);
    walk(v, NodeRef::expr(&field.ty));
    walk_lit(v, field.tag.as_ref());
    walk_doc(v, &field.comment);
}

fn walk_field_list<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, list: &'ast FieldList) {
    for field in &list.list {
        walk(v, NodeRef::Field(field));
    }
}

fn walk_type_params<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, list: &'ast TypeParamList) {
    for param in &list.list {
        walk(v, NodeRef::TypeParam(param));
    }
}

fn walk_opt_type_params<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    list: &'ast Option<TypeParamList>,
) {
    if let Some(list) = list {
        walk(v, NodeRef::TypeParamList(list));
    }
}

fn walk_call<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, call: &'ast CallExpr) {
    walk(v, NodeRef::expr(&call.fun));
    walk_exprs(v, &call.args);
}

fn walk_func_type<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, ft: &'ast FuncType) {
    walk_opt_type_params(v, &ft.type_params);
    walk(v, NodeRef::FieldList(&ft.params));
    if let Some(results) = &ft.results {
        walk(v, NodeRef::FieldList(results));
    }
}

fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, block: &'ast BlockStmt) {
    walk_stmts(v, &block.list);
}

fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Bad { .. } | Expr::Ident(_) | Expr::BasicLit(_) => {}
        Expr::Ellipsis { elt, .. } => walk_opt_expr(v, elt.as_deref()),
        Expr::FuncLit { ty, body } => {
            walk(v, NodeRef::FuncType(ty));
            walk(v, NodeRef::Block(body));
        }
        Expr::CompositeLit { ty, elts, .. } => {
            walk_opt_expr(v, ty.as_deref());
            walk_exprs(v, elts);
        }
        Expr::Paren { x, .. } | Expr::Star { x, .. } | Expr::Unary { x, .. } => {
            walk(v, NodeRef::expr(x));
        }
        Expr::Selector { x, sel } => {
            walk(v, NodeRef::expr(x));
            walk(v, NodeRef::Ident(sel));
        }
        Expr::Index { x, index, .. } => {
            walk(v, NodeRef::expr(x));
            walk(v, NodeRef::expr(index));
        }
        Expr::Slice {
            x, low, high, max, ..
        } => {
            walk(v, NodeRef::expr(x));
            walk_opt_expr(v, low.as_deref());
            walk_opt_expr(v, high.as_deref());
            walk_opt_expr(v, max.as_deref());
        }
        Expr::TypeAssert { x, ty, .. } => {
            walk(v, NodeRef::expr(x));
            walk_opt_expr(v, ty.as_deref());
        }
        Expr::Call(call) => walk_call(v, call),
        Expr::Binary { x, y, .. } => {
            walk(v, NodeRef::expr(x));
            walk(v, NodeRef::expr(y));
        }
        Expr::KeyValue { key, value, .. } => {
            walk(v, NodeRef::expr(key));
            walk(v, NodeRef::expr(value));
        }
        Expr::ArrayType { len, elt, .. } => {
            walk_opt_expr(v, len.as_deref());
            walk(v, NodeRef::expr(elt));
        }
        Expr::StructType {
            type_params,
            fields,
            ..
        } => {
            walk_opt_type_params(v, type_params);
            walk(v, NodeRef::FieldList(fields));
        }
        Expr::FuncType(ft) => walk_func_type(v, ft),
        Expr::InterfaceType {
            type_params,
            methods,
            ..
        } => {
            walk_opt_type_params(v, type_params);
            walk(v, NodeRef::FieldList(methods));
        }
        Expr::MapType { key, value, .. } => {
            walk(v, NodeRef::expr(key));
            walk(v, NodeRef::expr(value));
        }
        Expr::ChanType { value, .. } => walk(v, NodeRef::expr(value)),
        Expr::GenericType { ty, type_args, .. } => {
            walk(v, NodeRef::expr(ty));
            walk_exprs(v, type_args);
        }
    }
}

fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Bad { .. } | Stmt::Empty { .. } => {}
        Stmt::Decl(decl) => walk(v, NodeRef::Decl(decl)),
        Stmt::Labeled { label, stmt, .. } => {
            walk(v, NodeRef::Ident(label));
            walk(v, NodeRef::stmt(stmt));
        }
        Stmt::Expr(x) => walk(v, NodeRef::expr(x)),
        Stmt::Send { chan, value, .. } => {
            walk(v, NodeRef::expr(chan));
            walk(v, NodeRef::expr(value));
        }
        Stmt::IncDec { x, .. } => walk(v, NodeRef::expr(x)),
        Stmt::Assign { lhs, rhs, .. } => {
            walk_exprs(v, lhs);
            walk_exprs(v, rhs);
        }
        Stmt::Go { call, .. } | Stmt::Defer { call, .. } => walk(v, NodeRef::Call(call)),
        Stmt::Return { results, .. } => walk_exprs(v, results),
        Stmt::Branch { label, .. } => {
            if let Some(label) = label {
                walk(v, NodeRef::Ident(label));
            }
        }
        Stmt::Block(block) => walk_block(v, block),
        Stmt::If {
            init,
            cond,
            body,
            else_branch,
            ..
        } => {
            walk_opt_stmt(v, init.as_deref());
            walk(v, NodeRef::expr(cond));
            walk(v, NodeRef::Block(body));
            walk_opt_stmt(v, else_branch.as_deref());
        }
        Stmt::CaseClause { list, body, .. } => {
            walk_exprs(v, list);
            walk_stmts(v, body);
        }
        Stmt::Switch {
            init, tag, body, ..
        } => {
            walk_opt_stmt(v, init.as_deref());
            walk_opt_expr(v, tag.as_ref());
            walk(v, NodeRef::Block(body));
        }
        Stmt::TypeSwitch {
            init, assign, body, ..
        } => {
            walk_opt_stmt(v, init.as_deref());
            walk(v, NodeRef::stmt(assign));
            walk(v, NodeRef::Block(body));
        }
        Stmt::CommClause { comm, body, .. } => {
            walk_opt_stmt(v, comm.as_deref());
            walk_stmts(v, body);
        }
        Stmt::Select { body, .. } => walk(v, NodeRef::Block(body)),
        Stmt::For {
            init,
            cond,
            post,
            body,
            ..
        } => {
            walk_opt_stmt(v, init.as_deref());
            walk_opt_expr(v, cond.as_ref());
            walk_opt_stmt(v, post.as_deref());
            walk(v, NodeRef::Block(body));
        }
        Stmt::Range {
            key,
            value,
            x,
            body,
            ..
        } => {
            walk_opt_expr(v, key.as_ref());
            walk_opt_expr(v, value.as_ref());
            walk(v, NodeRef::expr(x));
            walk(v, NodeRef::Block(body));
        }
    }
}

fn walk_spec<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, spec: &'ast Spec) {
    match spec {
        Spec::Import {
            doc,
            name,
            path,
            comment,
            ..
        } => {
            walk_doc(v, doc);
            if let Some(name) = name {
                walk(v, NodeRef::Ident(name));
            }
            walk(v, NodeRef::BasicLit(path));
            walk_doc(v, comment);
        }
        Spec::Value {
            doc,
            names,
            ty,
            values,
            comment,
        } => {
            walk_doc(v, doc);
            walk_idents(v, names);
            walk_opt_expr(v, ty.as_ref());
            walk_exprs(v, values);
            walk_doc(v, comment);
        }
        Spec::Type {
            doc,
            name,
            ty,
            comment,
            ..
        } => {
            walk_doc(v, doc);
            walk(v, NodeRef::Ident(name));
            walk(v, NodeRef::expr(ty));
            walk_doc(v, comment);
        }
    }
}

fn walk_decl<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, decl: &'ast Decl) {
    match decl {
        Decl::Bad { .. } => {}
        Decl::Gen(gen_decl) => {
            walk_doc(v, &gen_decl.doc);
            for spec in &gen_decl.specs {
                walk(v, NodeRef::Spec(spec));
            }
        }
        Decl::Func(func) => {
            walk_doc(v, &func.doc);
            if let Some(recv) = &func.recv {
                walk(v, NodeRef::FieldList(recv));
            }
            walk(v, NodeRef::Ident(&func.name));
            walk(v, NodeRef::FuncType(&func.ty));
            if let Some(body) = &func.body {
                walk(v, NodeRef::Block(body));
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/walk_tests.rs"]
mod tests;
