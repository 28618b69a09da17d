//! Structure-producing rewrite.
//!
//! Every `transform_*` entry point rebuilds its input bottom-up: children are
//! transformed first, a fresh parent is assembled from them (positions and
//! tokens copied), and only then is the [`Rewriter`] callback for the
//! parent's kind called with both the original and the rebuilt node. The
//! input tree is never modified.
//!
//! # Statement splicing
//!
//! `rewrite_stmt` may return any number of statements. Where the enclosing
//! slot holds a list (block, case and comm-clause bodies) all of them are
//! inserted in order. Single-statement slots splice as follows:
//!
//! | slot | leading outputs go | last output |
//! |---|---|---|
//! | `if`/`switch`/type-switch/`for` init | before the construct | new init |
//! | type-switch assign | before the construct (see below) | new assign |
//! | labeled statement | before the label | relabeled |
//! | `for` post | end of the loop body | new post |
//! | `else` | whole output wrapped in a block unless it is one block or `if` |
//! | select case communication | exactly one required, else error |
//!
//! When a type switch has an init and its assign expands, the init cannot
//! stay in its slot: it must run before the assign's leading statements.
//! The whole init output then moves ahead of them, and those statements
//! plus the switch are wrapped in a fresh block that keeps the init's scope.
//!
//! A single-statement slot that receives nothing gets an implicit empty
//! statement. Hoisted statements become part of the enclosing statement's
//! own output list, so they reach the nearest enclosing block.

use crate::ast::{
    BlockStmt, CallExpr, Decl, Expr, Field, FieldList, File, FuncDecl, FuncType, GenDecl, Ident,
    Node, NodeRef, Package, Spec, Stmt, TypeParam, TypeParamList,
};
use crate::error::{Result, SpliceContext, TransformError};
use genus_common::Pos;
use genus_common::limits::{MAX_TRANSFORM_DEPTH, STACK_GROWTH, STACK_RED_ZONE};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

/// Output of a statement rewrite. Almost always a single statement.
pub type StmtList = SmallVec<[Stmt; 1]>;

/// Per-kind rewrite callbacks. Each receives the original node and the node
/// rebuilt from already-transformed children; the defaults keep the rebuilt
/// node.
///
/// Kinds with a typed slot somewhere in the tree (calls under `go`/`defer`,
/// function signatures, identifiers, block bodies) have their own callback.
/// Where such a node also stands as a plain expression, its own callback
/// runs first and `rewrite_expr` second.
pub trait Rewriter {
    fn rewrite_expr(&mut self, _old: &Expr, new: Expr) -> Expr {
        new
    }

    fn rewrite_stmt(&mut self, _old: &Stmt, new: Stmt) -> StmtList {
        smallvec![new]
    }

    fn rewrite_block(&mut self, _old: &BlockStmt, new: BlockStmt) -> BlockStmt {
        new
    }

    fn rewrite_call(&mut self, _old: &CallExpr, new: CallExpr) -> CallExpr {
        new
    }

    fn rewrite_func_type(&mut self, _old: &FuncType, new: FuncType) -> FuncType {
        new
    }

    fn rewrite_ident(&mut self, _old: &Ident, new: Ident) -> Ident {
        new
    }

    fn rewrite_decl(&mut self, _old: &Decl, new: Decl) -> Decl {
        new
    }

    fn rewrite_spec(&mut self, _old: &Spec, new: Spec) -> Spec {
        new
    }

    fn rewrite_field(&mut self, _old: &Field, new: Field) -> Field {
        new
    }

    fn rewrite_field_list(&mut self, _old: &FieldList, new: FieldList) -> FieldList {
        new
    }

    fn rewrite_type_param(&mut self, _old: &TypeParam, new: TypeParam) -> TypeParam {
        new
    }

    fn rewrite_type_param_list(&mut self, _old: &TypeParamList, new: TypeParamList) -> TypeParamList {
        new
    }

    fn rewrite_file(&mut self, _old: &File, new: File) -> File {
        new
    }

    fn rewrite_package(&mut self, _old: &Package, new: Package) -> Package {
        new
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Rewrite a statement into zero or more statements.
pub fn transform_stmt<R: Rewriter + ?Sized>(rewriter: &mut R, stmt: &Stmt) -> Result<StmtList> {
    Transformer::new(rewriter).stmt(stmt)
}

pub fn transform_expr<R: Rewriter + ?Sized>(rewriter: &mut R, expr: &Expr) -> Result<Expr> {
    Transformer::new(rewriter).expr(expr)
}

pub fn transform_block<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    block: &BlockStmt,
) -> Result<BlockStmt> {
    Transformer::new(rewriter).block(block)
}

pub fn transform_decl<R: Rewriter + ?Sized>(rewriter: &mut R, decl: &Decl) -> Result<Decl> {
    Transformer::new(rewriter).decl(decl)
}

/// Rewrite the parts of a function declaration. There is no enclosing
/// `Decl`, so `rewrite_decl` is not called.
pub fn transform_func_decl<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    func: &FuncDecl,
) -> Result<FuncDecl> {
    Transformer::new(rewriter).func_decl(func)
}

pub fn transform_spec<R: Rewriter + ?Sized>(rewriter: &mut R, spec: &Spec) -> Result<Spec> {
    Transformer::new(rewriter).spec(spec)
}

pub fn transform_file<R: Rewriter + ?Sized>(rewriter: &mut R, file: &File) -> Result<File> {
    Transformer::new(rewriter).file(file)
}

pub fn transform_package<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    package: &Package,
) -> Result<Package> {
    Transformer::new(rewriter).package(package)
}

/// Rewrite any node 1:1. A statement must rewrite to exactly one statement.
pub fn transform_node<R: Rewriter + ?Sized>(rewriter: &mut R, node: NodeRef<'_>) -> Result<Node> {
    let mut t = Transformer::new(rewriter);
    Ok(match node {
        NodeRef::Comment(comment) => Node::Comment(comment.clone()),
        NodeRef::CommentGroup(group) => Node::CommentGroup(std::sync::Arc::new(group.clone())),
        NodeRef::Field(field) => Node::Field(t.field(field)?),
        NodeRef::FieldList(list) => Node::FieldList(t.field_list(list)?),
        NodeRef::TypeParam(param) => Node::TypeParam(t.type_param(param)?),
        NodeRef::TypeParamList(list) => Node::TypeParamList(t.type_param_list(list)?),
        NodeRef::Ident(ident) => Node::Ident(t.ident(ident)),
        NodeRef::BasicLit(lit) => Node::Expr(t.expr(&Expr::BasicLit(lit.clone()))?),
        NodeRef::Call(call) => Node::Call(t.call(call)?),
        NodeRef::FuncType(ft) => Node::FuncType(t.func_type(ft)?),
        NodeRef::Expr(expr) => Node::Expr(t.expr(expr)?),
        NodeRef::Block(block) => Node::Block(t.block(block)?),
        NodeRef::Stmt(stmt) => {
            let mut outputs = t.stmt(stmt)?;
            let produced = outputs.len();
            match (outputs.pop(), outputs.is_empty()) {
                (Some(stmt), true) => Node::Stmt(stmt),
                _ => {
                    return Err(TransformError::SpliceArity {
                        context: SpliceContext::SingleNode,
                        produced,
                    });
                }
            }
        }
        NodeRef::Spec(spec) => Node::Spec(t.spec(spec)?),
        NodeRef::Decl(decl) => Node::Decl(t.decl(decl)?),
        NodeRef::File(file) => Node::File(t.file(file)?),
        NodeRef::Package(package) => Node::Package(t.package(package)?),
    })
}

// =============================================================================
// Transformer
// =============================================================================

struct Transformer<'r, R: ?Sized> {
    rewriter: &'r mut R,
    depth: u32,
}

/// Split a single-slot result into the statements to move elsewhere and the
/// one that stays in the slot.
fn split_last(mut outputs: StmtList, pos: Pos) -> (StmtList, Stmt) {
    match outputs.pop() {
        Some(last) => (outputs, last),
        None => (outputs, Stmt::empty(pos)),
    }
}

impl<'r, R: Rewriter + ?Sized> Transformer<'r, R> {
    fn new(rewriter: &'r mut R) -> Self {
        Self { rewriter, depth: 0 }
    }

    fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_TRANSFORM_DEPTH {
            return Err(TransformError::DepthExceeded {
                limit: MAX_TRANSFORM_DEPTH,
            });
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || f(self));
        self.depth -= 1;
        result
    }

    // -------------------------------------------------------------------------
    // Leaves and typed slots
    // -------------------------------------------------------------------------

    fn ident(&mut self, old: &Ident) -> Ident {
        self.rewriter.rewrite_ident(old, old.clone())
    }

    fn idents(&mut self, old: &[Ident]) -> Vec<Ident> {
        old.iter().map(|ident| self.ident(ident)).collect()
    }

    fn call(&mut self, old: &CallExpr) -> Result<CallExpr> {
        let rebuilt = CallExpr {
            fun: self.boxed(&old.fun)?,
            lparen: old.lparen,
            args: self.exprs(&old.args)?,
            ellipsis: old.ellipsis,
            rparen: old.rparen,
        };
        Ok(self.rewriter.rewrite_call(old, rebuilt))
    }

    fn func_type(&mut self, old: &FuncType) -> Result<FuncType> {
        let rebuilt = FuncType {
            func: old.func,
            type_params: self.opt_type_param_list(&old.type_params)?,
            params: self.field_list(&old.params)?,
            results: old
                .results
                .as_ref()
                .map(|results| self.field_list(results))
                .transpose()?,
        };
        Ok(self.rewriter.rewrite_func_type(old, rebuilt))
    }

    fn field(&mut self, old: &Field) -> Result<Field> {
        let rebuilt = Field {
            doc: old.doc.clone(),
            names: self.idents(&old.names),
            ty: self.expr(&old.ty)?,
            tag: old.tag.clone(),
            comment: old.comment.clone(),
        };
        Ok(self.rewriter.rewrite_field(old, rebuilt))
    }

    fn field_list(&mut self, old: &FieldList) -> Result<FieldList> {
        let rebuilt = FieldList {
            opening: old.opening,
            list: old
                .list
                .iter()
                .map(|field| self.field(field))
                .collect::<Result<_>>()?,
            closing: old.closing,
        };
        Ok(self.rewriter.rewrite_field_list(old, rebuilt))
    }

    fn type_param(&mut self, old: &TypeParam) -> Result<TypeParam> {
        let rebuilt = TypeParam {
            doc: old.doc.clone(),
            names: self.idents(&old.names),
            bound: self.expr(&old.bound)?,
            tag: old.tag.clone(),
            comment: old.comment.clone(),
        };
        Ok(self.rewriter.rewrite_type_param(old, rebuilt))
    }

    fn type_param_list(&mut self, old: &TypeParamList) -> Result<TypeParamList> {
        let rebuilt = TypeParamList {
            opening: old.opening,
            list: old
                .list
                .iter()
                .map(|param| self.type_param(param))
                .collect::<Result<_>>()?,
            closing: old.closing,
        };
        Ok(self.rewriter.rewrite_type_param_list(old, rebuilt))
    }

    fn opt_type_param_list(&mut self, old: &Option<TypeParamList>) -> Result<Option<TypeParamList>> {
        old.as_ref().map(|list| self.type_param_list(list)).transpose()
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn expr(&mut self, old: &Expr) -> Result<Expr> {
        self.guarded(|t| t.expr_inner(old))
    }

    fn boxed(&mut self, old: &Expr) -> Result<Box<Expr>> {
        Ok(Box::new(self.expr(old)?))
    }

    fn opt_boxed(&mut self, old: Option<&Expr>) -> Result<Option<Box<Expr>>> {
        old.map(|expr| self.boxed(expr)).transpose()
    }

    fn opt_expr(&mut self, old: Option<&Expr>) -> Result<Option<Expr>> {
        old.map(|expr| self.expr(expr)).transpose()
    }

    fn exprs(&mut self, old: &[Expr]) -> Result<Vec<Expr>> {
        old.iter().map(|expr| self.expr(expr)).collect()
    }

    fn expr_inner(&mut self, old: &Expr) -> Result<Expr> {
        let rebuilt = match old {
            Expr::Bad { .. } | Expr::BasicLit(_) => old.clone(),
            Expr::Ident(ident) => Expr::Ident(self.ident(ident)),
            Expr::Ellipsis { pos, elt } => Expr::Ellipsis {
                pos: *pos,
                elt: self.opt_boxed(elt.as_deref())?,
            },
            Expr::FuncLit { ty, body } => Expr::FuncLit {
                ty: self.func_type(ty)?,
                body: self.block(body)?,
            },
            Expr::CompositeLit {
                ty,
                lbrace,
                elts,
                rbrace,
            } => Expr::CompositeLit {
                ty: self.opt_boxed(ty.as_deref())?,
                lbrace: *lbrace,
                elts: self.exprs(elts)?,
                rbrace: *rbrace,
            },
            Expr::Paren { lparen, x, rparen } => Expr::Paren {
                lparen: *lparen,
                x: self.boxed(x)?,
                rparen: *rparen,
            },
            Expr::Selector { x, sel } => Expr::Selector {
                x: self.boxed(x)?,
                sel: self.ident(sel),
            },
            Expr::Index {
                x,
                lbrack,
                index,
                rbrack,
            } => Expr::Index {
                x: self.boxed(x)?,
                lbrack: *lbrack,
                index: self.boxed(index)?,
                rbrack: *rbrack,
            },
            Expr::Slice {
                x,
                lbrack,
                low,
                high,
                max,
                slice3,
                rbrack,
            } => Expr::Slice {
                x: self.boxed(x)?,
                lbrack: *lbrack,
                low: self.opt_boxed(low.as_deref())?,
                high: self.opt_boxed(high.as_deref())?,
                max: self.opt_boxed(max.as_deref())?,
                slice3: *slice3,
                rbrack: *rbrack,
            },
            Expr::TypeAssert {
                x,
                lparen,
                ty,
                rparen,
            } => Expr::TypeAssert {
                x: self.boxed(x)?,
                lparen: *lparen,
                ty: self.opt_boxed(ty.as_deref())?,
                rparen: *rparen,
            },
            Expr::Call(call) => Expr::Call(self.call(call)?),
            Expr::Star { star, x } => Expr::Star {
                star: *star,
                x: self.boxed(x)?,
            },
            Expr::Unary { op_pos, op, x } => Expr::Unary {
                op_pos: *op_pos,
                op: *op,
                x: self.boxed(x)?,
            },
            Expr::Binary { x, op_pos, op, y } => Expr::Binary {
                x: self.boxed(x)?,
                op_pos: *op_pos,
                op: *op,
                y: self.boxed(y)?,
            },
            Expr::KeyValue { key, colon, value } => Expr::KeyValue {
                key: self.boxed(key)?,
                colon: *colon,
                value: self.boxed(value)?,
            },
            Expr::ArrayType { lbrack, len, elt } => Expr::ArrayType {
                lbrack: *lbrack,
                len: self.opt_boxed(len.as_deref())?,
                elt: self.boxed(elt)?,
            },
            Expr::StructType {
                struct_pos,
                type_params,
                fields,
                incomplete,
            } => Expr::StructType {
                struct_pos: *struct_pos,
                type_params: self.opt_type_param_list(type_params)?,
                fields: self.field_list(fields)?,
                incomplete: *incomplete,
            },
            Expr::FuncType(ft) => Expr::FuncType(self.func_type(ft)?),
            Expr::InterfaceType {
                interface,
                type_params,
                methods,
                incomplete,
            } => Expr::InterfaceType {
                interface: *interface,
                type_params: self.opt_type_param_list(type_params)?,
                methods: self.field_list(methods)?,
                incomplete: *incomplete,
            },
            Expr::MapType { map, key, value } => Expr::MapType {
                map: *map,
                key: self.boxed(key)?,
                value: self.boxed(value)?,
            },
            Expr::ChanType {
                begin,
                arrow,
                dir,
                value,
            } => Expr::ChanType {
                begin: *begin,
                arrow: *arrow,
                dir: *dir,
                value: self.boxed(value)?,
            },
            Expr::GenericType {
                ty,
                lbrack,
                type_args,
                rbrack,
            } => Expr::GenericType {
                ty: self.boxed(ty)?,
                lbrack: *lbrack,
                type_args: self.exprs(type_args)?,
                rbrack: *rbrack,
            },
        };
        Ok(self.rewriter.rewrite_expr(old, rebuilt))
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn stmt(&mut self, old: &Stmt) -> Result<StmtList> {
        self.guarded(|t| t.stmt_inner(old))
    }

    /// Transform a statement list, splicing every output in place.
    fn stmt_list(&mut self, old: &[Stmt]) -> Result<Vec<Stmt>> {
        let mut list = Vec::with_capacity(old.len());
        for stmt in old {
            list.extend(self.stmt(stmt)?);
        }
        Ok(list)
    }

    fn block(&mut self, old: &BlockStmt) -> Result<BlockStmt> {
        self.block_with_tail(old, StmtList::new())
    }

    /// Rebuild a block with `tail` appended, before `rewrite_block` sees it.
    fn block_with_tail(&mut self, old: &BlockStmt, tail: StmtList) -> Result<BlockStmt> {
        let mut list = self.stmt_list(&old.list)?;
        list.extend(tail);
        let rebuilt = BlockStmt {
            lbrace: old.lbrace,
            list,
            rbrace: old.rbrace,
        };
        Ok(self.rewriter.rewrite_block(old, rebuilt))
    }

    /// Transform a single-statement slot, moving leading outputs to `hoisted`.
    fn single(&mut self, old: &Stmt, hoisted: &mut StmtList) -> Result<Stmt> {
        let (prefix, last) = split_last(self.stmt(old)?, old.pos());
        if !prefix.is_empty() {
            trace!(count = prefix.len(), "hoisting statements out of single-statement slot");
        }
        hoisted.extend(prefix);
        Ok(last)
    }

    fn opt_single(&mut self, old: Option<&Stmt>, hoisted: &mut StmtList) -> Result<Option<Box<Stmt>>> {
        match old {
            Some(stmt) => Ok(Some(Box::new(self.single(stmt, hoisted)?))),
            None => Ok(None),
        }
    }

    /// An `else` must be a block or an `if`; anything else is wrapped.
    fn else_branch(&mut self, old: &Stmt) -> Result<Stmt> {
        let mut outputs = self.stmt(old)?;
        if outputs.len() == 1 && matches!(outputs[0], Stmt::Block(_) | Stmt::If { .. }) {
            if let Some(stmt) = outputs.pop() {
                return Ok(stmt);
            }
        }
        let pos = old.pos();
        Ok(Stmt::Block(BlockStmt {
            lbrace: pos,
            list: outputs.into_vec(),
            rbrace: pos,
        }))
    }

    fn stmt_inner(&mut self, old: &Stmt) -> Result<StmtList> {
        let mut hoisted = StmtList::new();
        // Statements that must share a fresh block with the rewritten node.
        let mut scoped: Option<Vec<Stmt>> = None;
        let rebuilt = match old {
            Stmt::Bad { .. } | Stmt::Empty { .. } => old.clone(),
            Stmt::Decl(decl) => Stmt::Decl(Box::new(self.decl(decl)?)),
            Stmt::Labeled { label, colon, stmt } => {
                let label = self.ident(label);
                let stmt = self.single(stmt, &mut hoisted)?;
                Stmt::Labeled {
                    label,
                    colon: *colon,
                    stmt: Box::new(stmt),
                }
            }
            Stmt::Expr(x) => Stmt::Expr(self.expr(x)?),
            Stmt::Send { chan, arrow, value } => Stmt::Send {
                chan: self.expr(chan)?,
                arrow: *arrow,
                value: self.expr(value)?,
            },
            Stmt::IncDec { x, tok_pos, tok } => Stmt::IncDec {
                x: self.expr(x)?,
                tok_pos: *tok_pos,
                tok: *tok,
            },
            Stmt::Assign {
                lhs,
                tok_pos,
                tok,
                rhs,
            } => Stmt::Assign {
                lhs: self.exprs(lhs)?,
                tok_pos: *tok_pos,
                tok: *tok,
                rhs: self.exprs(rhs)?,
            },
            Stmt::Go { go, call } => Stmt::Go {
                go: *go,
                call: self.call(call)?,
            },
            Stmt::Defer { defer, call } => Stmt::Defer {
                defer: *defer,
                call: self.call(call)?,
            },
            Stmt::Return {
                return_pos,
                results,
            } => Stmt::Return {
                return_pos: *return_pos,
                results: self.exprs(results)?,
            },
            Stmt::Branch {
                tok_pos,
                tok,
                label,
            } => Stmt::Branch {
                tok_pos: *tok_pos,
                tok: *tok,
                label: label.as_ref().map(|label| self.ident(label)),
            },
            Stmt::Block(block) => Stmt::Block(self.block(block)?),
            Stmt::If {
                if_pos,
                init,
                cond,
                body,
                else_branch,
            } => {
                let init = self.opt_single(init.as_deref(), &mut hoisted)?;
                let cond = self.expr(cond)?;
                let body = self.block(body)?;
                let else_branch = match else_branch {
                    Some(stmt) => Some(Box::new(self.else_branch(stmt)?)),
                    None => None,
                };
                Stmt::If {
                    if_pos: *if_pos,
                    init,
                    cond,
                    body,
                    else_branch,
                }
            }
            Stmt::CaseClause {
                case_pos,
                list,
                colon,
                body,
            } => Stmt::CaseClause {
                case_pos: *case_pos,
                list: self.exprs(list)?,
                colon: *colon,
                body: self.stmt_list(body)?,
            },
            Stmt::Switch {
                switch_pos,
                init,
                tag,
                body,
            } => {
                let init = self.opt_single(init.as_deref(), &mut hoisted)?;
                Stmt::Switch {
                    switch_pos: *switch_pos,
                    init,
                    tag: self.opt_expr(tag.as_ref())?,
                    body: self.block(body)?,
                }
            }
            Stmt::TypeSwitch {
                switch_pos,
                init,
                assign,
                body,
            } => {
                let init_outputs = match init.as_deref() {
                    Some(stmt) => Some((self.stmt(stmt)?, stmt.pos())),
                    None => None,
                };
                let (assign_prefix, assign) = split_last(self.stmt(assign)?, assign.pos());
                let init = match init_outputs {
                    Some((outputs, _)) if !assign_prefix.is_empty() => {
                        trace!(
                            count = outputs.len() + assign_prefix.len(),
                            "moving type switch init ahead of assign statements"
                        );
                        let mut list = outputs.into_vec();
                        list.extend(assign_prefix);
                        scoped = Some(list);
                        None
                    }
                    Some((outputs, pos)) => {
                        let (prefix, last) = split_last(outputs, pos);
                        hoisted.extend(prefix);
                        Some(Box::new(last))
                    }
                    None => {
                        hoisted.extend(assign_prefix);
                        None
                    }
                };
                Stmt::TypeSwitch {
                    switch_pos: *switch_pos,
                    init,
                    assign: Box::new(assign),
                    body: self.block(body)?,
                }
            }
            Stmt::CommClause {
                case_pos,
                comm,
                colon,
                body,
            } => {
                let comm = match comm {
                    Some(stmt) => Some(Box::new(self.comm(stmt)?)),
                    None => None,
                };
                Stmt::CommClause {
                    case_pos: *case_pos,
                    comm,
                    colon: *colon,
                    body: self.stmt_list(body)?,
                }
            }
            Stmt::Select { select_pos, body } => Stmt::Select {
                select_pos: *select_pos,
                body: self.block(body)?,
            },
            Stmt::For {
                for_pos,
                init,
                cond,
                post,
                body,
            } => {
                let init = self.opt_single(init.as_deref(), &mut hoisted)?;
                let cond = self.opt_expr(cond.as_ref())?;
                let mut per_iteration = StmtList::new();
                let post = self.opt_single(post.as_deref(), &mut per_iteration)?;
                if !per_iteration.is_empty() {
                    trace!(count = per_iteration.len(), "appending post statements to loop body");
                }
                let body = self.block_with_tail(body, per_iteration)?;
                Stmt::For {
                    for_pos: *for_pos,
                    init,
                    cond,
                    post,
                    body,
                }
            }
            Stmt::Range {
                for_pos,
                key,
                value,
                tok_pos,
                tok,
                x,
                body,
            } => Stmt::Range {
                for_pos: *for_pos,
                key: self.opt_expr(key.as_ref())?,
                value: self.opt_expr(value.as_ref())?,
                tok_pos: *tok_pos,
                tok: *tok,
                x: self.expr(x)?,
                body: self.block(body)?,
            },
        };
        let outputs = self.rewriter.rewrite_stmt(old, rebuilt);
        match scoped {
            Some(mut list) => {
                list.extend(outputs);
                let pos = old.pos();
                hoisted.push(Stmt::Block(BlockStmt {
                    lbrace: pos,
                    list,
                    rbrace: pos,
                }));
            }
            None => hoisted.extend(outputs),
        }
        Ok(hoisted)
    }

    /// The communication of a select case must stay exactly one statement.
    fn comm(&mut self, old: &Stmt) -> Result<Stmt> {
        let mut outputs = self.stmt(old)?;
        let produced = outputs.len();
        match (outputs.pop(), outputs.is_empty()) {
            (Some(stmt), true) => Ok(stmt),
            _ => Err(TransformError::SpliceArity {
                context: SpliceContext::CommClause,
                produced,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Declarations, files and packages
    // -------------------------------------------------------------------------

    fn spec(&mut self, old: &Spec) -> Result<Spec> {
        let rebuilt = match old {
            Spec::Import {
                doc,
                name,
                path,
                comment,
                end_pos,
            } => Spec::Import {
                doc: doc.clone(),
                name: name.as_ref().map(|name| self.ident(name)),
                path: path.clone(),
                comment: comment.clone(),
                end_pos: *end_pos,
            },
            Spec::Value {
                doc,
                names,
                ty,
                values,
                comment,
            } => Spec::Value {
                doc: doc.clone(),
                names: self.idents(names),
                ty: self.opt_expr(ty.as_ref())?,
                values: self.exprs(values)?,
                comment: comment.clone(),
            },
            Spec::Type {
                doc,
                name,
                assign,
                ty,
                comment,
            } => Spec::Type {
                doc: doc.clone(),
                name: self.ident(name),
                assign: *assign,
                ty: self.expr(ty)?,
                comment: comment.clone(),
            },
        };
        Ok(self.rewriter.rewrite_spec(old, rebuilt))
    }

    fn decl(&mut self, old: &Decl) -> Result<Decl> {
        let rebuilt = match old {
            Decl::Bad { .. } => old.clone(),
            Decl::Gen(gen_decl) => Decl::Gen(GenDecl {
                doc: gen_decl.doc.clone(),
                tok_pos: gen_decl.tok_pos,
                tok: gen_decl.tok,
                lparen: gen_decl.lparen,
                specs: gen_decl
                    .specs
                    .iter()
                    .map(|spec| self.spec(spec))
                    .collect::<Result<_>>()?,
                rparen: gen_decl.rparen,
            }),
            Decl::Func(func) => Decl::Func(self.func_decl(func)?),
        };
        Ok(self.rewriter.rewrite_decl(old, rebuilt))
    }

    fn func_decl(&mut self, old: &FuncDecl) -> Result<FuncDecl> {
        Ok(FuncDecl {
            doc: old.doc.clone(),
            recv: old
                .recv
                .as_ref()
                .map(|recv| self.field_list(recv))
                .transpose()?,
            name: self.ident(&old.name),
            ty: self.func_type(&old.ty)?,
            body: old.body.as_ref().map(|body| self.block(body)).transpose()?,
        })
    }

    fn file(&mut self, old: &File) -> Result<File> {
        let rebuilt = File {
            doc: old.doc.clone(),
            package: old.package,
            name: self.ident(&old.name),
            decls: old
                .decls
                .iter()
                .map(|decl| self.decl(decl))
                .collect::<Result<_>>()?,
            comments: old.comments.clone(),
        };
        Ok(self.rewriter.rewrite_file(old, rebuilt))
    }

    fn package(&mut self, old: &Package) -> Result<Package> {
        let mut files = indexmap::IndexMap::with_capacity(old.files.len());
        for (name, file) in &old.files {
            files.insert(name.clone(), self.file(file)?);
        }
        let rebuilt = Package {
            name: old.name.clone(),
            files,
        };
        Ok(self.rewriter.rewrite_package(old, rebuilt))
    }
}

#[cfg(test)]
#[path = "../tests/transform_tests.rs"]
mod tests;
