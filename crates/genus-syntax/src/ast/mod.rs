//! Syntax tree for the source language.
//!
//! Nodes own their children (`Box`/`Vec`). Comment groups are the one
//! shared part: a doc comment is referenced both from the node it documents
//! and from its file's comment list, so groups are held through `Arc` and
//! copied by reference when a tree is rebuilt.
//!
//! Every kind of node has exactly one [`NodeRef`] form. Expressions and
//! statements that wrap a standalone node type (`Expr::Ident`,
//! `Expr::Call`, `Stmt::Block`, ...) are presented as that node type, so a
//! visitor sees an identifier as `NodeRef::Ident` wherever it occurs.

mod decl;
mod expr;
mod stmt;
mod token;

pub use decl::{Decl, FuncDecl, GenDecl, Spec};
pub use expr::{BasicLit, CallExpr, ChanDir, Expr, FuncType};
pub use stmt::{BlockStmt, Stmt};
pub use token::Token;

use genus_common::Pos;
use indexmap::IndexMap;
use std::sync::Arc;

/// Optional shared comment group (doc or line comment).
pub type Doc = Option<Arc<CommentGroup>>;

// =============================================================================
// Comments and names
// =============================================================================

/// A single `//` or `/* */` comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub slash: Pos,
    pub text: String,
}

/// Comments with no other tokens and no empty lines between them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub pos: Pos,
    pub name: String,
}

impl Ident {
    pub fn new(pos: Pos, name: impl Into<String>) -> Self {
        Self {
            pos,
            name: name.into(),
        }
    }
}

// =============================================================================
// Fields and type parameters
// =============================================================================

/// Struct field, interface method, or parameter/result declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub doc: Doc,
    /// Empty for anonymous parameters and embedded fields.
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
    pub comment: Doc,
}

impl Field {
    pub fn new(names: Vec<Ident>, ty: Expr) -> Self {
        Self {
            doc: None,
            names,
            ty,
            tag: None,
            comment: None,
        }
    }
}

/// Parenthesized or braced list of fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldList {
    pub opening: Pos,
    pub list: Vec<Field>,
    pub closing: Pos,
}

impl FieldList {
    pub fn new(list: Vec<Field>) -> Self {
        Self {
            opening: Pos::NONE,
            list,
            closing: Pos::NONE,
        }
    }

    /// Number of declared entries (a field with several names counts once
    /// per name).
    pub fn num_fields(&self) -> usize {
        self.list.iter().map(|f| f.names.len().max(1)).sum()
    }
}

/// Type parameter declaration: `K comparable`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParam {
    pub doc: Doc,
    pub names: Vec<Ident>,
    pub bound: Expr,
    pub tag: Option<BasicLit>,
    pub comment: Doc,
}

impl TypeParam {
    pub fn new(names: Vec<Ident>, bound: Expr) -> Self {
        Self {
            doc: None,
            names,
            bound,
            tag: None,
            comment: None,
        }
    }
}

/// Bracketed type-parameter list: `[K comparable, V any]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeParamList {
    pub opening: Pos,
    pub list: Vec<TypeParam>,
    pub closing: Pos,
}

impl TypeParamList {
    pub fn new(list: Vec<TypeParam>) -> Self {
        Self {
            opening: Pos::NONE,
            list,
            closing: Pos::NONE,
        }
    }

    /// Declared parameter names in order.
    pub fn names(&self) -> impl Iterator<Item = &Ident> {
        self.list.iter().flat_map(|p| p.names.iter())
    }
}

// =============================================================================
// Files and packages
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    pub doc: Doc,
    /// Position of the `package` keyword.
    pub package: Pos,
    pub name: Ident,
    pub decls: Vec<Decl>,
    /// Every comment group in the file, in source order.
    pub comments: Vec<Arc<CommentGroup>>,
}

/// Files of one package, keyed by file name in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub files: IndexMap<String, File>,
}

// =============================================================================
// Node views
// =============================================================================

/// Borrowed view of any node, as handed to visitors.
#[derive(Copy, Clone, Debug)]
pub enum NodeRef<'a> {
    Comment(&'a Comment),
    CommentGroup(&'a CommentGroup),
    Field(&'a Field),
    FieldList(&'a FieldList),
    TypeParam(&'a TypeParam),
    TypeParamList(&'a TypeParamList),
    Ident(&'a Ident),
    BasicLit(&'a BasicLit),
    Call(&'a CallExpr),
    FuncType(&'a FuncType),
    /// Any expression other than the standalone kinds above.
    Expr(&'a Expr),
    Block(&'a BlockStmt),
    /// Any statement other than a block.
    Stmt(&'a Stmt),
    Spec(&'a Spec),
    Decl(&'a Decl),
    File(&'a File),
    Package(&'a Package),
}

impl<'a> NodeRef<'a> {
    pub fn expr(expr: &'a Expr) -> Self {
        match expr {
            Expr::Ident(ident) => NodeRef::Ident(ident),
            Expr::BasicLit(lit) => NodeRef::BasicLit(lit),
            Expr::Call(call) => NodeRef::Call(call),
            Expr::FuncType(ft) => NodeRef::FuncType(ft),
            other => NodeRef::Expr(other),
        }
    }

    pub fn stmt(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Block(block) => NodeRef::Block(block),
            other => NodeRef::Stmt(other),
        }
    }

    /// Short kind name for traces and assertions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Comment(_) => "Comment",
            NodeRef::CommentGroup(_) => "CommentGroup",
            NodeRef::Field(_) => "Field",
            NodeRef::FieldList(_) => "FieldList",
            NodeRef::TypeParam(_) => "TypeParam",
            NodeRef::TypeParamList(_) => "TypeParamList",
            NodeRef::Ident(_) => "Ident",
            NodeRef::BasicLit(_) => "BasicLit",
            NodeRef::Call(_) => "CallExpr",
            NodeRef::FuncType(_) => "FuncType",
            NodeRef::Expr(expr) => expr_kind_name(expr),
            NodeRef::Block(_) => "BlockStmt",
            NodeRef::Stmt(stmt) => stmt_kind_name(stmt),
            NodeRef::Spec(Spec::Import { .. }) => "ImportSpec",
            NodeRef::Spec(Spec::Value { .. }) => "ValueSpec",
            NodeRef::Spec(Spec::Type { .. }) => "TypeSpec",
            NodeRef::Decl(Decl::Bad { .. }) => "BadDecl",
            NodeRef::Decl(Decl::Gen(_)) => "GenDecl",
            NodeRef::Decl(Decl::Func(_)) => "FuncDecl",
            NodeRef::File(_) => "File",
            NodeRef::Package(_) => "Package",
        }
    }
}

fn expr_kind_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Bad { .. } => "BadExpr",
        Expr::Ident(_) => "Ident",
        Expr::Ellipsis { .. } => "Ellipsis",
        Expr::BasicLit(_) => "BasicLit",
        Expr::FuncLit { .. } => "FuncLit",
        Expr::CompositeLit { .. } => "CompositeLit",
        Expr::Paren { .. } => "ParenExpr",
        Expr::Selector { .. } => "SelectorExpr",
        Expr::Index { .. } => "IndexExpr",
        Expr::Slice { .. } => "SliceExpr",
        Expr::TypeAssert { .. } => "TypeAssertExpr",
        Expr::Call(_) => "CallExpr",
        Expr::Star { .. } => "StarExpr",
        Expr::Unary { .. } => "UnaryExpr",
        Expr::Binary { .. } => "BinaryExpr",
        Expr::KeyValue { .. } => "KeyValueExpr",
        Expr::ArrayType { .. } => "ArrayType",
        Expr::StructType { .. } => "StructType",
        Expr::FuncType(_) => "FuncType",
        Expr::InterfaceType { .. } => "InterfaceType",
        Expr::MapType { .. } => "MapType",
        Expr::ChanType { .. } => "ChanType",
        Expr::GenericType { .. } => "GenericType",
    }
}

fn stmt_kind_name(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Bad { .. } => "BadStmt",
        Stmt::Decl(_) => "DeclStmt",
        Stmt::Empty { .. } => "EmptyStmt",
        Stmt::Labeled { .. } => "LabeledStmt",
        Stmt::Expr(_) => "ExprStmt",
        Stmt::Send { .. } => "SendStmt",
        Stmt::IncDec { .. } => "IncDecStmt",
        Stmt::Assign { .. } => "AssignStmt",
        Stmt::Go { .. } => "GoStmt",
        Stmt::Defer { .. } => "DeferStmt",
        Stmt::Return { .. } => "ReturnStmt",
        Stmt::Branch { .. } => "BranchStmt",
        Stmt::Block(_) => "BlockStmt",
        Stmt::If { .. } => "IfStmt",
        Stmt::CaseClause { .. } => "CaseClause",
        Stmt::Switch { .. } => "SwitchStmt",
        Stmt::TypeSwitch { .. } => "TypeSwitchStmt",
        Stmt::CommClause { .. } => "CommClause",
        Stmt::Select { .. } => "SelectStmt",
        Stmt::For { .. } => "ForStmt",
        Stmt::Range { .. } => "RangeStmt",
    }
}

impl<'a> From<&'a Expr> for NodeRef<'a> {
    fn from(expr: &'a Expr) -> Self {
        NodeRef::expr(expr)
    }
}

impl<'a> From<&'a Stmt> for NodeRef<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        NodeRef::stmt(stmt)
    }
}

impl<'a> From<&'a Decl> for NodeRef<'a> {
    fn from(decl: &'a Decl) -> Self {
        NodeRef::Decl(decl)
    }
}

impl<'a> From<&'a File> for NodeRef<'a> {
    fn from(file: &'a File) -> Self {
        NodeRef::File(file)
    }
}

/// Owned node, as produced by [`transform_node`](crate::transform_node).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Comment(Comment),
    CommentGroup(Arc<CommentGroup>),
    Field(Field),
    FieldList(FieldList),
    TypeParam(TypeParam),
    TypeParamList(TypeParamList),
    Ident(Ident),
    Call(CallExpr),
    FuncType(FuncType),
    Expr(Expr),
    Block(BlockStmt),
    Stmt(Stmt),
    Spec(Spec),
    Decl(Decl),
    File(File),
    Package(Package),
}
