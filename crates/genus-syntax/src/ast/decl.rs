//! Declaration and spec nodes.

use super::expr::{BasicLit, Expr, FuncType};
use super::stmt::BlockStmt;
use super::token::Token;
use super::{Doc, FieldList, Ident};
use genus_common::Pos;

/// A single entry of a `GenDecl`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Spec {
    /// `import name "path"`
    Import {
        doc: Doc,
        name: Option<Ident>,
        path: BasicLit,
        comment: Doc,
        end_pos: Pos,
    },

    /// `const`/`var` spec: `names type = values`
    Value {
        doc: Doc,
        names: Vec<Ident>,
        ty: Option<Expr>,
        values: Vec<Expr>,
        comment: Doc,
    },

    /// `type Name Type`
    Type {
        doc: Doc,
        name: Ident,
        /// Position of `=` for alias declarations, or `Pos::NONE`.
        assign: Pos,
        ty: Expr,
        comment: Doc,
    },
}

/// `import`, `const`, `type` or `var` declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenDecl {
    pub doc: Doc,
    pub tok_pos: Pos,
    pub tok: Token,
    pub lparen: Pos,
    pub specs: Vec<Spec>,
    pub rparen: Pos,
}

/// Function or method declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Doc,
    /// Receiver list for methods.
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    /// Absent for external (assembly) functions.
    pub body: Option<BlockStmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decl {
    Bad { from: Pos, to: Pos },
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn pos(&self) -> Pos {
        match self {
            Decl::Bad { from, .. } => *from,
            Decl::Gen(gen_decl) => gen_decl.tok_pos,
            Decl::Func(func) => func.ty.func,
        }
    }
}
