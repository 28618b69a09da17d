//! Statement nodes.

use super::Ident;
use super::decl::Decl;
use super::expr::{CallExpr, Expr};
use super::token::Token;
use genus_common::Pos;

/// Braced statement list: `{ ... }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockStmt {
    pub lbrace: Pos,
    pub list: Vec<Stmt>,
    pub rbrace: Pos,
}

impl BlockStmt {
    pub fn new(list: Vec<Stmt>) -> Self {
        Self {
            lbrace: Pos::NONE,
            list,
            rbrace: Pos::NONE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// Placeholder for syntactically invalid source.
    Bad { from: Pos, to: Pos },

    Decl(Box<Decl>),

    /// Explicit `;` or a synthesized no-op (`implicit`).
    Empty { semicolon: Pos, implicit: bool },

    /// `label: stmt`
    Labeled {
        label: Ident,
        colon: Pos,
        stmt: Box<Stmt>,
    },

    Expr(Expr),

    /// `ch <- value`
    Send { chan: Expr, arrow: Pos, value: Expr },

    IncDec { x: Expr, tok_pos: Pos, tok: Token },

    Assign {
        lhs: Vec<Expr>,
        tok_pos: Pos,
        tok: Token,
        rhs: Vec<Expr>,
    },

    Go { go: Pos, call: CallExpr },

    Defer { defer: Pos, call: CallExpr },

    Return { return_pos: Pos, results: Vec<Expr> },

    /// `break`, `continue`, `goto` or `fallthrough`.
    Branch {
        tok_pos: Pos,
        tok: Token,
        label: Option<Ident>,
    },

    Block(BlockStmt),

    If {
        if_pos: Pos,
        init: Option<Box<Stmt>>,
        cond: Expr,
        body: BlockStmt,
        /// Either a `Block` or another `If`.
        else_branch: Option<Box<Stmt>>,
    },

    /// `case list: body`; an empty `list` is `default:`.
    CaseClause {
        case_pos: Pos,
        list: Vec<Expr>,
        colon: Pos,
        body: Vec<Stmt>,
    },

    Switch {
        switch_pos: Pos,
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        body: BlockStmt,
    },

    /// `switch init; x := y.(type) { ... }`
    TypeSwitch {
        switch_pos: Pos,
        init: Option<Box<Stmt>>,
        assign: Box<Stmt>,
        body: BlockStmt,
    },

    /// `case comm: body` in a select; `comm` is `None` for `default:`.
    CommClause {
        case_pos: Pos,
        comm: Option<Box<Stmt>>,
        colon: Pos,
        body: Vec<Stmt>,
    },

    Select { select_pos: Pos, body: BlockStmt },

    For {
        for_pos: Pos,
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: BlockStmt,
    },

    /// `for key, value := range x { ... }`
    Range {
        for_pos: Pos,
        key: Option<Expr>,
        value: Option<Expr>,
        tok_pos: Pos,
        tok: Token,
        x: Expr,
        body: BlockStmt,
    },
}

impl Stmt {
    /// Synthesized no-op at `pos`.
    pub fn empty(pos: Pos) -> Stmt {
        Stmt::Empty {
            semicolon: pos,
            implicit: true,
        }
    }

    /// Start position of the statement.
    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Bad { from, .. } => *from,
            Stmt::Decl(decl) => decl.pos(),
            Stmt::Empty { semicolon, .. } => *semicolon,
            Stmt::Labeled { label, .. } => label.pos,
            Stmt::Expr(x) => x.pos(),
            Stmt::Send { chan, .. } => chan.pos(),
            Stmt::IncDec { x, .. } => x.pos(),
            Stmt::Assign { lhs, tok_pos, .. } => lhs.first().map_or(*tok_pos, Expr::pos),
            Stmt::Go { go, .. } => *go,
            Stmt::Defer { defer, .. } => *defer,
            Stmt::Return { return_pos, .. } => *return_pos,
            Stmt::Branch { tok_pos, .. } => *tok_pos,
            Stmt::Block(block) => block.lbrace,
            Stmt::If { if_pos, .. } => *if_pos,
            Stmt::CaseClause { case_pos, .. } | Stmt::CommClause { case_pos, .. } => *case_pos,
            Stmt::Switch { switch_pos, .. } | Stmt::TypeSwitch { switch_pos, .. } => *switch_pos,
            Stmt::Select { select_pos, .. } => *select_pos,
            Stmt::For { for_pos, .. } | Stmt::Range { for_pos, .. } => *for_pos,
        }
    }
}
