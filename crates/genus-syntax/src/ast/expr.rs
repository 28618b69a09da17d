//! Expression and type-expression nodes.

use super::stmt::BlockStmt;
use super::token::Token;
use super::{FieldList, Ident, TypeParamList};
use genus_common::Pos;

/// Literal of basic type: `42`, `"text"`, `'x'`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicLit {
    pub pos: Pos,
    /// One of `Token::Int`, `Float`, `Imag`, `Char`, `String`.
    pub kind: Token,
    pub value: String,
}

impl BasicLit {
    pub fn string(pos: Pos, value: &str) -> Self {
        Self {
            pos,
            kind: Token::String,
            value: format!("{value:?}"),
        }
    }
}

/// Call expression: `fun(args...)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub lparen: Pos,
    pub args: Vec<Expr>,
    /// Position of a trailing `...`, or `Pos::NONE`.
    pub ellipsis: Pos,
    pub rparen: Pos,
}

/// Function signature: `func[T any](params) results`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncType {
    /// Position of the `func` keyword, or `Pos::NONE` for method specs.
    pub func: Pos,
    pub type_params: Option<TypeParamList>,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

/// Channel direction as written.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Send,
    Recv,
    Both,
}

/// Expressions, including type expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    // =========================================================================
    // Leaves
    // =========================================================================
    /// Placeholder for syntactically invalid source.
    Bad { from: Pos, to: Pos },

    Ident(Ident),

    /// `...T` in a parameter list or `[...]T` in an array type.
    Ellipsis { pos: Pos, elt: Option<Box<Expr>> },

    BasicLit(BasicLit),

    // =========================================================================
    // Compound expressions
    // =========================================================================
    /// `func(x int) int { ... }`
    FuncLit { ty: FuncType, body: BlockStmt },

    /// `T{elts...}`
    CompositeLit {
        ty: Option<Box<Expr>>,
        lbrace: Pos,
        elts: Vec<Expr>,
        rbrace: Pos,
    },

    Paren {
        lparen: Pos,
        x: Box<Expr>,
        rparen: Pos,
    },

    /// `x.sel`
    Selector { x: Box<Expr>, sel: Ident },

    /// `x[index]`
    Index {
        x: Box<Expr>,
        lbrack: Pos,
        index: Box<Expr>,
        rbrack: Pos,
    },

    /// `x[low:high:max]`
    Slice {
        x: Box<Expr>,
        lbrack: Pos,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
        slice3: bool,
        rbrack: Pos,
    },

    /// `x.(T)`, or `x.(type)` in a type switch when `ty` is `None`.
    TypeAssert {
        x: Box<Expr>,
        lparen: Pos,
        ty: Option<Box<Expr>>,
        rparen: Pos,
    },

    Call(CallExpr),

    /// `*x` as a dereference or a pointer type.
    Star { star: Pos, x: Box<Expr> },

    Unary { op_pos: Pos, op: Token, x: Box<Expr> },

    Binary {
        x: Box<Expr>,
        op_pos: Pos,
        op: Token,
        y: Box<Expr>,
    },

    /// `key: value` inside a composite literal.
    KeyValue {
        key: Box<Expr>,
        colon: Pos,
        value: Box<Expr>,
    },

    // =========================================================================
    // Types
    // =========================================================================
    /// `[len]elt`, or `[]elt` when `len` is `None`.
    ArrayType {
        lbrack: Pos,
        len: Option<Box<Expr>>,
        elt: Box<Expr>,
    },

    StructType {
        struct_pos: Pos,
        type_params: Option<TypeParamList>,
        fields: FieldList,
        incomplete: bool,
    },

    FuncType(FuncType),

    InterfaceType {
        interface: Pos,
        type_params: Option<TypeParamList>,
        methods: FieldList,
        incomplete: bool,
    },

    MapType {
        map: Pos,
        key: Box<Expr>,
        value: Box<Expr>,
    },

    ChanType {
        begin: Pos,
        /// Position of `<-`, or `Pos::NONE`.
        arrow: Pos,
        dir: ChanDir,
        value: Box<Expr>,
    },

    /// Instantiation of a generic type: `List[int]`.
    GenericType {
        ty: Box<Expr>,
        lbrack: Pos,
        type_args: Vec<Expr>,
        rbrack: Pos,
    },
}

impl Expr {
    /// Identifier expression with a synthesized position.
    pub fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new(Pos::NONE, name))
    }

    /// Start position of the expression.
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Bad { from, .. } => *from,
            Expr::Ident(ident) => ident.pos,
            Expr::Ellipsis { pos, .. } => *pos,
            Expr::BasicLit(lit) => lit.pos,
            Expr::FuncLit { ty, .. } => ty.func,
            Expr::CompositeLit { ty, lbrace, .. } => ty.as_ref().map_or(*lbrace, |t| t.pos()),
            Expr::Paren { lparen, .. } => *lparen,
            Expr::Selector { x, .. }
            | Expr::Index { x, .. }
            | Expr::Slice { x, .. }
            | Expr::TypeAssert { x, .. }
            | Expr::Binary { x, .. } => x.pos(),
            Expr::Call(call) => call.fun.pos(),
            Expr::Star { star, .. } => *star,
            Expr::Unary { op_pos, .. } => *op_pos,
            Expr::KeyValue { key, .. } => key.pos(),
            Expr::ArrayType { lbrack, .. } => *lbrack,
            Expr::StructType { struct_pos, .. } => *struct_pos,
            Expr::FuncType(ft) => ft.func,
            Expr::InterfaceType { interface, .. } => *interface,
            Expr::MapType { map, .. } => *map,
            Expr::ChanType { begin, .. } => *begin,
            Expr::GenericType { ty, .. } => ty.pos(),
        }
    }

    /// The identifier, if this expression is a bare identifier.
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}
