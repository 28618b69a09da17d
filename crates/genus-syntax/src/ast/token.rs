//! Operator, keyword and literal-kind tokens carried by syntax nodes.
//!
//! The rewriter never interprets tokens; it copies them from the template
//! node into the rebuilt one.

/// Lexical token kinds that appear inside the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Illegal,

    // Literal kinds
    Int,
    Float,
    Imag,
    Char,
    String,

    // Operators
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    Arrow,
    Inc,
    Dec,
    Eql,
    Lss,
    Gtr,
    Not,
    Neq,
    Leq,
    Geq,

    // Assignment operators
    Assign,
    Define,
    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,

    // Keywords used as node tokens
    Break,
    Continue,
    Goto,
    Fallthrough,
    Import,
    Const,
    Type,
    Var,
}

impl Token {
    /// Source spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Token::Illegal => "ILLEGAL",
            Token::Int => "INT",
            Token::Float => "FLOAT",
            Token::Imag => "IMAG",
            Token::Char => "CHAR",
            Token::String => "STRING",
            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Quo => "/",
            Token::Rem => "%",
            Token::And => "&",
            Token::Or => "|",
            Token::Xor => "^",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::AndNot => "&^",
            Token::LAnd => "&&",
            Token::LOr => "||",
            Token::Arrow => "<-",
            Token::Inc => "++",
            Token::Dec => "--",
            Token::Eql => "==",
            Token::Lss => "<",
            Token::Gtr => ">",
            Token::Not => "!",
            Token::Neq => "!=",
            Token::Leq => "<=",
            Token::Geq => ">=",
            Token::Assign => "=",
            Token::Define => ":=",
            Token::AddAssign => "+=",
            Token::SubAssign => "-=",
            Token::MulAssign => "*=",
            Token::QuoAssign => "/=",
            Token::RemAssign => "%=",
            Token::AndAssign => "&=",
            Token::OrAssign => "|=",
            Token::XorAssign => "^=",
            Token::ShlAssign => "<<=",
            Token::ShrAssign => ">>=",
            Token::AndNotAssign => "&^=",
            Token::Break => "break",
            Token::Continue => "continue",
            Token::Goto => "goto",
            Token::Fallthrough => "fallthrough",
            Token::Import => "import",
            Token::Const => "const",
            Token::Type => "type",
            Token::Var => "var",
        }
    }

    pub const fn is_assign_op(self) -> bool {
        matches!(
            self,
            Token::Assign
                | Token::Define
                | Token::AddAssign
                | Token::SubAssign
                | Token::MulAssign
                | Token::QuoAssign
                | Token::RemAssign
                | Token::AndAssign
                | Token::OrAssign
                | Token::XorAssign
                | Token::ShlAssign
                | Token::ShrAssign
                | Token::AndNotAssign
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
