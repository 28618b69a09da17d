//! Fatal rewrite errors.
//!
//! These are contract violations, not user-facing diagnostics: the caller
//! abandons the compilation unit being rewritten.

use std::fmt;
use thiserror::Error;

/// Syntactic slot whose arity was violated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpliceContext {
    /// The communication slot of a `select` case. Zero statements would turn
    /// the case into `default`, so exactly one is required.
    CommClause,
    /// A statement rewritten through `transform_node`, which is 1:1.
    SingleNode,
}

impl fmt::Display for SpliceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpliceContext::CommClause => f.write_str("select case communication"),
            SpliceContext::SingleNode => f.write_str("single-node transform"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("{context} requires exactly one statement, rewriter produced {produced}")]
    SpliceArity {
        context: SpliceContext,
        produced: usize,
    },

    #[error("syntax tree nesting exceeds {limit} levels")]
    DepthExceeded { limit: u32 },
}

pub type Result<T, E = TransformError> = std::result::Result<T, E>;
