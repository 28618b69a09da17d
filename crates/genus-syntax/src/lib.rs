//! Syntax tree, traversal and rewriting.
//!
//! - **`ast`**: owned tree for declarations, statements and (type)
//!   expressions, plus the `NodeRef` view used by visitors
//! - **`walk`**: read-only depth-first traversal (`walk`, `inspect`)
//! - **`transform`**: bottom-up rewrite that builds a fresh tree and lets a
//!   statement expand into several, splicing the extras into the right place

pub mod ast;
mod error;
pub mod transform;
pub mod walk;

pub use error::{Result, SpliceContext, TransformError};
pub use transform::{
    Rewriter, StmtList, transform_block, transform_decl, transform_expr, transform_file,
    transform_func_decl, transform_node, transform_package, transform_spec, transform_stmt,
};
pub use walk::{Visit, Visitor, inspect, walk};
