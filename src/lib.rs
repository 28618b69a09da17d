//! genus: generic instantiation core.
//!
//! Facade over the workspace crates:
//!
//! - [`solver`]: type arena, inference-driven substitution, generic predicates
//! - [`syntax`]: syntax tree, `walk`/`inspect`, and the splicing rewriter
//! - [`lowering`]: solver types back to syntax, monomorphization
//!
//! A typical instantiation substitutes a generic signature against the
//! signature seen at a call site, then rewrites the generic body:
//!
//! ```ignore
//! let mut aliases = TypeAliases::new();
//! let inst = instantiate_func(&arena, &decl, template, context, Some(call_sig), &mut aliases, "_int")?;
//! ```

pub use genus_common as common;
pub use genus_lowering as lowering;
pub use genus_solver as solver;
pub use genus_syntax as syntax;

pub mod tracing_config;

pub use genus_lowering::{Instantiation, Monomorphizer, instantiate_func, type_to_expr};
pub use genus_solver::{
    SubstitutionReport, TypeAliases, TypeArena, TypeId, contains_unresolved_generic,
    is_composite_generic, is_direct_generic_reference, substitute_types,
};
pub use genus_syntax::{Rewriter, TransformError, inspect, transform_stmt, walk};
