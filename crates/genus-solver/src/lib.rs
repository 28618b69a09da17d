//! Type arena and generic substitution engine.
//!
//! This crate owns the checker-side representation of types and the engine
//! that specializes generic declarations:
//!
//! - **`TypeArena`**: concurrent storage for types and symbols, addressed by
//!   `TypeId` / `SymbolId` handles
//! - **Substitution**: `substitute_types` walks a template and a concrete
//!   argument in lockstep, inferring type-parameter bindings into a
//!   caller-owned `TypeAliases` table
//! - **Predicates**: cheap checks for whether a type still mentions type
//!   parameters at all
//! - **Relations**: the identity and assignability rules inference consults
//!
//! Outcomes that are not errors (unresolved parameters, shape mismatches,
//! depth cut-offs) are returned as a `SubstitutionReport`.
pub mod arena;
mod diagnostics;
mod format;
pub mod generic;
pub mod recursion;
pub mod relations;
mod substitute;
pub mod types;

pub use arena::TypeArena;
pub use diagnostics::{Inference, SubstitutionReport, Unresolved, UnresolvedReason};
pub use format::{TypeFormatter, format_type};
pub use generic::{contains_unresolved_generic, is_composite_generic, is_direct_generic_reference};
pub use recursion::{DepthCounter, RecursionProfile, Visit, VisitSet};
pub use relations::{identical, implements, is_assignable};
pub use substitute::{Substitution, TypeAliases, TypeSubstituter, substitute_types};
pub use types::{
    BasicKind, ChanDir, InterfaceShape, NamedShape, PackageId, ScopeId, SignatureShape,
    StructShape, Symbol, SymbolId, SymbolKind, TypeData, TypeId, VarInfo, Variance,
};
