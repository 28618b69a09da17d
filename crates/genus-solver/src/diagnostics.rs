//! Observable outcomes of a substitution.
//!
//! The engine never formats messages. It records what happened to each type
//! parameter occurrence so the checker can report unresolved parameters and
//! trace inferences. The report is serializable for machine-readable traces.

use crate::substitute::TypeAliases;
use crate::types::{SymbolId, TypeId};
use serde::Serialize;

/// A binding established during substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Inference {
    pub param: SymbolId,
    pub ty: TypeId,
}

/// Why a type parameter occurrence stayed unresolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UnresolvedReason {
    /// No argument reached this position (absent or shape mismatch above it).
    ArgumentAbsent,
    /// The argument does not satisfy the parameter's constraint.
    NotAssignable { argument: TypeId },
}

/// A type parameter occurrence left in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub param: SymbolId,
    /// The placeholder type that was returned.
    pub placeholder: TypeId,
    pub reason: UnresolvedReason,
}

/// Everything a single `substitute_types` call observed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionReport {
    /// New bindings, in traversal order.
    pub inferred: Vec<Inference>,
    /// Occurrences that could not be bound, in traversal order.
    pub unresolved: Vec<Unresolved>,
    /// The depth guard cut off part of the template.
    pub depth_exceeded: bool,
}

impl SubstitutionReport {
    /// True when no occurrence was left unresolved and no subtree was cut off.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty() && !self.depth_exceeded
    }

    /// Parameters with an unresolved occurrence that still have no binding
    /// after the call. An occurrence can be unresolved while a later
    /// occurrence of the same parameter binds it; re-running substitution
    /// with the same aliases then resolves the earlier one.
    pub fn unbound_params(&self, aliases: &TypeAliases) -> Vec<SymbolId> {
        let mut params: Vec<SymbolId> = self
            .unresolved
            .iter()
            .map(|u| u.param)
            .filter(|p| !aliases.contains(*p))
            .collect();
        params.sort();
        params.dedup();
        params
    }

    pub(crate) fn record_inference(&mut self, param: SymbolId, ty: TypeId) {
        self.inferred.push(Inference { param, ty });
    }

    pub(crate) fn record_unresolved(
        &mut self,
        param: SymbolId,
        placeholder: TypeId,
        reason: UnresolvedReason,
    ) {
        self.unresolved.push(Unresolved {
            param,
            placeholder,
            reason,
        });
    }
}
