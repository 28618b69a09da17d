//! Generic-reference predicates.
//!
//! The checker uses these to decide whether substitution is needed at all:
//! a type that contains no type-parameter reference is already concrete and
//! substituting it would return it unchanged.

use crate::arena::TypeArena;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{SymbolId, TypeData, TypeId};
use genus_common::limits::{STACK_GROWTH, STACK_RED_ZONE};
use rustc_hash::FxHashSet;

/// True iff `ty` is a `Named` type with an instantiation context, i.e. a
/// direct use of a type parameter.
pub fn is_direct_generic_reference(arena: &TypeArena, ty: TypeId) -> bool {
    arena
        .named_shape(ty)
        .is_some_and(|shape| shape.context.is_some())
}

/// True iff `ty` or any type reachable through its structural children is a
/// direct generic reference.
///
/// Embedded interfaces are checked both as references and through their
/// underlying interface. Other named types are not expanded, which keeps
/// the scan finite on recursive declarations.
pub fn contains_unresolved_generic(arena: &TypeArena, ty: TypeId) -> bool {
    GenericScanner::new(arena).scan(ty)
}

/// True iff `ty` contains a generic reference but is not itself a `Named`
/// type (e.g. `[]T`, `map[string]T`, `func(T)`).
pub fn is_composite_generic(arena: &TypeArena, ty: TypeId) -> bool {
    arena.named_shape(ty).is_none() && contains_unresolved_generic(arena, ty)
}

struct GenericScanner<'a> {
    arena: &'a TypeArena,
    visited: FxHashSet<TypeId>,
    depth: DepthCounter,
}

impl<'a> GenericScanner<'a> {
    fn new(arena: &'a TypeArena) -> Self {
        Self {
            arena,
            visited: FxHashSet::default(),
            depth: DepthCounter::with_profile(RecursionProfile::GenericScan),
        }
    }

    fn scan(&mut self, ty: TypeId) -> bool {
        if !self.visited.insert(ty) {
            return false;
        }
        if !self.depth.enter() {
            return false;
        }
        let found = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.scan_children(ty));
        self.depth.leave();
        found
    }

    fn scan_children(&mut self, ty: TypeId) -> bool {
        let Some(data) = self.arena.get(ty) else {
            return false;
        };
        match data {
            TypeData::Basic(_) => false,
            TypeData::Named(shape) => shape.context.is_some(),
            TypeData::Array { elem, .. }
            | TypeData::Slice { elem }
            | TypeData::Chan { elem, .. } => self.scan(elem),
            TypeData::Pointer { base } => self.scan(base),
            TypeData::Map { key, elem } => self.scan(key) || self.scan(elem),
            TypeData::Tuple(vars) => self.scan_symbols(&vars),
            TypeData::Signature(sig) => {
                sig.params.is_some_and(|p| self.scan(p))
                    || sig.results.is_some_and(|r| self.scan(r))
                    || self.scan_symbols(&sig.type_params)
            }
            TypeData::Struct(shape) => {
                self.scan_symbols(&shape.fields) || self.scan_symbols(&shape.type_params)
            }
            TypeData::Interface(shape) => {
                self.scan_symbols(&shape.methods)
                    || shape.embeddeds.iter().any(|&embedded| {
                        self.scan(embedded) || self.scan(self.arena.underlying(embedded))
                    })
                    || self.scan_symbols(&shape.all_methods)
            }
        }
    }

    fn scan_symbols(&mut self, symbols: &[SymbolId]) -> bool {
        symbols
            .iter()
            .any(|&s| self.arena.symbol_type(s).is_some_and(|ty| self.scan(ty)))
    }
}

#[cfg(test)]
#[path = "../tests/generic_tests.rs"]
mod tests;
