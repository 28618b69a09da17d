//! Type identity and assignability.
//!
//! These are the checker-side relations the substitution engine consults
//! before binding a type parameter. They cover what inference needs:
//! structural identity, the interface method-set rule, and the
//! named/unnamed underlying-type rule. Recursive types are compared
//! coinductively: a pair already under comparison is assumed related.

use crate::arena::TypeArena;
use crate::recursion::{RecursionProfile, Visit, VisitSet};
use crate::types::{BasicKind, InterfaceShape, StructShape, SymbolId, TypeData, TypeId};
use std::sync::Arc;
use tracing::trace;

/// Report whether `a` and `b` are identical types.
pub fn identical(arena: &TypeArena, a: TypeId, b: TypeId) -> bool {
    RelationChecker::new(arena).identical(a, b)
}

/// Report whether a value of type `value` may be assigned to `target`.
/// An absent value is never assignable.
pub fn is_assignable(arena: &TypeArena, value: Option<TypeId>, target: TypeId) -> bool {
    let Some(value) = value else {
        return false;
    };
    RelationChecker::new(arena).assignable(value, target)
}

/// Report whether `value` has every method of the interface `iface`.
pub fn implements(arena: &TypeArena, value: TypeId, iface: TypeId) -> bool {
    let mut checker = RelationChecker::new(arena);
    match arena.get(arena.underlying(iface)) {
        Some(TypeData::Interface(shape)) => checker.implements(value, &shape),
        _ => false,
    }
}

/// Stateful checker carrying the coinductive visiting set.
pub struct RelationChecker<'a> {
    arena: &'a TypeArena,
    visits: VisitSet<(TypeId, TypeId)>,
}

impl<'a> RelationChecker<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self {
            arena,
            visits: VisitSet::with_profile(RecursionProfile::TypeRelation),
        }
    }

    pub fn identical(&mut self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match self.visits.enter((a, b)) {
            Visit::Fresh => {}
            Visit::Revisit => return true,
            Visit::Exhausted => {
                trace!(a = a.0, b = b.0, "identical: limit exceeded");
                return false;
            }
        }
        let result = self.identical_structure(a, b);
        self.visits.leave((a, b));
        result
    }

    fn identical_structure(&mut self, a: TypeId, b: TypeId) -> bool {
        let (Some(da), Some(db)) = (self.arena.get(a), self.arena.get(b)) else {
            return false;
        };
        match (da, db) {
            (TypeData::Basic(x), TypeData::Basic(y)) => x == y,
            (TypeData::Array { len: la, elem: ea }, TypeData::Array { len: lb, elem: eb }) => {
                la == lb && self.identical(ea, eb)
            }
            (TypeData::Slice { elem: ea }, TypeData::Slice { elem: eb }) => self.identical(ea, eb),
            (TypeData::Pointer { base: ba }, TypeData::Pointer { base: bb }) => {
                self.identical(ba, bb)
            }
            (TypeData::Map { key: ka, elem: ea }, TypeData::Map { key: kb, elem: eb }) => {
                self.identical(ka, kb) && self.identical(ea, eb)
            }
            (TypeData::Chan { dir: da, elem: ea }, TypeData::Chan { dir: db, elem: eb }) => {
                da == db && self.identical(ea, eb)
            }
            (TypeData::Tuple(va), TypeData::Tuple(vb)) => self.identical_vars(&va, &vb, false),
            (TypeData::Struct(sa), TypeData::Struct(sb)) => {
                struct_tags(&sa) == struct_tags(&sb)
                    && self.identical_vars(&sa.fields, &sb.fields, true)
            }
            (TypeData::Signature(sa), TypeData::Signature(sb)) => {
                sa.variadic == sb.variadic
                    && sa.type_params.len() == sb.type_params.len()
                    && self.identical_tuples(sa.params, sb.params)
                    && self.identical_tuples(sa.results, sb.results)
            }
            (TypeData::Interface(ia), TypeData::Interface(ib)) => {
                let ma = method_set(self.arena, &ia);
                let mb = method_set(self.arena, &ib);
                ma.len() == mb.len()
                    && ma.iter().all(|&m| {
                        self.find_method(&mb, self.arena.symbol_name(m).as_ref())
                            .is_some_and(|other| self.identical_symbol_types(m, other))
                    })
            }
            // Named types are identical only to themselves (handled above).
            _ => false,
        }
    }

    /// Pairwise identity of symbol types. Struct fields also compare names
    /// and embedding.
    fn identical_vars(&mut self, a: &[SymbolId], b: &[SymbolId], fields: bool) -> bool {
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).all(|(&x, &y)| {
            let (Some(sx), Some(sy)) = (self.arena.symbol(x), self.arena.symbol(y)) else {
                return false;
            };
            if fields && (sx.name != sy.name || sx.kind != sy.kind) {
                return false;
            }
            self.identical(sx.ty, sy.ty)
        })
    }

    fn identical_tuples(&mut self, a: Option<TypeId>, b: Option<TypeId>) -> bool {
        let arena = self.arena;
        let empty = |t: Option<TypeId>| match t {
            None => true,
            Some(t) => matches!(arena.get(t), Some(TypeData::Tuple(v)) if v.is_empty()),
        };
        match (a, b) {
            (Some(a), Some(b)) => self.identical(a, b),
            _ => empty(a) && empty(b),
        }
    }

    fn identical_symbol_types(&mut self, a: SymbolId, b: SymbolId) -> bool {
        match (self.arena.symbol_type(a), self.arena.symbol_type(b)) {
            (Some(ta), Some(tb)) => self.identical(ta, tb),
            _ => false,
        }
    }

    fn find_method(&self, methods: &[SymbolId], name: &str) -> Option<SymbolId> {
        methods
            .iter()
            .copied()
            .find(|&m| self.arena.symbol_name(m).as_ref() == name)
    }

    pub fn assignable(&mut self, value: TypeId, target: TypeId) -> bool {
        if self.identical(value, target) {
            return true;
        }

        let target_under = self.arena.underlying(target);
        if let Some(TypeData::Interface(shape)) = self.arena.get(target_under) {
            return self.implements(value, &shape);
        }

        // Identical underlying types, at least one side unnamed.
        let value_named = matches!(self.arena.get(value), Some(TypeData::Named(_)));
        let target_named = matches!(self.arena.get(target), Some(TypeData::Named(_)));
        if (!value_named || !target_named)
            && self.identical(self.arena.underlying(value), target_under)
        {
            return true;
        }

        if value == TypeId::UNTYPED_NIL {
            return matches!(
                self.arena.get(target_under),
                Some(
                    TypeData::Pointer { .. }
                        | TypeData::Slice { .. }
                        | TypeData::Map { .. }
                        | TypeData::Chan { .. }
                        | TypeData::Signature(_)
                        | TypeData::Basic(BasicKind::UnsafePointer)
                )
            );
        }

        false
    }

    pub fn implements(&mut self, value: TypeId, iface: &InterfaceShape) -> bool {
        let required = method_set(self.arena, iface);
        if required.is_empty() {
            return true;
        }
        let available = self.value_methods(value);
        required.iter().all(|&m| {
            let name = self.arena.symbol_name(m);
            self.find_method(&available, name.as_ref())
                .is_some_and(|found| self.identical_symbol_types(m, found))
        })
    }

    /// Methods callable on a value of type `value`: declared methods of a
    /// named type (also through a pointer to it) plus the method set of an
    /// interface underlying type.
    fn value_methods(&self, value: TypeId) -> Vec<SymbolId> {
        let mut methods = Vec::new();
        let mut named = self.arena.named_shape(value);
        if named.is_none()
            && let Some(TypeData::Pointer { base }) = self.arena.get(value)
        {
            named = self.arena.named_shape(base);
        }
        if let Some(shape) = named {
            methods.extend(shape.methods.iter().copied());
        }
        if let Some(TypeData::Interface(shape)) = self.arena.get(self.arena.underlying(value)) {
            methods.extend(method_set(self.arena, &shape).iter().copied());
        }
        methods
    }
}

/// Complete method set of an interface: `all_methods` when computed,
/// otherwise declared methods plus those of embedded interfaces.
pub fn method_set(arena: &TypeArena, iface: &InterfaceShape) -> Arc<[SymbolId]> {
    if !iface.all_methods.is_empty() || (iface.methods.is_empty() && iface.embeddeds.is_empty()) {
        return Arc::from(iface.all_methods.as_slice());
    }
    let mut methods = iface.methods.clone();
    for &embedded in &iface.embeddeds {
        if let Some(TypeData::Interface(inner)) = arena.get(arena.underlying(embedded)) {
            methods.extend(inner.all_methods.iter().copied());
            if inner.all_methods.is_empty() {
                methods.extend(inner.methods.iter().copied());
            }
        }
    }
    Arc::from(methods)
}

/// Tags padded to the field count so "no tags" equals "all tags empty".
fn struct_tags(shape: &StructShape) -> Vec<Option<&str>> {
    (0..shape.fields.len())
        .map(|i| {
            shape
                .tags
                .get(i)
                .and_then(|t| t.as_deref())
                .filter(|t| !t.is_empty())
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/relations_tests.rs"]
mod tests;
