//! Type substitution with inference.
//!
//! `substitute_types` specializes a template type (possibly mentioning the
//! type parameters of a generic declaration) against a concrete argument
//! type. The template and argument are walked in lockstep; whenever the
//! template reaches a type parameter of `context`, the argument found at the
//! same position becomes its binding if it satisfies the constraint.
//!
//! ## Memoization
//!
//! A per-call `seen` table maps each composite template already visited to
//! its result. Before descending, a composite is recorded as mapping to
//! itself, so a cycle (only possible through `Named` types) terminates by
//! returning the template. The entry is overwritten with the real result
//! afterwards. Type-parameter leaves are not memoized: their consistency
//! comes from the alias table, and a later occurrence may still bind a
//! parameter an earlier occurrence left unresolved.
//!
//! ## Sharing
//!
//! When no child changes, the template handle itself is returned. Concrete
//! templates therefore come back unchanged and allocate nothing.

use crate::arena::TypeArena;
use crate::diagnostics::{SubstitutionReport, UnresolvedReason};
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::relations::is_assignable;
use crate::types::{
    InterfaceShape, NamedShape, SignatureShape, StructShape, SymbolId, TypeData, TypeId,
};
use genus_common::limits::{STACK_GROWTH, STACK_RED_ZONE};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Bindings from type parameters to concrete types.
///
/// Owned by the caller and shared across the `substitute_types` calls of one
/// instantiation (receiver, parameters, results) so that every member sees
/// the same bindings. A parameter is bound at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeAliases {
    bindings: IndexMap<SymbolId, TypeId>,
}

impl TypeAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, param: SymbolId) -> Option<TypeId> {
        self.bindings.get(&param).copied()
    }

    pub fn contains(&self, param: SymbolId) -> bool {
        self.bindings.contains_key(&param)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in the order they were established.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, TypeId)> + '_ {
        self.bindings.iter().map(|(&param, &ty)| (param, ty))
    }

    /// Bind `param` unless it already has a binding. Returns whether the
    /// binding was added.
    pub fn bind(&mut self, param: SymbolId, ty: TypeId) -> bool {
        if self.bindings.contains_key(&param) {
            return false;
        }
        self.bindings.insert(param, ty);
        true
    }
}

impl FromIterator<(SymbolId, TypeId)> for TypeAliases {
    fn from_iter<I: IntoIterator<Item = (SymbolId, TypeId)>>(iter: I) -> Self {
        let mut aliases = TypeAliases::new();
        for (param, ty) in iter {
            aliases.bind(param, ty);
        }
        aliases
    }
}

/// Result of one `substitute_types` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Substitution {
    pub ty: TypeId,
    pub report: SubstitutionReport,
}

/// Specialize `template` against `argument`, inferring bindings for the type
/// parameters of `context` into `aliases`.
///
/// Never fails. Parameters that cannot be bound stay in the result and are
/// listed in the report.
pub fn substitute_types(
    arena: &TypeArena,
    context: TypeId,
    template: TypeId,
    argument: Option<TypeId>,
    aliases: &mut TypeAliases,
) -> Substitution {
    let mut substituter = TypeSubstituter::new(arena, context, aliases);
    let ty = substituter.substitute(template, argument);
    Substitution {
        ty,
        report: substituter.finish(),
    }
}

/// Lockstep walker behind [`substitute_types`].
pub struct TypeSubstituter<'a> {
    arena: &'a TypeArena,
    context: TypeId,
    aliases: &'a mut TypeAliases,
    seen: FxHashMap<TypeId, TypeId>,
    seen_symbols: FxHashMap<SymbolId, SymbolId>,
    depth: DepthCounter,
    report: SubstitutionReport,
}

impl<'a> TypeSubstituter<'a> {
    pub fn new(arena: &'a TypeArena, context: TypeId, aliases: &'a mut TypeAliases) -> Self {
        Self {
            arena,
            context,
            aliases,
            seen: FxHashMap::default(),
            seen_symbols: FxHashMap::default(),
            depth: DepthCounter::with_profile(RecursionProfile::Substitution),
            report: SubstitutionReport::default(),
        }
    }

    pub fn finish(self) -> SubstitutionReport {
        self.report
    }

    pub fn substitute(&mut self, template: TypeId, argument: Option<TypeId>) -> TypeId {
        if let Some(&done) = self.seen.get(&template) {
            return done;
        }
        let Some(data) = self.arena.get(template) else {
            return template;
        };
        match data {
            TypeData::Basic(_) => template,
            TypeData::Named(shape) => self.substitute_named(template, &shape, argument),
            composite => {
                if !self.depth.enter() {
                    debug!(
                        template = template.0,
                        depth = self.depth.depth(),
                        "substitution depth exceeded"
                    );
                    self.report.depth_exceeded = true;
                    return template;
                }
                self.seen.insert(template, template);
                let argument = argument.and_then(|arg| self.arena.get(arg));
                let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
                    self.substitute_composite(template, composite, argument)
                });
                self.depth.leave();
                self.seen.insert(template, result);
                result
            }
        }
    }

    fn substitute_named(
        &mut self,
        template: TypeId,
        shape: &NamedShape,
        argument: Option<TypeId>,
    ) -> TypeId {
        let Some(param) = shape.obj else {
            return template;
        };
        if shape.context != Some(self.context) {
            return template;
        }
        if let Some(bound) = self.aliases.get(param) {
            return bound;
        }
        match argument {
            Some(arg) if is_assignable(self.arena, Some(arg), template) => {
                self.aliases.bind(param, arg);
                self.report.record_inference(param, arg);
                debug!(
                    param = %self.arena.symbol_name(param),
                    ty = arg.0,
                    "inferred type parameter"
                );
                arg
            }
            Some(arg) => {
                trace!(param = param.0, argument = arg.0, "argument not assignable");
                self.report.record_unresolved(
                    param,
                    template,
                    UnresolvedReason::NotAssignable { argument: arg },
                );
                template
            }
            None => {
                self.report
                    .record_unresolved(param, template, UnresolvedReason::ArgumentAbsent);
                template
            }
        }
    }

    /// Rebuild `data` with substituted children. `argument` is the
    /// argument's structure; a different kind pairs every child with an
    /// absent argument.
    fn substitute_composite(
        &mut self,
        template: TypeId,
        data: TypeData,
        argument: Option<TypeData>,
    ) -> TypeId {
        let rebuilt = match &data {
            TypeData::Array { len, elem } => {
                let arg = match argument {
                    Some(TypeData::Array { elem, .. }) => Some(elem),
                    _ => None,
                };
                TypeData::Array {
                    len: *len,
                    elem: self.substitute(*elem, arg),
                }
            }
            TypeData::Slice { elem } => {
                let arg = match argument {
                    Some(TypeData::Slice { elem }) => Some(elem),
                    _ => None,
                };
                TypeData::Slice {
                    elem: self.substitute(*elem, arg),
                }
            }
            TypeData::Pointer { base } => {
                let arg = match argument {
                    Some(TypeData::Pointer { base }) => Some(base),
                    _ => None,
                };
                TypeData::Pointer {
                    base: self.substitute(*base, arg),
                }
            }
            TypeData::Map { key, elem } => {
                let (arg_key, arg_elem) = match argument {
                    Some(TypeData::Map { key, elem }) => (Some(key), Some(elem)),
                    _ => (None, None),
                };
                TypeData::Map {
                    key: self.substitute(*key, arg_key),
                    elem: self.substitute(*elem, arg_elem),
                }
            }
            TypeData::Chan { dir, elem } => {
                let arg = match argument {
                    Some(TypeData::Chan { elem, .. }) => Some(elem),
                    _ => None,
                };
                TypeData::Chan {
                    dir: *dir,
                    elem: self.substitute(*elem, arg),
                }
            }
            TypeData::Tuple(vars) => {
                let arg_vars = match &argument {
                    Some(TypeData::Tuple(vars)) => vars.to_vec(),
                    _ => Vec::new(),
                };
                TypeData::Tuple(Arc::from(self.substitute_symbols(vars, &arg_vars)))
            }
            TypeData::Struct(shape) => {
                let (arg_fields, arg_params) = match &argument {
                    Some(TypeData::Struct(arg)) => {
                        (arg.fields.clone(), arg.type_params.clone())
                    }
                    _ => (Vec::new(), Vec::new()),
                };
                TypeData::Struct(Arc::new(StructShape {
                    fields: self.substitute_symbols(&shape.fields, &arg_fields),
                    tags: shape.tags.clone(),
                    offsets: shape.offsets.clone(),
                    type_params: self.substitute_symbols(&shape.type_params, &arg_params),
                }))
            }
            TypeData::Signature(sig) => {
                let (arg_params, arg_results, arg_type_params) = match &argument {
                    Some(TypeData::Signature(arg)) => {
                        (arg.params, arg.results, arg.type_params.clone())
                    }
                    _ => (None, None, Vec::new()),
                };
                TypeData::Signature(Arc::new(SignatureShape {
                    scope: sig.scope,
                    recv: sig.recv,
                    params: sig.params.map(|p| self.substitute(p, arg_params)),
                    results: sig.results.map(|r| self.substitute(r, arg_results)),
                    variadic: sig.variadic,
                    type_params: self.substitute_symbols(&sig.type_params, &arg_type_params),
                }))
            }
            TypeData::Interface(iface) => {
                let empty = InterfaceShape::default();
                let arg = match &argument {
                    Some(TypeData::Interface(arg)) => arg.as_ref(),
                    _ => &empty,
                };
                TypeData::Interface(Arc::new(InterfaceShape {
                    methods: self.substitute_symbols(&iface.methods, &arg.methods),
                    embeddeds: self.substitute_embeddeds(&iface.embeddeds, &arg.embeddeds),
                    all_methods: self.substitute_symbols(&iface.all_methods, &arg.all_methods),
                    variance: iface.variance,
                }))
            }
            TypeData::Basic(_) | TypeData::Named(_) => return template,
        };

        if rebuilt == data {
            template
        } else {
            self.arena.alloc(rebuilt)
        }
    }

    /// Substitute each symbol's type against the symbol at the same index
    /// of `arguments`. Missing trailing arguments are absent.
    fn substitute_symbols(&mut self, symbols: &[SymbolId], arguments: &[SymbolId]) -> Vec<SymbolId> {
        symbols
            .iter()
            .enumerate()
            .map(|(i, &symbol)| {
                let arg = arguments
                    .get(i)
                    .and_then(|&arg| self.arena.symbol_type(arg));
                self.substitute_symbol(symbol, arg)
            })
            .collect()
    }

    /// Copy of `symbol` with its type substituted, or `symbol` itself when
    /// the type is unchanged.
    fn substitute_symbol(&mut self, symbol: SymbolId, argument: Option<TypeId>) -> SymbolId {
        if let Some(&done) = self.seen_symbols.get(&symbol) {
            return done;
        }
        let Some(old) = self.arena.symbol(symbol) else {
            return symbol;
        };
        let ty = self.substitute(old.ty, argument);
        let result = if ty == old.ty {
            symbol
        } else {
            self.arena.alloc_symbol(old.with_type(ty))
        };
        self.seen_symbols.insert(symbol, result);
        result
    }

    /// Embedded interfaces go through the type-parameter rule only. A
    /// result that is not a named type cannot be embedded, so the template
    /// entry is kept.
    fn substitute_embeddeds(&mut self, embeddeds: &[TypeId], arguments: &[TypeId]) -> Vec<TypeId> {
        embeddeds
            .iter()
            .enumerate()
            .map(|(i, &embedded)| {
                let Some(shape) = self.arena.named_shape(embedded) else {
                    return embedded;
                };
                let sub = self.substitute_named(embedded, &shape, arguments.get(i).copied());
                if self.arena.named_shape(sub).is_some() {
                    sub
                } else {
                    embedded
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/substitute_tests.rs"]
mod tests;
