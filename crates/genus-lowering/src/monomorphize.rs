//! Monomorphizing rewrite of generic function bodies.

use crate::lower::type_to_expr;
use genus_solver::{
    Substitution, SubstitutionReport, SymbolId, TypeAliases, TypeArena, TypeData, TypeId,
    substitute_types,
};
use genus_syntax::ast::{Expr, FuncDecl, FuncType, Ident, TypeParamList};
use genus_syntax::{Result, Rewriter, transform_func_decl};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Rewriter that replaces bound type parameters with their concrete types.
///
/// Parameters are matched by name. An identifier naming a parameter that
/// has no binding is left alone and recorded in [`unbound`](Self::unbound).
pub struct Monomorphizer<'a> {
    arena: &'a TypeArena,
    aliases: &'a TypeAliases,
    /// Type parameters in declaration order.
    params: IndexMap<String, SymbolId>,
    lowered: FxHashMap<SymbolId, Expr>,
    unbound: IndexSet<String>,
    /// Original and instantiated name of the function being rewritten.
    rename: Option<(String, String)>,
}

impl<'a> Monomorphizer<'a> {
    pub fn new(
        arena: &'a TypeArena,
        aliases: &'a TypeAliases,
        params: impl IntoIterator<Item = (String, SymbolId)>,
    ) -> Self {
        Self {
            arena,
            aliases,
            params: params.into_iter().collect(),
            lowered: FxHashMap::default(),
            unbound: IndexSet::new(),
            rename: None,
        }
    }

    /// Monomorphizer for the given type-parameter symbols, named as declared.
    pub fn for_type_params(
        arena: &'a TypeArena,
        aliases: &'a TypeAliases,
        params: &[SymbolId],
    ) -> Self {
        let named = params
            .iter()
            .map(|&param| (arena.symbol_name(param).to_string(), param));
        Self::new(arena, aliases, named)
    }

    /// Rewrite self-instantiations `from[T...]` to the identifier `to`.
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename = Some((from.into(), to.into()));
        self
    }

    /// Parameter names seen without a binding, in first-seen order.
    pub fn unbound(&self) -> impl Iterator<Item = &str> {
        self.unbound.iter().map(String::as_str)
    }

    fn is_bound(&self, name: &str) -> bool {
        self.params
            .get(name)
            .is_some_and(|&param| self.aliases.contains(param))
    }

    fn binding(&mut self, name: &str) -> Option<Expr> {
        let param = *self.params.get(name)?;
        let Some(ty) = self.aliases.get(param) else {
            self.unbound.insert(name.to_string());
            return None;
        };
        let arena = self.arena;
        let expr = self
            .lowered
            .entry(param)
            .or_insert_with(|| type_to_expr(arena, ty));
        Some(expr.clone())
    }

    /// Drop bound names from a type-parameter list; `None` once nothing is left.
    fn strip_bound(&self, list: Option<TypeParamList>) -> Option<TypeParamList> {
        let mut list = list?;
        for param in &mut list.list {
            param.names.retain(|name| !self.is_bound(&name.name));
        }
        list.list.retain(|param| !param.names.is_empty());
        (!list.list.is_empty()).then_some(list)
    }

    /// `F[T, U]` inside `F`'s own body: its own parameters, in declaration
    /// order, all bound.
    fn is_self_instantiation(&self, old: &Expr) -> bool {
        let (Some((from, _)), Expr::GenericType { ty, type_args, .. }) = (&self.rename, old) else {
            return false;
        };
        ty.as_ident().is_some_and(|ident| ident.name == *from)
            && type_args.len() == self.params.len()
            && type_args.iter().zip(self.params.keys()).all(|(arg, param)| {
                arg.as_ident()
                    .is_some_and(|ident| ident.name == *param && self.is_bound(param))
            })
    }
}

impl Rewriter for Monomorphizer<'_> {
    fn rewrite_expr(&mut self, old: &Expr, new: Expr) -> Expr {
        if self.is_self_instantiation(old) {
            if let Some((_, to)) = &self.rename {
                trace!(name = %to, "collapsing self-instantiation");
                return Expr::Ident(Ident::new(old.pos(), to.as_str()));
            }
        }
        match new {
            Expr::Ident(ident) => match self.binding(&ident.name) {
                Some(concrete) => concrete,
                None => Expr::Ident(ident),
            },
            Expr::StructType {
                struct_pos,
                type_params,
                fields,
                incomplete,
            } => Expr::StructType {
                struct_pos,
                type_params: self.strip_bound(type_params),
                fields,
                incomplete,
            },
            Expr::InterfaceType {
                interface,
                type_params,
                methods,
                incomplete,
            } => Expr::InterfaceType {
                interface,
                type_params: self.strip_bound(type_params),
                methods,
                incomplete,
            },
            other => other,
        }
    }

    fn rewrite_func_type(&mut self, _old: &FuncType, mut new: FuncType) -> FuncType {
        new.type_params = self.strip_bound(new.type_params.take());
        new
    }
}

/// Outcome of [`instantiate_func`].
#[derive(Clone, Debug)]
pub struct Instantiation {
    /// The specialized declaration.
    pub decl: FuncDecl,
    /// The specialized signature type.
    pub signature: TypeId,
    pub report: SubstitutionReport,
    /// Type-parameter names still referenced without a binding.
    pub unbound: Vec<String>,
}

impl Instantiation {
    /// Every parameter was bound and the body mentions no unbound one.
    pub fn is_complete(&self) -> bool {
        self.report.is_complete() && self.unbound.is_empty()
    }
}

/// Specialize a generic function for one call site.
///
/// Substitutes `signature_template` against `argument_signature` (inferring
/// into `aliases`), then rewrites a copy of `decl` so that every bound type
/// parameter is spelled as its concrete type. The copy is named
/// `decl.name + suffix`; recursive self-instantiations follow the rename.
pub fn instantiate_func(
    arena: &TypeArena,
    decl: &FuncDecl,
    signature_template: TypeId,
    context: TypeId,
    argument_signature: Option<TypeId>,
    aliases: &mut TypeAliases,
    suffix: &str,
) -> Result<Instantiation> {
    let Substitution { ty, report } =
        substitute_types(arena, context, signature_template, argument_signature, aliases);

    let params = match arena.data(signature_template) {
        TypeData::Signature(shape) => shape.type_params.clone(),
        _ => Vec::new(),
    };
    let name = format!("{}{}", decl.name.name, suffix);
    let mut monomorphizer = Monomorphizer::for_type_params(arena, aliases, &params)
        .with_rename(decl.name.name.as_str(), name.as_str());
    let mut specialized = transform_func_decl(&mut monomorphizer, decl)?;
    specialized.name = Ident::new(decl.name.pos, name);
    let unbound: Vec<String> = monomorphizer.unbound().map(str::to_string).collect();

    debug!(
        name = %specialized.name.name,
        inferred = report.inferred.len(),
        unresolved = report.unresolved.len(),
        unbound = unbound.len(),
        "instantiated function"
    );

    Ok(Instantiation {
        decl: specialized,
        signature: ty,
        report,
        unbound,
    })
}

#[cfg(test)]
#[path = "../tests/monomorphize_tests.rs"]
mod tests;
