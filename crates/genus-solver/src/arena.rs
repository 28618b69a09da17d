//! Type and symbol storage.
//!
//! `TypeArena` owns every type and symbol of a compilation and hands out
//! stable integer handles. It follows the same layout as a definition store:
//! `DashMap` tables plus atomic id counters, so independent instantiations
//! can allocate concurrently through a shared `&TypeArena`.
//!
//! Entries are immutable once published. The only writes to existing entries
//! are the construction-time setters for `Named` types
//! ([`set_underlying`](TypeArena::set_underlying),
//! [`add_method`](TypeArena::add_method),
//! [`set_context`](TypeArena::set_context)), which exist because a named
//! type must have a handle before its (possibly self-referential)
//! underlying type can be built.

use crate::types::{
    BasicKind, ChanDir, InterfaceShape, NamedShape, PackageId, ScopeId, SignatureShape,
    StructShape, Symbol, SymbolId, SymbolKind, TypeData, TypeId, VarInfo,
};
use dashmap::DashMap;
use genus_common::{Atom, Pos, ShardedInterner};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Thread-safe storage for types and symbols.
pub struct TypeArena {
    interner: ShardedInterner,
    types: DashMap<TypeId, TypeData>,
    symbols: DashMap<SymbolId, Symbol>,
    next_type: AtomicU32,
    next_symbol: AtomicU32,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    /// Create an arena with the basic types pre-registered at their fixed
    /// handles (`TypeId::INT`, `TypeId::STRING`, ...).
    pub fn new() -> Self {
        let arena = Self {
            interner: ShardedInterner::new(),
            types: DashMap::new(),
            symbols: DashMap::new(),
            next_type: AtomicU32::new(TypeId::FIRST_USER),
            next_symbol: AtomicU32::new(1),
        };
        for kind in BasicKind::ALL {
            arena.types.insert(TypeId(kind as u32), TypeData::Basic(kind));
        }
        arena.interner.intern_predeclared();
        arena
    }

    // -------------------------------------------------------------------------
    // Strings
    // -------------------------------------------------------------------------

    pub fn intern_string(&self, s: &str) -> Atom {
        self.interner.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.interner.resolve(atom)
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    /// Publish a new type and return its handle.
    pub fn alloc(&self, data: TypeData) -> TypeId {
        let id = TypeId(self.next_type.fetch_add(1, Ordering::SeqCst));
        trace!(type_id = id.0, kind = data.kind_name(), "TypeArena::alloc");
        self.types.insert(id, data);
        id
    }

    /// Look up a type.
    pub fn get(&self, id: TypeId) -> Option<TypeData> {
        self.types.get(&id).map(|r| r.clone())
    }

    /// Look up a type, treating unknown handles as the invalid type.
    pub fn data(&self, id: TypeId) -> TypeData {
        self.get(id)
            .unwrap_or(TypeData::Basic(BasicKind::Invalid))
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.types.contains_key(&id)
    }

    /// Number of types, basic types included.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn named_shape(&self, id: TypeId) -> Option<Arc<NamedShape>> {
        match self.get(id)? {
            TypeData::Named(shape) => Some(shape),
            _ => None,
        }
    }

    /// Follow `Named` links to the first unnamed type.
    ///
    /// A chain of named types whose underlying was never set (or that loops
    /// back on itself) ends in `TypeId::INVALID`.
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..64 {
            match self.get(current) {
                Some(TypeData::Named(shape)) => current = shape.underlying,
                Some(_) => return current,
                None => return TypeId::INVALID,
            }
        }
        TypeId::INVALID
    }

    pub fn array(&self, len: i64, elem: TypeId) -> TypeId {
        self.alloc(TypeData::Array { len, elem })
    }

    pub fn slice(&self, elem: TypeId) -> TypeId {
        self.alloc(TypeData::Slice { elem })
    }

    pub fn pointer(&self, base: TypeId) -> TypeId {
        self.alloc(TypeData::Pointer { base })
    }

    pub fn map(&self, key: TypeId, elem: TypeId) -> TypeId {
        self.alloc(TypeData::Map { key, elem })
    }

    pub fn chan(&self, dir: ChanDir, elem: TypeId) -> TypeId {
        self.alloc(TypeData::Chan { dir, elem })
    }

    pub fn tuple(&self, vars: Vec<SymbolId>) -> TypeId {
        self.alloc(TypeData::Tuple(Arc::from(vars)))
    }

    pub fn struct_type(&self, shape: StructShape) -> TypeId {
        self.alloc(TypeData::Struct(Arc::new(shape)))
    }

    pub fn signature(&self, shape: SignatureShape) -> TypeId {
        self.alloc(TypeData::Signature(Arc::new(shape)))
    }

    pub fn interface(&self, shape: InterfaceShape) -> TypeId {
        self.alloc(TypeData::Interface(Arc::new(shape)))
    }

    /// Interface whose complete method set is computed from its declared
    /// methods and embedded interfaces (sorted by name, duplicates by name
    /// dropped).
    pub fn interface_with_methods(&self, methods: Vec<SymbolId>, embeddeds: Vec<TypeId>) -> TypeId {
        let mut all: Vec<SymbolId> = methods.clone();
        for &embedded in &embeddeds {
            if let Some(TypeData::Interface(inner)) = self.get(self.underlying(embedded)) {
                all.extend(inner.all_methods.iter().copied());
            }
        }
        let mut keyed: Vec<(Arc<str>, SymbolId)> = all
            .into_iter()
            .filter_map(|m| self.symbol(m).map(|s| (self.resolve_atom(s.name), m)))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.0 == b.0);
        self.interface(InterfaceShape {
            methods,
            embeddeds,
            all_methods: keyed.into_iter().map(|(_, m)| m).collect(),
            variance: Default::default(),
        })
    }

    /// The empty interface (`any`).
    pub fn empty_interface(&self) -> TypeId {
        self.interface(InterfaceShape::default())
    }

    /// Declare a named type with a `TypeName` symbol. The underlying type
    /// starts out invalid; fill it in with [`set_underlying`](Self::set_underlying).
    pub fn declare_named(&self, name: &str, context: Option<TypeId>) -> TypeId {
        let id = self.alloc(TypeData::Named(Arc::new(NamedShape {
            obj: None,
            underlying: TypeId::INVALID,
            methods: Vec::new(),
            context,
        })));
        let obj = self.alloc_symbol(Symbol {
            kind: SymbolKind::TypeName,
            parent: None,
            pos: Pos::NONE,
            pkg: None,
            name: self.intern_string(name),
            ty: id,
            order: 0,
        });
        self.update_named(id, |shape| shape.obj = Some(obj));
        id
    }

    /// Declare a type parameter of the generic declaration `context`,
    /// constrained by `constraint`. Returns the parameter's `TypeName`
    /// symbol and its `Named` type.
    pub fn declare_type_param(
        &self,
        name: &str,
        constraint: TypeId,
        context: Option<TypeId>,
    ) -> (SymbolId, TypeId) {
        let named = self.declare_named(name, context);
        self.set_underlying(named, constraint);
        let obj = self
            .named_shape(named)
            .and_then(|shape| shape.obj)
            .unwrap_or(SymbolId(0));
        (obj, named)
    }

    pub fn set_underlying(&self, named: TypeId, underlying: TypeId) {
        self.update_named(named, |shape| shape.underlying = underlying);
    }

    pub fn add_method(&self, named: TypeId, method: SymbolId) {
        self.update_named(named, |shape| shape.methods.push(method));
    }

    /// Attach type parameters to the declaration they belong to. Used when
    /// the declaration's own type is built after its parameters.
    pub fn set_context(&self, named: TypeId, context: TypeId) {
        self.update_named(named, |shape| shape.context = Some(context));
    }

    fn update_named(&self, id: TypeId, f: impl FnOnce(&mut NamedShape)) {
        if let Some(mut entry) = self.types.get_mut(&id)
            && let TypeData::Named(shape) = entry.value_mut()
        {
            f(Arc::make_mut(shape));
        }
    }

    // -------------------------------------------------------------------------
    // Symbols
    // -------------------------------------------------------------------------

    pub fn alloc_symbol(&self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.next_symbol.fetch_add(1, Ordering::SeqCst));
        trace!(symbol_id = id.0, ty = symbol.ty.0, "TypeArena::alloc_symbol");
        self.symbols.insert(id, symbol);
        id
    }

    pub fn symbol(&self, id: SymbolId) -> Option<Symbol> {
        self.symbols.get(&id).map(|r| r.clone())
    }

    pub fn symbol_type(&self, id: SymbolId) -> Option<TypeId> {
        self.symbols.get(&id).map(|r| r.ty)
    }

    pub fn symbol_name(&self, id: SymbolId) -> Arc<str> {
        self.symbols
            .get(&id)
            .map(|r| self.resolve_atom(r.name))
            .unwrap_or_else(|| Arc::from(""))
    }

    /// Declare a variable (parameter or result).
    pub fn new_var(&self, name: &str, ty: TypeId) -> SymbolId {
        self.new_symbol(SymbolKind::Var(VarInfo::default()), name, ty)
    }

    /// Declare a struct field.
    pub fn new_field(&self, name: &str, ty: TypeId, anonymous: bool) -> SymbolId {
        let info = VarInfo {
            anonymous,
            is_field: true,
            ..VarInfo::default()
        };
        self.new_symbol(SymbolKind::Var(info), name, ty)
    }

    /// Declare a function or method.
    pub fn new_func(&self, name: &str, signature: TypeId) -> SymbolId {
        self.new_symbol(SymbolKind::Func, name, signature)
    }

    fn new_symbol(&self, kind: SymbolKind, name: &str, ty: TypeId) -> SymbolId {
        self.alloc_symbol(Symbol {
            kind,
            parent: None,
            pos: Pos::NONE,
            pkg: None,
            name: self.intern_string(name),
            ty,
            order: 0,
        })
    }

    /// Declare a symbol with full provenance.
    pub fn declare(
        &self,
        kind: SymbolKind,
        name: &str,
        ty: TypeId,
        parent: Option<ScopeId>,
        pkg: Option<PackageId>,
        pos: Pos,
        order: u32,
    ) -> SymbolId {
        self.alloc_symbol(Symbol {
            kind,
            parent,
            pos,
            pkg,
            name: self.intern_string(name),
            ty,
            order,
        })
    }
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod tests;
