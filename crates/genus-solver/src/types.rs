//! Type and symbol representation.
//!
//! Types live in a [`TypeArena`](crate::TypeArena) and are addressed by
//! [`TypeId`] handles. Identity is handle identity: two `Named` types with
//! the same name are different types, and the `seen` memo and alias tables
//! are keyed by handle rather than by structural value. Cycles are only
//! possible through `Named` types, whose underlying type is filled in after
//! the handle exists.

use bitflags::bitflags;
use genus_common::{Atom, Pos};
use serde::Serialize;
use std::sync::Arc;

// =============================================================================
// Handles
// =============================================================================

/// Handle of a type in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const INVALID: TypeId = TypeId(BasicKind::Invalid as u32);
    pub const BOOL: TypeId = TypeId(BasicKind::Bool as u32);
    pub const INT: TypeId = TypeId(BasicKind::Int as u32);
    pub const INT8: TypeId = TypeId(BasicKind::Int8 as u32);
    pub const INT16: TypeId = TypeId(BasicKind::Int16 as u32);
    pub const INT32: TypeId = TypeId(BasicKind::Int32 as u32);
    pub const INT64: TypeId = TypeId(BasicKind::Int64 as u32);
    pub const UINT: TypeId = TypeId(BasicKind::Uint as u32);
    pub const UINT8: TypeId = TypeId(BasicKind::Uint8 as u32);
    pub const UINT16: TypeId = TypeId(BasicKind::Uint16 as u32);
    pub const UINT32: TypeId = TypeId(BasicKind::Uint32 as u32);
    pub const UINT64: TypeId = TypeId(BasicKind::Uint64 as u32);
    pub const UINTPTR: TypeId = TypeId(BasicKind::Uintptr as u32);
    pub const FLOAT32: TypeId = TypeId(BasicKind::Float32 as u32);
    pub const FLOAT64: TypeId = TypeId(BasicKind::Float64 as u32);
    pub const COMPLEX64: TypeId = TypeId(BasicKind::Complex64 as u32);
    pub const COMPLEX128: TypeId = TypeId(BasicKind::Complex128 as u32);
    pub const STRING: TypeId = TypeId(BasicKind::String as u32);
    pub const UNSAFE_POINTER: TypeId = TypeId(BasicKind::UnsafePointer as u32);
    pub const UNTYPED_NIL: TypeId = TypeId(BasicKind::UntypedNil as u32);

    /// First handle handed out for non-basic types.
    pub const FIRST_USER: u32 = BasicKind::ALL.len() as u32;

    /// Returns true for the predeclared basic types.
    #[inline]
    pub const fn is_basic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

/// Handle of a declared symbol in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

/// Opaque scope reference. Scopes are owned by the checker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub u32);

/// Opaque package reference. Packages are owned by the checker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PackageId(pub u32);

// =============================================================================
// Basic types
// =============================================================================

/// Predeclared basic types. These are substitution fixed points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum BasicKind {
    Invalid = 0,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    UntypedNil,
}

impl BasicKind {
    /// All basic kinds in handle order.
    pub const ALL: [BasicKind; 20] = [
        BasicKind::Invalid,
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::String,
        BasicKind::UnsafePointer,
        BasicKind::UntypedNil,
    ];

    /// Source spelling of the basic type.
    pub const fn name(self) -> &'static str {
        match self {
            BasicKind::Invalid => "invalid type",
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::UntypedNil => "untyped nil",
        }
    }
}

bitflags! {
    /// Channel direction. Both bits set means a bidirectional channel.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ChanDir: u8 {
        const SEND = 1 << 0;
        const RECV = 1 << 1;
        const BOTH = Self::SEND.bits() | Self::RECV.bits();
    }
}

/// Variance annotation carried by interfaces. Substitution copies it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

// =============================================================================
// TypeData
// =============================================================================

/// Structure of a type. Heavy shapes are `Arc`ed so lookups stay cheap.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Basic(BasicKind),
    Array { len: i64, elem: TypeId },
    Slice { elem: TypeId },
    Struct(Arc<StructShape>),
    Pointer { base: TypeId },
    Tuple(Arc<[SymbolId]>),
    Signature(Arc<SignatureShape>),
    Interface(Arc<InterfaceShape>),
    Map { key: TypeId, elem: TypeId },
    Chan { dir: ChanDir, elem: TypeId },
    Named(Arc<NamedShape>),
}

impl TypeData {
    /// Short kind name used in traces.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeData::Basic(_) => "basic",
            TypeData::Array { .. } => "array",
            TypeData::Slice { .. } => "slice",
            TypeData::Struct(_) => "struct",
            TypeData::Pointer { .. } => "pointer",
            TypeData::Tuple(_) => "tuple",
            TypeData::Signature(_) => "signature",
            TypeData::Interface(_) => "interface",
            TypeData::Map { .. } => "map",
            TypeData::Chan { .. } => "chan",
            TypeData::Named(_) => "named",
        }
    }
}

/// Struct type: fields are `Var` symbols with `is_field` set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StructShape {
    pub fields: Vec<SymbolId>,
    /// Field tags, parallel to `fields`. Empty when no field has a tag.
    pub tags: Vec<Option<String>>,
    /// Byte offsets, parallel to `fields`. Empty until layout is computed.
    pub offsets: Vec<i64>,
    pub type_params: Vec<SymbolId>,
}

/// Function or method signature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SignatureShape {
    pub scope: Option<ScopeId>,
    pub recv: Option<SymbolId>,
    /// Parameter tuple (a `TypeData::Tuple` handle).
    pub params: Option<TypeId>,
    /// Result tuple (a `TypeData::Tuple` handle).
    pub results: Option<TypeId>,
    pub variadic: bool,
    pub type_params: Vec<SymbolId>,
}

/// Interface type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InterfaceShape {
    /// Explicitly declared methods (`Func` symbols).
    pub methods: Vec<SymbolId>,
    /// Embedded interfaces; every entry is a `Named` type.
    pub embeddeds: Vec<TypeId>,
    /// Complete method set including embedded methods, sorted by name.
    pub all_methods: Vec<SymbolId>,
    pub variance: Variance,
}

/// Named type. A type parameter is a `Named` type whose `context` is the
/// generic declaration it belongs to and whose underlying type is its
/// constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedShape {
    pub obj: Option<SymbolId>,
    pub underlying: TypeId,
    pub methods: Vec<SymbolId>,
    pub context: Option<TypeId>,
}

// =============================================================================
// Symbols
// =============================================================================

/// Attributes specific to variables and fields.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct VarInfo {
    /// Embedded (anonymous) struct field.
    pub anonymous: bool,
    pub visited: bool,
    pub is_field: bool,
    pub used: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Var(VarInfo),
    Func,
    TypeName,
}

/// A declared name. Never mutated; substitution allocates a copy with a
/// different `ty`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub parent: Option<ScopeId>,
    pub pos: Pos,
    pub pkg: Option<PackageId>,
    pub name: Atom,
    pub ty: TypeId,
    /// Declaration order within the parent scope.
    pub order: u32,
}

impl Symbol {
    /// Copy of this symbol with a different type; every other attribute
    /// (scope, position, package, name, order, var flags) is kept.
    pub fn with_type(&self, ty: TypeId) -> Symbol {
        Symbol {
            ty,
            ..self.clone()
        }
    }

    #[inline]
    pub const fn is_field(&self) -> bool {
        matches!(self.kind, SymbolKind::Var(VarInfo { is_field: true, .. }))
    }
}
