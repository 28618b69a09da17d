//! Solver type → type expression.

use genus_common::Pos;
use genus_common::limits::{MAX_LOWERING_DEPTH, STACK_GROWTH, STACK_RED_ZONE};
use genus_solver::{
    BasicKind, ChanDir as TypeChanDir, DepthCounter, InterfaceShape, SignatureShape,
    StructShape, SymbolId, SymbolKind, TypeArena, TypeData, TypeId, VarInfo,
};
use genus_syntax::ast::{
    BasicLit, ChanDir, Expr, Field, FieldList, FuncType, Ident, Token, TypeParam, TypeParamList,
};

/// Placeholder spelled for types that have no source form.
const INVALID: &str = "invalid";

/// Spell `ty` as a type expression.
pub fn type_to_expr(arena: &TypeArena, ty: TypeId) -> Expr {
    TypeLowering::new(arena).lower(ty)
}

/// Renders solver types as syntax. Named types lower to their name, so the
/// output is finite for recursive types.
pub struct TypeLowering<'a> {
    arena: &'a TypeArena,
    depth: DepthCounter,
}

impl<'a> TypeLowering<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self {
            arena,
            depth: DepthCounter::new(MAX_LOWERING_DEPTH),
        }
    }

    pub fn lower(&mut self, ty: TypeId) -> Expr {
        if !self.depth.enter() {
            return Expr::ident(INVALID);
        }
        let expr = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.lower_data(ty));
        self.depth.leave();
        expr
    }

    fn lower_data(&mut self, ty: TypeId) -> Expr {
        match self.arena.data(ty) {
            TypeData::Basic(BasicKind::Invalid) => Expr::ident(INVALID),
            TypeData::Basic(BasicKind::UntypedNil) => Expr::ident("nil"),
            TypeData::Basic(BasicKind::UnsafePointer) => Expr::Selector {
                x: Box::new(Expr::ident("unsafe")),
                sel: Ident::new(Pos::NONE, "Pointer"),
            },
            TypeData::Basic(kind) => Expr::ident(kind.name()),
            TypeData::Named(shape) => match shape.obj {
                Some(obj) => Expr::ident(&self.arena.symbol_name(obj)),
                None => Expr::ident(INVALID),
            },
            TypeData::Pointer { base } => Expr::Star {
                star: Pos::NONE,
                x: Box::new(self.lower(base)),
            },
            TypeData::Slice { elem } => Expr::ArrayType {
                lbrack: Pos::NONE,
                len: None,
                elt: Box::new(self.lower(elem)),
            },
            TypeData::Array { len, elem } => Expr::ArrayType {
                lbrack: Pos::NONE,
                len: Some(Box::new(Expr::BasicLit(BasicLit {
                    pos: Pos::NONE,
                    kind: Token::Int,
                    value: len.to_string(),
                }))),
                elt: Box::new(self.lower(elem)),
            },
            TypeData::Map { key, elem } => Expr::MapType {
                map: Pos::NONE,
                key: Box::new(self.lower(key)),
                value: Box::new(self.lower(elem)),
            },
            TypeData::Chan { dir, elem } => Expr::ChanType {
                begin: Pos::NONE,
                arrow: Pos::NONE,
                dir: chan_dir(dir),
                value: Box::new(self.lower(elem)),
            },
            // A lone tuple only has a source form when it holds one type.
            TypeData::Tuple(vars) => match &*vars {
                [var] => match self.arena.symbol_type(*var) {
                    Some(var_ty) => self.lower(var_ty),
                    None => Expr::ident(INVALID),
                },
                _ => Expr::ident(INVALID),
            },
            TypeData::Signature(shape) => Expr::FuncType(self.signature(&shape)),
            TypeData::Struct(shape) => self.struct_type(&shape),
            TypeData::Interface(shape) => self.interface_type(&shape),
        }
    }

    fn signature(&mut self, shape: &SignatureShape) -> FuncType {
        let params = self.tuple_fields(shape.params, shape.variadic);
        let results = self.tuple_fields(shape.results, false);
        FuncType {
            func: Pos::NONE,
            type_params: self.type_params(&shape.type_params),
            params,
            results: (!results.list.is_empty()).then_some(results),
        }
    }

    /// Parameter or result list. The last entry of a variadic list is spelled
    /// `...T` instead of `[]T`.
    fn tuple_fields(&mut self, tuple: Option<TypeId>, variadic: bool) -> FieldList {
        let vars = match tuple.map(|t| self.arena.data(t)) {
            Some(TypeData::Tuple(vars)) => vars,
            _ => return FieldList::default(),
        };
        let last = vars.len().saturating_sub(1);
        let mut fields = Vec::with_capacity(vars.len());
        for (i, &var) in vars.iter().enumerate() {
            let var_ty = self.arena.symbol_type(var).unwrap_or(TypeId::INVALID);
            let ty = match self.arena.data(var_ty) {
                TypeData::Slice { elem } if variadic && i == last => Expr::Ellipsis {
                    pos: Pos::NONE,
                    elt: Some(Box::new(self.lower(elem))),
                },
                _ => self.lower(var_ty),
            };
            fields.push(Field::new(self.names_of(var), ty));
        }
        FieldList::new(fields)
    }

    fn names_of(&self, symbol: SymbolId) -> Vec<Ident> {
        let name = self.arena.symbol_name(symbol);
        if name.is_empty() {
            Vec::new()
        } else {
            vec![Ident::new(Pos::NONE, &*name)]
        }
    }

    fn type_params(&mut self, params: &[SymbolId]) -> Option<TypeParamList> {
        if params.is_empty() {
            return None;
        }
        let list = params
            .iter()
            .map(|&param| {
                let constraint = self
                    .arena
                    .symbol_type(param)
                    .and_then(|ty| self.arena.named_shape(ty))
                    .map_or(TypeId::INVALID, |shape| shape.underlying);
                let bound = match self.arena.data(constraint) {
                    TypeData::Interface(shape)
                        if shape.methods.is_empty() && shape.embeddeds.is_empty() =>
                    {
                        Expr::ident("any")
                    }
                    _ => self.lower(constraint),
                };
                TypeParam::new(self.names_of(param), bound)
            })
            .collect();
        Some(TypeParamList::new(list))
    }

    fn struct_type(&mut self, shape: &StructShape) -> Expr {
        let mut fields = Vec::with_capacity(shape.fields.len());
        for (i, &field) in shape.fields.iter().enumerate() {
            let Some(symbol) = self.arena.symbol(field) else {
                continue;
            };
            let names = match symbol.kind {
                SymbolKind::Var(VarInfo {
                    anonymous: true, ..
                }) => Vec::new(),
                _ => self.names_of(field),
            };
            let mut lowered = Field::new(names, self.lower(symbol.ty));
            if let Some(Some(tag)) = shape.tags.get(i) {
                lowered.tag = Some(BasicLit::string(Pos::NONE, tag));
            }
            fields.push(lowered);
        }
        Expr::StructType {
            struct_pos: Pos::NONE,
            type_params: self.type_params(&shape.type_params),
            fields: FieldList::new(fields),
            incomplete: false,
        }
    }

    fn interface_type(&mut self, shape: &InterfaceShape) -> Expr {
        let mut methods = Vec::with_capacity(shape.embeddeds.len() + shape.methods.len());
        for &embedded in &shape.embeddeds {
            methods.push(Field::new(Vec::new(), self.lower(embedded)));
        }
        for &method in &shape.methods {
            let signature = self.arena.symbol_type(method).unwrap_or(TypeId::INVALID);
            let ty = match self.arena.data(signature) {
                TypeData::Signature(sig) => Expr::FuncType(self.signature(&sig)),
                _ => Expr::ident(INVALID),
            };
            methods.push(Field::new(self.names_of(method), ty));
        }
        Expr::InterfaceType {
            interface: Pos::NONE,
            type_params: None,
            methods: FieldList::new(methods),
            incomplete: false,
        }
    }
}

fn chan_dir(dir: TypeChanDir) -> ChanDir {
    if dir == TypeChanDir::SEND {
        ChanDir::Send
    } else if dir == TypeChanDir::RECV {
        ChanDir::Recv
    } else {
        ChanDir::Both
    }
}

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod tests;
