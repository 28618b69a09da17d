//! Source-like rendering of types for traces and test assertions.

use crate::arena::TypeArena;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::relations::method_set;
use crate::types::{ChanDir, SymbolId, SymbolKind, TypeData, TypeId, VarInfo};
use std::fmt::Write;

/// Renders types the way they are spelled in source.
///
/// Named types print their name only, so recursive types print finitely.
pub struct TypeFormatter<'a> {
    arena: &'a TypeArena,
    depth: DepthCounter,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self {
            arena,
            depth: DepthCounter::with_profile(RecursionProfile::Formatting),
        }
    }

    pub fn format(&mut self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    fn write_type(&mut self, out: &mut String, ty: TypeId) {
        if !self.depth.enter() {
            out.push_str("...");
            return;
        }
        self.write_data(out, ty);
        self.depth.leave();
    }

    fn write_data(&mut self, out: &mut String, ty: TypeId) {
        let Some(data) = self.arena.get(ty) else {
            out.push_str("invalid type");
            return;
        };
        match data {
            TypeData::Basic(kind) => out.push_str(kind.name()),
            TypeData::Named(shape) => match shape.obj {
                Some(obj) => out.push_str(&self.arena.symbol_name(obj)),
                None => out.push_str("<named>"),
            },
            TypeData::Array { len, elem } => {
                let _ = write!(out, "[{len}]");
                self.write_type(out, elem);
            }
            TypeData::Slice { elem } => {
                out.push_str("[]");
                self.write_type(out, elem);
            }
            TypeData::Pointer { base } => {
                out.push('*');
                self.write_type(out, base);
            }
            TypeData::Map { key, elem } => {
                out.push_str("map[");
                self.write_type(out, key);
                out.push(']');
                self.write_type(out, elem);
            }
            TypeData::Chan { dir, elem } => {
                out.push_str(if dir == ChanDir::SEND {
                    "chan<- "
                } else if dir == ChanDir::RECV {
                    "<-chan "
                } else {
                    "chan "
                });
                self.write_type(out, elem);
            }
            TypeData::Tuple(vars) => {
                out.push('(');
                self.write_vars(out, &vars, false);
                out.push(')');
            }
            TypeData::Signature(sig) => {
                out.push_str("func");
                self.write_signature(out, ty, sig.variadic);
            }
            TypeData::Struct(shape) => {
                out.push_str("struct{");
                for (i, &field) in shape.fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    let embedded = matches!(
                        self.arena.symbol(field).map(|s| s.kind),
                        Some(SymbolKind::Var(VarInfo {
                            anonymous: true,
                            ..
                        }))
                    );
                    if !embedded {
                        out.push_str(&self.arena.symbol_name(field));
                        out.push(' ');
                    }
                    if let Some(field_ty) = self.arena.symbol_type(field) {
                        self.write_type(out, field_ty);
                    }
                    if let Some(Some(tag)) = shape.tags.get(i)
                        && !tag.is_empty()
                    {
                        let _ = write!(out, " {tag:?}");
                    }
                }
                out.push('}');
            }
            TypeData::Interface(shape) => {
                out.push_str("interface{");
                let mut first = true;
                for &embedded in &shape.embeddeds {
                    if !first {
                        out.push_str("; ");
                    }
                    first = false;
                    self.write_type(out, embedded);
                }
                let methods = if shape.methods.is_empty() {
                    method_set(self.arena, &shape)
                } else {
                    shape.methods.clone().into()
                };
                for &method in methods.iter() {
                    if !first {
                        out.push_str("; ");
                    }
                    first = false;
                    out.push_str(&self.arena.symbol_name(method));
                    if let Some(sig) = self.arena.symbol_type(method) {
                        let variadic = matches!(
                            self.arena.get(sig),
                            Some(TypeData::Signature(s)) if s.variadic
                        );
                        self.write_signature(out, sig, variadic);
                    }
                }
                out.push('}');
            }
        }
    }

    fn write_signature(&mut self, out: &mut String, sig: TypeId, variadic: bool) {
        let Some(TypeData::Signature(shape)) = self.arena.get(sig) else {
            return;
        };
        out.push('(');
        if let Some(params) = shape.params
            && let Some(TypeData::Tuple(vars)) = self.arena.get(params)
        {
            self.write_vars(out, &vars, variadic);
        }
        out.push(')');
        let results = shape
            .results
            .and_then(|r| match self.arena.get(r) {
                Some(TypeData::Tuple(vars)) => Some(vars.to_vec()),
                _ => None,
            })
            .unwrap_or_default();
        match results.len() {
            0 => {}
            1 if self.arena.symbol_name(results[0]).is_empty() => {
                out.push(' ');
                if let Some(ty) = self.arena.symbol_type(results[0]) {
                    self.write_type(out, ty);
                }
            }
            _ => {
                out.push_str(" (");
                self.write_vars(out, &results, false);
                out.push(')');
            }
        }
    }

    fn write_vars(&mut self, out: &mut String, vars: &[SymbolId], variadic: bool) {
        for (i, &var) in vars.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let name = self.arena.symbol_name(var);
            if !name.is_empty() {
                out.push_str(&name);
                out.push(' ');
            }
            let Some(ty) = self.arena.symbol_type(var) else {
                continue;
            };
            if variadic && i + 1 == vars.len() {
                // The last parameter of a variadic signature is a slice.
                out.push_str("...");
                match self.arena.get(ty) {
                    Some(TypeData::Slice { elem }) => self.write_type(out, elem),
                    _ => self.write_type(out, ty),
                }
            } else {
                self.write_type(out, ty);
            }
        }
    }
}

/// Render `ty` with a fresh [`TypeFormatter`].
pub fn format_type(arena: &TypeArena, ty: TypeId) -> String {
    TypeFormatter::new(arena).format(ty)
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
