//! Bridge from checker types back to syntax.
//!
//! - **Lowering**: `type_to_expr` spells a `TypeId` as a type expression
//! - **Monomorphization**: `Monomorphizer` rewrites a generic body so every
//!   bound type parameter is replaced by its concrete type, and
//!   `instantiate_func` drives substitution plus rewrite for one function

mod lower;
mod monomorphize;

pub use lower::{TypeLowering, type_to_expr};
pub use monomorphize::{Instantiation, Monomorphizer, instantiate_func};
