//! Source positions.
//!
//! A `Pos` is an opaque byte offset into a file set, assigned by the parser.
//! The instantiation core never interprets positions; it only copies them
//! from template nodes and symbols into their rewritten counterparts.

use serde::Serialize;

/// Compact source position. `Pos::NONE` marks synthesized nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pos(pub u32);

impl Pos {
    /// Position of nodes that have no source counterpart.
    pub const NONE: Pos = Pos(0);
}
