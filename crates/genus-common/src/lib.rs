//! Common types and utilities for the genus crates.
//!
//! This crate provides foundational types used across all genus crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Source positions (`Pos`)
//! - Recursion limits shared by the rewriter and the lowering bridge

// String interning for symbol names
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Pos - opaque source offsets carried through rewrites untouched
pub mod position;
pub use position::Pos;

// Centralized limits and thresholds
pub mod limits;
