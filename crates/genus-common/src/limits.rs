//! Centralized limits and thresholds.
//!
//! Recursion limits for the substitution engine live in
//! `genus_solver::recursion::RecursionProfile` rather than here; the
//! constants below cover the syntax rewriter and the lowering bridge.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth for the statement/expression rewriter.
///
/// Parser output is acyclic, so this only trips on malformed, absurdly deep
/// trees. When exceeded the rewrite aborts with
/// `TransformError::DepthExceeded` instead of overflowing the stack.
///
/// ```go
/// x := ((((((((((((((((((((((((1))))))))))))))))))))))))  // ... thousands deep
/// ```
pub const MAX_TRANSFORM_DEPTH: u32 = 2_000;

/// Maximum nesting depth for substitution and generic-reference scans.
///
/// The arena only holds finite composites and named types stop both
/// walks, so this is reached by deeply nested but valid templates alone.
/// Both walks grow the stack on demand.
pub const MAX_TYPE_DEPTH: u32 = 2_000;

/// Maximum depth for lowering a solver type back into a type expression.
///
/// Lowering stops at named types, so only pathological unnamed nesting
/// (`[][][][]...T`) can reach it. Deeper levels lower to the `invalid`
/// placeholder identifier.
pub const MAX_LOWERING_DEPTH: u32 = 256;

// =============================================================================
// Stack growth
// =============================================================================

/// Remaining stack below which recursive passes grow the stack.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
pub const STACK_GROWTH: usize = 1024 * 1024;
