//! Depth and cycle bookkeeping for the solver's recursive walks.
//!
//! Relations compare pairs of possibly cyclic types and use a [`VisitSet`],
//! which remembers the pairs under comparison so a revisit can be assumed
//! related. Substitution, generic scans and formatting keep their own memo
//! tables and only need a [`DepthCounter`].
//!
//! Limits come from [`RecursionProfile`] so every walk is bounded in one
//! place:
//!
//! ```ignore
//! let mut depth = DepthCounter::with_profile(RecursionProfile::Substitution);
//! ```

use genus_common::limits::MAX_TYPE_DEPTH;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Limit presets, one per recursive walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// `TypeSubstituter`. Named types stop the descent, so only deeply
    /// nested unnamed composites reach the limit.
    Substitution,
    /// `RelationChecker`.
    TypeRelation,
    /// `contains_unresolved_generic` and friends.
    GenericScan,
    /// `format_type`. Deeper types print as `...`.
    Formatting,
    Custom { max_depth: u32, max_steps: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Substitution | Self::GenericScan => MAX_TYPE_DEPTH,
            Self::TypeRelation => 100,
            Self::Formatting => 32,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    /// Total number of entries a [`VisitSet`] accepts over its lifetime.
    pub const fn max_steps(self) -> u32 {
        match self {
            Self::Substitution => 1_000_000,
            Self::Custom { max_steps, .. } => max_steps,
            Self::TypeRelation | Self::GenericScan | Self::Formatting => 100_000,
        }
    }
}

/// Outcome of [`VisitSet::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Not under comparison yet. The caller owes a matching `leave`.
    Fresh,
    /// Already under comparison further up the stack.
    Revisit,
    /// Depth or step budget spent. Nothing was recorded.
    Exhausted,
}

/// Keys currently being visited, bounded in depth and total steps.
pub struct VisitSet<K> {
    active: FxHashSet<K>,
    steps: u32,
    max_depth: u32,
    max_steps: u32,
    exhausted: bool,
}

impl<K: Hash + Eq + Copy> VisitSet<K> {
    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self {
            active: FxHashSet::default(),
            steps: 0,
            max_depth: profile.max_depth(),
            max_steps: profile.max_steps(),
            exhausted: false,
        }
    }

    pub fn enter(&mut self, key: K) -> Visit {
        if self.active.contains(&key) {
            return Visit::Revisit;
        }
        self.steps = self.steps.saturating_add(1);
        if self.steps > self.max_steps || self.depth() >= self.max_depth {
            self.exhausted = true;
            return Visit::Exhausted;
        }
        self.active.insert(key);
        Visit::Fresh
    }

    pub fn leave(&mut self, key: K) {
        let removed = self.active.remove(&key);
        debug_assert!(removed, "VisitSet::leave without a matching enter");
    }

    pub fn contains(&self, key: &K) -> bool {
        self.active.contains(key)
    }

    pub fn depth(&self) -> u32 {
        u32::try_from(self.active.len()).unwrap_or(u32::MAX)
    }

    /// Sticky once any budget ran out.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Depth-only bound. The same template may legitimately be revisited with
/// another argument, so keys are not tracked.
#[derive(Debug)]
pub struct DepthCounter {
    depth: u32,
    limit: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(limit: u32) -> Self {
        Self {
            depth: 0,
            limit,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Step one level down. On `false` the level was not entered and the
    /// caller must not `leave`.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth < self.limit {
            self.depth += 1;
            true
        } else {
            self.exceeded = true;
            false
        }
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Sticky once the limit was hit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
