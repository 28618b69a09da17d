//! Interned symbol names.
//!
//! Names live in a sharded pool and travel as [`Atom`] handles, so
//! comparing two names is an integer comparison. The pool is shared by
//! reference between threads that instantiate independent declarations.

use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::Serialize;
use std::hash::BuildHasher;
use std::sync::{Arc, RwLock};

/// Handle to an interned name. The low bits select the shard, the rest is
/// the slot within it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty name.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    fn pack(shard: usize, slot: usize) -> Option<Atom> {
        let slot = u32::try_from(slot).ok().filter(|&s| s <= u32::MAX >> SHARD_BITS)?;
        Some(Atom((slot << SHARD_BITS) | shard as u32))
    }

    fn unpack(self) -> (usize, usize) {
        ((self.0 & SHARD_MASK) as usize, (self.0 >> SHARD_BITS) as usize)
    }
}

const SHARD_BITS: u32 = 6;
const SHARD_MASK: u32 = (1 << SHARD_BITS) - 1;

/// Universe-scope identifiers, interned up front by `intern_predeclared`.
const PREDECLARED: [&str; 25] = [
    "any", "bool", "byte", "complex128", "complex64", "error", "false", "float32", "float64",
    "int", "int16", "int32", "int64", "int8", "iota", "nil", "rune", "string", "true", "uint",
    "uint16", "uint32", "uint64", "uint8", "uintptr",
];

#[derive(Default)]
struct Shard {
    slots: Vec<Arc<str>>,
    lookup: FxHashMap<Arc<str>, Atom>,
}

/// Concurrent name pool. Slot 0 of shard 0 holds the empty name, so no
/// real name ever packs to [`Atom::NONE`].
pub struct ShardedInterner {
    shards: Box<[RwLock<Shard>]>,
    hasher: FxBuildHasher,
}

impl ShardedInterner {
    pub fn new() -> Self {
        let mut shards: Vec<RwLock<Shard>> =
            (0..=SHARD_MASK).map(|_| RwLock::new(Shard::default())).collect();
        if let Some(first) = shards.first_mut().and_then(|s| s.get_mut().ok()) {
            let empty: Arc<str> = Arc::from("");
            first.slots.push(Arc::clone(&empty));
            first.lookup.insert(empty, Atom::NONE);
        }
        Self {
            shards: shards.into_boxed_slice(),
            hasher: FxBuildHasher,
        }
    }

    /// Intern `name`. A poisoned shard or an exhausted slot range yields
    /// [`Atom::NONE`].
    pub fn intern(&self, name: &str) -> Atom {
        if name.is_empty() {
            return Atom::NONE;
        }
        let index = (self.hasher.hash_one(name) & u64::from(SHARD_MASK)) as usize;
        if let Some(atom) = self.shards[index]
            .read()
            .ok()
            .and_then(|shard| shard.lookup.get(name).copied())
        {
            return atom;
        }

        let Ok(mut shard) = self.shards[index].write() else {
            return Atom::NONE;
        };
        // Another thread may have won the race between the two locks.
        if let Some(&atom) = shard.lookup.get(name) {
            return atom;
        }
        let Some(atom) = Atom::pack(index, shard.slots.len()) else {
            return Atom::NONE;
        };
        let owned: Arc<str> = Arc::from(name);
        shard.slots.push(Arc::clone(&owned));
        shard.lookup.insert(owned, atom);
        atom
    }

    /// The name behind `atom`, or the empty name for a foreign handle.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let (index, slot) = atom.unpack();
        let shard = self.shards.get(index)?.read().ok()?;
        shard.slots.get(slot).cloned()
    }

    /// Number of interned names, the empty name included.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .filter_map(|shard| shard.read().ok().map(|s| s.slots.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    pub fn intern_predeclared(&self) {
        for name in PREDECLARED {
            self.intern(name);
        }
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
