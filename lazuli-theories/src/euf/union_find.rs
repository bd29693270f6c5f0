//! Union-find over terms, with path halving and union by rank.

use lazuli_core::TermId;
use rustc_hash::FxHashMap;

/// Disjoint sets of terms.
///
/// Terms never registered with [`make_set`](Self::make_set) behave as
/// singletons.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    parent: FxHashMap<TermId, TermId>,
    rank: FxHashMap<TermId, u32>,
    classes: usize,
}

impl UnionFind {
    /// Create an empty partition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `x` as a singleton class. No-op if already present.
    pub fn make_set(&mut self, x: TermId) {
        if !self.parent.contains_key(&x) {
            self.parent.insert(x, x);
            self.rank.insert(x, 0);
            self.classes += 1;
        }
    }

    /// Whether `x` was registered.
    #[must_use]
    pub fn contains(&self, x: TermId) -> bool {
        self.parent.contains_key(&x)
    }

    /// Representative of the class of `x`, halving the path on the way.
    pub fn find(&mut self, x: TermId) -> TermId {
        let mut current = x;
        loop {
            let Some(&parent) = self.parent.get(&current) else {
                return current;
            };
            if parent == current {
                return current;
            }
            let grandparent = self.parent.get(&parent).copied().unwrap_or(parent);
            self.parent.insert(current, grandparent);
            current = grandparent;
        }
    }

    /// Merge the classes of `x` and `y`. Returns `true` if they were distinct.
    pub fn union(&mut self, x: TermId, y: TermId) -> bool {
        self.make_set(x);
        self.make_set(y);
        let x_root = self.find(x);
        let y_root = self.find(y);
        if x_root == y_root {
            return false;
        }

        let x_rank = self.rank.get(&x_root).copied().unwrap_or(0);
        let y_rank = self.rank.get(&y_root).copied().unwrap_or(0);
        if x_rank < y_rank {
            self.parent.insert(x_root, y_root);
        } else if x_rank > y_rank {
            self.parent.insert(y_root, x_root);
        } else {
            self.parent.insert(y_root, x_root);
            self.rank.insert(x_root, x_rank + 1);
        }
        self.classes -= 1;
        true
    }

    /// Whether `x` and `y` are in the same class.
    pub fn same(&mut self, x: TermId, y: TermId) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of classes among registered terms.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.classes
    }

    /// Registered terms, in no particular order.
    pub fn elements(&self) -> impl Iterator<Item = TermId> + '_ {
        self.parent.keys().copied()
    }
}
