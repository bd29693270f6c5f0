//! Clause database holding original and learned clauses.

use crate::cnf::ClauseLits;
use lazuli_core::Lit;
use rustc_hash::FxHashSet;

/// Handle to a clause in the database. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseRef(u32);

impl ClauseRef {
    /// Position in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A stored clause.
#[derive(Debug, Clone)]
pub struct Clause {
    /// Literals. Positions 0 and 1 are the watched literals when len >= 2.
    pub lits: ClauseLits,
    /// Learned clauses may be forgotten; original clauses never are.
    pub learned: bool,
    /// Bumped whenever the clause takes part in conflict analysis.
    pub activity: u64,
}

impl Clause {
    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Whether the clause has no literals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }
}

/// Ordered clause storage.
///
/// Slots of removed clauses stay empty so that watchers holding an old
/// [`ClauseRef`] notice the removal instead of reading a different clause.
#[derive(Debug, Default)]
pub struct ClauseDb {
    slots: Vec<Option<Clause>>,
    present: FxHashSet<ClauseLits>,
    num_original: usize,
    num_learned: usize,
}

impl ClauseDb {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a clause with exactly these literals is stored.
    #[must_use]
    pub fn contains(&self, lits: &[Lit]) -> bool {
        self.present.contains(&sorted(lits))
    }

    /// Store a clause. Literal order is kept, since it carries the watches.
    pub fn insert(&mut self, lits: ClauseLits, learned: bool) -> ClauseRef {
        let cref = ClauseRef(self.slots.len() as u32);
        self.present.insert(sorted(&lits));
        if learned {
            self.num_learned += 1;
        } else {
            self.num_original += 1;
        }
        self.slots.push(Some(Clause {
            lits,
            learned,
            activity: 0,
        }));
        cref
    }

    /// Remove a learned clause. Original clauses are kept.
    pub fn remove(&mut self, cref: ClauseRef) -> bool {
        let Some(slot) = self.slots.get_mut(cref.index()) else {
            return false;
        };
        if !matches!(slot, Some(c) if c.learned) {
            return false;
        }
        if let Some(clause) = slot.take() {
            self.present.remove(&sorted(&clause.lits));
        }
        self.num_learned -= 1;
        true
    }

    /// Look up a live clause.
    #[must_use]
    pub fn get(&self, cref: ClauseRef) -> Option<&Clause> {
        self.slots.get(cref.index()).and_then(Option::as_ref)
    }

    /// Look up a live clause mutably.
    pub fn get_mut(&mut self, cref: ClauseRef) -> Option<&mut Clause> {
        self.slots.get_mut(cref.index()).and_then(Option::as_mut)
    }

    /// Whether the clause was removed.
    #[must_use]
    pub fn is_removed(&self, cref: ClauseRef) -> bool {
        self.get(cref).is_none()
    }

    /// Live clauses in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ClauseRef, &Clause)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (ClauseRef(i as u32), c)))
    }

    /// Handles of live learned clauses.
    pub fn learned(&self) -> impl Iterator<Item = ClauseRef> + '_ {
        self.iter().filter(|(_, c)| c.learned).map(|(r, _)| r)
    }

    /// Number of original clauses.
    #[must_use]
    pub fn num_original(&self) -> usize {
        self.num_original
    }

    /// Number of live learned clauses.
    #[must_use]
    pub fn num_learned(&self) -> usize {
        self.num_learned
    }
}

fn sorted(lits: &[Lit]) -> ClauseLits {
    let mut key: ClauseLits = lits.iter().copied().collect();
    key.sort_unstable();
    key
}
