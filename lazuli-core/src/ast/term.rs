//! Term nodes and sorts.

use lasso::Spur;
use smallvec::SmallVec;
use std::fmt;

/// Interned name of a variable, function or sort.
pub type Symbol = Spur;

/// Argument list of an n-ary node.
pub type TermArgs = SmallVec<[TermId; 4]>;

/// Index of a node in the [`TermManager`](super::TermManager) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u32);

impl TermId {
    /// Create a term id from a raw arena index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Sort of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Booleans.
    Bool,
    /// Fixed-width bit-vectors.
    BitVec(u32),
    /// An uninterpreted domain, identified by name.
    Uninterpreted(Symbol),
}

impl Sort {
    /// Check if this is the Boolean sort.
    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Check if this is a bit-vector sort.
    #[must_use]
    pub const fn is_bitvec(self) -> bool {
        matches!(self, Self::BitVec(_))
    }

    /// Check if this is an uninterpreted sort.
    #[must_use]
    pub const fn is_uninterpreted(self) -> bool {
        matches!(self, Self::Uninterpreted(_))
    }

    /// Width of a bit-vector sort.
    #[must_use]
    pub const fn bitvec_width(self) -> Option<u32> {
        match self {
            Self::BitVec(w) => Some(w),
            _ => None,
        }
    }
}

/// The kind of a term node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Boolean true.
    True,
    /// Boolean false.
    False,
    /// A named variable of any sort.
    Var(Symbol),
    /// Logical negation.
    Not(TermId),
    /// N-ary conjunction.
    And(TermArgs),
    /// N-ary disjunction.
    Or(TermArgs),
    /// Implication.
    Implies(TermId, TermId),
    /// Equivalence of two Boolean terms.
    Iff(TermId, TermId),
    /// Bit-vector literal.
    BitVecConst {
        /// Value, least-significant bit first.
        value: u64,
        /// Width in bits.
        width: u32,
    },
    /// Bitwise and.
    BvAnd(TermId, TermId),
    /// Bitwise or.
    BvOr(TermId, TermId),
    /// Modular addition.
    BvAdd(TermId, TermId),
    /// Equality atom.
    Eq(TermId, TermId),
    /// Application of an uninterpreted function or predicate.
    Apply {
        /// Function symbol.
        func: Symbol,
        /// Arguments.
        args: TermArgs,
    },
}

impl TermKind {
    /// Operator name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Var(_) => "var",
            Self::Not(_) => "not",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Implies(..) => "=>",
            Self::Iff(..) => "iff",
            Self::BitVecConst { .. } => "bv-const",
            Self::BvAnd(..) => "bvand",
            Self::BvOr(..) => "bvor",
            Self::BvAdd(..) => "bvadd",
            Self::Eq(..) => "=",
            Self::Apply { .. } => "apply",
        }
    }

    /// Direct children in argument order.
    #[must_use]
    pub fn children(&self) -> TermArgs {
        match self {
            Self::True | Self::False | Self::Var(_) | Self::BitVecConst { .. } => TermArgs::new(),
            Self::Not(a) => smallvec::smallvec![*a],
            Self::And(args) | Self::Or(args) | Self::Apply { args, .. } => args.clone(),
            Self::Implies(a, b)
            | Self::Iff(a, b)
            | Self::BvAnd(a, b)
            | Self::BvOr(a, b)
            | Self::BvAdd(a, b)
            | Self::Eq(a, b) => smallvec::smallvec![*a, *b],
        }
    }
}

/// A node in the term arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    /// Node kind.
    pub kind: TermKind,
    /// Sort of the node.
    pub sort: Sort,
}
