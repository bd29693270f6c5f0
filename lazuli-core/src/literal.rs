//! Boolean variables and literals.
//!
//! Shared by the CNF encoder, the CDCL engine and the theory solvers so that
//! a literal produced by one layer can be handed to the next unchanged.

use std::fmt;
use std::ops::Not;

/// A Boolean variable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl Var {
    /// Create a variable from its zero-based index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Zero-based index, usable for indexing per-variable tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A literal (signed Boolean variable).
///
/// Packed as `var << 1 | sign`, so a literal and its complement are adjacent
/// and `index()` can address per-literal tables directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(u32);

impl Lit {
    /// Create a positive literal from a variable.
    #[must_use]
    pub const fn pos(var: Var) -> Self {
        Self(var.0 << 1)
    }

    /// Create a negative literal from a variable.
    #[must_use]
    pub const fn neg(var: Var) -> Self {
        Self((var.0 << 1) | 1)
    }

    /// Create a literal with the given sign.
    #[must_use]
    pub const fn new(var: Var, negative: bool) -> Self {
        Self((var.0 << 1) | negative as u32)
    }

    /// Get the variable of this literal.
    #[must_use]
    pub const fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    /// Check if this literal is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        (self.0 & 1) == 0
    }

    /// Check if this literal is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Get the negation of this literal.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Index into per-literal tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Convert a non-zero DIMACS integer (1-based, sign = polarity).
    ///
    /// Returns `None` for 0, which DIMACS reserves as the clause terminator.
    #[must_use]
    pub fn from_dimacs(lit: i32) -> Option<Self> {
        if lit == 0 {
            return None;
        }
        let var = Var::new(lit.unsigned_abs() - 1);
        Some(Self::new(var, lit < 0))
    }

    /// Convert to a DIMACS integer.
    #[must_use]
    pub fn to_dimacs(self) -> i32 {
        let v = (self.var().raw() + 1) as i32;
        if self.is_negative() { -v } else { v }
    }

    /// Whether `other` is the complement of this literal.
    #[must_use]
    pub const fn is_complement_of(self, other: Self) -> bool {
        self.0 ^ 1 == other.0
    }
}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self {
        self.negate()
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.var().raw())
        } else {
            write!(f, "-{}", self.var().raw())
        }
    }
}
