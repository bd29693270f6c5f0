//! Error types for malformed solver input.
//!
//! Satisfiability outcomes are never errors. Everything here signals a
//! contract violation by the caller: an operator the receiving layer does not
//! handle, ill-sorted terms, or a cube in the wrong shape.

use thiserror::Error;

/// Errors raised by the lazuli layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LazuliError {
    /// An operator reached a layer that cannot encode it.
    #[error("unsupported operator `{op}` in {context}")]
    Unsupported {
        /// Operator name as rendered in the term display.
        op: String,
        /// Layer that rejected it.
        context: &'static str,
    },

    /// A term of the wrong sort.
    #[error("sort mismatch: expected {expected}, found {found}")]
    SortMismatch {
        /// Expected sort.
        expected: String,
        /// Actual sort.
        found: String,
    },

    /// A bit-vector term whose width differs from the blaster's width.
    #[error("bit-vector width mismatch: expected {expected}, found {found}")]
    WidthMismatch {
        /// Fixed width of the bit-blaster.
        expected: u32,
        /// Width of the offending term.
        found: u32,
    },

    /// A bit-vector constant that does not fit its width.
    #[error("constant {value} does not fit in {width} bits")]
    ConstantOverflow {
        /// Constant value.
        value: u64,
        /// Declared width.
        width: u32,
    },

    /// A literal handed to congruence closure that is not flat.
    #[error("literal is not flat: {0}")]
    NotFlat(String),

    /// A cube entry that is neither an atom nor a negated atom.
    #[error("not a cube literal: {0}")]
    NotALiteral(String),

    /// A term id that the manager never produced.
    #[error("unknown term id {0}")]
    UnknownTerm(u32),

    /// A query combining theories that no single solver decides.
    #[error("formula mixes theories: {0}")]
    MixedTheories(String),
}

impl LazuliError {
    /// Create an unsupported-operator error.
    pub fn unsupported(op: impl Into<String>, context: &'static str) -> Self {
        Self::Unsupported {
            op: op.into(),
            context,
        }
    }

    /// Create a sort mismatch error.
    pub fn sort_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::SortMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result type for lazuli operations.
pub type Result<T> = std::result::Result<T, LazuliError>;
