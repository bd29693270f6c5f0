//! Property-based tests for variables and literals

use lazuli_core::{Lit, Var};
use proptest::prelude::*;

proptest! {
    /// Negation is an involution and flips polarity only
    #[test]
    fn negation_involution(index in 0u32..10_000, negative in proptest::bool::ANY) {
        let lit = Lit::new(Var::new(index), negative);
        prop_assert_eq!(!!lit, lit);
        prop_assert_eq!((!lit).var(), lit.var());
        prop_assert_ne!((!lit).is_negative(), lit.is_negative());
        prop_assert!(lit.is_complement_of(!lit));
    }

    /// DIMACS conversion preserves variable and sign
    #[test]
    fn dimacs_conversion(d in prop_oneof![1i32..5000, -5000i32..0]) {
        let lit = Lit::from_dimacs(d).unwrap();
        prop_assert_eq!(lit.to_dimacs(), d);
        prop_assert_eq!(lit.is_negative(), d < 0);
        prop_assert_eq!(Lit::from_raw(lit.raw()), lit);
    }

    /// Complementary literals have adjacent indices
    #[test]
    fn literal_index_layout(index in 0u32..10_000) {
        let v = Var::new(index);
        prop_assert_eq!(Lit::pos(v).index() / 2, v.index());
        prop_assert_eq!(Lit::neg(v).index() / 2, v.index());
        prop_assert_ne!(Lit::pos(v).index(), Lit::neg(v).index());
    }
}
