//! Property-based tests for AST operations
//!
//! - Structurally equal terms share one id
//! - Fresh variables never collide with user names
//! - Bit-vector constants render with their full width

use lazuli_core::ast::{Sort, TermId, TermKind, TermManager};
use proptest::prelude::*;

/// Strategy for generating variable names, including ones that look fresh
fn var_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z][0-9]?", "[a-z]![0-9]"]
}

proptest! {
    /// Creating the same bit-vector constant twice yields the same TermId
    #[test]
    fn bitvec_constant_uniqueness(value in 0u64..16) {
        let mut tm = TermManager::new();
        let t1 = tm.mk_bitvec(value, 4);
        let t2 = tm.mk_bitvec(value, 4);
        prop_assert_eq!(t1, t2);
        prop_assert_eq!(tm.sort(t1), Some(Sort::BitVec(4)));
    }

    /// Creating the same boolean constant yields the same TermId
    #[test]
    fn boolean_constant_uniqueness(b in proptest::bool::ANY) {
        let tm = TermManager::new();
        prop_assert_eq!(tm.mk_bool(b), tm.mk_bool(b));
        prop_assert_ne!(tm.mk_bool(b), tm.mk_bool(!b));
    }

    /// Applications are interned by symbol and arguments
    #[test]
    fn application_uniqueness(names in prop::collection::vec(var_name_strategy(), 1..4)) {
        let mut tm = TermManager::new();
        let u = tm.uninterpreted_sort("U");
        let args: Vec<TermId> = names.iter().map(|n| tm.mk_var(n, u)).collect();
        let f1 = tm.mk_apply("f", args.clone(), u);
        let f2 = tm.mk_apply("f", args.clone(), u);
        let g = tm.mk_apply("g", args, u);
        prop_assert_eq!(f1, f2);
        prop_assert_ne!(f1, g);
    }

    /// Fresh variables are distinct from every variable made before them
    #[test]
    fn fresh_vars_do_not_clash(names in prop::collection::vec(var_name_strategy(), 0..8)) {
        let mut tm = TermManager::new();
        let user: Vec<TermId> = names.iter().map(|n| tm.mk_var(n, Sort::Bool)).collect();
        for _ in 0..4 {
            let fresh = tm.mk_fresh_var("a", Sort::Bool);
            prop_assert!(!user.contains(&fresh));
            prop_assert!(matches!(tm.get(fresh).map(|t| &t.kind), Some(TermKind::Var(_))));
        }
    }

    /// Constants render as binary literals padded to their width
    #[test]
    fn bitvec_display_width(value in 0u64..256, width in 8u32..12) {
        let mut tm = TermManager::new();
        let k = tm.mk_bitvec(value, width);
        let shown = tm.display(k).to_string();
        prop_assert!(shown.starts_with("#b"));
        prop_assert_eq!(shown.len(), 2 + width as usize);
        prop_assert_eq!(u64::from_str_radix(&shown[2..], 2).unwrap(), value);
    }
}
