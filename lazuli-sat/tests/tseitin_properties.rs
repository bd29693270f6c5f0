//! Property-based tests for the Tseitin encoder
//!
//! The clause set must be satisfiable exactly when the formula is, and any
//! model of the clauses must satisfy the formula on its own variables.

use lazuli_core::ast::{Sort, TermId, TermManager};
use lazuli_sat::{TseitinEncoder, cdcl_solve};
use proptest::prelude::*;

const NUM_VARS: usize = 5;

#[derive(Debug, Clone)]
enum Formula {
    Var(usize),
    Const(bool),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
}

impl Formula {
    fn eval(&self, assignment: &[bool]) -> bool {
        match self {
            Self::Var(i) => assignment[*i],
            Self::Const(b) => *b,
            Self::Not(f) => !f.eval(assignment),
            Self::And(fs) => fs.iter().all(|f| f.eval(assignment)),
            Self::Or(fs) => fs.iter().any(|f| f.eval(assignment)),
            Self::Implies(a, b) => !a.eval(assignment) || b.eval(assignment),
            Self::Iff(a, b) => a.eval(assignment) == b.eval(assignment),
        }
    }

    fn build(&self, tm: &mut TermManager, vars: &[TermId]) -> TermId {
        match self {
            Self::Var(i) => vars[*i],
            Self::Const(b) => tm.mk_bool(*b),
            Self::Not(f) => {
                let f = f.build(tm, vars);
                tm.mk_not(f)
            }
            Self::And(fs) => {
                let args: Vec<TermId> = fs.iter().map(|f| f.build(tm, vars)).collect();
                tm.mk_and(args)
            }
            Self::Or(fs) => {
                let args: Vec<TermId> = fs.iter().map(|f| f.build(tm, vars)).collect();
                tm.mk_or(args)
            }
            Self::Implies(a, b) => {
                let (a, b) = (a.build(tm, vars), b.build(tm, vars));
                tm.mk_implies(a, b)
            }
            Self::Iff(a, b) => {
                let (a, b) = (a.build(tm, vars), b.build(tm, vars));
                tm.mk_iff(a, b)
            }
        }
    }
}

fn arb_formula() -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![
        4 => (0..NUM_VARS).prop_map(Formula::Var),
        1 => any::<bool>().prop_map(Formula::Const),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|f| Formula::Not(Box::new(f))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Formula::And),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Formula::Or),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Formula::Implies(Box::new(a), Box::new(b))),
            (inner.clone(), inner).prop_map(|(a, b)| Formula::Iff(Box::new(a), Box::new(b))),
        ]
    })
}

fn truth_table_sat(f: &Formula) -> bool {
    (0u32..(1 << NUM_VARS)).any(|bits| {
        let assignment: Vec<bool> = (0..NUM_VARS).map(|i| bits >> i & 1 == 1).collect();
        f.eval(&assignment)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn encoding_is_equisatisfiable(f in arb_formula()) {
        let mut tm = TermManager::new();
        let vars: Vec<TermId> = (0..NUM_VARS)
            .map(|i| tm.mk_var(&format!("p{i}"), Sort::Bool))
            .collect();
        let root = f.build(&mut tm, &vars);

        let mut encoder = TseitinEncoder::new();
        encoder.encode(&tm, root).unwrap();
        let model = cdcl_solve(encoder.cnf());

        prop_assert_eq!(model.is_some(), truth_table_sat(&f));
        if let Some(model) = model {
            let projected: Vec<bool> = vars
                .iter()
                .map(|&v| {
                    encoder
                        .var_of(v)
                        .is_some_and(|sat_var| model[sat_var.index()].is_positive())
                })
                .collect();
            prop_assert!(f.eval(&projected));
        }
    }
}
