//! End-to-end DPLL(T) scenarios over each theory.

use lazuli_core::ast::{Sort, TermId, TermManager};
use lazuli_core::LazuliError;
use lazuli_sat::{Cnf, cdcl_solve, encode_cnf};
use lazuli_solver::{Solver, SolverConfig, SolverResult, TheoryKind, dpll_t_solve};
use proptest::prelude::*;

#[test]
fn test_congruence_makes_query_unsat() {
    // x = y and f(x) != f(y)
    let mut tm = TermManager::new();
    let u = tm.uninterpreted_sort("U");
    let x = tm.mk_var("x", u);
    let y = tm.mk_var("y", u);
    let fx = tm.mk_apply("f", [x], u);
    let fy = tm.mk_apply("f", [y], u);
    let xy = tm.mk_eq(x, y);
    let f_eq = tm.mk_eq(fx, fy);
    let f_neq = tm.mk_not(f_eq);
    let formula = tm.mk_and([xy, f_neq]);

    assert_eq!(dpll_t_solve(&mut tm, formula).unwrap(), SolverResult::Unsat);
}

#[test]
fn test_consistent_equalities_are_sat() {
    // x = y and f(x) = f(y)
    let mut tm = TermManager::new();
    let u = tm.uninterpreted_sort("U");
    let x = tm.mk_var("x", u);
    let y = tm.mk_var("y", u);
    let fx = tm.mk_apply("f", [x], u);
    let fy = tm.mk_apply("f", [y], u);
    let xy = tm.mk_eq(x, y);
    let f_eq = tm.mk_eq(fx, fy);
    let formula = tm.mk_and([xy, f_eq]);

    let outcome = Solver::new().solve(&mut tm, formula).unwrap();
    assert_eq!(outcome.result, SolverResult::Sat);
    let model = outcome.model.unwrap();
    assert!(model.same_class(x, y));
    assert!(model.literals().contains(&xy));
}

#[test]
fn test_bitvector_and_has_unique_value() {
    // a & b = c, a = #b1010, b = #b1100
    let mut tm = TermManager::new();
    let bv4 = Sort::BitVec(4);
    let [a, b, c] = ["a", "b", "c"].map(|n| tm.mk_var(n, bv4));
    let and = tm.mk_bv_and(a, b);
    let ka = tm.mk_bitvec(0b1010, 4);
    let kb = tm.mk_bitvec(0b1100, 4);
    let conjuncts = [tm.mk_eq(and, c), tm.mk_eq(a, ka), tm.mk_eq(b, kb)];
    let formula = tm.mk_and(conjuncts);

    let outcome = Solver::new().solve(&mut tm, formula).unwrap();
    assert_eq!(outcome.result, SolverResult::Sat);
    let model = outcome.model.unwrap();
    assert_eq!(model.bitvec_value(c), Some(0b1000));
    assert!(model.display(&tm).to_string().contains("c = #b1000"));
}

#[test]
fn test_contradiction_has_no_model() {
    let mut tm = TermManager::new();
    let p = tm.mk_var("p", Sort::Bool);
    let not_p = tm.mk_not(p);
    let formula = tm.mk_and([p, not_p]);

    let cnf = encode_cnf(&tm, formula).unwrap();
    assert_eq!(cdcl_solve(&cnf), None);
    assert_eq!(dpll_t_solve(&mut tm, formula).unwrap(), SolverResult::Unsat);
}

#[test]
fn test_bitvector_disjunction_refines() {
    // (x = 1 or x = 2) and x + x = 4 forces x = 2
    let mut tm = TermManager::new();
    let bv4 = Sort::BitVec(4);
    let x = tm.mk_var("x", bv4);
    let [k1, k2, k4] = [1, 2, 4].map(|v| tm.mk_bitvec(v, 4));
    let is1 = tm.mk_eq(x, k1);
    let is2 = tm.mk_eq(x, k2);
    let either = tm.mk_or([is1, is2]);
    let double = tm.mk_bv_add(x, x);
    let four = tm.mk_eq(double, k4);
    let formula = tm.mk_and([either, four]);

    let outcome = Solver::new().solve(&mut tm, formula).unwrap();
    assert_eq!(outcome.result, SolverResult::Sat);
    assert_eq!(outcome.model.unwrap().bitvec_value(x), Some(2));
}

#[test]
fn test_mixed_theories_rejected() {
    let mut tm = TermManager::new();
    let u = tm.uninterpreted_sort("U");
    let x = tm.mk_var("x", u);
    let fx = tm.mk_apply("f", [x], u);
    let a = tm.mk_var("a", Sort::BitVec(4));
    let k = tm.mk_bitvec(1, 4);
    let uf = tm.mk_eq(fx, x);
    let bv = tm.mk_eq(a, k);
    let formula = tm.mk_and([uf, bv]);

    assert!(matches!(
        dpll_t_solve(&mut tm, formula),
        Err(LazuliError::MixedTheories(_))
    ));
}

#[test]
fn test_forced_theory_reports_malformed_atoms() {
    let mut tm = TermManager::new();
    let u = tm.uninterpreted_sort("U");
    let x = tm.mk_var("x", u);
    let y = tm.mk_var("y", u);
    let formula = tm.mk_eq(x, y);

    let config = SolverConfig::default().with_theory(TheoryKind::BitVector);
    assert!(Solver::with_config(config).solve(&mut tm, formula).is_err());
}

#[test]
fn test_forced_propositional_rejects_theory_atoms() {
    // x = y and f(x) != f(y) is unsat, but only the theory can tell
    let mut tm = TermManager::new();
    let u = tm.uninterpreted_sort("U");
    let x = tm.mk_var("x", u);
    let y = tm.mk_var("y", u);
    let fx = tm.mk_apply("f", [x], u);
    let fy = tm.mk_apply("f", [y], u);
    let xy = tm.mk_eq(x, y);
    let f_eq = tm.mk_eq(fx, fy);
    let f_neq = tm.mk_not(f_eq);
    let formula = tm.mk_and([xy, f_neq]);

    let config = SolverConfig::default().with_theory(TheoryKind::Propositional);
    assert!(matches!(
        Solver::with_config(config).solve(&mut tm, formula),
        Err(LazuliError::MixedTheories(_))
    ));

    let p = tm.mk_var("p", Sort::Bool);
    let config = SolverConfig::default().with_theory(TheoryKind::Propositional);
    let outcome = Solver::with_config(config).solve(&mut tm, p).unwrap();
    assert_eq!(outcome.result, SolverResult::Sat);
}

#[test]
fn test_predicate_argument_is_flattened() {
    // f(p(x)) = y, f(p(z)) != y, x = z
    let mut tm = TermManager::new();
    let u = tm.uninterpreted_sort("U");
    let [x, y, z] = ["x", "y", "z"].map(|n| tm.mk_var(n, u));
    let px = tm.mk_apply("p", [x], Sort::Bool);
    let pz = tm.mk_apply("p", [z], Sort::Bool);
    let fpx = tm.mk_apply("f", [px], u);
    let fpz = tm.mk_apply("f", [pz], u);
    let first = tm.mk_eq(fpx, y);
    let second = tm.mk_eq(fpz, y);
    let not_second = tm.mk_not(second);
    let xz = tm.mk_eq(x, z);

    let outcome = Solver::new().solve(&mut tm, first).unwrap();
    assert_eq!(outcome.result, SolverResult::Sat);

    let formula = tm.mk_and([first, not_second, xz]);
    assert_eq!(dpll_t_solve(&mut tm, formula).unwrap(), SolverResult::Unsat);
}

#[test]
fn test_width_from_config() {
    let mut tm = TermManager::new();
    let x = tm.mk_var("x", Sort::BitVec(8));
    let k = tm.mk_bitvec(0xA5, 8);
    let formula = tm.mk_eq(x, k);

    assert!(dpll_t_solve(&mut tm, formula).is_err());
    let config = SolverConfig::default().with_bv_width(8);
    let outcome = Solver::with_config(config).solve(&mut tm, formula).unwrap();
    assert_eq!(outcome.model.unwrap().bitvec_value(x), Some(0xA5));
}

/// Equalities over a few variables and `f` applications, combined with
/// random connectives.
#[derive(Debug, Clone)]
enum Query {
    Eq(usize, usize, bool),
    Not(Box<Query>),
    And(Vec<Query>),
    Or(Vec<Query>),
}

fn arb_query() -> impl Strategy<Value = Query> {
    let leaf = (0usize..6, 0usize..6, any::<bool>()).prop_map(|(a, b, f)| Query::Eq(a, b, f));
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|q| Query::Not(Box::new(q))),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Query::And),
            prop::collection::vec(inner, 1..4).prop_map(Query::Or),
        ]
    })
}

fn build(q: &Query, tm: &mut TermManager, terms: &[TermId]) -> TermId {
    match q {
        Query::Eq(a, b, wrap) => {
            let u = tm.uninterpreted_sort("U");
            let lhs = terms[*a];
            let rhs = if *wrap {
                tm.mk_apply("f", [terms[*b]], u)
            } else {
                terms[*b]
            };
            tm.mk_eq(lhs, rhs)
        }
        Query::Not(inner) => {
            let inner = build(inner, tm, terms);
            tm.mk_not(inner)
        }
        Query::And(qs) => {
            let args: Vec<TermId> = qs.iter().map(|q| build(q, tm, terms)).collect();
            tm.mk_and(args)
        }
        Query::Or(qs) => {
            let args: Vec<TermId> = qs.iter().map(|q| build(q, tm, terms)).collect();
            tm.mk_or(args)
        }
    }
}

/// Truth value of `q` when each atom takes the polarity it has in `cube`.
fn eval(q: &Query, tm: &mut TermManager, terms: &[TermId], cube: &[TermId]) -> Option<bool> {
    match q {
        Query::Eq(..) => {
            let atom = build(q, tm, terms);
            let negated = tm.mk_not(atom);
            if cube.contains(&atom) {
                Some(true)
            } else if cube.contains(&negated) {
                Some(false)
            } else {
                None
            }
        }
        Query::Not(inner) => eval(inner, tm, terms, cube).map(|v| !v),
        Query::And(qs) => qs.iter().try_fold(true, |acc, q| {
            eval(q, tm, terms, cube).map(|v| acc && v)
        }),
        Query::Or(qs) => qs.iter().try_fold(false, |acc, q| {
            eval(q, tm, terms, cube).map(|v| acc || v)
        }),
    }
}

fn query_terms(tm: &mut TermManager) -> Vec<TermId> {
    let u = tm.uninterpreted_sort("U");
    let mut terms: Vec<TermId> = ["x", "y", "z"].iter().map(|n| tm.mk_var(n, u)).collect();
    for i in 0..3 {
        let fx = tm.mk_apply("f", [terms[i]], u);
        terms.push(fx);
    }
    terms
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_rejected_models_never_repeat(q in arb_query()) {
        let mut tm = TermManager::new();
        let terms = query_terms(&mut tm);
        let formula = build(&q, &mut tm, &terms);
        let mut solver = Solver::new();
        let outcome = solver.solve(&mut tm, formula).unwrap();
        prop_assert_ne!(outcome.result, SolverResult::Unknown);

        let rejected = solver.rejected_models();
        for pair in rejected.windows(2) {
            prop_assert_ne!(&pair[0], &pair[1]);
        }
        let mut sorted: Vec<_> = rejected.to_vec();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), rejected.len());
    }

    #[test]
    fn prop_sat_models_satisfy_skeleton(q in arb_query()) {
        let mut tm = TermManager::new();
        let terms = query_terms(&mut tm);
        let formula = build(&q, &mut tm, &terms);
        let outcome = Solver::new().solve(&mut tm, formula).unwrap();
        if let Some(model) = outcome.model {
            let cube = model.literals().to_vec();
            prop_assert_eq!(eval(&q, &mut tm, &terms, &cube), Some(true));
            // the accepted literals are consistent on their own
            if !cube.is_empty() {
                let flat = lazuli_theories::flatten(&mut tm, &cube).unwrap();
                prop_assert!(lazuli_theories::uf_theory_check(&tm, &flat).unwrap());
            }
        }
    }

    #[test]
    fn prop_propositional_agrees_with_cdcl(clauses in prop::collection::vec(
        prop::collection::vec((1i32..6, any::<bool>()), 1..4), 1..12)
    ) {
        let mut tm = TermManager::new();
        let vars: Vec<TermId> = (0..6).map(|i| tm.mk_var(&format!("p{i}"), Sort::Bool)).collect();
        let mut cnf = Cnf::new();
        let mut conjuncts = Vec::new();
        for clause in &clauses {
            let dimacs: Vec<i32> = clause.iter().map(|&(v, neg)| if neg { -v } else { v }).collect();
            cnf.add_clause_dimacs(&dimacs);
            let lits: Vec<TermId> = clause
                .iter()
                .map(|&(v, neg)| {
                    let p = vars[v as usize];
                    if neg { tm.mk_not(p) } else { p }
                })
                .collect();
            conjuncts.push(tm.mk_or(lits));
        }
        let formula = tm.mk_and(conjuncts);
        let expected = if cdcl_solve(&cnf).is_some() { SolverResult::Sat } else { SolverResult::Unsat };
        prop_assert_eq!(dpll_t_solve(&mut tm, formula).unwrap(), expected);
    }
}
