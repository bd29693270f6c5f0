//! Tseitin transformation from propositional terms to CNF.
//!
//! Every distinct sub-formula gets one proxy variable and the clauses that pin
//! the proxy to the operator applied to its operands' proxies. Hash-consing in
//! the term arena plus the memo table here means each node is visited once,
//! however often it is shared.

use crate::cnf::Cnf;
use lazuli_core::ast::{TermId, TermKind, TermManager};
use lazuli_core::error::{LazuliError, Result};
use lazuli_core::{Lit, Var};
use rustc_hash::FxHashMap;

/// Incremental Tseitin encoder.
///
/// Several roots may be encoded into the same clause set; shared sub-formulas
/// keep their proxies across calls.
#[derive(Debug, Default)]
pub struct TseitinEncoder {
    cnf: Cnf,
    proxies: FxHashMap<TermId, Var>,
    vars: FxHashMap<TermId, Var>,
}

impl TseitinEncoder {
    /// Create an encoder with an empty clause set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `root` and assert its proxy as a unit clause.
    pub fn encode(&mut self, tm: &TermManager, root: TermId) -> Result<Lit> {
        let lit = self.define(tm, root)?;
        self.cnf.add_clause([lit]);
        Ok(lit)
    }

    /// Encode `term` without asserting it, returning its proxy literal.
    pub fn define(&mut self, tm: &TermManager, term: TermId) -> Result<Lit> {
        if let Some(&proxy) = self.proxies.get(&term) {
            return Ok(Lit::pos(proxy));
        }
        let t = tm.term(term)?;
        if !t.sort.is_bool() {
            return Err(LazuliError::sort_mismatch("Bool", tm.sort_name(t.sort)));
        }

        let proxy = self.cnf.new_var();
        self.proxies.insert(term, proxy);
        let p = Lit::pos(proxy);

        match &t.kind {
            TermKind::True => {
                self.cnf.add_clause([p]);
            }
            TermKind::False => {
                self.cnf.add_clause([!p]);
            }
            TermKind::Var(_) => {
                let v = Lit::pos(self.var_for(term));
                // p <=> v
                self.cnf.add_clause([!p, v]);
                self.cnf.add_clause([!v, p]);
            }
            TermKind::Not(arg) => {
                let d = self.define(tm, *arg)?;
                // p <=> ~d
                self.cnf.add_clause([!p, !d]);
                self.cnf.add_clause([p, d]);
            }
            TermKind::And(args) => {
                let mut lits = Vec::with_capacity(args.len());
                for &arg in args {
                    lits.push(self.define(tm, arg)?);
                }
                // p => each arg
                for &c in &lits {
                    self.cnf.add_clause([!p, c]);
                }
                // all args => p
                self.cnf
                    .add_clause(lits.iter().map(|&c| !c).chain(std::iter::once(p)));
            }
            TermKind::Or(args) => {
                let mut lits = Vec::with_capacity(args.len());
                for &arg in args {
                    lits.push(self.define(tm, arg)?);
                }
                // each arg => p
                for &c in &lits {
                    self.cnf.add_clause([!c, p]);
                }
                // p => some arg
                self.cnf
                    .add_clause(std::iter::once(!p).chain(lits.iter().copied()));
            }
            TermKind::Implies(lhs, rhs) => {
                let a = self.define(tm, *lhs)?;
                let b = self.define(tm, *rhs)?;
                // p => ~a or b
                self.cnf.add_clause([!p, !a, b]);
                // (~a or b) => p
                self.cnf.add_clause([p, a]);
                self.cnf.add_clause([p, !b]);
            }
            TermKind::Iff(lhs, rhs) => {
                let (lhs, rhs) = (*lhs, *rhs);
                self.encode_iff(tm, p, lhs, rhs)?;
            }
            TermKind::Eq(lhs, rhs)
                if tm.sort(*lhs).is_some_and(|s| s.is_bool())
                    && tm.sort(*rhs).is_some_and(|s| s.is_bool()) =>
            {
                let (lhs, rhs) = (*lhs, *rhs);
                self.encode_iff(tm, p, lhs, rhs)?;
            }
            kind => {
                return Err(LazuliError::unsupported(kind.name(), "Tseitin encoder"));
            }
        }
        Ok(p)
    }

    fn encode_iff(&mut self, tm: &TermManager, p: Lit, lhs: TermId, rhs: TermId) -> Result<()> {
        let a = self.define(tm, lhs)?;
        let b = self.define(tm, rhs)?;
        // p => (a <=> b)
        self.cnf.add_clause([!p, a, !b]);
        self.cnf.add_clause([!p, !a, b]);
        // (a <=> b) => p
        self.cnf.add_clause([p, !a, !b]);
        self.cnf.add_clause([p, a, b]);
        Ok(())
    }

    fn var_for(&mut self, term: TermId) -> Var {
        if let Some(&v) = self.vars.get(&term) {
            return v;
        }
        let v = self.cnf.new_var();
        self.vars.insert(term, v);
        v
    }

    /// SAT variable standing for a Boolean variable of the formula.
    #[must_use]
    pub fn var_of(&self, term: TermId) -> Option<Var> {
        self.vars.get(&term).copied()
    }

    /// Proxy variable of an encoded sub-formula.
    #[must_use]
    pub fn proxy_of(&self, term: TermId) -> Option<Var> {
        self.proxies.get(&term).copied()
    }

    /// Boolean variables of the encoded formulas with their SAT variables.
    pub fn variables(&self) -> impl Iterator<Item = (TermId, Var)> + '_ {
        self.vars.iter().map(|(&t, &v)| (t, v))
    }

    /// Clause set built so far.
    #[must_use]
    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Take the clause set.
    #[must_use]
    pub fn into_cnf(self) -> Cnf {
        self.cnf
    }
}

/// Encode a propositional formula into an equisatisfiable clause set.
pub fn encode_cnf(tm: &TermManager, formula: TermId) -> Result<Cnf> {
    let mut encoder = TseitinEncoder::new();
    encoder.encode(tm, formula)?;
    Ok(encoder.into_cnf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazuli_core::ast::Sort;

    fn brute_force_sat(cnf: &Cnf) -> bool {
        let n = cnf.num_vars() as usize;
        (0u64..(1 << n)).any(|bits| {
            let assignment: Vec<bool> = (0..n).map(|i| bits >> i & 1 == 1).collect();
            cnf.evaluate(&assignment)
        })
    }

    #[test]
    fn test_variable_gets_proxy_and_var() {
        let mut tm = TermManager::new();
        let p = tm.mk_var("p", Sort::Bool);
        let mut enc = TseitinEncoder::new();
        let lit = enc.encode(&tm, p).unwrap();

        let v = enc.var_of(p).unwrap();
        assert_ne!(lit.var(), v);
        // two equivalence clauses plus the root unit
        assert_eq!(enc.cnf().len(), 3);
    }

    #[test]
    fn test_shared_subformula_encoded_once() {
        let mut tm = TermManager::new();
        let p = tm.mk_var("p", Sort::Bool);
        let q = tm.mk_var("q", Sort::Bool);
        let pq = tm.mk_and([p, q]);
        let f = tm.mk_or([pq, pq]);
        let mut enc = TseitinEncoder::new();
        enc.encode(&tm, f).unwrap();
        // or, and, p, q proxies plus p and q themselves
        assert_eq!(enc.cnf().num_vars(), 6);
    }

    #[test]
    fn test_contradiction_is_unsat() {
        let mut tm = TermManager::new();
        let p = tm.mk_var("p", Sort::Bool);
        let np = tm.mk_not(p);
        let f = tm.mk_and([p, np]);
        let cnf = encode_cnf(&tm, f).unwrap();
        assert!(!brute_force_sat(&cnf));
    }

    #[test]
    fn test_implies_and_iff() {
        let mut tm = TermManager::new();
        let p = tm.mk_var("p", Sort::Bool);
        let q = tm.mk_var("q", Sort::Bool);
        let imp = tm.mk_implies(p, q);
        let nq = tm.mk_not(q);
        let f = tm.mk_and([imp, p, nq]);
        assert!(!brute_force_sat(&encode_cnf(&tm, f).unwrap()));

        let iff = tm.mk_iff(p, q);
        let np = tm.mk_not(p);
        let g = tm.mk_and([iff, np, q]);
        assert!(!brute_force_sat(&encode_cnf(&tm, g).unwrap()));

        let h = tm.mk_and([iff, np]);
        assert!(brute_force_sat(&encode_cnf(&tm, h).unwrap()));
    }

    #[test]
    fn test_constants() {
        let tm = TermManager::new();
        assert!(brute_force_sat(&encode_cnf(&tm, tm.mk_true()).unwrap()));
        assert!(!brute_force_sat(&encode_cnf(&tm, tm.mk_false()).unwrap()));
    }

    #[test]
    fn test_boolean_equality_as_iff() {
        let mut tm = TermManager::new();
        let p = tm.mk_var("p", Sort::Bool);
        let q = tm.mk_var("q", Sort::Bool);
        let eq = tm.mk_eq(p, q);
        let nq = tm.mk_not(q);
        let f = tm.mk_and([eq, p, nq]);
        assert!(!brute_force_sat(&encode_cnf(&tm, f).unwrap()));
    }

    #[test]
    fn test_theory_atom_rejected() {
        let mut tm = TermManager::new();
        let a = tm.mk_var("a", Sort::BitVec(4));
        let b = tm.mk_var("b", Sort::BitVec(4));
        let eq = tm.mk_eq(a, b);
        let err = encode_cnf(&tm, eq).unwrap_err();
        assert!(matches!(err, LazuliError::Unsupported { .. }));

        let err = encode_cnf(&tm, a).unwrap_err();
        assert!(matches!(err, LazuliError::SortMismatch { .. }));
    }
}
