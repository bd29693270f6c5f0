//! Boolean abstraction of a formula.
//!
//! Theory atoms (equalities between non-Boolean terms and predicate
//! applications) are replaced by fresh Boolean proxies. Connectives, Boolean
//! variables and constants stay as they are.

use lazuli_core::ast::{Sort, TermId, TermKind, TermManager};
use lazuli_core::error::{LazuliError, Result};
use rustc_hash::FxHashMap;

/// A propositional formula over proxies with the atom correspondence.
#[derive(Debug, Clone)]
pub struct BooleanSkeleton {
    formula: TermId,
    atoms: Vec<(TermId, TermId)>,
    proxies: FxHashMap<TermId, TermId>,
    originals: FxHashMap<TermId, TermId>,
    bool_vars: Vec<TermId>,
}

impl BooleanSkeleton {
    /// Abstract `formula`. Repeated atoms share one proxy.
    pub fn extract(tm: &mut TermManager, formula: TermId) -> Result<Self> {
        let mut skeleton = Self {
            formula,
            atoms: Vec::new(),
            proxies: FxHashMap::default(),
            originals: FxHashMap::default(),
            bool_vars: Vec::new(),
        };
        let mut cache = FxHashMap::default();
        skeleton.formula = skeleton.abstract_term(tm, formula, &mut cache)?;
        Ok(skeleton)
    }

    fn abstract_term(
        &mut self,
        tm: &mut TermManager,
        t: TermId,
        cache: &mut FxHashMap<TermId, TermId>,
    ) -> Result<TermId> {
        if let Some(&done) = cache.get(&t) {
            return Ok(done);
        }
        let term = tm.term(t)?.clone();
        if !term.sort.is_bool() {
            return Err(LazuliError::sort_mismatch("Bool", tm.sort_name(term.sort)));
        }

        let result = match term.kind {
            TermKind::True | TermKind::False => t,
            TermKind::Var(_) => {
                self.bool_vars.push(t);
                t
            }
            TermKind::Not(arg) => {
                let arg = self.abstract_term(tm, arg, cache)?;
                tm.mk_not(arg)
            }
            TermKind::And(args) => {
                let args = self.abstract_all(tm, &args, cache)?;
                tm.mk_and(args)
            }
            TermKind::Or(args) => {
                let args = self.abstract_all(tm, &args, cache)?;
                tm.mk_or(args)
            }
            TermKind::Implies(lhs, rhs) => {
                let lhs = self.abstract_term(tm, lhs, cache)?;
                let rhs = self.abstract_term(tm, rhs, cache)?;
                tm.mk_implies(lhs, rhs)
            }
            TermKind::Iff(lhs, rhs) => {
                let lhs = self.abstract_term(tm, lhs, cache)?;
                let rhs = self.abstract_term(tm, rhs, cache)?;
                tm.mk_iff(lhs, rhs)
            }
            TermKind::Eq(lhs, rhs) if tm.sort(lhs).is_some_and(Sort::is_bool) => {
                let lhs = self.abstract_term(tm, lhs, cache)?;
                let rhs = self.abstract_term(tm, rhs, cache)?;
                tm.mk_iff(lhs, rhs)
            }
            TermKind::Eq(..) | TermKind::Apply { .. } => self.proxy(tm, t),
            kind => return Err(LazuliError::unsupported(kind.name(), "Boolean skeleton")),
        };
        cache.insert(t, result);
        Ok(result)
    }

    fn abstract_all(
        &mut self,
        tm: &mut TermManager,
        args: &[TermId],
        cache: &mut FxHashMap<TermId, TermId>,
    ) -> Result<Vec<TermId>> {
        args.iter()
            .map(|&arg| self.abstract_term(tm, arg, cache))
            .collect()
    }

    fn proxy(&mut self, tm: &mut TermManager, atom: TermId) -> TermId {
        if let Some(&p) = self.proxies.get(&atom) {
            return p;
        }
        let p = tm.mk_fresh_var("atom", Sort::Bool);
        self.proxies.insert(atom, p);
        self.originals.insert(p, atom);
        self.atoms.push((atom, p));
        p
    }

    /// The abstracted formula.
    #[must_use]
    pub fn formula(&self) -> TermId {
        self.formula
    }

    /// `(atom, proxy)` pairs in order of first occurrence.
    #[must_use]
    pub fn atoms(&self) -> &[(TermId, TermId)] {
        &self.atoms
    }

    /// Proxy standing for `atom`.
    #[must_use]
    pub fn proxy_of(&self, atom: TermId) -> Option<TermId> {
        self.proxies.get(&atom).copied()
    }

    /// Atom a proxy stands for.
    #[must_use]
    pub fn atom_of(&self, proxy: TermId) -> Option<TermId> {
        self.originals.get(&proxy).copied()
    }

    /// Boolean variables of the input formula.
    #[must_use]
    pub fn bool_vars(&self) -> &[TermId] {
        &self.bool_vars
    }
}
