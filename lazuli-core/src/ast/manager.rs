//! Hash-consed term arena.

use super::term::{Sort, Symbol, Term, TermArgs, TermId, TermKind};
use crate::error::{LazuliError, Result};
use lasso::Rodeo;
use rustc_hash::FxHashMap;
use std::fmt;

/// Owner of every term node in a query.
///
/// Nodes are immutable once created. Building the same kind with the same
/// children and sort twice yields the same [`TermId`], so maps keyed by id
/// see structurally equal subterms as one entry.
#[derive(Debug)]
pub struct TermManager {
    terms: Vec<Term>,
    cache: FxHashMap<Term, TermId>,
    symbols: Rodeo,
    fresh_counter: u32,
    true_id: TermId,
    false_id: TermId,
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TermManager {
    /// Create an empty arena holding only the two Boolean constants.
    #[must_use]
    pub fn new() -> Self {
        let mut tm = Self {
            terms: Vec::new(),
            cache: FxHashMap::default(),
            symbols: Rodeo::default(),
            fresh_counter: 0,
            true_id: TermId::new(0),
            false_id: TermId::new(0),
        };
        tm.true_id = tm.intern(TermKind::True, Sort::Bool);
        tm.false_id = tm.intern(TermKind::False, Sort::Bool);
        tm
    }

    fn intern(&mut self, kind: TermKind, sort: Sort) -> TermId {
        let term = Term { kind, sort };
        if let Some(&id) = self.cache.get(&term) {
            return id;
        }
        let id = TermId::new(self.terms.len() as u32);
        self.terms.push(term.clone());
        self.cache.insert(term, id);
        id
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the arena is empty (never true: constants are preallocated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.index())
    }

    /// Look up a node, failing on ids this manager never produced.
    pub fn term(&self, id: TermId) -> Result<&Term> {
        self.get(id).ok_or(LazuliError::UnknownTerm(id.raw()))
    }

    /// Sort of a node.
    #[must_use]
    pub fn sort(&self, id: TermId) -> Option<Sort> {
        self.get(id).map(|t| t.sort)
    }

    /// Intern a name.
    pub fn symbol(&mut self, name: &str) -> Symbol {
        self.symbols.get_or_intern(name)
    }

    /// Resolve an interned name.
    #[must_use]
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.symbols.resolve(&symbol)
    }

    /// Declare (or look up) an uninterpreted sort.
    pub fn uninterpreted_sort(&mut self, name: &str) -> Sort {
        Sort::Uninterpreted(self.symbol(name))
    }

    /// Render a sort for diagnostics.
    #[must_use]
    pub fn sort_name(&self, sort: Sort) -> String {
        match sort {
            Sort::Bool => "Bool".to_string(),
            Sort::BitVec(w) => format!("(_ BitVec {w})"),
            Sort::Uninterpreted(s) => self.resolve(s).to_string(),
        }
    }

    /// Name of a variable node.
    #[must_use]
    pub fn var_name(&self, id: TermId) -> Option<&str> {
        match self.get(id).map(|t| &t.kind) {
            Some(TermKind::Var(s)) => Some(self.resolve(*s)),
            _ => None,
        }
    }

    /// Boolean true.
    #[must_use]
    pub fn mk_true(&self) -> TermId {
        self.true_id
    }

    /// Boolean false.
    #[must_use]
    pub fn mk_false(&self) -> TermId {
        self.false_id
    }

    /// Boolean constant.
    #[must_use]
    pub fn mk_bool(&self, value: bool) -> TermId {
        if value { self.true_id } else { self.false_id }
    }

    /// Named variable of the given sort.
    pub fn mk_var(&mut self, name: &str, sort: Sort) -> TermId {
        let sym = self.symbol(name);
        self.intern(TermKind::Var(sym), sort)
    }

    /// Variable whose name does not clash with any symbol interned so far.
    pub fn mk_fresh_var(&mut self, prefix: &str, sort: Sort) -> TermId {
        loop {
            let name = format!("{prefix}!{}", self.fresh_counter);
            self.fresh_counter += 1;
            if self.symbols.get(&name).is_none() {
                return self.mk_var(&name, sort);
            }
        }
    }

    /// Negation.
    pub fn mk_not(&mut self, arg: TermId) -> TermId {
        self.intern(TermKind::Not(arg), Sort::Bool)
    }

    /// N-ary conjunction.
    pub fn mk_and(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: TermArgs = args.into_iter().collect();
        self.intern(TermKind::And(args), Sort::Bool)
    }

    /// N-ary disjunction.
    pub fn mk_or(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: TermArgs = args.into_iter().collect();
        self.intern(TermKind::Or(args), Sort::Bool)
    }

    /// Implication.
    pub fn mk_implies(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.intern(TermKind::Implies(lhs, rhs), Sort::Bool)
    }

    /// Boolean equivalence.
    pub fn mk_iff(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.intern(TermKind::Iff(lhs, rhs), Sort::Bool)
    }

    /// Exclusive or, expressed as a negated equivalence.
    pub fn mk_xor(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let iff = self.mk_iff(lhs, rhs);
        self.mk_not(iff)
    }

    /// Equality atom.
    pub fn mk_eq(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.intern(TermKind::Eq(lhs, rhs), Sort::Bool)
    }

    /// Bit-vector literal of the given width.
    pub fn mk_bitvec(&mut self, value: u64, width: u32) -> TermId {
        self.intern(TermKind::BitVecConst { value, width }, Sort::BitVec(width))
    }

    /// Bitwise and. The result takes the sort of `lhs`.
    pub fn mk_bv_and(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.bv_result_sort(lhs);
        self.intern(TermKind::BvAnd(lhs, rhs), sort)
    }

    /// Bitwise or. The result takes the sort of `lhs`.
    pub fn mk_bv_or(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.bv_result_sort(lhs);
        self.intern(TermKind::BvOr(lhs, rhs), sort)
    }

    /// Modular addition. The result takes the sort of `lhs`.
    pub fn mk_bv_add(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.bv_result_sort(lhs);
        self.intern(TermKind::BvAdd(lhs, rhs), sort)
    }

    fn bv_result_sort(&self, operand: TermId) -> Sort {
        self.sort(operand).unwrap_or(Sort::BitVec(0))
    }

    /// Application of an uninterpreted function (or predicate when `sort` is Bool).
    pub fn mk_apply(
        &mut self,
        func: &str,
        args: impl IntoIterator<Item = TermId>,
        sort: Sort,
    ) -> TermId {
        let func = self.symbol(func);
        self.mk_apply_symbol(func, args, sort)
    }

    /// Application of an already interned function symbol.
    pub fn mk_apply_symbol(
        &mut self,
        func: Symbol,
        args: impl IntoIterator<Item = TermId>,
        sort: Sort,
    ) -> TermId {
        let args: TermArgs = args.into_iter().collect();
        self.intern(TermKind::Apply { func, args }, sort)
    }

    /// S-expression rendering for logs and error messages.
    #[must_use]
    pub fn display(&self, id: TermId) -> TermDisplay<'_> {
        TermDisplay { tm: self, id }
    }
}

/// Display adapter returned by [`TermManager::display`].
pub struct TermDisplay<'a> {
    tm: &'a TermManager,
    id: TermId,
}

impl TermDisplay<'_> {
    fn write_list(&self, f: &mut fmt::Formatter<'_>, head: &str, args: &[TermId]) -> fmt::Result {
        write!(f, "({head}")?;
        for &arg in args {
            write!(f, " {}", self.tm.display(arg))?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(term) = self.tm.get(self.id) else {
            return write!(f, "<unknown {}>", self.id);
        };
        match &term.kind {
            TermKind::True => write!(f, "true"),
            TermKind::False => write!(f, "false"),
            TermKind::Var(s) => write!(f, "{}", self.tm.resolve(*s)),
            TermKind::BitVecConst { value, width } => {
                write!(f, "#b{:0width$b}", value, width = *width as usize)
            }
            TermKind::Apply { func, args } if args.is_empty() => {
                write!(f, "{}", self.tm.resolve(*func))
            }
            TermKind::Apply { func, args } => self.write_list(f, self.tm.resolve(*func), args),
            kind => self.write_list(f, kind.name(), &kind.children()),
        }
    }
}
