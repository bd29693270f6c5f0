//! Flattening of equality cubes.
//!
//! A cube is flat when every literal has one of the shapes
//! `x = y`, `x = f(y1, .., yn)`, `x != y`, `p(y1, .., yn)` or `!p(y1, .., yn)`
//! with `x`, `y`, `yi` symbols (variables or constants). Flattening names every
//! non-symbol sub-term with a fresh variable `v`, adds the defining literal
//! `v = t` once, and rewrites the literal over `v` until nothing nested is left.
//! A predicate application used as an argument is named by a Boolean variable
//! and lives in the partition like any other term.

use lazuli_core::ast::{Sort, TermArgs, TermId, TermKind, TermManager};
use lazuli_core::error::{LazuliError, Result};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::trace;

/// A cube literal over equality and uninterpreted functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UfLiteral {
    Eq(TermId, TermId),
    Neq(TermId, TermId),
    Pred(TermId),
    NotPred(TermId),
}

impl UfLiteral {
    fn negate(self) -> Self {
        match self {
            Self::Eq(a, b) => Self::Neq(a, b),
            Self::Neq(a, b) => Self::Eq(a, b),
            Self::Pred(p) => Self::NotPred(p),
            Self::NotPred(p) => Self::Pred(p),
        }
    }

    /// Decompose a cube entry.
    pub(crate) fn classify(tm: &TermManager, lit: TermId) -> Result<Self> {
        let term = tm.term(lit)?;
        match &term.kind {
            TermKind::Not(inner) => Ok(Self::classify(tm, *inner)?.negate()),
            TermKind::Eq(a, b) => {
                // Boolean sides must be names or predicate applications
                if tm.sort(*a).is_some_and(Sort::is_bool)
                    && !(is_partition_term(tm, *a) && is_partition_term(tm, *b))
                {
                    return Err(LazuliError::unsupported("Boolean =", "congruence closure"));
                }
                Ok(Self::Eq(*a, *b))
            }
            TermKind::Apply { .. } if term.sort.is_bool() => Ok(Self::Pred(lit)),
            _ => Err(LazuliError::NotALiteral(tm.display(lit).to_string())),
        }
    }

    fn build(self, tm: &mut TermManager) -> TermId {
        match self {
            Self::Eq(a, b) => tm.mk_eq(a, b),
            Self::Neq(a, b) => {
                let eq = tm.mk_eq(a, b);
                tm.mk_not(eq)
            }
            Self::Pred(p) => p,
            Self::NotPred(p) => tm.mk_not(p),
        }
    }

    fn is_flat(self, tm: &TermManager) -> bool {
        match self {
            Self::Eq(a, b) => is_symbol(tm, a) && (is_symbol(tm, b) || is_flat_app(tm, b)),
            Self::Neq(a, b) => is_symbol(tm, a) && is_symbol(tm, b),
            Self::Pred(p) | Self::NotPred(p) => is_flat_app(tm, p),
        }
    }
}

/// Variables and nullary applications.
pub(crate) fn is_symbol(tm: &TermManager, t: TermId) -> bool {
    match tm.get(t).map(|t| &t.kind) {
        Some(TermKind::Var(_)) => true,
        Some(TermKind::Apply { args, .. }) => args.is_empty(),
        _ => false,
    }
}

fn is_partition_term(tm: &TermManager, t: TermId) -> bool {
    matches!(
        tm.get(t).map(|t| &t.kind),
        Some(TermKind::Var(_) | TermKind::Apply { .. })
    )
}

fn is_flat_app(tm: &TermManager, t: TermId) -> bool {
    match tm.get(t).map(|t| &t.kind) {
        Some(TermKind::Apply { args, .. }) => args.iter().all(|&a| is_symbol(tm, a)),
        _ => false,
    }
}

/// Whether a single literal is flat. Malformed literals are not.
#[must_use]
pub fn is_flat_literal(tm: &TermManager, lit: TermId) -> bool {
    UfLiteral::classify(tm, lit).is_ok_and(|l| l.is_flat(tm))
}

/// Whether every literal of the cube is flat.
#[must_use]
pub fn is_flat_cube(tm: &TermManager, cube: &[TermId]) -> bool {
    cube.iter().all(|&lit| is_flat_literal(tm, lit))
}

/// Rewrites cubes into flat cubes, naming each non-symbol sub-term once.
#[derive(Debug, Default)]
pub struct Flattener {
    names: FxHashMap<TermId, TermId>,
}

impl Flattener {
    /// Create a flattener with no names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh variable standing for `t`, if one was introduced.
    #[must_use]
    pub fn name_of(&self, t: TermId) -> Option<TermId> {
        self.names.get(&t).copied()
    }

    /// Flatten `cube`. Literals that are already flat are kept in order.
    pub fn flatten(&mut self, tm: &mut TermManager, cube: &[TermId]) -> Result<Vec<TermId>> {
        let mut pending: VecDeque<UfLiteral> = VecDeque::with_capacity(cube.len());
        for &lit in cube {
            pending.push_back(UfLiteral::classify(tm, lit)?);
        }

        let mut out = Vec::with_capacity(cube.len());
        let mut first_pass = cube.iter();
        while let Some(lit) = pending.pop_front() {
            let original = first_pass.next().copied();
            if lit.is_flat(tm) {
                out.push(original.unwrap_or_else(|| lit.build(tm)));
                continue;
            }
            let rewritten = match lit {
                UfLiteral::Eq(a, b) if !is_symbol(tm, a) => {
                    let v = self.name(tm, a, &mut pending)?;
                    UfLiteral::Eq(v, b)
                }
                UfLiteral::Eq(a, b) => UfLiteral::Eq(a, self.name_args(tm, b, &mut pending)?),
                UfLiteral::Neq(a, b) if !is_symbol(tm, a) => {
                    let v = self.name(tm, a, &mut pending)?;
                    UfLiteral::Neq(v, b)
                }
                UfLiteral::Neq(a, b) => {
                    let v = self.name(tm, b, &mut pending)?;
                    UfLiteral::Neq(a, v)
                }
                UfLiteral::Pred(p) => UfLiteral::Pred(self.name_args(tm, p, &mut pending)?),
                UfLiteral::NotPred(p) => UfLiteral::NotPred(self.name_args(tm, p, &mut pending)?),
            };
            pending.push_back(rewritten);
        }
        Ok(out)
    }

    /// Symbol standing for `t`; defines a fresh one on first use.
    fn name(
        &mut self,
        tm: &mut TermManager,
        t: TermId,
        pending: &mut VecDeque<UfLiteral>,
    ) -> Result<TermId> {
        if is_symbol(tm, t) {
            return Ok(t);
        }
        if let Some(&v) = self.names.get(&t) {
            return Ok(v);
        }
        let term = tm.term(t)?;
        let sort = term.sort;
        if !matches!(term.kind, TermKind::Apply { .. }) {
            return Err(LazuliError::unsupported(term.kind.name(), "flattening"));
        }
        let v = tm.mk_fresh_var("x", sort);
        trace!(term = %tm.display(t), name = %tm.display(v), "flatten: naming sub-term");
        self.names.insert(t, v);
        pending.push_back(UfLiteral::Eq(v, t));
        Ok(v)
    }

    /// Rebuild application `t` with every non-symbol argument named.
    fn name_args(
        &mut self,
        tm: &mut TermManager,
        t: TermId,
        pending: &mut VecDeque<UfLiteral>,
    ) -> Result<TermId> {
        let term = tm.term(t)?.clone();
        let (func, args) = match term.kind {
            TermKind::Apply { func, args } => (func, args),
            other => return Err(LazuliError::unsupported(other.name(), "flattening")),
        };
        let mut named = TermArgs::with_capacity(args.len());
        for arg in args {
            named.push(self.name(tm, arg, pending)?);
        }
        Ok(tm.mk_apply_symbol(func, named, term.sort))
    }
}

/// Flatten a cube into an equisatisfiable flat cube.
pub fn flatten(tm: &mut TermManager, cube: &[TermId]) -> Result<Vec<TermId>> {
    Flattener::new().flatten(tm, cube)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        tm: TermManager,
        u: Sort,
        x: TermId,
        y: TermId,
    }

    fn fixture() -> Fixture {
        let mut tm = TermManager::new();
        let u = tm.uninterpreted_sort("U");
        let x = tm.mk_var("x", u);
        let y = tm.mk_var("y", u);
        Fixture { tm, u, x, y }
    }

    #[test]
    fn test_flat_cube_unchanged() {
        let Fixture { mut tm, u, x, y } = fixture();
        let fx = tm.mk_apply("f", [x], u);
        let fy = tm.mk_apply("f", [y], u);
        let eq = tm.mk_eq(x, y);
        let a = tm.mk_fresh_var("a", u);
        let b = tm.mk_fresh_var("b", u);
        let d1 = tm.mk_eq(a, fx);
        let d2 = tm.mk_eq(b, fy);
        let ab = tm.mk_eq(a, b);
        let neq = tm.mk_not(ab);
        let cube = vec![eq, d1, d2, neq];
        assert!(is_flat_cube(&tm, &cube));
        assert_eq!(flatten(&mut tm, &cube).unwrap(), cube);
    }

    #[test]
    fn test_nested_application() {
        let Fixture { mut tm, u, x, y } = fixture();
        let gx = tm.mk_apply("g", [x], u);
        let fgx = tm.mk_apply("f", [gx], u);
        let eq = tm.mk_eq(fgx, y);
        assert!(!is_flat_literal(&tm, eq));

        let flat = flatten(&mut tm, &[eq]).unwrap();
        assert!(is_flat_cube(&tm, &flat));
        // v1 = y, v1 = f(v2), v2 = g(x)
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn test_disequality_of_applications() {
        let Fixture { mut tm, u, x, y } = fixture();
        let fx = tm.mk_apply("f", [x], u);
        let fy = tm.mk_apply("f", [y], u);
        let eq = tm.mk_eq(fx, fy);
        let neq = tm.mk_not(eq);
        let flat = flatten(&mut tm, &[neq]).unwrap();
        assert!(is_flat_cube(&tm, &flat));
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn test_shared_subterm_named_once() {
        let Fixture { mut tm, u, x, y } = fixture();
        let fx = tm.mk_apply("f", [x], u);
        let e1 = tm.mk_eq(fx, y);
        let e2 = tm.mk_eq(fx, x);
        let mut flattener = Flattener::new();
        let flat = flattener.flatten(&mut tm, &[e1, e2]).unwrap();
        // v = y, v = x, v = f(x)
        assert_eq!(flat.len(), 3);
        assert!(flattener.name_of(fx).is_some());
    }

    #[test]
    fn test_predicates() {
        let Fixture { mut tm, u, x, .. } = fixture();
        let fx = tm.mk_apply("f", [x], u);
        let p = tm.mk_apply("p", [fx], Sort::Bool);
        let np = tm.mk_not(p);
        let flat = flatten(&mut tm, &[np]).unwrap();
        assert!(is_flat_cube(&tm, &flat));
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_predicate_as_argument() {
        let Fixture { mut tm, u, x, y } = fixture();
        let px = tm.mk_apply("p", [x], Sort::Bool);
        let fpx = tm.mk_apply("f", [px], u);
        let eq = tm.mk_eq(fpx, y);
        let mut flattener = Flattener::new();
        let flat = flattener.flatten(&mut tm, &[eq]).unwrap();
        assert!(is_flat_cube(&tm, &flat));
        // v1 = y, v1 = f(v2), v2 = p(x)
        assert_eq!(flat.len(), 3);
        let v2 = flattener.name_of(px).unwrap();
        assert_eq!(tm.sort(v2), Some(Sort::Bool));
        let def = tm.mk_eq(v2, px);
        assert!(flat.contains(&def));
    }

    #[test]
    fn test_idempotent() {
        let Fixture { mut tm, u, x, y } = fixture();
        let gy = tm.mk_apply("g", [y], u);
        let fxgy = tm.mk_apply("f", [x, gy], u);
        let hfx = tm.mk_apply("h", [fxgy], u);
        let eq = tm.mk_eq(hfx, x);
        let once = flatten(&mut tm, &[eq]).unwrap();
        let twice = flatten(&mut tm, &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_malformed_literals() {
        let Fixture { mut tm, x, .. } = fixture();
        let p = tm.mk_var("p", Sort::Bool);
        assert!(matches!(
            flatten(&mut tm, &[p]),
            Err(LazuliError::NotALiteral(_))
        ));
        assert!(!is_flat_literal(&tm, x));

        let np = tm.mk_not(p);
        let eq = tm.mk_eq(p, np);
        assert!(matches!(
            flatten(&mut tm, &[eq]),
            Err(LazuliError::Unsupported { .. })
        ));
    }
}
