//! Runtime invariant checks for the CDCL solver
//!
//! Each check returns a description of the first violation found.

use crate::cnf::Cnf;
use crate::solver::Solver;
use lazuli_core::Lit;

/// Check clause database integrity
pub fn check_clause_database(solver: &Solver) -> Result<(), String> {
    let num_vars = solver.num_vars() as usize;
    for (cref, clause) in solver.clause_db().iter() {
        let lits = &clause.lits;

        // No duplicate literals
        for j in 0..lits.len() {
            for k in (j + 1)..lits.len() {
                if lits[j] == lits[k] {
                    return Err(format!("Duplicate literal in clause {}", cref.index()));
                }
                if lits[j].is_complement_of(lits[k]) {
                    return Err(format!("Tautology in clause {}", cref.index()));
                }
            }
        }

        // All literals reference valid variables
        if lits.iter().any(|l| l.var().index() >= num_vars) {
            return Err(format!("Invalid variable in clause {}", cref.index()));
        }
    }
    Ok(())
}

/// Check that no variable occurs twice on the trail
pub fn check_trail_unique(solver: &Solver) -> Result<(), String> {
    let mut seen = vec![false; solver.num_vars() as usize];
    for &lit in solver.trail().lits() {
        let v = lit.var().index();
        if seen[v] {
            return Err(format!("Variable {} appears twice on the trail", lit.var()));
        }
        seen[v] = true;
        if !solver.trail().value(lit).is_true() {
            return Err(format!("Trail literal {lit} is not assigned true"));
        }
    }
    Ok(())
}

/// Check decision level consistency
pub fn check_decision_levels(solver: &Solver) -> Result<(), String> {
    let trail = solver.trail();
    let mut last_level = 0;
    for (i, &lit) in trail.lits().iter().enumerate() {
        let level = trail.level(lit.var());
        // Decision levels should be monotonic on trail
        if level < last_level {
            return Err(format!(
                "Trail position {i} has level {level} < previous {last_level}"
            ));
        }
        last_level = level;
        if level > trail.decision_level() {
            return Err(format!(
                "Variable {} has level {} > current {}",
                lit.var(),
                level,
                trail.decision_level()
            ));
        }
        if trail.is_decision_at(i) != trail.reason(lit.var()).is_none() {
            return Err(format!("Trail position {i} is neither decision nor propagated"));
        }
    }
    Ok(())
}

/// Check that every propagated literal is justified by its reason clause:
/// the clause contains the literal and all its other literals are false
/// earlier on the trail.
pub fn check_reasons(solver: &Solver) -> Result<(), String> {
    let trail = solver.trail();
    let mut position = vec![usize::MAX; solver.num_vars() as usize];
    for (i, &lit) in trail.lits().iter().enumerate() {
        position[lit.var().index()] = i;
    }

    for (i, &lit) in trail.lits().iter().enumerate() {
        let Some(cref) = trail.reason(lit.var()) else {
            continue;
        };
        let Some(clause) = solver.clause_db().get(cref) else {
            return Err(format!("Reason of {lit} was deleted"));
        };
        if !clause.lits.contains(&lit) {
            return Err(format!("Reason of {lit} does not contain it"));
        }
        for &other in clause.lits.iter().filter(|&&o| o != lit) {
            let pos = position[other.var().index()];
            if pos >= i || !trail.value(other).is_false() {
                return Err(format!("Reason of {lit} has non-falsified literal {other}"));
            }
        }
    }
    Ok(())
}

/// Check that a model satisfies every clause of `cnf`
pub fn check_model(model: &[Lit], cnf: &Cnf) -> Result<(), String> {
    let mut assignment = vec![false; cnf.num_vars() as usize];
    for lit in model {
        if let Some(slot) = assignment.get_mut(lit.var().index()) {
            *slot = lit.is_positive();
        }
    }
    for (i, clause) in cnf.clauses().iter().enumerate() {
        let satisfied = clause
            .iter()
            .any(|l| assignment[l.var().index()] == l.is_positive());
        if !satisfied {
            return Err(format!("Clause {i} is falsified by the model"));
        }
    }
    Ok(())
}

/// Master invariant check for the SAT solver
pub fn check_all_sat_invariants(solver: &Solver) -> Result<(), String> {
    check_clause_database(solver)?;
    check_trail_unique(solver)?;
    check_decision_levels(solver)?;
    check_reasons(solver)?;
    Ok(())
}
