//! Given a conjunction of clauses that share logic variables, in what
//! order should we evaluate them?
//!
//! We build levels greedily, one pass over the pending clauses per
//! level.  A clause is eligible once everything it requires is bound
//! by an earlier level: always for generic clauses, and only once the
//! whole input is bound for computation clauses.  An eligible clause
//! joins the current level unless one of the variables it would
//! newly bind is already claimed by a clause accepted earlier in the
//! same pass; first come, first served.
//!
//! Once a level is accepted, every variable its clauses reference is
//! known, including those that only appear in a computation's
//! operator.  A later clause never binds a variable that an earlier
//! level already referenced.
//!
//! There is no backtracking.  When a pass accepts nothing, the
//! remaining clauses can never be scheduled (e.g., a computation
//! whose input is never bound, or a cycle of computations), and we
//! stop there.  These clauses are reported as dropped rather than
//! failing the whole run: they may be legitimately disconnected.
//!
//! Pending clauses are sorted by the number of distinct variables
//! they reference first, so that ground facts tend to be scheduled
//! before variable-heavy rules.  This is only a heuristic; any order
//! yields a legal stratification.
use super::{Clause, Level, Stratification};
use crate::config::CompilerConfig;
use crate::term::Term;
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

/// A clause waiting to be scheduled, with its variable sets computed
/// once up front.
struct Pending {
    clause: Clause,
    variable_count: usize,
    requires: BTreeSet<String>,
    produces: BTreeSet<String>,
}

impl Pending {
    fn new(clause: Clause) -> Self {
        let to_owned = |vars: BTreeSet<&str>| -> BTreeSet<String> {
            vars.into_iter().map(String::from).collect()
        };
        let variable_count = clause.variables().len();
        let requires = to_owned(clause.requires());
        let produces = to_owned(clause.produces());

        Self {
            clause,
            variable_count,
            requires,
            produces,
        }
    }

    /// Returns the variables this clause would newly bind given the
    /// `known` variables, or `None` if it is not yet eligible.
    fn introduces(&self, known: &BTreeSet<String>) -> Option<BTreeSet<String>> {
        if !self.requires.is_subset(known) {
            return None;
        }

        Some(self.produces.difference(known).cloned().collect())
    }
}

/// Classifies each of `terms` with `config.computation_tag`, and
/// stratifies the resulting clauses.
#[must_use]
pub fn stratify(terms: Vec<Term>, config: &CompilerConfig) -> Stratification {
    let clauses = terms
        .into_iter()
        .map(|term| Clause::classify(term, &config.computation_tag))
        .collect();

    stratify_clauses(clauses, config)
}

/// Partitions `clauses` into levels, such that no clause consumes a
/// variable before an earlier level binds it.
///
/// This function never fails: clauses that can never be scheduled
/// are listed in `Stratification::dropped`.
#[must_use]
pub fn stratify_clauses(clauses: Vec<Clause>, config: &CompilerConfig) -> Stratification {
    let mut remaining: Vec<Pending> = clauses.into_iter().map(Pending::new).collect();
    if config.sort_by_variable_count {
        // `sort_by_key` is stable: ties keep their input order.
        remaining.sort_by_key(|pending| pending.variable_count);
    }

    let mut known = BTreeSet::<String>::new();
    let mut levels = Vec::<Level>::new();

    while !remaining.is_empty() {
        let mut accepted = Vec::new();
        let mut claimed = BTreeSet::<String>::new();
        let mut deferred = Vec::with_capacity(remaining.len());

        for pending in remaining {
            match pending.introduces(&known) {
                Some(new_vars) if new_vars.is_disjoint(&claimed) => {
                    trace!(clause = %pending.clause, level = levels.len(), "accepted clause");
                    claimed.extend(new_vars);
                    accepted.push(pending.clause);
                }
                _ => deferred.push(pending),
            }
        }

        remaining = deferred;
        if accepted.is_empty() {
            break;
        }

        debug!(
            level = levels.len(),
            clauses = accepted.len(),
            introduces = ?claimed,
            "scheduled level"
        );
        // Operator variables are referenced but never bound; they join
        // `known` too, so no later level may bind them.
        for clause in &accepted {
            known.extend(clause.variables().into_iter().map(String::from));
        }
        levels.push(Level::new(accepted, claimed));
    }

    let dropped: Vec<Clause> = remaining.into_iter().map(|pending| pending.clause).collect();
    if !dropped.is_empty() {
        let printed: Vec<String> = dropped.iter().map(Clause::to_string).collect();
        warn!(
            count = dropped.len(),
            clauses = ?printed,
            "dropped clauses that can never be scheduled"
        );
    }

    debug!(levels = levels.len(), known = known.len(), "stratification done");
    Stratification::new(levels, dropped)
}

#[cfg(test)]
fn stratify_text(text: &str) -> Stratification {
    stratify(
        crate::term::parse_all(text).expect("ok"),
        &CompilerConfig::default(),
    )
}

#[cfg(test)]
fn printed_levels(strat: &Stratification) -> Vec<String> {
    strat
        .levels()
        .iter()
        .map(|level| level.to_term().to_string())
        .collect()
}

#[test]
fn test_empty_input() {
    let strat = stratify_text("");

    assert_eq!(printed_levels(&strat), vec!["()"]);
    assert!(strat.is_complete());
}

#[test]
fn test_ground_clauses_share_level() {
    let strat = stratify_text("(Implication A B) (Implication B C)");

    assert_eq!(
        printed_levels(&strat),
        vec!["((Implication A B) (Implication B C))", "()"]
    );
}

#[test]
fn test_shared_variable_splits_levels() {
    // Both clauses would introduce `$x`: the second waits, and binds
    // nothing new in the next level.
    let strat = stratify_text("(Camera $x) (Thing $x)");

    assert_eq!(
        printed_levels(&strat),
        vec!["((Camera $x))", "((Thing $x))", "()"]
    );
    assert_eq!(
        strat.levels()[0].introduces().iter().collect::<Vec<_>>(),
        vec!["$x"]
    );
    assert!(strat.levels()[1].introduces().is_empty());
}

#[test]
fn test_sorted_by_variable_count() {
    let strat = stratify_text("(R $a $x $c) (A $a) (B $b)");

    assert_eq!(
        printed_levels(&strat),
        vec!["((A $a) (B $b))", "((R $a $x $c))", "()"]
    );
}

#[test]
fn test_unsorted_keeps_input_order() {
    let config = CompilerConfig {
        sort_by_variable_count: false,
        ..CompilerConfig::default()
    };
    let strat = stratify(
        crate::term::parse_all("(R $a $x $c) (A $a) (B $b)").expect("ok"),
        &config,
    );

    assert_eq!(
        printed_levels(&strat),
        vec!["((R $a $x $c) (B $b))", "((A $a))", "()"]
    );
}

#[test]
fn test_computation_waits_for_input() {
    let strat = stratify_text("(CPU mul ($s1 $s2) $s) (: $p1 A (STV $s1 $c1)) (: $p2 B (STV $s2 $c2))");

    assert_eq!(
        printed_levels(&strat),
        vec![
            "((: $p1 A (STV $s1 $c1)) (: $p2 B (STV $s2 $c2)))",
            "((CPU mul ($s1 $s2) $s))",
            "()"
        ]
    );
    assert!(strat.is_complete());
}

#[test]
fn test_computation_chain() {
    let strat = stratify_text("(CPU min ($b $c) $d) (CPU mul ($a 0.5) $b) (CPU max ($a $a) $c) (F $a)");

    assert_eq!(
        printed_levels(&strat),
        vec![
            "((F $a))",
            "((CPU mul ($a 0.5) $b) (CPU max ($a $a) $c))",
            "((CPU min ($b $c) $d))",
            "()"
        ]
    );
}

#[test]
fn test_computation_outputs_must_be_disjoint() {
    let strat = stratify_text("(F $a) (CPU f $a $b) (CPU g $a $b)");

    assert_eq!(
        printed_levels(&strat),
        vec!["((F $a))", "((CPU f $a $b))", "((CPU g $a $b))", "()"]
    );
}

#[test]
fn test_unbound_computation_is_dropped() {
    let strat = stratify_text("(A $a) (CPU mul ($a $z) $out)");

    assert_eq!(printed_levels(&strat), vec!["((A $a))", "()"]);
    assert!(!strat.is_complete());
    assert_eq!(strat.dropped().len(), 1);
    assert_eq!(strat.dropped()[0].to_string(), "(CPU mul ($a $z) $out)");
    assert_eq!(strat.scheduled_count(), 1);
}

#[test]
fn test_computation_cycle_is_dropped() {
    let strat = stratify_text("(CPU f $a $b) (CPU g $b $a)");

    assert_eq!(printed_levels(&strat), vec!["()"]);
    assert_eq!(strat.dropped().len(), 2);
}

#[test]
fn test_ground_computation_runs_first() {
    let strat = stratify_text("(CPU add (1 2) $x) (P $x)");

    assert_eq!(
        printed_levels(&strat),
        vec!["((CPU add (1 2) $x))", "((P $x))", "()"]
    );
}

#[test]
fn test_operator_variable_is_never_bound_later() {
    let strat = stratify_text("(CPU $op (1) $x) (H $x $op)");

    assert_eq!(
        printed_levels(&strat),
        vec!["((CPU $op (1) $x))", "((H $x $op))", "()"]
    );
    assert_eq!(
        strat.levels()[0].introduces().iter().collect::<Vec<_>>(),
        vec!["$x"]
    );
    assert!(strat.levels()[1].introduces().is_empty());
}
