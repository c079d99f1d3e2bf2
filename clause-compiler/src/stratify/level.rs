//! The stratifier's answer: an ordered sequence of levels, always
//! terminated by an empty sentinel level, and the clauses that could
//! never be scheduled.
use super::Clause;
use crate::term::Term;
use std::collections::BTreeSet;

/// A `Level` is a group of clauses that may be evaluated together,
/// once every variable bound by earlier levels is available.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Level {
    clauses: Vec<Clause>,
    /// Variables first bound by this level's clauses.  Each one was
    /// introduced by exactly one clause.
    introduces: BTreeSet<String>,
}

impl Level {
    #[must_use]
    pub fn new(clauses: Vec<Clause>, introduces: BTreeSet<String>) -> Self {
        Self {
            clauses,
            introduces,
        }
    }

    #[cfg(not(tarpaulin_include))]
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[cfg(not(tarpaulin_include))]
    #[must_use]
    pub fn introduces(&self) -> &BTreeSet<String> {
        &self.introduces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns the level as a list of its clauses.
    #[must_use]
    pub fn to_term(&self) -> Term {
        Term::list(self.clauses.iter().map(Clause::to_term).collect())
    }
}

/// The result of a stratification run.  `levels` always ends with an
/// empty level; `dropped` lists the clauses that were never scheduled,
/// in scheduling order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stratification {
    levels: Vec<Level>,
    dropped: Vec<Clause>,
}

impl Stratification {
    /// Returns a new stratification for `levels` (without the
    /// terminal sentinel, which is appended here).
    #[must_use]
    pub fn new(mut levels: Vec<Level>, dropped: Vec<Clause>) -> Self {
        levels.push(Level::default());
        Self { levels, dropped }
    }

    #[cfg(not(tarpaulin_include))]
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[cfg(not(tarpaulin_include))]
    #[must_use]
    pub fn dropped(&self) -> &[Clause] {
        &self.dropped
    }

    /// Returns true iff every input clause was scheduled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }

    /// Returns the number of clauses across all levels.
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.levels.iter().map(Level::len).sum()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Level>, Vec<Clause>) {
        (self.levels, self.dropped)
    }

    /// Renders the levels as a list of lists, e.g.,
    /// `(((A $a) (B $b)) ((R $a $b)) ())`.  Dropped clauses do not
    /// appear.
    #[must_use]
    pub fn to_term(&self) -> Term {
        Term::list(self.levels.iter().map(Level::to_term).collect())
    }
}

#[test]
fn test_empty_stratification() {
    let strat = Stratification::new(Vec::new(), Vec::new());

    assert_eq!(strat.levels().len(), 1);
    assert!(strat.levels()[0].is_empty());
    assert!(strat.is_complete());
    assert_eq!(strat.scheduled_count(), 0);
    assert_eq!(strat.to_term().to_string(), "(())");
}

#[test]
fn test_stratification_to_term() {
    let clause = |text: &str| Clause::classify(crate::term::parse(text).expect("ok"), "CPU");
    let level = Level::new(
        vec![clause("(A $a)"), clause("(B $b)")],
        vec!["$a".to_string(), "$b".to_string()].into_iter().collect(),
    );
    let strat = Stratification::new(vec![level], vec![clause("(CPU f $z $w)")]);

    assert_eq!(strat.to_term().to_string(), "(((A $a) (B $b)) ())");
    assert_eq!(strat.scheduled_count(), 2);
    assert!(!strat.is_complete());

    let (levels, dropped) = strat.into_parts();
    assert_eq!(levels.len(), 2);
    assert_eq!(dropped.len(), 1);
}
