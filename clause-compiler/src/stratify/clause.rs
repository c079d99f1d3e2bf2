//! Clauses are classified once, when they enter the stratifier.  A
//! computation clause `(tag operator input output)` only binds its
//! output once its input is fully bound; every other term is a
//! generic clause, which binds all its variables as soon as it is
//! scheduled.
use crate::term::{variables_of, Term};
use std::collections::BTreeSet;
use std::convert::TryFrom;
use std::fmt;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Clause {
    Generic(Term),
    Computation {
        tag: String,
        operator: Term,
        input: Term,
        output: Term,
    },
}

impl Clause {
    /// Classifies `term`: a four-element list whose functor is
    /// `computation_tag` is a computation clause, anything else is
    /// generic.
    #[must_use]
    pub fn classify(term: Term, computation_tag: &str) -> Self {
        let four = term.as_list().map_or(false, |items| items.len() == 4);
        if !four || term.functor() != Some(computation_tag) {
            return Clause::Generic(term);
        }

        match term.into_list().map(<[Term; 4]>::try_from) {
            Ok(Ok([_, operator, input, output])) => Clause::Computation {
                tag: computation_tag.to_owned(),
                operator,
                input,
                output,
            },
            Ok(Err(items)) => Clause::Generic(Term::List(items)),
            Err(term) => Clause::Generic(term),
        }
    }

    #[must_use]
    pub fn is_computation(&self) -> bool {
        matches!(self, Clause::Computation { .. })
    }

    /// Returns the variables that must already be bound before the
    /// clause may be scheduled.
    #[must_use]
    pub fn requires(&self) -> BTreeSet<&str> {
        match self {
            Clause::Generic(_) => BTreeSet::new(),
            Clause::Computation { input, .. } => variables_of(input),
        }
    }

    /// Returns the variables the clause binds once scheduled (some may
    /// already be bound).
    #[must_use]
    pub fn produces(&self) -> BTreeSet<&str> {
        match self {
            Clause::Generic(term) => variables_of(term),
            Clause::Computation { output, .. } => variables_of(output),
        }
    }

    /// Returns every variable referenced anywhere in the clause.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        match self {
            Clause::Generic(term) => variables_of(term),
            Clause::Computation {
                operator,
                input,
                output,
                ..
            } => {
                let mut vars = variables_of(operator);
                vars.extend(variables_of(input));
                vars.extend(variables_of(output));
                vars
            }
        }
    }

    /// Rebuilds the term the clause was classified from.
    #[must_use]
    pub fn to_term(&self) -> Term {
        match self {
            Clause::Generic(term) => term.clone(),
            Clause::Computation {
                tag,
                operator,
                input,
                output,
            } => Term::list(vec![
                Term::atom(tag),
                operator.clone(),
                input.clone(),
                output.clone(),
            ]),
        }
    }

    #[must_use]
    pub fn into_term(self) -> Term {
        match self {
            Clause::Generic(term) => term,
            Clause::Computation {
                tag,
                operator,
                input,
                output,
            } => Term::list(vec![Term::Atom(tag), operator, input, output]),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_term())
    }
}

#[cfg(test)]
fn clause(text: &str) -> Clause {
    Clause::classify(crate::term::parse(text).expect("ok"), "CPU")
}

#[test]
fn test_classify_computation() {
    let cpu = clause("(CPU mul ($a $b) $c)");

    assert!(cpu.is_computation());
    assert_eq!(cpu.requires().into_iter().collect::<Vec<_>>(), vec!["$a", "$b"]);
    assert_eq!(cpu.produces().into_iter().collect::<Vec<_>>(), vec!["$c"]);
    assert_eq!(cpu.to_string(), "(CPU mul ($a $b) $c)");
}

#[test]
fn test_classify_generic() {
    // Wrong arity or tag: generic.
    for text in &["(CPU mul $a)", "(CPU mul $a $b $c)", "(cpu mul $a $b)", "CPU", "()"] {
        let generic = clause(text);
        assert!(!generic.is_computation(), "{}", text);
        assert!(generic.requires().is_empty());
        assert_eq!(generic.produces(), generic.variables());
        assert_eq!(generic.to_string(), *text);
    }
}

#[test]
fn test_computation_variables() {
    let cpu = clause("(CPU $op ($a 0.5) ($c $a))");

    assert_eq!(
        cpu.variables().into_iter().collect::<Vec<_>>(),
        vec!["$a", "$c", "$op"]
    );
    assert_eq!(cpu.produces().into_iter().collect::<Vec<_>>(), vec!["$a", "$c"]);
}

#[test]
fn test_round_trip_term() {
    let term = crate::term::parse("(CPU min (0.2 $x) $y)").expect("ok");
    let cpu = Clause::classify(term.clone(), "CPU");

    assert_eq!(cpu.to_term(), term);
    assert_eq!(cpu.into_term(), term);
}
