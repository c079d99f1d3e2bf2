//! Logic variables are atoms with a leading sigil.  They carry no
//! identity beyond their spelling.
//!
//! Variable sets are ordered (`BTreeSet`) rather than hashed, for
//! reproducibility: iterating over the same set always yields the
//! same sequence.
use super::{Step, Term};
use std::collections::BTreeSet;

pub const VARIABLE_SIGIL: char = '$';

/// Returns true iff `atom` is non-empty and starts with the variable
/// sigil.
#[inline]
#[must_use]
pub fn is_variable(atom: &str) -> bool {
    atom.starts_with(VARIABLE_SIGIL)
}

/// Returns the set of variable names anywhere in `term`.
#[must_use]
pub fn variables_of(term: &Term) -> BTreeSet<&str> {
    insert_variables(term, BTreeSet::new())
}

/// Returns the union of `variables_of` over all `terms`.
#[must_use]
pub fn variables_of_all(terms: &[Term]) -> BTreeSet<&str> {
    terms
        .iter()
        .fold(BTreeSet::new(), |acc, term| insert_variables(term, acc))
}

/// Inserts all variables in `term` into `dst`.
fn insert_variables<'a>(term: &'a Term, mut dst: BTreeSet<&'a str>) -> BTreeSet<&'a str> {
    dst.extend(term.walk().filter_map(|step| match step {
        Step::Atom { text, .. } if is_variable(text) => Some(text),
        _ => None,
    }));

    dst
}

#[test]
fn test_is_variable() {
    assert!(is_variable("$x"));
    assert!(is_variable("$"));
    assert!(!is_variable(""));
    assert!(!is_variable("x$"));
    assert!(!is_variable("_1"));
}

#[test]
fn test_variables_of_nested() {
    let term = super::parse("(R $a (S $b (T $a)) c $c)").expect("ok");
    let vars: Vec<&str> = variables_of(&term).into_iter().collect();

    assert_eq!(vars, vec!["$a", "$b", "$c"]);
}

#[test]
fn test_variables_of_ground() {
    assert!(variables_of(&super::parse("(Implication A B)").expect("ok")).is_empty());
    assert!(variables_of(&Term::list(vec![])).is_empty());
}

#[test]
fn test_variables_of_all() {
    let terms = super::parse_all("(A $a) (B $b) (R $a $x)").expect("ok");
    let vars: Vec<&str> = variables_of_all(&terms).into_iter().collect();

    assert_eq!(vars, vec!["$a", "$b", "$x"]);
}
