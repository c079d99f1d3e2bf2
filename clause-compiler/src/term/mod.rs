//! Terms are the universal currency between the reasoning engine and
//! the external matcher: an opaque `Atom`, or an ordered `List` of
//! terms.  By convention, the first element of a list is its functor
//! (tag), and the rest are its arguments, so order is significant.
//!
//! Logic variables are not a separate variant: a variable is any atom
//! spelled with a leading `$` sigil, and two occurrences with the same
//! spelling are the same variable.  Nothing in this crate renames
//! variables.
//!
//! Terms are immutable values: parsing builds them once, and every
//! transformation returns a fresh term.
//!
//! Nesting depth is only bounded by memory.  Traversals that would
//! naturally recurse (printing, cloning, dropping, variable analysis,
//! encoding) go through `Walk` instead, which keeps its stack on the
//! heap.
mod parse;
mod variable;
mod walk;

pub use parse::parse;
pub use parse::parse_all;
pub use variable::is_variable;
pub use variable::variables_of;
pub use variable::variables_of_all;
pub use variable::VARIABLE_SIGIL;
pub(crate) use walk::{Step, Walk};

use crate::error::SyntaxError;
use std::collections::BTreeSet;
use std::fmt;
use std::mem;
use std::str::FromStr;

#[derive(Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Term {
    Atom(String),
    List(Vec<Term>),
}

impl Term {
    #[must_use]
    pub fn atom(text: &str) -> Self {
        Term::Atom(text.into())
    }

    #[must_use]
    pub fn list(items: Vec<Term>) -> Self {
        Term::List(items)
    }

    #[must_use]
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(text) => Some(text.as_str()),
            Term::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::Atom(_) => None,
            Term::List(items) => Some(items.as_slice()),
        }
    }

    /// Returns the functor of a non-empty list, if that first element
    /// is an atom.
    #[must_use]
    pub fn functor(&self) -> Option<&str> {
        self.as_list()?.first()?.as_atom()
    }

    /// Returns true iff `self` is a variable atom.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.as_atom().map_or(false, is_variable)
    }

    /// Returns the set of variable names anywhere in `self`.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<&str> {
        variables_of(self)
    }

    /// Returns the children of a list, or gives back `self` if it is
    /// an atom.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` for atoms.
    pub fn into_list(mut self) -> Result<Vec<Term>, Term> {
        if let Term::List(items) = &mut self {
            return Ok(mem::take(items));
        }

        Err(self)
    }

    /// Returns a pre-order walk over `self` and its descendants.
    pub(crate) fn walk(&self) -> Walk<'_> {
        Walk::new(self)
    }

    /// Returns a copy of `self` where every atom spelled exactly
    /// `from` is replaced with `to`.
    #[must_use]
    pub fn rename_atoms(&self, from: &str, to: &str) -> Term {
        self.map_atoms(|text| (if text == from { to } else { text }).to_owned())
    }

    /// Rebuilds `self` bottom-up, with every atom's text replaced by
    /// `rewrite(text)`.
    fn map_atoms<F: FnMut(&str) -> String>(&self, mut rewrite: F) -> Term {
        // Children built so far for each open list, innermost last.
        let mut open: Vec<Vec<Term>> = Vec::new();

        for step in self.walk() {
            let complete = match step {
                Step::Open { len, .. } => {
                    open.push(Vec::with_capacity(len));
                    continue;
                }
                Step::Close => Term::List(open.pop().unwrap_or_default()),
                Step::Atom { text, .. } => Term::Atom(rewrite(text)),
            };

            match open.last_mut() {
                Some(parent) => parent.push(complete),
                None => return complete,
            }
        }

        // The walk always ends by completing the root.
        Term::List(Vec::new())
    }
}

impl Clone for Term {
    fn clone(&self) -> Self {
        self.map_atoms(str::to_owned)
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        let mut pending = match self {
            Term::List(items) if items.iter().any(|item| item.as_list().is_some()) => {
                mem::take(items)
            }
            _ => return,
        };

        // Each popped term has its children moved out before it goes
        // out of scope, so its own drop never recurses.
        while let Some(mut term) = pending.pop() {
            if let Term::List(items) = &mut term {
                pending.append(items);
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in self.walk() {
            match step {
                Step::Atom { text, sibling } => {
                    if sibling {
                        f.write_str(" ")?;
                    }
                    f.write_str(text)?;
                }
                Step::Open { sibling, .. } => f.write_str(if sibling { " (" } else { "(" })?,
                Step::Close => f.write_str(")")?,
            }
        }

        Ok(())
    }
}

impl FromStr for Term {
    type Err = SyntaxError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse(text)
    }
}

#[test]
fn test_print() {
    let term = Term::list(vec![
        Term::atom("Implication"),
        Term::list(vec![Term::atom("A"), Term::atom("$x")]),
        Term::list(vec![]),
    ]);

    assert_eq!(term.to_string(), "(Implication (A $x) ())");
    assert_eq!(Term::list(vec![]).to_string(), "()");
    assert_eq!(Term::atom("foo").to_string(), "foo");
}

#[test]
fn test_print_normalizes_whitespace() {
    let term: Term = "(  a\n(b   c )( ) )".parse().expect("ok");

    assert_eq!(term.to_string(), "(a (b c) ())");
    assert_eq!(parse(&term.to_string()).expect("ok"), term);
}

#[test]
fn test_functor() {
    assert_eq!(parse("(CPU mul ($a $b) $c)").expect("ok").functor(), Some("CPU"));
    assert_eq!(parse("((a) b)").expect("ok").functor(), None);
    assert_eq!(parse("()").expect("ok").functor(), None);
    assert_eq!(Term::atom("CPU").functor(), None);
}

#[test]
fn test_is_variable_term() {
    assert!(Term::atom("$x").is_variable());
    assert!(!Term::atom("x").is_variable());
    assert!(!Term::list(vec![Term::atom("$x")]).is_variable());
}

#[test]
fn test_rename_atoms() {
    let term = parse("(goal (goalpost goal) $goal)").expect("ok");

    assert_eq!(
        term.rename_atoms("goal", "ev").to_string(),
        "(ev (goalpost ev) $goal)"
    );
}

#[test]
fn test_into_list() {
    let items = parse("(a (b) c)").expect("ok").into_list().expect("list");

    assert_eq!(items.len(), 3);
    assert_eq!(items[1].to_string(), "(b)");
    assert_eq!(
        Term::atom("a").into_list().expect_err("atom"),
        Term::atom("a")
    );
}

#[test]
fn test_clone_is_deep() {
    let term = parse("(a (b $c) () d)").expect("ok");
    let copy = term.clone();
    drop(term);

    assert_eq!(copy.to_string(), "(a (b $c) () d)");
}

#[test]
fn test_deeply_nested_term() {
    // Far deeper than a recursive traversal survives on a test thread.
    const DEPTH: usize = 200_000;
    let text = format!("{}$x{}", "(".repeat(DEPTH), ")".repeat(DEPTH));
    let term = parse(&text).expect("ok");

    assert_eq!(term.to_string(), text);
    assert_eq!(term.variables().into_iter().collect::<Vec<_>>(), vec!["$x"]);

    let renamed = term.rename_atoms("$x", "$y");
    assert!(renamed.to_string().contains("$y"));
    assert_eq!(renamed.clone().to_string().len(), text.len());

    drop(term);
    drop(renamed);
}
