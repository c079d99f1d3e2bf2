//! Pre-order traversal of a term, driven by an explicit stack of
//! sibling iterators instead of recursion.
use super::Term;
use std::slice;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step<'a> {
    /// `sibling` is false for the root and for the first child of
    /// each list.
    Atom { text: &'a str, sibling: bool },
    /// Entering a list of `len` children.
    Open { len: usize, sibling: bool },
    /// Leaving the innermost open list.
    Close,
}

pub(crate) struct Walk<'a> {
    root: Option<&'a Term>,
    /// Remaining children of each open list, and whether one was
    /// already yielded.
    stack: Vec<(slice::Iter<'a, Term>, bool)>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(root: &'a Term) -> Self {
        Walk {
            root: Some(root),
            stack: Vec::new(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (term, sibling) = match self.root.take() {
            Some(root) => (root, false),
            None => {
                let (children, started) = self.stack.last_mut()?;
                match children.next() {
                    Some(child) => (child, std::mem::replace(started, true)),
                    None => {
                        self.stack.pop();
                        return Some(Step::Close);
                    }
                }
            }
        };

        Some(match term {
            Term::Atom(text) => Step::Atom {
                text: text.as_str(),
                sibling,
            },
            Term::List(items) => {
                self.stack.push((items.iter(), false));
                Step::Open {
                    len: items.len(),
                    sibling,
                }
            }
        })
    }
}

#[test]
fn test_walk_steps() {
    let term = super::parse("(a (b) ())").expect("ok");
    let steps: Vec<Step<'_>> = term.walk().collect();

    assert_eq!(
        steps,
        vec![
            Step::Open { len: 3, sibling: false },
            Step::Atom { text: "a", sibling: false },
            Step::Open { len: 1, sibling: true },
            Step::Atom { text: "b", sibling: false },
            Step::Close,
            Step::Open { len: 0, sibling: true },
            Step::Close,
            Step::Close,
        ]
    );
}

#[test]
fn test_walk_atom() {
    let term = Term::atom("$x");

    assert_eq!(
        term.walk().collect::<Vec<_>>(),
        vec![Step::Atom { text: "$x", sibling: false }]
    );
}
