//! A single depth-first, left-to-right traversal emits both addressing
//! modes at once, so a variable always maps to the same index in the
//! pattern and in the template.  Index assignment is local to one
//! traversal.
use super::{AddressingMode, WireEncoding, WILDCARD};
use crate::error::SyntaxError;
use crate::term::{is_variable, parse, Step, Term};
use std::collections::BTreeMap;
use tracing::trace;

struct Encoder<'a> {
    /// Index of each variable seen so far, starting at 1.
    indices: BTreeMap<&'a str, usize>,
    /// Variables in first-occurrence (index) order.
    variables: Vec<&'a str>,
    pattern: String,
    template: String,
}

impl<'a> Encoder<'a> {
    fn new() -> Self {
        Self {
            indices: BTreeMap::new(),
            variables: Vec::new(),
            pattern: String::new(),
            template: String::new(),
        }
    }

    fn push_both(&mut self, token: &str) {
        self.pattern.push_str(token);
        self.template.push_str(token);
    }

    fn visit(&mut self, term: &'a Term) {
        for step in term.walk() {
            match step {
                Step::Atom { text, sibling } => {
                    if sibling {
                        self.push_both(" ");
                    }
                    self.atom(text);
                }
                Step::Open { len, sibling } => {
                    if sibling {
                        self.push_both(" ");
                    }
                    self.push_both(&format!("[{}] ", len));
                }
                Step::Close => {}
            }
        }
    }

    fn atom(&mut self, text: &'a str) {
        if !is_variable(text) {
            self.push_both(text);
            return;
        }

        match self.indices.get(text) {
            Some(index) => {
                let back_reference = format!("_{}", index);
                self.push_both(&back_reference);
            }
            None => {
                self.variables.push(text);
                let index = self.variables.len();
                self.indices.insert(text, index);
                // First occurrence: an open slot in the pattern, a
                // fresh index in the template.
                self.pattern.push(WILDCARD);
                self.template.push_str(&format!("_{}", index));
            }
        }
    }

    fn finish(self) -> WireEncoding {
        WireEncoding {
            pattern: self.pattern,
            template: self.template,
            variables: self.variables.into_iter().map(String::from).collect(),
        }
    }
}

/// Encodes `term` in both addressing modes, with a shared variable
/// index assignment.
#[must_use]
pub fn encode_pair(term: &Term) -> WireEncoding {
    let mut encoder = Encoder::new();
    encoder.visit(term);

    let encoding = encoder.finish();
    trace!(
        term = %term,
        pattern = %encoding.pattern,
        template = %encoding.template,
        "encoded term"
    );
    encoding
}

/// Encodes `term` in a single addressing `mode`.
#[must_use]
pub fn encode(term: &Term, mode: AddressingMode) -> String {
    encode_pair(term).into_mode(mode)
}

/// Parses `text` and encodes the result in `mode`.
///
/// # Errors
///
/// Returns `Err` when `text` is not a single well-formed term.
pub fn encode_str(text: &str, mode: AddressingMode) -> Result<String, SyntaxError> {
    Ok(encode(&parse(text)?, mode))
}

#[test]
fn test_non_linear_pattern() {
    let term = parse("(ev $a $b $a)").expect("ok");

    assert_eq!(encode(&term, AddressingMode::Pattern), "[4] ev $ $ _1");
    assert_eq!(encode(&term, AddressingMode::Template), "[4] ev _1 _2 _1");
}

#[test]
fn test_typed_query() {
    let encoding = encode_pair(&parse("(: $prf F $tv)").expect("ok"));

    assert_eq!(encoding.pattern, "[4] : $ F $");
    assert_eq!(encoding.template, "[4] : _1 F _2");
    assert_eq!(encoding.variables, vec!["$prf", "$tv"]);
}

#[test]
fn test_nested_back_references() {
    let encoding = encode_pair(
        &parse("(: $prf (Implication (Day $d) (WakeUp $who $d)) $tv)").expect("ok"),
    );

    assert_eq!(
        encoding.pattern,
        "[4] : $ [3] Implication [2] Day $ [3] WakeUp $ _2 $"
    );
    assert_eq!(
        encoding.template,
        "[4] : _1 [3] Implication [2] Day _2 [3] WakeUp _3 _2 _4"
    );
}

#[test]
fn test_atoms_and_empty_lists() {
    assert_eq!(encode(&Term::atom("foo"), AddressingMode::Pattern), "foo");
    assert_eq!(encode(&Term::atom("$x"), AddressingMode::Pattern), "$");
    assert_eq!(encode(&Term::atom("$x"), AddressingMode::Template), "_1");
    assert_eq!(encode(&Term::list(vec![]), AddressingMode::Template), "[0] ");
    assert_eq!(
        encode_str("(a () b)", AddressingMode::Template).expect("ok"),
        "[3] a [0]  b"
    );
}

#[test]
fn test_fresh_indices_per_call() {
    let term = parse("(p $x $y)").expect("ok");

    assert_eq!(encode_pair(&term), encode_pair(&term));
    assert_eq!(
        encode(&parse("(q $y)").expect("ok"), AddressingMode::Template),
        "[2] q _1"
    );
}

#[test]
fn test_encode_str_syntax_error() {
    assert_eq!(
        encode_str("(a (b c", AddressingMode::Pattern),
        Err(SyntaxError::UnexpectedEnd { offset: 7 })
    );
    assert_eq!(
        encode_str("", AddressingMode::Template),
        Err(SyntaxError::EmptyInput)
    );
}

#[test]
fn test_deeply_nested_encoding() {
    const DEPTH: usize = 100_000;
    let term = parse(&format!("{}$x{}", "(".repeat(DEPTH), ")".repeat(DEPTH))).expect("ok");
    let encoding = encode_pair(&term);

    assert_eq!(encoding.pattern, format!("{}$", "[1] ".repeat(DEPTH)));
    assert_eq!(encoding.template, format!("{}_1", "[1] ".repeat(DEPTH)));
    assert_eq!(encoding.variables, vec!["$x"]);
}
