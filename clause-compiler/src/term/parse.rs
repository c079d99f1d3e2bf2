//! Tokenizing and parsing S-expression text.
//!
//! Parentheses are self-delimiting tokens; any other maximal run of
//! non-whitespace, non-parenthesis characters is an atom.  The parser
//! keeps an explicit stack of open lists rather than recursing, so
//! nesting depth is bounded by memory, not by the call stack.
use super::Term;
use crate::error::SyntaxError;
use std::iter::Peekable;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

/// Yields `(byte offset, Token)` pairs.
struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { text, pos: 0 }
    }
}

fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')' || c.is_whitespace()
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;

        let rest = &self.text[self.pos..];
        let start = self.pos;
        let token = match rest.chars().next()? {
            '(' => {
                self.pos += 1;
                Token::Open
            }
            ')' => {
                self.pos += 1;
                Token::Close
            }
            _ => {
                let len = rest.find(is_delimiter).unwrap_or_else(|| rest.len());
                self.pos += len;
                Token::Atom(&rest[..len])
            }
        };

        Some((start, token))
    }
}

/// Consumes exactly one complete term from `tokens`.  `end` is the
/// offset reported when the input runs out mid-term.
fn parse_term<'a, I>(tokens: &mut I, end: usize) -> Result<Term, SyntaxError>
where
    I: Iterator<Item = (usize, Token<'a>)>,
{
    // Each entry is the list of children read so far for one open
    // parenthesis, innermost last.
    let mut open: Vec<Vec<Term>> = Vec::new();

    loop {
        let (offset, token) = tokens
            .next()
            .ok_or(SyntaxError::UnexpectedEnd { offset: end })?;

        let complete = match token {
            Token::Open => {
                open.push(Vec::new());
                continue;
            }
            Token::Close => Term::List(open.pop().ok_or(SyntaxError::UnexpectedClose { offset })?),
            Token::Atom(text) => Term::Atom(text.into()),
        };

        match open.last_mut() {
            Some(parent) => parent.push(complete),
            None => return Ok(complete),
        }
    }
}

fn next_term<'a>(
    tokens: &mut Peekable<Tokens<'a>>,
    end: usize,
) -> Option<Result<Term, SyntaxError>> {
    tokens.peek()?;
    Some(parse_term(tokens, end))
}

/// Parses exactly one top-level term.
///
/// # Errors
///
/// Returns `Err` on empty input, unbalanced parentheses, or trailing
/// tokens after the first complete term.
pub fn parse(text: &str) -> Result<Term, SyntaxError> {
    let mut tokens = Tokens::new(text).peekable();
    let term = next_term(&mut tokens, text.len()).ok_or(SyntaxError::EmptyInput)??;

    match tokens.next() {
        Some((offset, _)) => Err(SyntaxError::TrailingInput { offset }),
        None => Ok(term),
    }
}

/// Parses a whitespace-separated sequence of top-level terms, e.g., a
/// knowledge base file with one atom per line.  Empty input yields an
/// empty vector.
///
/// # Errors
///
/// Returns the first `SyntaxError` encountered.
pub fn parse_all(text: &str) -> Result<Vec<Term>, SyntaxError> {
    let mut tokens = Tokens::new(text).peekable();
    let mut terms = Vec::new();

    while let Some(term) = next_term(&mut tokens, text.len()) {
        terms.push(term?);
    }

    Ok(terms)
}

#[test]
fn test_tokens() {
    let tokens: Vec<_> = Tokens::new(" (a(b) $c)").collect();

    assert_eq!(
        tokens,
        vec![
            (1, Token::Open),
            (2, Token::Atom("a")),
            (3, Token::Open),
            (4, Token::Atom("b")),
            (5, Token::Close),
            (7, Token::Atom("$c")),
            (9, Token::Close),
        ]
    );
}

#[test]
fn test_parse_nested() {
    let term = parse("(: $prf (Implication A B) $tv)").expect("ok");

    assert_eq!(
        term,
        Term::list(vec![
            Term::atom(":"),
            Term::atom("$prf"),
            Term::list(vec![
                Term::atom("Implication"),
                Term::atom("A"),
                Term::atom("B")
            ]),
            Term::atom("$tv"),
        ])
    );
}

#[test]
fn test_parse_atom_and_empty_list() {
    assert_eq!(parse("  foo \n").expect("ok"), Term::atom("foo"));
    assert_eq!(parse("()").expect("ok"), Term::list(vec![]));
    assert_eq!(
        parse("(())").expect("ok"),
        Term::list(vec![Term::list(vec![])])
    );
}

#[test]
fn test_parse_keeps_quotes_in_atoms() {
    assert_eq!(
        parse("(Name bob_obj \"Bob\")").expect("ok"),
        Term::list(vec![
            Term::atom("Name"),
            Term::atom("bob_obj"),
            Term::atom("\"Bob\"")
        ])
    );
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse(""), Err(SyntaxError::EmptyInput));
    assert_eq!(parse(" \t\n"), Err(SyntaxError::EmptyInput));
    assert_eq!(
        parse("(a (b c"),
        Err(SyntaxError::UnexpectedEnd { offset: 7 })
    );
    assert_eq!(parse(")"), Err(SyntaxError::UnexpectedClose { offset: 0 }));
    assert_eq!(
        parse("(a b))"),
        Err(SyntaxError::TrailingInput { offset: 5 })
    );
    assert_eq!(
        parse("(a) (b)"),
        Err(SyntaxError::TrailingInput { offset: 4 })
    );
    assert_eq!(parse("a b"), Err(SyntaxError::TrailingInput { offset: 2 }));
}

#[test]
fn test_parse_all() {
    let terms = parse_all("(: a A (STV 1.0 1.0))\n(: b B (STV 0.5 0.5))\n").expect("ok");
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[1].to_string(), "(: b B (STV 0.5 0.5))");

    assert_eq!(parse_all("  ").expect("ok"), vec![]);
    assert_eq!(
        parse_all("(a) (b"),
        Err(SyntaxError::UnexpectedEnd { offset: 6 })
    );
    assert_eq!(
        parse_all("(a) )"),
        Err(SyntaxError::UnexpectedClose { offset: 4 })
    );
}
