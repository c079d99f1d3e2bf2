//! The external matcher works on a linear, arity-prefixed encoding of
//! terms, and has no notion of variable names: variables are small
//! integer indices, assigned in order of first occurrence.
//!
//! ```text
//! Term ::= Atom | "[" Int "] " Term*
//! ```
//!
//! A list of `n` children encodes as `[n] ` followed by its children,
//! space-joined.  Atoms encode as themselves.  Variables come in two
//! addressing modes:
//!
//! * in a *pattern*, the first occurrence of a variable is an open
//!   wildcard slot, `$`, that binds whatever it matches;
//! * in a *template*, the first occurrence is the placeholder `_<n>`.
//!
//! In both modes, later occurrences are back-references `_<n>` to the
//! value captured at the first occurrence.  This lets patterns be
//! non-linear: `(ev $a $b $a)` encodes as the pattern `[4] ev $ $ _1`,
//! and the template `[4] ev _1 _2 _1`.
mod encoder;

pub use encoder::encode;
pub use encoder::encode_pair;
pub use encoder::encode_str;

/// Marks the first occurrence of a variable in pattern mode.
pub const WILDCARD: char = '$';

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AddressingMode {
    /// Open form, for matching.
    Pattern,
    /// Closed form, for substitution.
    Template,
}

/// The pattern and template encodings of the same term, computed from
/// one index assignment.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct WireEncoding {
    pub pattern: String,
    pub template: String,
    /// Variable names by index: `_1` is `variables[0]`.
    pub variables: Vec<String>,
}

impl WireEncoding {
    #[must_use]
    pub fn into_mode(self, mode: AddressingMode) -> String {
        match mode {
            AddressingMode::Pattern => self.pattern,
            AddressingMode::Template => self.template,
        }
    }

    /// Returns the variable name for back-reference `index` (1-based).
    #[must_use]
    pub fn variable(&self, index: usize) -> Option<&str> {
        let slot = index.checked_sub(1)?;
        self.variables.get(slot).map(String::as_str)
    }
}

#[test]
fn test_variable_lookup() {
    let encoding = encode_pair(&crate::term::parse("(ev $a $b $a)").expect("ok"));

    assert_eq!(encoding.variable(0), None);
    assert_eq!(encoding.variable(1), Some("$a"));
    assert_eq!(encoding.variable(2), Some("$b"));
    assert_eq!(encoding.variable(3), None);
}
