//! The reasoning engine compiles each rule into a term whose first
//! element lists the rule's premise clauses, `((c1 c2 ...) rest...)`.
//! Before the rule goes to the matcher, the premises are replaced with
//! their stratification, so that the matcher evaluates them level by
//! level.
//!
//! Queries go the other way: the matcher receives them as a
//! pattern/template pair, with the engine's goal functor renamed to
//! the matcher's.
use crate::config::CompilerConfig;
use crate::error::{CompileError, ConfigError};
use crate::stratify::{stratify, Clause, Stratification};
use crate::term::{parse, Term};
use crate::wire::{encode_pair, WireEncoding};
use tracing::debug;

/// A compiled rule whose premises have been stratified.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Restructured {
    pub rule: Term,
    /// Premise clauses missing from the stratification.
    pub dropped: Vec<Clause>,
}

#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// # Errors
    ///
    /// Returns `Err` if `config` is invalid.
    pub fn new(config: CompilerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[cfg(not(tarpaulin_include))]
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    #[must_use]
    pub fn stratify(&self, clauses: Vec<Term>) -> Stratification {
        stratify(clauses, &self.config)
    }

    /// Replaces the premise list at the head of `rule` with its
    /// stratification.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `rule` is not a non-empty list whose first
    /// element is a list.
    pub fn restructure_rule(&self, rule: Term) -> Result<Restructured, CompileError> {
        let mut items = rule
            .into_list()
            .map_err(|atom| malformed(&atom, "rule is an atom"))?
            .into_iter();

        match items.next().map(Term::into_list) {
            Some(Ok(premises)) => {
                let premise_count = premises.len();
                let stratification = self.stratify(premises);
                debug!(
                    premises = premise_count,
                    levels = stratification.levels().len(),
                    dropped = stratification.dropped().len(),
                    "restructured rule"
                );

                let mut rebuilt = vec![stratification.to_term()];
                rebuilt.extend(items);
                let (_, dropped) = stratification.into_parts();

                Ok(Restructured {
                    rule: Term::List(rebuilt),
                    dropped,
                })
            }
            Some(Err(first)) => {
                let rule = Term::List(std::iter::once(first).chain(items).collect());
                Err(malformed(&rule, "first element is not a list of clauses"))
            }
            None => Err(malformed(&Term::list(Vec::new()), "rule is an empty list")),
        }
    }

    /// Parses `text` as a compiled rule, and prints the restructured
    /// rule.
    ///
    /// # Errors
    ///
    /// Returns `Err` on syntax errors, or if the rule is malformed.
    pub fn restructure_rule_str(&self, text: &str) -> Result<String, CompileError> {
        let restructured = self.restructure_rule(parse(text)?)?;
        Ok(restructured.rule.to_string())
    }

    /// Renames the goal functor of `query`, if configured, and encodes
    /// the result as a pattern/template pair.
    #[must_use]
    pub fn compile_query(&self, query: &Term) -> WireEncoding {
        match &self.config.query_functor {
            Some(rename) => encode_pair(&query.rename_atoms(&rename.from, &rename.to)),
            None => encode_pair(query),
        }
    }

    /// # Errors
    ///
    /// Returns `Err` when `text` is not a single well-formed term.
    pub fn compile_query_str(&self, text: &str) -> Result<WireEncoding, CompileError> {
        Ok(self.compile_query(&parse(text)?))
    }
}

fn malformed(rule: &Term, reason: &'static str) -> CompileError {
    CompileError::MalformedRule {
        rule: rule.to_string(),
        reason,
    }
}

#[test]
fn test_restructure_rule() {
    let compiler = Compiler::default();
    let printed = compiler
        .restructure_rule_str("(((R $a $b) (A $a) (B $b)) (: rule (R $a $b)) (STV 1.0 1.0))")
        .expect("ok");

    assert_eq!(
        printed,
        "((((A $a) (B $b)) ((R $a $b)) ()) (: rule (R $a $b)) (STV 1.0 1.0))"
    );
}

#[test]
fn test_restructure_reports_dropped() {
    let compiler = Compiler::default();
    let restructured = compiler
        .restructure_rule(parse("(((CPU mul ($x $y) $z) (A $x)) head)").expect("ok"))
        .expect("ok");

    assert_eq!(restructured.rule.to_string(), "((((A $x)) ()) head)");
    assert_eq!(restructured.dropped.len(), 1);
    assert_eq!(restructured.dropped[0].to_string(), "(CPU mul ($x $y) $z)");
}

#[test]
fn test_restructure_empty_premises() {
    let compiler = Compiler::default();

    assert_eq!(
        compiler.restructure_rule_str("(() head)").expect("ok"),
        "((()) head)"
    );
}

#[test]
fn test_restructure_malformed() {
    let compiler = Compiler::default();

    for text in &["atom", "()", "(head (A $a))"] {
        assert!(
            matches!(
                compiler.restructure_rule_str(text),
                Err(CompileError::MalformedRule { .. })
            ),
            "{}",
            text
        );
    }

    assert!(matches!(
        compiler.restructure_rule_str("((A $a)"),
        Err(CompileError::Syntax(_))
    ));
}

#[test]
fn test_malformed_rule_message() {
    let compiler = Compiler::default();
    let err = compiler
        .restructure_rule(parse("(head (A $a))").expect("ok"))
        .expect_err("malformed");

    assert_eq!(
        err.to_string(),
        "malformed compiled rule `(head (A $a))`: first element is not a list of clauses"
    );
}

#[test]
fn test_compile_query_renames_goal() {
    let compiler = Compiler::default();
    let encoding = compiler
        .compile_query_str("(goal (: $prf C $tv))")
        .expect("ok");

    assert_eq!(encoding.pattern, "[2] ev [4] : $ C $");
    assert_eq!(encoding.template, "[2] ev [4] : _1 C _2");
}

#[test]
fn test_compile_query_without_rename() {
    let config = CompilerConfig {
        query_functor: None,
        ..CompilerConfig::default()
    };
    let compiler = Compiler::new(config).expect("ok");
    let encoding = compiler.compile_query_str("(goal $x)").expect("ok");

    assert_eq!(encoding.pattern, "[2] goal $");
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = CompilerConfig {
        computation_tag: String::new(),
        ..CompilerConfig::default()
    };

    assert!(Compiler::new(config).is_err());
}

#[test]
fn test_restructure_malformed_reasons() {
    let compiler = Compiler::default();
    let reason = |text: &str| match compiler.restructure_rule_str(text) {
        Err(CompileError::MalformedRule { reason, .. }) => reason,
        other => panic!("{:?}", other),
    };

    assert_eq!(reason("atom"), "rule is an atom");
    assert_eq!(reason("()"), "rule is an empty list");
    assert_eq!(reason("(head)"), "first element is not a list of clauses");
}
