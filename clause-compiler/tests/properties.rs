//! Property-based tests for parsing, variable analysis, stratification
//! and wire encoding.
use clause_compiler::{
    encode_pair, is_variable, parse, stratify, variables_of, CompilerConfig, Stratification, Term,
    WireEncoding,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ===== Strategies =====

fn arb_constant() -> impl Strategy<Value = Term> {
    "[A-Za-z][A-Za-z0-9_.]{0,4}".prop_map(Term::Atom)
}

/// Few distinct names, so that clauses share variables.
fn arb_variable() -> impl Strategy<Value = Term> {
    "\\$[a-f]".prop_map(Term::Atom)
}

fn arb_leaf() -> impl Strategy<Value = Term> {
    prop_oneof![arb_constant(), arb_variable()]
}

fn arb_term() -> impl Strategy<Value = Term> {
    arb_leaf().prop_recursive(4, 64, 5, |inner| {
        prop::collection::vec(inner, 0..5).prop_map(Term::List)
    })
}

/// `(Functor args...)`; the functor never spells `CPU`.
fn arb_generic_clause() -> impl Strategy<Value = Term> {
    (
        "[A-Z][a-z]{0,3}",
        prop::collection::vec(arb_term(), 0..4),
    )
        .prop_map(|(functor, args)| {
            let mut items = vec![Term::Atom(functor)];
            items.extend(args);
            Term::List(items)
        })
}

/// `(CPU op input output)`; the operator may itself hold variables.
fn arb_computation_clause() -> impl Strategy<Value = Term> {
    (arb_term(), arb_term(), arb_term()).prop_map(|(op, input, output)| {
        Term::list(vec![Term::atom("CPU"), op, input, output])
    })
}

fn arb_clause() -> impl Strategy<Value = Term> {
    prop_oneof![
        3 => arb_generic_clause(),
        1 => arb_computation_clause(),
    ]
}

// ===== Helpers =====

fn naive_variables(term: &Term, dst: &mut Vec<String>) {
    match term {
        Term::Atom(text) => {
            if is_variable(text) {
                dst.push(text.clone());
            }
        }
        Term::List(items) => items.iter().for_each(|item| naive_variables(item, dst)),
    }
}

fn sorted_printed<'a, I: IntoIterator<Item = &'a Term>>(terms: I) -> Vec<String> {
    let mut printed: Vec<String> = terms.into_iter().map(Term::to_string).collect();
    printed.sort();
    printed
}

fn scheduled_and_dropped(strat: &Stratification) -> Vec<String> {
    let mut printed: Vec<String> = strat
        .levels()
        .iter()
        .flat_map(|level| level.clauses().iter())
        .chain(strat.dropped().iter())
        .map(|clause| clause.to_string())
        .collect();
    printed.sort();
    printed
}

/// Decodes a wire string back into a term, using `encoding`'s
/// variable names for wildcards and back-references.  Panics on
/// malformed input.
fn decode(text: &str, encoding: &WireEncoding) -> Term {
    fn decode_one<'a, I: Iterator<Item = &'a str>>(
        tokens: &mut I,
        encoding: &WireEncoding,
        next_fresh: &mut usize,
    ) -> Term {
        let token = tokens.next().expect("truncated wire string");
        if let Some(count) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            let count: usize = count.parse().expect("arity");
            let children = (0..count)
                .map(|_| decode_one(tokens, encoding, next_fresh))
                .collect();
            Term::List(children)
        } else if token == "$" {
            *next_fresh += 1;
            Term::atom(encoding.variable(*next_fresh).expect("fresh variable"))
        } else if let Some(index) = token.strip_prefix('_') {
            let index: usize = index.parse().expect("index");
            if index > *next_fresh {
                *next_fresh = index;
            }
            Term::atom(encoding.variable(index).expect("back-reference"))
        } else {
            Term::atom(token)
        }
    }

    let mut tokens = text.split_whitespace();
    let mut next_fresh = 0;
    let term = decode_one(&mut tokens, encoding, &mut next_fresh);
    assert_eq!(tokens.next(), None, "trailing wire tokens");
    term
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_print_parse_round_trip(term in arb_term()) {
        let printed = term.to_string();
        prop_assert_eq!(parse(&printed).expect("ok"), term.clone());
        prop_assert_eq!(parse(&printed).expect("ok").to_string(), printed);
    }

    #[test]
    fn prop_variables_match_naive_enumeration(term in arb_term()) {
        let mut naive = Vec::new();
        naive_variables(&term, &mut naive);
        let naive: BTreeSet<&str> = naive.iter().map(String::as_str).collect();

        prop_assert_eq!(variables_of(&term), naive);
    }

    #[test]
    fn prop_generic_clauses_are_all_scheduled(
        clauses in prop::collection::vec(arb_generic_clause(), 0..12)
    ) {
        let strat = stratify(clauses.clone(), &CompilerConfig::default());

        prop_assert!(strat.is_complete());
        prop_assert_eq!(strat.scheduled_count(), clauses.len());
        prop_assert_eq!(scheduled_and_dropped(&strat), sorted_printed(&clauses));
        prop_assert!(strat.levels().last().expect("sentinel").is_empty());
    }

    #[test]
    fn prop_levels_respect_bindings(
        clauses in prop::collection::vec(arb_clause(), 0..12),
        sort in any::<bool>()
    ) {
        let config = CompilerConfig { sort_by_variable_count: sort, ..CompilerConfig::default() };
        let strat = stratify(clauses.clone(), &config);

        // Every clause lands in at most one level, or is dropped.
        prop_assert_eq!(scheduled_and_dropped(&strat), sorted_printed(&clauses));

        let (sentinel, levels) = strat.levels().split_last().expect("sentinel");
        prop_assert!(sentinel.is_empty());

        // Every variable referenced by an earlier level.
        let mut known = BTreeSet::<String>::new();
        for level in levels {
            prop_assert!(!level.is_empty());

            let mut introduced = BTreeSet::<String>::new();
            for clause in level.clauses() {
                for var in clause.requires() {
                    prop_assert!(known.contains(var), "{} consumes unbound {}", clause, var);
                }

                let new_vars: BTreeSet<String> = clause
                    .produces()
                    .into_iter()
                    .filter(|var| !known.contains(*var))
                    .map(String::from)
                    .collect();
                prop_assert!(new_vars.is_disjoint(&introduced), "{} collides in its level", clause);
                introduced.extend(new_vars);
            }

            prop_assert_eq!(&introduced, level.introduces());
            prop_assert!(
                level.introduces().is_disjoint(&known),
                "level binds {:?} after an earlier reference",
                level.introduces()
            );
            for clause in level.clauses() {
                known.extend(clause.variables().into_iter().map(String::from));
            }
        }
    }

    #[test]
    fn prop_encoding_is_stable(term in arb_term()) {
        prop_assert_eq!(encode_pair(&term), encode_pair(&term));
    }

    #[test]
    fn prop_encoding_decodes_to_term(term in arb_term()) {
        let encoding = encode_pair(&term);

        prop_assert_eq!(decode(&encoding.pattern, &encoding), term.clone());
        prop_assert_eq!(decode(&encoding.template, &encoding), term.clone());

        let distinct: BTreeSet<&String> = encoding.variables.iter().collect();
        prop_assert_eq!(distinct.len(), encoding.variables.len());
        prop_assert_eq!(distinct.len(), variables_of(&term).len());
    }
}

#[test]
fn test_decode_helper() {
    let encoding = encode_pair(&parse("(ev $a (q $b ()) $a)").expect("ok"));

    assert_eq!(encoding.pattern, "[4] ev $ [3] q $ [0]  _1");
    assert_eq!(
        decode(&encoding.pattern, &encoding).to_string(),
        "(ev $a (q $b ()) $a)"
    );
}
