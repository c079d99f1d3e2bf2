//! End-to-end scenarios: queries and rules as the reasoning engine
//! produces them, and the strings the matcher receives.
use clause_compiler::{
    encode_pair, encode_str, parse, parse_all, stratify, AddressingMode, CompileError, Compiler,
    CompilerConfig, SyntaxError, Term,
};

fn printed_levels(text: &str) -> Vec<String> {
    let strat = stratify(parse_all(text).expect("ok"), &CompilerConfig::default());
    strat
        .levels()
        .iter()
        .map(|level| level.to_term().to_string())
        .collect()
}

#[test]
fn test_non_linear_query() {
    assert_eq!(
        encode_str("(ev $a $b $a)", AddressingMode::Pattern).expect("ok"),
        "[4] ev $ $ _1"
    );
    assert_eq!(
        encode_str("(ev $a $b $a)", AddressingMode::Template).expect("ok"),
        "[4] ev _1 _2 _1"
    );
}

#[test]
fn test_proof_query() {
    assert_eq!(
        encode_str("(: $prf F $tv)", AddressingMode::Pattern).expect("ok"),
        "[4] : $ F $"
    );
    assert_eq!(
        encode_str("(: $prf F $tv)", AddressingMode::Template).expect("ok"),
        "[4] : _1 F _2"
    );
}

#[test]
fn test_conjunctive_query() {
    let encoding = encode_pair(
        &parse("(: $prf (And (Name $bob_obj Bob) (Name $tennis_obj Tennis) (Play $bob_obj $tennis_obj)) $tv)")
            .expect("ok"),
    );

    assert_eq!(
        encoding.pattern,
        "[4] : $ [4] And [3] Name $ Bob [3] Name $ Tennis [3] Play _2 _3 $"
    );
    assert_eq!(
        encoding.template,
        "[4] : _1 [4] And [3] Name _2 Bob [3] Name _3 Tennis [3] Play _2 _3 _4"
    );
    assert_eq!(
        encoding.variables,
        vec!["$prf", "$bob_obj", "$tennis_obj", "$tv"]
    );
}

#[test]
fn test_ground_implications_share_level() {
    assert_eq!(
        printed_levels("(Implication A B) (Implication B C)"),
        vec!["((Implication A B) (Implication B C))", "()"]
    );
}

#[test]
fn test_computation_waits_then_drops() {
    // `$t` is bound by the second level, so the computation waits.
    assert_eq!(
        printed_levels("(CPU mul ($s $t) $u) (P $s) (Q $s $t)"),
        vec!["((P $s))", "((Q $s $t))", "((CPU mul ($s $t) $u))", "()"]
    );

    // Nothing ever binds `$never`.
    let strat = stratify(
        parse_all("(P $s) (CPU mul ($s $never) $u)").expect("ok"),
        &CompilerConfig::default(),
    );
    assert_eq!(strat.scheduled_count(), 1);
    assert!(!strat.is_complete());
    assert!(strat
        .levels()
        .iter()
        .all(|level| level.clauses().iter().all(|clause| !clause.is_computation())));
}

#[test]
fn test_custom_computation_tag() {
    let config = CompilerConfig::from_json(r#"{ "computation_tag": "Compute" }"#).expect("ok");
    let strat = stratify(
        parse_all("(Compute f $a $b) (CPU f $a $b)").expect("ok"),
        &config,
    );

    // `CPU` is now a generic clause, and binds `$a` for `Compute`.
    let printed: Vec<String> = strat
        .levels()
        .iter()
        .map(|level| level.to_term().to_string())
        .collect();
    assert_eq!(printed, vec!["((CPU f $a $b))", "((Compute f $a $b))", "()"]);
}

#[test]
fn test_restructure_truth_value_rule() {
    let compiler = Compiler::default();
    let printed = compiler
        .restructure_rule_str(
            "(((: $p1 (A $a) (STV $s1 $c1)) (: $p2 (B $b) (STV $s2 $c2)) \
             (CPU mul ($s1 $s2) $s) (CPU min ($c1 $c2) $c)) \
             (: (rule $p1 $p2) (R $a $b) (STV $s $c)))",
        )
        .expect("ok");

    assert_eq!(
        printed,
        "((((: $p1 (A $a) (STV $s1 $c1)) (: $p2 (B $b) (STV $s2 $c2))) \
         ((CPU mul ($s1 $s2) $s) (CPU min ($c1 $c2) $c)) ()) \
         (: (rule $p1 $p2) (R $a $b) (STV $s $c)))"
    );
}

#[test]
fn test_compile_query_pair() {
    let compiler = Compiler::default();
    let encoding = compiler
        .compile_query_str("(goal (: $prf C $tv) $depth)")
        .expect("ok");

    assert_eq!(encoding.pattern, "[3] ev [4] : $ C $ $");
    assert_eq!(encoding.template, "[3] ev [4] : _1 C _2 _3");
}

#[test]
fn test_unbalanced_input() {
    assert_eq!(
        parse("(a (b c"),
        Err(SyntaxError::UnexpectedEnd { offset: 7 })
    );
    assert!(encode_str("(a (b c", AddressingMode::Pattern).is_err());
    assert!(matches!(
        Compiler::default().compile_query_str("(a (b c"),
        Err(CompileError::Syntax(SyntaxError::UnexpectedEnd { .. }))
    ));
}

#[test]
fn test_knowledge_base_file() {
    let kb = "(: a_b (Implication A B) (STV 1.0 1.0))\n\
              (: a_b_c (Implication (Implication A B) C) (STV 1.0 1.0))\n";
    let atoms: Vec<Term> = parse_all(kb).expect("ok");

    assert_eq!(atoms.len(), 2);
    assert_eq!(
        encode_pair(&atoms[1]).template,
        "[4] : a_b_c [3] Implication [3] Implication A B C [3] STV 1.0 1.0"
    );
}
