use fpmine::{
    analyze, compute_metrics, generate_all_rules, mine_patterns, rules_from_mapping, Engine,
    MiningConfig, SupportThreshold, TransactionDb,
};

#[test]
fn metrics_follow_rule_order() {
    let transactions = vec![
        vec!["bread", "milk"],
        vec!["bread", "milk", "eggs"],
        vec!["bread", "eggs"],
        vec!["milk"],
        vec!["bread", "milk"],
    ];
    let db = TransactionDb::new(&transactions);
    let patterns = mine_patterns(&transactions, 2, Engine::Tree).unwrap();
    let rules = generate_all_rules(&patterns, 0.5).unwrap();
    let metrics = compute_metrics(&rules, &db);

    assert_eq!(metrics.len(), rules.len());
    for (rule, m) in rules.iter().zip(metrics.iter()) {
        assert_eq!(rule.antecedent, m.antecedent);
        assert_eq!(rule.consequent, m.consequent);
        let expected = f64::from(patterns[&rule.itemset()]) / db.len() as f64;
        assert!((m.support - expected).abs() < 1e-12);
        assert!(m.all_confidence <= 1.0 + 1e-12);
        assert!(m.cosine_similarity <= 1.0 + 1e-12);
        if rule.confidence < 1.0 {
            assert!(m.conviction.is_finite());
        } else {
            assert!(m.conviction.is_infinite());
        }
    }
}

#[test]
fn analysis_from_toml() {
    let transactions = vec![
        vec!["a", "b"],
        vec!["b", "c"],
        vec!["a", "b", "c"],
        vec!["a", "b", "c", "d"],
    ];
    let db = TransactionDb::new(&transactions);
    let config = MiningConfig::from_toml_str(
        r#"
        min_support = { count = 2 }
        min_confidence = 0.8
        engine = "tree"
        "#,
    )
    .unwrap();
    assert_eq!(config.min_support, SupportThreshold::Count(2));

    let analysis = analyze(&config, &db).unwrap();
    let rules = rules_from_mapping(&analysis.rules);
    assert_eq!(rules.len(), 3);
    assert_eq!(analysis.metrics.len(), 3);
    for m in &analysis.metrics {
        assert!((m.lift - 1.0).abs() < 1e-12);
        assert!(m.leverage.abs() < 1e-12);
    }
    assert!(analysis.summary.conviction.is_infinite());
}
