//! Tests for pipeline configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        random_seed = 42

        [data]
        dataset = "percent.json"
        fold_count = 4

        [nlp]
        endpoint = "http://parser:9000"
        timeout_seconds = 30

        [scoring]
        require_order_match = true
        [scoring.eligibility]
        type = "never"

        [training]
        epochs = 50
        learning_rate = 0.05
    "#;

    let config = EqRankConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.data.dataset, PathBuf::from("percent.json"));
    assert_eq!(config.data.fold_count, 4);
    // unspecified fields keep their defaults
    assert_eq!(config.data.max_candidates, 100);
    assert_eq!(config.nlp.timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.scoring.eligibility, EligibilityPolicy::Never);
    assert_eq!(config.training.epochs, 50);
    assert_eq!(config.training.batch_size, 32);
    config.validate().unwrap();
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        random_seed: 7
        data:
          ilp_dir: solver-out
        scoring:
          require_order_match: false
          eligibility:
            type: up_to_problem_id
            max_id: 278
    "#;

    let config = EqRankConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.seed(), 7);
    assert_eq!(config.data.ilp_dir, PathBuf::from("solver-out"));
    assert!(!config.scoring.require_order_match);
    assert_eq!(
        config.scoring.eligibility,
        EligibilityPolicy::UpToProblemId { max_id: 278 }
    );
}

#[test]
fn test_defaults() {
    let config = EqRankConfig::default();
    assert_eq!(config.seed(), EqRankConfig::DEFAULT_SEED);
    assert_eq!(config.nlp.endpoint, "http://localhost:8080");
    assert!(config.scoring.require_order_match);
    assert_eq!(config.scoring.eligibility, EligibilityPolicy::Always);
    config.validate().unwrap();
}

#[test]
fn test_builder() {
    let config = EqRankConfig::new()
        .with_random_seed(123)
        .with_eligibility(EligibilityPolicy::UpToProblemId { max_id: 10 })
        .with_nlp_endpoint("http://nlp:8080")
        .with_data_root("/tmp/run");

    assert_eq!(config.random_seed, Some(123));
    assert!(config.scoring.eligibility.counts(10));
    assert!(!config.scoring.eligibility.counts(11));
    assert_eq!(config.nlp.endpoint, "http://nlp:8080");
    assert_eq!(config.data.ilp_dir, PathBuf::from("/tmp/run/ILP.out"));
    assert_eq!(config.data.fold_count, 5);
}

#[test]
fn test_validation() {
    let mut config = EqRankConfig::default();
    config.data.fold_count = 1;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = EqRankConfig::default();
    config.training.learning_rate = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_missing_file() {
    let result = EqRankConfig::load("definitely/not/here.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
