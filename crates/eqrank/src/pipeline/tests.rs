//! Tests for the pipeline drivers.

use std::path::Path;

use eqrank_config::{EqRankConfig, NlpConfig};
use eqrank_core::{Operator, ParseResult};
use eqrank_data::{folds, ilp, results, DataError, Dataset, NlpClient, SentenceParser};
use eqrank_scoring::{Classifier, ProblemOutcome, SoftmaxRegression, GLOBAL_CLASSES, LOCAL_CLASSES};
use eqrank_test::ilp as fixtures;
use eqrank_test::net::closed_endpoint;
use eqrank_test::problems::SAMPLE_DATASET;
use eqrank_test::{percent_problem, sum_problem};

use super::*;

// Answers with the hand-tagged parse of the matching sample problem.
struct FixtureParser;

impl SentenceParser for FixtureParser {
    fn parse(&self, text: &str) -> eqrank_data::Result<ParseResult> {
        if text.contains("seashells") {
            Ok(percent_problem().parse)
        } else if text.contains("apples") {
            Ok(sum_problem().parse)
        } else {
            Err(DataError::EmptyRpcResponse)
        }
    }
}

// Fails on the apple problem with a service-side error.
struct AppleRefusingParser;

impl SentenceParser for AppleRefusingParser {
    fn parse(&self, text: &str) -> eqrank_data::Result<ParseResult> {
        if text.contains("apples") {
            Err(DataError::Rpc {
                code: -32000,
                message: "parse timed out".into(),
            })
        } else {
            FixtureParser.parse(text)
        }
    }
}

fn pipeline(root: &Path) -> Pipeline {
    let mut config = EqRankConfig::default().with_random_seed(7).with_data_root(root);
    config.data.fold_count = 2;
    config.training.epochs = 50;
    let dataset = Dataset::from_json_str(SAMPLE_DATASET).unwrap();
    Pipeline::with_dataset(config, dataset)
}

// Parses the sample problems, stores their solver output and puts problem
// 0 in fold 0 and problem 1 in fold 1.
fn prepared(root: &Path) -> Pipeline {
    let pipeline = pipeline(root);
    pipeline.parse(&FixtureParser).unwrap();
    let data = &pipeline.config().data;
    std::fs::create_dir_all(&data.ilp_dir).unwrap();
    std::fs::write(ilp::output_path(&data.ilp_dir, 0), fixtures::percent_output()).unwrap();
    std::fs::write(ilp::output_path(&data.ilp_dir, 1), fixtures::sum_output()).unwrap();
    folds::write_folds(&data.fold_dir, &[vec![0], vec![1]]).unwrap();
    pipeline
}

#[test]
fn test_parse_caches_problems() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    let report = pipeline.parse(&FixtureParser).unwrap();
    assert_eq!(report.parsed, vec![0, 1]);
    assert!(report.failed.is_empty());

    let data = &pipeline.config().data;
    let quantities: eqrank_core::QuantitySet =
        serde_json::from_str(&std::fs::read_to_string(data.quantity_dir.join("0.json")).unwrap()).unwrap();
    assert_eq!(quantities, percent_problem().quantities);
    assert!(data.parse_dir.join("1.json").is_file());

    let input = std::fs::read_to_string(&data.ilp_input).unwrap();
    assert!(input.starts_with("\n0\nquantities : 70 0.25 x\n"));
    assert!(input.contains("\n1\nquantities : 5 3 x\n"));
    assert!(input.contains("answer : 8\n"));

    // a second run starts the solver input afresh
    pipeline.parse(&FixtureParser).unwrap();
    let again = std::fs::read_to_string(&data.ilp_input).unwrap();
    assert_eq!(again, input);
}

#[test]
fn test_parse_failure_skips_problem() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    let report = pipeline.parse(&AppleRefusingParser).unwrap();
    assert_eq!(report.parsed, vec![0]);
    assert_eq!(report.failed, vec![1]);
    assert!(!pipeline.config().data.parse_dir.join("1.json").exists());
}

#[test]
fn test_parse_unreachable_service() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    let client = NlpClient::new(&NlpConfig {
        endpoint: closed_endpoint(),
        timeout_seconds: Some(2),
    })
    .unwrap();
    let result = pipeline.parse(&client);
    assert!(matches!(result, Err(PipelineError::ServiceUnavailable(_))));
}

#[test]
fn test_split_folds() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    let paths = pipeline.split_folds().unwrap();
    assert_eq!(paths.len(), 2);

    let data = &pipeline.config().data;
    let mut ids = folds::training_ids(&data.fold_dir, 5, 2).unwrap();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1]);
}

#[test]
fn test_fold_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline(dir.path());
    assert!(matches!(
        pipeline.train_local(2),
        Err(PipelineError::FoldOutOfRange { fold: 2, fold_count: 2 })
    ));
    assert!(matches!(
        pipeline.evaluate(9, false),
        Err(PipelineError::FoldOutOfRange { .. })
    ));
}

#[test]
fn test_train_local_uses_simple_positives() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = prepared(dir.path());

    // fold 0 trains on the apple problem: only `5 + 3 = x` is positive and
    // in order
    let examples = pipeline.train_local(0).unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples.rows_for(Operator::Add).unwrap().len(), 1);

    // fold 1 trains on the seashell problem: `0.25 * 70 = x` is out of order
    let examples = pipeline.train_local(1).unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples.rows_for(Operator::Mul).unwrap().len(), 1);

    let (data, labels) =
        eqrank_data::feature_files::local_paths(&pipeline.config().data.feature_dir, 1, Operator::Mul);
    assert!(data.is_file());
    assert_eq!(std::fs::read_to_string(labels).unwrap().trim(), "2");
}

#[test]
fn test_train_global_balances_labels() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = prepared(dir.path());
    pipeline.train_local(0).unwrap();

    let set = pipeline.train_global(0).unwrap();
    // `5 + 3 = x`, `3 + 5 = x` and the first two negatives
    assert_eq!(set.len(), 4);
    assert_eq!(set.class_histogram(GLOBAL_CLASSES), vec![2, 2]);
    assert!(pipeline.model_path(0, ModelKind::Local).is_file());

    let local = SoftmaxRegression::load(pipeline.model_path(0, ModelKind::Local)).unwrap();
    assert_eq!(local.class_count(), LOCAL_CLASSES);
}

#[test]
fn test_global_rows_keep_out_of_order_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = prepared(dir.path());
    pipeline.train_local(1).unwrap();

    // the seashell problem: `0.25 * 70 = x` is positive but out of order
    let set = pipeline.train_global(1).unwrap();
    let flags: Vec<f64> = set.rows().iter().map(|row| row[0]).collect();
    assert_eq!(flags, vec![1.0, 0.0, 1.0, 1.0]);
    assert_eq!(set.labels(), &[1, 1, 0, 0]);
}

#[test]
fn test_evaluate_and_summarize() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = prepared(dir.path());
    for fold in 0..2 {
        pipeline.train_local(fold).unwrap();
        pipeline.train_global(fold).unwrap();
    }

    let evaluation = pipeline.evaluate(0, false).unwrap();
    assert_eq!(evaluation.outcomes.len(), 1);
    let (id, outcome) = &evaluation.outcomes[0];
    assert_eq!(*id, 0);
    // `70 * 0.25 = x`, `70 - 0.25 = x` and `70 / 0.25 = x` survive intake
    let ranking = outcome.ranking().unwrap();
    assert_eq!(ranking.len(), 3);
    assert_eq!(evaluation.tally.counted(), 1);
    assert!(pipeline.model_path(0, ModelKind::Global).is_file());

    pipeline.evaluate(1, true).unwrap();
    let data = &pipeline.config().data;
    assert!(results::result_path(&data.results_dir, 1).is_file());

    let summary = pipeline.summarize().unwrap();
    assert_eq!(summary.folds, vec![0, 1]);
    assert_eq!(summary.tally.counted(), 2);
    assert!((0.0..=100.0).contains(&summary.accuracy));
}

#[test]
fn test_missing_problem_files_fail_the_problem() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = prepared(dir.path());
    for fold in 0..2 {
        pipeline.train_local(fold).unwrap();
        pipeline.train_global(fold).unwrap();
    }
    let data = &pipeline.config().data;
    std::fs::remove_file(ilp::output_path(&data.ilp_dir, 1)).unwrap();

    let evaluation = pipeline.evaluate(1, false).unwrap();
    assert!(matches!(evaluation.outcomes[0].1, ProblemOutcome::Failed(_)));
    assert_eq!(evaluation.tally.failed, 1);
    assert_eq!(evaluation.tally.incorrect, 1);
}
