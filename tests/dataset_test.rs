// tests/dataset_test.rs — Integration test: CSV persistence and validation

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use evoforest::dataset::{self, ValidationIssue};
use evoforest::forest::{Forest, Node};
use evoforest::infra::errors::EvolveError;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// root(a) -> [a1 -> [a1x], a2], root(b)
fn sample_forest() -> Forest {
    let mut forest = Forest::new();
    let a = forest.push_root(Node::new("sys, with comma", "a", "answer \"quoted\"", true));
    let a1 = forest.append_child(a, Node::derived(forest.node(a), "a1\nsecond line"));
    forest.append_child(a1, Node::derived(forest.node(a1), "a1x"));
    forest.append_child(a, Node::derived(forest.node(a), "a2"));
    forest.push_root(Node::new("other", "b", "", false));
    forest
}

#[test]
fn test_round_trip_keeps_rows_but_flattens_trees() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forest.csv");
    let forest = sample_forest();

    dataset::save_forest(&forest, &path).unwrap();
    let loaded = dataset::load_forest(&path).unwrap();

    assert_eq!(loaded.count_nodes(), forest.count_nodes());
    assert_eq!(loaded.roots().len(), 5);
    assert!(loaded.roots().iter().all(|&r| loaded.node(r).is_leaf()));

    let fields = |f: &Forest| -> Vec<(bool, String, String, String)> {
        f.preorder()
            .into_iter()
            .map(|id| {
                let n = f.node(id);
                (
                    n.is_refusal,
                    n.system_prompt.clone(),
                    n.user_prompt.clone(),
                    n.assistant_response.clone(),
                )
            })
            .collect()
    };
    assert_eq!(fields(&loaded), fields(&forest));
}

#[test]
fn test_save_overwrites_previous_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    dataset::save_forest(&sample_forest(), &path).unwrap();
    let mut small = Forest::new();
    small.push_root(Node::new("s", "only", "", false));
    dataset::save_forest(&small, &path).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Refusal,System,User,Assistant\nFalse,s,only,\n"
    );
}

#[test]
fn test_load_seed_file_by_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "seed.csv",
        "whatever,headers,are,here,extra\n\
         yes,You are helpful,Write a poem,,ignored\n\
         No,,Summarize this,Done\n",
    );

    let forest = dataset::load_forest(&path).unwrap();
    let roots = forest.roots();
    assert_eq!(roots.len(), 2);
    assert_eq!(forest.stats().trees, 2);

    let first = forest.node(roots[0]);
    assert!(first.is_refusal);
    assert_eq!(first.system_prompt, "You are helpful");
    assert_eq!(first.user_prompt, "Write a poem");
    assert_eq!(first.assistant_response, "");

    let second = forest.node(roots[1]);
    assert!(!second.is_refusal);
    assert_eq!(second.system_prompt, "");
    assert_eq!(second.assistant_response, "Done");
}

#[test]
fn test_load_short_row_names_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "short.csv",
        "Refusal,System,User,Assistant\nFalse,s,u,a\nFalse,s\n",
    );

    match dataset::load_forest(&path) {
        Err(EvolveError::Dataset { row, .. }) => assert_eq!(row, 2),
        other => panic!("expected dataset error, got {other:?}"),
    }
}

#[test]
fn test_load_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(dataset::load_forest(&dir.path().join("nope.csv")).is_err());
}

#[test]
fn test_saved_output_passes_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let mut forest = Forest::new();
    let root = forest.push_root(Node::new("s", "u", "a", false));
    forest.append_child(root, Node::new("s", "child", "reply", true));
    dataset::save_forest(&forest, &path).unwrap();

    let report = dataset::validate_csv(&path).unwrap();
    assert!(report.is_valid(), "{:?}", report.issues);
    assert_eq!(report.rows_checked, 2);
}

#[test]
fn test_validation_reports_every_bad_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "bad.csv",
        "Refusal,System,User,Assistant\n\
         True,s,fine,ok\n\
         maybe,s,hmm,ok\n\
         False,s,,ok\n\
         ,s,u,ok\n",
    );

    let report = dataset::validate_csv(&path).unwrap();
    assert!(!report.is_valid());
    assert_eq!(report.rows_checked, 4);
    assert_eq!(
        report.issues,
        vec![
            ValidationIssue::InvalidRefusal {
                row: 2,
                value: "maybe".into(),
                prompt: "hmm".into(),
            },
            ValidationIssue::EmptyValue {
                row: 3,
                column: "User".into(),
            },
            ValidationIssue::EmptyValue {
                row: 4,
                column: "Refusal".into(),
            },
        ]
    );
}

#[test]
fn test_validation_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cols.csv", "System,User\ns,u\n");

    let report = dataset::validate_csv(&path).unwrap();
    assert_eq!(
        report.issues,
        vec![ValidationIssue::MissingColumns {
            missing: vec!["Assistant".into(), "Refusal".into()],
        }]
    );
}
