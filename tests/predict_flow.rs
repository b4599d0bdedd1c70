//! End-to-end prediction flow tests against hand-checked and synthetic models.

mod common;

use common::fixtures::{ModelDirBuilder, config_for, engine_for, two_topic_model};
use kindred::{PackageId, PredictStatus, ScoringEngine, SyntheticModel};

#[test]
fn test_exact_match_round_trip() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);

    let outcome = engine.predict(&["pkg-0", "pkg-2"]);

    assert_eq!(outcome.status, PredictStatus::ExactMatch { manifest_id: 0 });
    assert_eq!(outcome.known_ids, vec![0, 2]);
    assert!(outcome.unknown_names.is_empty());

    let ids: Vec<PackageId> = outcome.recommendations.iter().map(|r| r.package_id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(outcome.recommendations[0].package_name, "pkg-1");
}

#[test]
fn test_lowest_manifest_id_wins_for_duplicate_sets() {
    // Two training manifests with identical contents.
    let dir = ModelDirBuilder::new()
        .manifest_dict(r#"{"0":[0,2],"1":[0,2]}"#)
        .write();
    let engine = engine_for(&dir);

    let outcome = engine.predict(&["pkg-0", "pkg-2"]);

    assert_eq!(outcome.status, PredictStatus::ExactMatch { manifest_id: 0 });
}

#[test]
fn test_fold_in_ordering() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);

    let outcome = engine.predict(&["pkg-1"]);

    assert_eq!(outcome.status, PredictStatus::FoldedIn);
    let ids: Vec<PackageId> = outcome.recommendations.iter().map(|r| r.package_id).collect();
    assert_eq!(
        ids,
        vec![2, 0, 3],
        "pkg-2 shares pkg-1's topic and should outrank the off-topic packages"
    );
}

#[test]
fn test_refusal_policy() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);

    let empty = engine.predict::<&str>(&[]);
    assert_eq!(empty.status, PredictStatus::Refused);
    assert!(empty.recommendations.is_empty());

    let unknown = engine.predict(&["ghost-b", "ghost-a"]);
    assert!(unknown.is_refused());
    assert!(unknown.recommendations.is_empty());
    assert_eq!(unknown.unknown_names, vec!["ghost-a", "ghost-b"]);
    assert!(unknown.known_ids.is_empty());

    // One known out of three distinct names is above the default threshold.
    let mixed = engine.predict(&["pkg-0", "ghost-a", "ghost-b"]);
    assert!(mixed.is_refused());
    assert_eq!(mixed.known_ids, vec![0]);
    assert_eq!(mixed.unknown_names, vec!["ghost-a", "ghost-b"]);
}

#[test]
fn test_threshold_boundary_proceeds() {
    let dir = two_topic_model();

    let mut config = config_for(&dir);
    config.unknown_threshold = 0.5;
    let engine = ScoringEngine::new(config).expect("engine should initialize");

    // One known and one unknown name: the fraction sits exactly at 0.5 and
    // refusal requires strictly exceeding the threshold.
    let outcome = engine.predict(&["pkg-1", "mystery"]);
    assert_eq!(outcome.status, PredictStatus::FoldedIn);
    assert_eq!(outcome.unknown_names, vec!["mystery"]);
}

#[test]
fn test_input_members_never_recommended() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);

    for names in [&["pkg-0", "pkg-2"][..], &["pkg-1"][..], &["pkg-2"][..]] {
        let outcome = engine.predict(names);
        assert!(!outcome.is_refused());
        for recommendation in &outcome.recommendations {
            assert!(
                !outcome.known_ids.contains(&recommendation.package_id),
                "{} was part of the input set",
                recommendation.package_name
            );
        }
    }
}

#[test]
fn test_duplicate_names_collapse() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);

    assert_eq!(
        engine.predict(&["pkg-1", "pkg-1", "pkg-1"]),
        engine.predict(&["pkg-1"]),
    );
}

#[test]
fn test_probability_bounds() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);

    for names in [&["pkg-0", "pkg-2"][..], &["pkg-1"][..]] {
        let outcome = engine.predict(names);
        for recommendation in &outcome.recommendations {
            let p = recommendation.cooccurrence_probability;
            assert!((0.0..100.0).contains(&p), "probability out of range: {p}");
        }
    }
}

#[test]
fn test_partitions_are_sorted() {
    let dir = two_topic_model();
    let mut config = config_for(&dir);
    config.unknown_threshold = 0.5;
    let engine = ScoringEngine::new(config).expect("engine should initialize");

    let outcome = engine.predict(&["zzz", "pkg-2", "aaa", "pkg-0"]);

    assert_eq!(outcome.known_ids, vec![0, 2]);
    assert_eq!(outcome.unknown_names, vec!["aaa", "zzz"]);
}

#[test]
fn test_outcome_json_shape() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);

    let exact = serde_json::to_value(engine.predict(&["pkg-0", "pkg-2"]))
        .expect("serialization should succeed");
    assert_eq!(exact["status"]["ExactMatch"]["manifest_id"], 0);
    assert_eq!(exact["known_ids"], serde_json::json!([0, 2]));
    let first = &exact["recommendations"][0];
    assert!(first["package_id"].is_number());
    assert!(first["package_name"].is_string());
    assert!(first["cooccurrence_probability"].is_number());
    assert!(first["topic_list"].is_array());

    let folded = serde_json::to_value(engine.predict(&["pkg-1"]))
        .expect("serialization should succeed");
    assert_eq!(folded["status"], "FoldedIn");

    let refused = serde_json::to_value(engine.predict(&["ghost"]))
        .expect("serialization should succeed");
    assert_eq!(refused["status"], "Refused");
    assert_eq!(refused["recommendations"], serde_json::json!([]));
}

#[test]
fn test_separate_engines_agree() {
    let dir = two_topic_model();
    let first = engine_for(&dir);
    let second = engine_for(&dir);

    assert_eq!(
        first.predict(&["pkg-0", "pkg-2"]),
        second.predict(&["pkg-0", "pkg-2"]),
    );
    assert_eq!(first.predict(&["pkg-1"]), second.predict(&["pkg-1"]));
}

#[test]
fn test_reload_picks_up_grown_model() {
    let dir = two_topic_model();
    let engine = engine_for(&dir);
    assert_eq!(engine.snapshot().packages(), 4);

    // Grow the catalog by one package that co-occurs with everything.
    ModelDirBuilder::new()
        .package_dict(r#"{"pkg-0":0,"pkg-1":1,"pkg-2":2,"pkg-3":3,"pkg-4":4}"#)
        .beta(
            5,
            2,
            &[1.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.0, 0.0, 0.9, 0.9],
        )
        .write_to(dir.path());

    engine.reload().expect("reload should succeed");

    assert_eq!(engine.snapshot().packages(), 5);
    let outcome = engine.predict(&["pkg-0", "pkg-2"]);
    assert_eq!(outcome.recommendations[0].package_name, "pkg-4");
}

#[test]
fn test_synthetic_model_predictions_within_bounds() {
    let dir = tempfile::TempDir::new().expect("temp dir should be created");
    SyntheticModel::new()
        .generated_manifests(8)
        .write_to(dir.path())
        .expect("synthetic model should be written");
    let engine = engine_for(&dir);

    let names = [
        SyntheticModel::package_name(0),
        SyntheticModel::package_name(3),
    ];
    let outcome = engine.predict(&names);

    assert!(!outcome.is_refused());
    assert!(outcome.recommendations.len() <= engine.config().top_n);
    for recommendation in &outcome.recommendations {
        assert!(recommendation.cooccurrence_probability >= 0.0);
        assert!(recommendation.cooccurrence_probability < 100.0);
        assert!(!outcome.known_ids.contains(&recommendation.package_id));
    }
}
