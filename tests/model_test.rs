//! Model artifact tests: loading from disk, strategy selection and the
//! degrade-to-heuristic policy

use odontofast::core::TreeNode;
use odontofast::utils::cache;
use odontofast::utils::constants::{FEATURE_COUNT, FEATURE_NAMES};
use odontofast::{
    AppConfig, BrushingFrequency, ErrorCode, Evaluator, ForestModel, HeuristicEvaluator,
    ModelBackedEvaluator, PatientAttributes, RiskEvaluator, Strategy,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("odontofast-{}-{}.json", std::process::id(), name))
}

/// Single tree splitting on smoking, importance only on the smoker column
fn smoking_model() -> ForestModel {
    let mut importances = vec![0.02; FEATURE_COUNT];
    importances[4] = 0.78;
    ForestModel {
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        classes: vec![0, 1],
        feature_importances: importances,
        trees: vec![TreeNode::Split {
            feature: 4,
            threshold: 0.5,
            left: Box::new(TreeNode::Leaf {
                probabilities: vec![0.85, 0.15],
            }),
            right: Box::new(TreeNode::Leaf {
                probabilities: vec![0.1, 0.9],
            }),
        }],
    }
}

fn write_model(name: &str, contents: &str) -> PathBuf {
    let path = temp_path(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_and_evaluate_from_disk() {
    let path = write_model("valid", &serde_json::to_string(&smoking_model()).unwrap());
    let evaluator = Evaluator::load(&path);
    fs::remove_file(&path).ok();

    assert_eq!(evaluator.strategy(), Strategy::Model);

    let smoker = PatientAttributes::builder().smoker(true).build().unwrap();
    let result = evaluator.evaluate(&smoker);
    assert_eq!(result.strategy, Strategy::Model);
    assert!(result.high_risk);
    assert!((result.probability - 90.0).abs() < 1e-9);
    assert_eq!(result.factors[0].name, "Smoker");
    assert_eq!(result.factors.len(), FEATURE_COUNT);
}

#[test]
fn test_model_probability_is_clamped() {
    let mut model = smoking_model();
    model.trees[0] = TreeNode::Leaf {
        probabilities: vec![0.0, 1.0],
    };
    let evaluator = Evaluator::with_model(Arc::new(model));
    let result = evaluator.evaluate(&PatientAttributes::builder().build().unwrap());
    assert_eq!(result.probability, 95.0);
    assert!(result.high_risk);
}

#[test]
fn test_malformed_artifact_degrades() {
    let path = write_model("garbage", "{ \"trees\": 12 }");
    let err = ForestModel::load(&path).unwrap_err();
    assert_eq!(err.code, ErrorCode::ModelMalformed);

    let evaluator = Evaluator::load(&path);
    fs::remove_file(&path).ok();
    assert_eq!(evaluator.strategy(), Strategy::Heuristic);
}

#[test]
fn test_wrong_feature_layout_is_rejected() {
    let mut model = smoking_model();
    model.feature_names.truncate(5);
    model.feature_importances.truncate(5);
    let path = write_model("short", &serde_json::to_string(&model).unwrap());
    let err = ForestModel::load(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert_eq!(err.code, ErrorCode::ModelMalformed);
}

#[test]
fn test_missing_artifact_reports_not_found() {
    let err = ForestModel::load(&temp_path("absent")).unwrap_err();
    assert_eq!(err.code, ErrorCode::ModelNotFound);
}

#[test]
fn test_invocation_failure_matches_heuristic() {
    // Passes deserialization but the leaf shape is wrong for two classes
    let mut model = smoking_model();
    model.trees[0] = TreeNode::Leaf {
        probabilities: vec![0.3, 0.3, 0.4],
    };
    assert!(model.validate().is_err());

    let evaluator = ModelBackedEvaluator::new(Arc::new(model));
    let attrs = PatientAttributes::builder()
        .age(70)
        .brushing_frequency(BrushingFrequency::OncePerDay)
        .smoker(true)
        .build()
        .unwrap();

    let result = evaluator.evaluate(&attrs);
    assert_eq!(result, HeuristicEvaluator::new().evaluate(&attrs));
    assert_eq!(result.strategy, Strategy::Heuristic);
}

#[test]
fn test_shared_model_loads_once() {
    let path = write_model("shared", &serde_json::to_string(&smoking_model()).unwrap());
    let config = AppConfig {
        model_path: path.clone(),
        use_model: true,
    };

    let first = cache::shared_model(&config.model_path).expect("model loads");
    fs::remove_file(&path).ok();

    // File is gone; the cached handle is still served
    let second = cache::shared_model(&config.model_path).expect("cached model");
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cache::is_model_loaded());
    assert_eq!(Evaluator::from_config(&config).strategy(), Strategy::Model);
}
