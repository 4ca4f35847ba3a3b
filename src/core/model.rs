//! Classifier Artifact Module
//!
//! A random-forest classifier exported to JSON. Each tree is a nested
//! split/leaf structure; a split sends a sample left when
//! `x[feature] <= threshold`. Class probabilities are the mean of the
//! leaf distributions reached in every tree.
//!
//! The artifact is checked once at load time, and the shapes touched
//! during prediction are checked again so a hand-built model can never
//! produce a partial result.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::RiskFactor;
use crate::utils::constants::{FEATURE_COUNT, FEATURE_LABELS, FEATURE_NAMES};

/// Tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        /// One probability per class, in `classes` order
        probabilities: Vec<f64>,
    },
}

impl TreeNode {
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Walk to the leaf `features` falls into
    fn leaf_for(&self, features: &[f64]) -> AppResult<&[f64]> {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { probabilities } => return Ok(probabilities),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).ok_or_else(|| {
                        AppError::shape_mismatch(format!(
                            "split on feature {} but sample has {}",
                            feature,
                            features.len()
                        ))
                    })?;
                    node = if *value <= *threshold { left } else { right };
                }
            }
        }
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> AppResult<()> {
        match self {
            TreeNode::Leaf { probabilities } => {
                if probabilities.len() != n_classes {
                    return Err(AppError::model_malformed(format!(
                        "leaf has {} probabilities, expected {}",
                        probabilities.len(),
                        n_classes
                    )));
                }
                if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
                    return Err(AppError::model_malformed(
                        "leaf probabilities must be within 0.0-1.0",
                    ));
                }
                Ok(())
            }
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(AppError::model_malformed(format!(
                        "split references feature {} of {}",
                        feature, n_features
                    )));
                }
                if !threshold.is_finite() {
                    return Err(AppError::model_malformed("split threshold is not finite"));
                }
                left.validate(n_features, n_classes)?;
                right.validate(n_features, n_classes)
            }
        }
    }
}

/// Class label and per-class probabilities for one sample
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: i64,
    pub probabilities: Vec<f64>,
}

impl Prediction {
    /// Probability of the predicted class
    pub fn confidence(&self) -> f64 {
        self.probabilities.iter().copied().fold(0.0, f64::max)
    }
}

/// Random forest classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    /// Must equal `FEATURE_NAMES`
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    /// Global importances aligned with `feature_names`
    pub feature_importances: Vec<f64>,
    pub trees: Vec<TreeNode>,
}

impl ForestModel {
    /// Read, parse and validate an artifact
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::model_not_found(path),
            _ => AppError::with_source(
                ErrorCode::ModelMalformed,
                format!("cannot read {}", path.display()),
                e,
            ),
        })?;

        let model = Self::from_json(&raw)?;
        info!(
            "🌲 Model loaded from {} ({} trees, max depth {})",
            path.display(),
            model.trees.len(),
            model.max_depth()
        );
        Ok(model)
    }

    /// Parse and validate an artifact held in memory
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let model: Self = serde_json::from_str(raw).map_err(|e| {
            AppError::with_source(ErrorCode::ModelMalformed, "model JSON parse error", e)
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Structural checks against the feature layout
    pub fn validate(&self) -> AppResult<()> {
        if self.trees.is_empty() {
            return Err(AppError::model_malformed("model has no trees"));
        }
        if self.classes.len() < 2 {
            return Err(AppError::model_malformed("model needs at least two classes"));
        }
        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(a, b)| a != b)
        {
            return Err(AppError::model_malformed(format!(
                "feature names {:?} do not match the expected layout",
                self.feature_names
            )));
        }
        if self.feature_importances.len() != FEATURE_COUNT {
            return Err(AppError::model_malformed(format!(
                "{} importances for {} features",
                self.feature_importances.len(),
                FEATURE_COUNT
            )));
        }
        if self
            .feature_importances
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0 || *w > 1.0)
        {
            return Err(AppError::model_malformed(
                "feature importances must be within 0.0-1.0",
            ));
        }
        for tree in &self.trees {
            tree.validate(FEATURE_COUNT, self.classes.len())?;
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Mean leaf distribution over all trees
    pub fn predict_proba(&self, features: &[f64]) -> AppResult<Vec<f64>> {
        if features.len() != self.feature_names.len() {
            return Err(AppError::shape_mismatch(format!(
                "sample has {} features, model expects {}",
                features.len(),
                self.feature_names.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(AppError::shape_mismatch("model has no trees"));
        }

        let n_classes = self.classes.len();
        let mut sums = vec![0.0; n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_for(features)?;
            if leaf.len() != n_classes {
                return Err(AppError::shape_mismatch(format!(
                    "leaf has {} probabilities, model has {} classes",
                    leaf.len(),
                    n_classes
                )));
            }
            for (sum, p) in sums.iter_mut().zip(leaf) {
                *sum += p;
            }
        }

        let n = self.trees.len() as f64;
        Ok(sums.into_iter().map(|s| s / n).collect())
    }

    /// Arg-max class (first wins on ties) with its distribution
    pub fn predict(&self, features: &[f64]) -> AppResult<Prediction> {
        let probabilities = self.predict_proba(features)?;

        let mut best = 0;
        for (i, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = i;
            }
        }
        let class = *self
            .classes
            .get(best)
            .ok_or_else(|| AppError::shape_mismatch("no class for winning probability"))?;

        debug!("🌲 Prediction: class {} {:?}", class, probabilities);
        Ok(Prediction {
            class,
            probabilities,
        })
    }

    /// Importances paired with display names, unsorted
    pub fn importance_factors(&self) -> AppResult<Vec<RiskFactor>> {
        if self.feature_importances.len() != FEATURE_COUNT {
            return Err(AppError::shape_mismatch(format!(
                "{} importances for {} features",
                self.feature_importances.len(),
                FEATURE_COUNT
            )));
        }
        Ok(FEATURE_LABELS
            .iter()
            .zip(&self.feature_importances)
            .map(|(label, weight)| RiskFactor::new(*label, *weight))
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two stumps: smokers (feature 4) lean high risk, and so does age
    /// over 50 (feature 0).
    pub(crate) fn sample_model() -> ForestModel {
        let stump = |feature: usize, threshold: f64, low: [f64; 2], high: [f64; 2]| {
            TreeNode::Split {
                feature,
                threshold,
                left: Box::new(TreeNode::Leaf {
                    probabilities: low.to_vec(),
                }),
                right: Box::new(TreeNode::Leaf {
                    probabilities: high.to_vec(),
                }),
            }
        };
        let mut importances = vec![0.0; FEATURE_COUNT];
        importances[0] = 0.35;
        importances[4] = 0.65;

        ForestModel {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classes: vec![0, 1],
            feature_importances: importances,
            trees: vec![
                stump(4, 0.5, [0.9, 0.1], [0.2, 0.8]),
                stump(0, 50.0, [0.7, 0.3], [0.4, 0.6]),
            ],
        }
    }

    #[test]
    fn test_sample_model_is_valid() {
        let model = sample_model();
        assert!(model.validate().is_ok());
        assert_eq!(model.n_trees(), 2);
        assert_eq!(model.max_depth(), 2);
    }

    #[test]
    fn test_predict_proba_averages_trees() {
        let model = sample_model();
        let mut x = [0.0; FEATURE_COUNT];
        x[0] = 60.0;
        x[4] = 1.0;
        let proba = model.predict_proba(&x).unwrap();
        assert!((proba[0] - 0.3).abs() < 1e-9);
        assert!((proba[1] - 0.7).abs() < 1e-9);

        let prediction = model.predict(&x).unwrap();
        assert_eq!(prediction.class, 1);
        assert!((prediction.confidence() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_split_goes_left_on_equal() {
        let model = sample_model();
        let mut x = [0.0; FEATURE_COUNT];
        x[0] = 50.0;
        let proba = model.predict_proba(&x).unwrap();
        // (0.9 + 0.7) / 2
        assert!((proba[0] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_vector_length() {
        let err = sample_model().predict(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ModelShapeMismatch);
    }

    #[test]
    fn test_validation_failures() {
        let mut model = sample_model();
        model.trees.clear();
        assert_eq!(model.validate().unwrap_err().code, ErrorCode::ModelMalformed);

        let mut model = sample_model();
        model.feature_importances.pop();
        assert!(model.validate().is_err());

        let mut model = sample_model();
        model.feature_names.swap(0, 1);
        assert!(model.validate().is_err());

        let mut model = sample_model();
        model.trees.push(TreeNode::Split {
            feature: FEATURE_COUNT,
            threshold: 0.0,
            left: Box::new(TreeNode::Leaf {
                probabilities: vec![0.5, 0.5],
            }),
            right: Box::new(TreeNode::Leaf {
                probabilities: vec![0.5, 0.5],
            }),
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_parses_nodes() {
        let json = serde_json::to_string(&sample_model()).unwrap();
        let parsed = ForestModel::from_json(&json).unwrap();
        assert_eq!(parsed, sample_model());
    }

    #[test]
    fn test_garbage_json_is_malformed() {
        let err = ForestModel::from_json("not a model").unwrap_err();
        assert_eq!(err.code, ErrorCode::ModelMalformed);
    }
}
