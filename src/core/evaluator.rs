//! Risk Evaluator
//!
//! One capability, two strategies. `Evaluator` picks the strategy once
//! from configuration; afterwards callers only see `evaluate`, which is
//! total over valid attributes. A model that fails at call time is
//! replaced by the heuristic for that call.

use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::heuristic::HeuristicEvaluator;
use super::model::ForestModel;
use crate::models::config::AppConfig;
use crate::models::errors::AppResult;
use crate::models::types::{PatientAttributes, RiskResult, Strategy};
use crate::utils::cache;
use crate::utils::constants::HIGH_RISK_CLASS;

/// Maps a patient record to a risk verdict
pub trait RiskEvaluator: Send + Sync {
    fn evaluate(&self, attrs: &PatientAttributes) -> RiskResult;

    /// Strategy this evaluator prefers; a fallback may still answer
    fn strategy(&self) -> Strategy;
}

/// Classifier-backed strategy with a heuristic safety net
#[derive(Debug, Clone)]
pub struct ModelBackedEvaluator {
    model: Arc<ForestModel>,
    fallback: HeuristicEvaluator,
}

impl ModelBackedEvaluator {
    pub fn new(model: Arc<ForestModel>) -> Self {
        Self {
            model,
            fallback: HeuristicEvaluator::new(),
        }
    }

    pub fn model(&self) -> &ForestModel {
        &self.model
    }

    /// Model path only; any failure is returned instead of absorbed
    pub fn try_evaluate(&self, attrs: &PatientAttributes) -> AppResult<RiskResult> {
        let features = attrs.feature_vector();
        let prediction = self.model.predict(&features)?;
        let factors = self.model.importance_factors()?;

        Ok(RiskResult::new(
            prediction.class == HIGH_RISK_CLASS,
            prediction.confidence() * 100.0,
            factors,
            Strategy::Model,
        ))
    }
}

impl RiskEvaluator for ModelBackedEvaluator {
    fn evaluate(&self, attrs: &PatientAttributes) -> RiskResult {
        match self.try_evaluate(attrs) {
            Ok(result) => result,
            Err(e) => {
                if e.code.is_model_error() {
                    warn!(code = e.code_str(), "⚠️ Model prediction failed, using heuristic: {}", e);
                } else {
                    error!(code = e.code_str(), "❌ Unexpected model failure, using heuristic: {}", e);
                }
                self.fallback.evaluate(attrs)
            }
        }
    }

    fn strategy(&self) -> Strategy {
        Strategy::Model
    }
}

/// Strategy chosen at startup
#[derive(Debug, Clone)]
pub enum Evaluator {
    ModelBacked(ModelBackedEvaluator),
    Heuristic(HeuristicEvaluator),
}

impl Evaluator {
    pub fn heuristic() -> Self {
        Self::Heuristic(HeuristicEvaluator::new())
    }

    pub fn with_model(model: Arc<ForestModel>) -> Self {
        Self::ModelBacked(ModelBackedEvaluator::new(model))
    }

    /// Select a strategy through the process-wide model cache
    pub fn from_config(config: &AppConfig) -> Self {
        if !config.use_model {
            info!("🧮 Model disabled by configuration, using heuristic");
            return Self::heuristic();
        }
        match cache::shared_model(&config.model_path) {
            Some(model) => Self::with_model(model),
            None => Self::heuristic(),
        }
    }

    /// Load `path` directly, bypassing the shared cache
    pub fn load(path: &Path) -> Self {
        match ForestModel::load(path) {
            Ok(model) => Self::with_model(Arc::new(model)),
            Err(e) => {
                warn!(code = e.code_str(), "⚠️ {} - using heuristic", e);
                Self::heuristic()
            }
        }
    }
}

impl RiskEvaluator for Evaluator {
    fn evaluate(&self, attrs: &PatientAttributes) -> RiskResult {
        let result = match self {
            Evaluator::ModelBacked(m) => m.evaluate(attrs),
            Evaluator::Heuristic(h) => h.evaluate(attrs),
        };
        info!(
            "🦷 Evaluated: {} {:.1}% via {}",
            if result.high_risk { "HIGH RISK" } else { "LOW RISK" },
            result.probability,
            result.strategy.as_str()
        );
        result
    }

    fn strategy(&self) -> Strategy {
        match self {
            Evaluator::ModelBacked(m) => m.strategy(),
            Evaluator::Heuristic(h) => h.strategy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::tests::sample_model;
    use crate::core::model::TreeNode;
    use crate::models::types::{BrushingFrequency, DentistVisits};

    fn smoker(age: i64) -> PatientAttributes {
        PatientAttributes::builder().age(age).smoker(true).build().unwrap()
    }

    #[test]
    fn test_model_result_mapping() {
        let evaluator = Evaluator::with_model(Arc::new(sample_model()));
        let result = evaluator.evaluate(&smoker(60));

        assert_eq!(result.strategy, Strategy::Model);
        assert!(result.high_risk);
        assert!((result.probability - 70.0).abs() < 1e-9);
        // Global importances, heaviest first, all twelve features
        assert_eq!(result.factors.len(), 12);
        assert_eq!(result.factors[0].name, "Smoker");
        assert_eq!(result.factors[1].name, "Age");
    }

    #[test]
    fn test_model_low_risk_class() {
        let evaluator = Evaluator::with_model(Arc::new(sample_model()));
        let attrs = PatientAttributes::builder().age(25).build().unwrap();
        let result = evaluator.evaluate(&attrs);
        assert!(!result.high_risk);
        // max(0.8, 0.2) of the predicted class
        assert!((result.probability - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_broken_model_falls_back_to_heuristic() {
        let mut model = sample_model();
        model.trees[0] = TreeNode::Leaf {
            probabilities: vec![1.0],
        };
        let evaluator = ModelBackedEvaluator::new(Arc::new(model));
        let attrs = PatientAttributes::builder()
            .brushing_frequency(BrushingFrequency::OncePerDay)
            .dentist_visit_frequency(DentistVisits::LessThanYearly)
            .build()
            .unwrap();

        assert!(evaluator.try_evaluate(&attrs).is_err());
        assert_eq!(evaluator.evaluate(&attrs), HeuristicEvaluator::new().evaluate(&attrs));
    }

    #[test]
    fn test_disabled_model_uses_heuristic() {
        let config = AppConfig {
            use_model: false,
            ..AppConfig::default()
        };
        let evaluator = Evaluator::from_config(&config);
        assert_eq!(evaluator.strategy(), Strategy::Heuristic);
    }

    #[test]
    fn test_missing_model_file_uses_heuristic() {
        let evaluator = Evaluator::load(Path::new("/nonexistent/odontofast/model.json"));
        assert_eq!(evaluator.strategy(), Strategy::Heuristic);
    }
}
