//! Heuristic Risk Scoring Module
//!
//! Deterministic fallback used whenever no classifier is available.
//! Fixed increments are added to a score for each risk condition that
//! holds; the score is then scaled into a 0-95 probability.
//!
//! Factor importances are assigned independently of the score, from
//! their own per-factor predicates.

use tracing::debug;

use super::evaluator::RiskEvaluator;
use crate::models::types::{
    BrushingFrequency, Consumption, DentistVisits, FormOption, OralProblem, PatientAttributes,
    RiskFactor, RiskResult, Strategy,
};
use crate::utils::constants::MAX_PROBABILITY;

// ============================================
// SCORE INCREMENTS
// ============================================

/// Points added to the risk score
pub mod score_weights {
    pub const AGE_OVER_60: u32 = 25;
    pub const AGE_OVER_40: u32 = 15;
    pub const AGE_OVER_30: u32 = 5;
    pub const INFREQUENT_BRUSHING: u32 = 30;
    pub const NO_FLOSS: u32 = 25;
    pub const SHORT_BRUSHING: u32 = 20;
    pub const SMOKER: u32 = 35;
    pub const SUGAR_INDEX_2: u32 = 20;
    pub const SUGAR_INDEX_1: u32 = 10;
    pub const PRIOR_PROBLEM: u32 = 30;
    pub const FAMILY_HISTORY: u32 = 15;
    pub const DENTIST_RARELY: u32 = 25;
    pub const DENTIST_YEARLY: u32 = 15;
    pub const ALCOHOL_INDEX_2: u32 = 15;
}

/// Score units per probability percentage point
pub const SCORE_PER_PERCENT: f64 = 2.5;

// ============================================
// IMPORTANCE WEIGHTS
// ============================================

/// (high, low) importance per factor
pub mod importance_weights {
    pub const AGE: (f64, f64) = (0.20, 0.05);
    pub const BRUSHING_FREQUENCY: (f64, f64) = (0.25, 0.05);
    pub const FLOSS: (f64, f64) = (0.20, 0.05);
    pub const SMOKER: (f64, f64) = (0.30, 0.05);
    pub const PRIOR_PROBLEMS: (f64, f64) = (0.25, 0.05);
    pub const DENTIST_VISITS: (f64, f64) = (0.15, 0.05);
}

/// Condition that added points to the score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreContribution {
    pub reason: &'static str,
    pub points: u32,
}

/// Fallback evaluator. Stateless; every call is a pure function of the
/// attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Every condition that fired, in evaluation order
    pub fn score_breakdown(&self, attrs: &PatientAttributes) -> Vec<ScoreContribution> {
        use score_weights::*;

        let mut breakdown = Vec::new();
        let mut add = |reason: &'static str, points: u32| {
            breakdown.push(ScoreContribution { reason, points });
        };

        // Age
        let age = attrs.age();
        if age > 60 {
            add("age over 60", AGE_OVER_60);
        } else if age > 40 {
            add("age over 40", AGE_OVER_40);
        } else if age > 30 {
            add("age over 30", AGE_OVER_30);
        }

        // Hygiene habits
        if attrs.brushing_frequency().index() < BrushingFrequency::ThreeTimesPerDay.index() {
            add("brushes at most twice a day", INFREQUENT_BRUSHING);
        }
        if !attrs.uses_floss() {
            add("does not floss", NO_FLOSS);
        }
        if attrs.brushing_duration_minutes() < 2 {
            add("brushes for under 2 minutes", SHORT_BRUSHING);
        }

        // Harmful habits
        if attrs.is_smoker() {
            add("smoker", SMOKER);
        }
        // Scores the last option ("low") above "medium" and "high" not at
        // all. Kept as-is until the intended direction is confirmed.
        match attrs.sugar_consumption() {
            Consumption::Low => add("sugar consumption option 2", SUGAR_INDEX_2),
            Consumption::Medium => add("sugar consumption option 1", SUGAR_INDEX_1),
            Consumption::High => {}
        }

        // History
        if attrs.prior_oral_problem() != OralProblem::None {
            add("prior oral problem", PRIOR_PROBLEM);
        }
        if attrs.family_history() {
            add("family history", FAMILY_HISTORY);
        }

        // Preventive care
        match attrs.dentist_visit_frequency() {
            DentistVisits::LessThanYearly => add("dentist less than once a year", DENTIST_RARELY),
            DentistVisits::Yearly => add("dentist once a year", DENTIST_YEARLY),
            _ => {}
        }

        // Other
        if attrs.alcohol_consumption() == Consumption::Low {
            add("alcohol consumption option 2", ALCOHOL_INDEX_2);
        }

        breakdown
    }

    /// Sum of all fired increments
    pub fn risk_score(&self, attrs: &PatientAttributes) -> u32 {
        self.score_breakdown(attrs).iter().map(|c| c.points).sum()
    }

    /// Scale a score into a percentage capped at 95
    pub fn probability(score: u32) -> f64 {
        (score as f64 / SCORE_PER_PERCENT).min(MAX_PROBABILITY)
    }

    /// The six fixed factors with their importances, unsorted
    pub fn factor_importances(&self, attrs: &PatientAttributes) -> Vec<RiskFactor> {
        use importance_weights::*;

        let pick = |(high, low): (f64, f64), condition: bool| if condition { high } else { low };
        let infrequent_dentist =
            attrs.dentist_visit_frequency().index() < DentistVisits::TwiceYearly.index();

        vec![
            RiskFactor::new("Age", pick(AGE, attrs.age() > 40)),
            RiskFactor::new(
                "Brushing frequency",
                pick(
                    BRUSHING_FREQUENCY,
                    attrs.brushing_frequency().index() < BrushingFrequency::ThreeTimesPerDay.index(),
                ),
            ),
            RiskFactor::new("Floss use", pick(FLOSS, !attrs.uses_floss())),
            RiskFactor::new("Smoker", pick(SMOKER, attrs.is_smoker())),
            RiskFactor::new(
                "Prior problems",
                pick(PRIOR_PROBLEMS, attrs.prior_oral_problem() != OralProblem::None),
            ),
            RiskFactor::new("Dentist visits", pick(DENTIST_VISITS, infrequent_dentist)),
        ]
    }
}

impl RiskEvaluator for HeuristicEvaluator {
    fn evaluate(&self, attrs: &PatientAttributes) -> RiskResult {
        let breakdown = self.score_breakdown(attrs);
        let score: u32 = breakdown.iter().map(|c| c.points).sum();
        let probability = Self::probability(score);

        debug!(
            "🧮 Heuristic score {} -> {:.1}% ({} conditions: {:?})",
            score,
            probability,
            breakdown.len(),
            breakdown.iter().map(|c| c.reason).collect::<Vec<_>>()
        );

        RiskResult::from_probability(probability, self.factor_importances(attrs), Strategy::Heuristic)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Heuristic
    }
}
