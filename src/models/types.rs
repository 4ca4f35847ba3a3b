//! Type definitions for OdontoFast
//! Patient attribute record, form options and the risk verdict

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::errors::ValidationError;
use crate::utils::constants::{
    AGE_MAX, AGE_MIN, BAND_ELEVATED_ABOVE, BAND_HIGH_ABOVE, BAND_MODERATE_ABOVE,
    BRUSHING_MINUTES_MAX, BRUSHING_MINUTES_MIN, FEATURE_COUNT, HIGH_RISK_THRESHOLD,
    MAX_PROBABILITY,
};

// ============================================
// FORM OPTIONS
// ============================================

/// A categorical form field whose options encode to their list position
pub trait FormOption: Copy + PartialEq + Sized + 'static {
    /// Options in display order; the position is the numeric encoding
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn index(&self) -> u8 {
        Self::ALL.iter().position(|o| o == self).unwrap_or_default() as u8
    }

    fn from_index(field: &'static str, index: i64) -> Result<Self, ValidationError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
            .ok_or_else(|| ValidationError::new(field, index, 0, Self::ALL.len() as i64 - 1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl FormOption for Gender {
    const ALL: &'static [Self] = &[Self::Female, Self::Male];

    fn label(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

/// Daily brushing bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushingFrequency {
    OncePerDay,
    TwicePerDay,
    ThreeTimesPerDay,
    MoreThanThreePerDay,
}

impl FormOption for BrushingFrequency {
    const ALL: &'static [Self] = &[
        Self::OncePerDay,
        Self::TwicePerDay,
        Self::ThreeTimesPerDay,
        Self::MoreThanThreePerDay,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::OncePerDay => "Once a day",
            Self::TwicePerDay => "Twice a day",
            Self::ThreeTimesPerDay => "3 times a day",
            Self::MoreThanThreePerDay => "More than 3 times a day",
        }
    }
}

/// Sugar and alcohol intake; the list runs from high to low
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    High,
    Medium,
    Low,
}

impl FormOption for Consumption {
    const ALL: &'static [Self] = &[Self::High, Self::Medium, Self::Low];

    fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OralProblem {
    None,
    Cavity,
    RootCanal,
    Gingivitis,
}

impl FormOption for OralProblem {
    const ALL: &'static [Self] = &[Self::None, Self::Cavity, Self::RootCanal, Self::Gingivitis];

    fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Cavity => "Cavity",
            Self::RootCanal => "Root canal",
            Self::Gingivitis => "Gingivitis",
        }
    }
}

/// Dentist visit bucket, least frequent first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DentistVisits {
    LessThanYearly,
    Yearly,
    TwiceYearly,
    MoreThanTwiceYearly,
}

impl FormOption for DentistVisits {
    const ALL: &'static [Self] = &[
        Self::LessThanYearly,
        Self::Yearly,
        Self::TwiceYearly,
        Self::MoreThanTwiceYearly,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::LessThanYearly => "Less than once a year",
            Self::Yearly => "Once a year",
            Self::TwiceYearly => "Twice a year",
            Self::MoreThanTwiceYearly => "More than twice a year",
        }
    }
}

// ============================================
// PATIENT ATTRIBUTES
// ============================================

/// Validated patient record. Only obtainable through
/// [`PatientAttributesBuilder::build`] or deserialization, both of which
/// reject out-of-domain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPatientRecord", into = "RawPatientRecord")]
pub struct PatientAttributes {
    age: u8,
    gender: Gender,
    brushing_frequency: BrushingFrequency,
    brushing_duration_minutes: u8,
    uses_floss: bool,
    uses_mouthwash: bool,
    is_smoker: bool,
    sugar_consumption: Consumption,
    alcohol_consumption: Consumption,
    prior_oral_problem: OralProblem,
    family_history: bool,
    dentist_visit_frequency: DentistVisits,
}

impl PatientAttributes {
    pub fn builder() -> PatientAttributesBuilder {
        PatientAttributesBuilder::default()
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn brushing_frequency(&self) -> BrushingFrequency {
        self.brushing_frequency
    }

    pub fn brushing_duration_minutes(&self) -> u8 {
        self.brushing_duration_minutes
    }

    pub fn uses_floss(&self) -> bool {
        self.uses_floss
    }

    pub fn uses_mouthwash(&self) -> bool {
        self.uses_mouthwash
    }

    pub fn is_smoker(&self) -> bool {
        self.is_smoker
    }

    pub fn sugar_consumption(&self) -> Consumption {
        self.sugar_consumption
    }

    pub fn alcohol_consumption(&self) -> Consumption {
        self.alcohol_consumption
    }

    pub fn prior_oral_problem(&self) -> OralProblem {
        self.prior_oral_problem
    }

    pub fn family_history(&self) -> bool {
        self.family_history
    }

    pub fn dentist_visit_frequency(&self) -> DentistVisits {
        self.dentist_visit_frequency
    }

    /// Numeric encoding in `FEATURE_NAMES` order
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            self.age as f64,
            self.brushing_frequency.index() as f64,
            flag(self.uses_floss),
            flag(self.uses_mouthwash),
            flag(self.is_smoker),
            self.prior_oral_problem.index() as f64,
            flag(self.family_history),
            self.gender.index() as f64,
            self.brushing_duration_minutes as f64,
            self.sugar_consumption.index() as f64,
            self.dentist_visit_frequency.index() as f64,
            self.alcohol_consumption.index() as f64,
        ]
    }
}

/// Builder seeded with the form's default answers
#[derive(Debug, Clone)]
pub struct PatientAttributesBuilder {
    age: i64,
    gender: Gender,
    brushing_frequency: BrushingFrequency,
    brushing_duration_minutes: i64,
    uses_floss: bool,
    uses_mouthwash: bool,
    is_smoker: bool,
    sugar_consumption: Consumption,
    alcohol_consumption: Consumption,
    prior_oral_problem: OralProblem,
    family_history: bool,
    dentist_visit_frequency: DentistVisits,
}

impl Default for PatientAttributesBuilder {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Female,
            brushing_frequency: BrushingFrequency::TwicePerDay,
            brushing_duration_minutes: 3,
            uses_floss: true,
            uses_mouthwash: false,
            is_smoker: false,
            sugar_consumption: Consumption::Medium,
            alcohol_consumption: Consumption::Medium,
            prior_oral_problem: OralProblem::None,
            family_history: false,
            dentist_visit_frequency: DentistVisits::Yearly,
        }
    }
}

impl PatientAttributesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn brushing_frequency(mut self, frequency: BrushingFrequency) -> Self {
        self.brushing_frequency = frequency;
        self
    }

    pub fn brushing_duration_minutes(mut self, minutes: i64) -> Self {
        self.brushing_duration_minutes = minutes;
        self
    }

    pub fn uses_floss(mut self, yes: bool) -> Self {
        self.uses_floss = yes;
        self
    }

    pub fn uses_mouthwash(mut self, yes: bool) -> Self {
        self.uses_mouthwash = yes;
        self
    }

    pub fn smoker(mut self, yes: bool) -> Self {
        self.is_smoker = yes;
        self
    }

    pub fn sugar_consumption(mut self, level: Consumption) -> Self {
        self.sugar_consumption = level;
        self
    }

    pub fn alcohol_consumption(mut self, level: Consumption) -> Self {
        self.alcohol_consumption = level;
        self
    }

    pub fn prior_oral_problem(mut self, problem: OralProblem) -> Self {
        self.prior_oral_problem = problem;
        self
    }

    pub fn family_history(mut self, yes: bool) -> Self {
        self.family_history = yes;
        self
    }

    pub fn dentist_visit_frequency(mut self, visits: DentistVisits) -> Self {
        self.dentist_visit_frequency = visits;
        self
    }

    /// Validate numeric fields and freeze the record
    pub fn build(self) -> Result<PatientAttributes, ValidationError> {
        let age = ValidationError::check("age", self.age, AGE_MIN, AGE_MAX)?;
        let minutes = ValidationError::check(
            "brushing_duration_minutes",
            self.brushing_duration_minutes,
            BRUSHING_MINUTES_MIN,
            BRUSHING_MINUTES_MAX,
        )?;

        Ok(PatientAttributes {
            age: age as u8,
            gender: self.gender,
            brushing_frequency: self.brushing_frequency,
            brushing_duration_minutes: minutes as u8,
            uses_floss: self.uses_floss,
            uses_mouthwash: self.uses_mouthwash,
            is_smoker: self.is_smoker,
            sugar_consumption: self.sugar_consumption,
            alcohol_consumption: self.alcohol_consumption,
            prior_oral_problem: self.prior_oral_problem,
            family_history: self.family_history,
            dentist_visit_frequency: self.dentist_visit_frequency,
        })
    }
}

/// Wire form of a patient: the numeric encoding keyed by feature name.
/// Booleans are 0/1, categorical fields are option positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPatientRecord {
    pub age: i64,
    pub gender: i64,
    pub brushing_frequency: i64,
    pub brushing_duration_minutes: i64,
    pub uses_floss: i64,
    pub uses_mouthwash: i64,
    pub is_smoker: i64,
    pub sugar_consumption: i64,
    pub alcohol_consumption: i64,
    pub prior_oral_problem: i64,
    pub family_history: i64,
    pub dentist_visit_frequency: i64,
}

fn flag(field: &'static str, value: i64) -> Result<bool, ValidationError> {
    ValidationError::check(field, value, 0, 1).map(|v| v == 1)
}

impl TryFrom<RawPatientRecord> for PatientAttributes {
    type Error = ValidationError;

    fn try_from(raw: RawPatientRecord) -> Result<Self, Self::Error> {
        PatientAttributesBuilder::new()
            .age(raw.age)
            .gender(Gender::from_index("gender", raw.gender)?)
            .brushing_frequency(BrushingFrequency::from_index(
                "brushing_frequency",
                raw.brushing_frequency,
            )?)
            .brushing_duration_minutes(raw.brushing_duration_minutes)
            .uses_floss(flag("uses_floss", raw.uses_floss)?)
            .uses_mouthwash(flag("uses_mouthwash", raw.uses_mouthwash)?)
            .smoker(flag("is_smoker", raw.is_smoker)?)
            .sugar_consumption(Consumption::from_index(
                "sugar_consumption",
                raw.sugar_consumption,
            )?)
            .alcohol_consumption(Consumption::from_index(
                "alcohol_consumption",
                raw.alcohol_consumption,
            )?)
            .prior_oral_problem(OralProblem::from_index(
                "prior_oral_problem",
                raw.prior_oral_problem,
            )?)
            .family_history(flag("family_history", raw.family_history)?)
            .dentist_visit_frequency(DentistVisits::from_index(
                "dentist_visit_frequency",
                raw.dentist_visit_frequency,
            )?)
            .build()
    }
}

impl From<PatientAttributes> for RawPatientRecord {
    fn from(attrs: PatientAttributes) -> Self {
        Self {
            age: attrs.age as i64,
            gender: attrs.gender.index() as i64,
            brushing_frequency: attrs.brushing_frequency.index() as i64,
            brushing_duration_minutes: attrs.brushing_duration_minutes as i64,
            uses_floss: attrs.uses_floss as i64,
            uses_mouthwash: attrs.uses_mouthwash as i64,
            is_smoker: attrs.is_smoker as i64,
            sugar_consumption: attrs.sugar_consumption.index() as i64,
            alcohol_consumption: attrs.alcohol_consumption.index() as i64,
            prior_oral_problem: attrs.prior_oral_problem.index() as i64,
            family_history: attrs.family_history as i64,
            dentist_visit_frequency: attrs.dentist_visit_frequency.index() as i64,
        }
    }
}

// ============================================
// RISK RESULT
// ============================================

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Model,
    Heuristic,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Model => "model",
            Strategy::Heuristic => "heuristic",
        }
    }
}

/// One contributing factor and its relative importance (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub weight: f64,
}

impl RiskFactor {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Evaluation verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub high_risk: bool,
    /// Risk percentage, clamped to 0-95
    pub probability: f64,
    /// Descending by weight, ties in insertion order
    pub factors: Vec<RiskFactor>,
    pub strategy: Strategy,
}

impl RiskResult {
    /// Build a result with an explicit verdict
    pub fn new(
        high_risk: bool,
        probability: f64,
        factors: Vec<RiskFactor>,
        strategy: Strategy,
    ) -> Self {
        Self {
            high_risk,
            probability: clamp_probability(probability),
            factors: rank_factors(factors),
            strategy,
        }
    }

    /// Build a result whose verdict is derived from the probability
    pub fn from_probability(probability: f64, factors: Vec<RiskFactor>, strategy: Strategy) -> Self {
        let probability = clamp_probability(probability);
        Self::new(probability > HIGH_RISK_THRESHOLD, probability, factors, strategy)
    }

    pub fn band(&self) -> RiskBand {
        RiskBand::from_probability(self.probability)
    }

    pub fn top_factors(&self, n: usize) -> &[RiskFactor] {
        &self.factors[..self.factors.len().min(n)]
    }
}

fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    probability.clamp(0.0, MAX_PROBABILITY)
}

/// Stable sort, heaviest first
pub fn rank_factors(mut factors: Vec<RiskFactor>) -> Vec<RiskFactor> {
    factors.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    factors
}

/// Display band of a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability > BAND_HIGH_ABOVE {
            Self::High
        } else if probability > BAND_ELEVATED_ABOVE {
            Self::Elevated
        } else if probability > BAND_MODERATE_ABOVE {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Color code for the probability figure
    pub fn color_code(&self) -> &'static str {
        match self {
            Self::High => "#d73027",     // Dark red
            Self::Elevated => "#fc8d59", // Orange
            Self::Moderate => "#fee08b", // Yellow
            Self::Low => "#1a9850",      // Green
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Elevated => "🟠",
            Self::Moderate => "🟡",
            Self::Low => "🟢",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_option_round_trip_positions() {
        assert_eq!(BrushingFrequency::TwicePerDay.index(), 1);
        assert_eq!(Consumption::Low.index(), 2);
        assert_eq!(
            DentistVisits::from_index("dentist_visit_frequency", 0),
            Ok(DentistVisits::LessThanYearly)
        );
        let err = OralProblem::from_index("prior_oral_problem", 4).unwrap_err();
        assert_eq!((err.min, err.max), (0, 3));
        assert!(Gender::from_index("gender", -1).is_err());
    }

    #[test]
    fn test_builder_rejects_out_of_domain() {
        assert!(PatientAttributes::builder().age(0).build().is_err());
        assert!(PatientAttributes::builder().age(121).build().is_err());
        assert!(PatientAttributes::builder()
            .brushing_duration_minutes(11)
            .build()
            .is_err());
        assert!(PatientAttributes::builder().age(120).build().is_ok());
    }

    #[test]
    fn test_feature_vector_layout() {
        let attrs = PatientAttributes::builder()
            .age(45)
            .gender(Gender::Male)
            .smoker(true)
            .build()
            .unwrap();
        let v = attrs.feature_vector();
        assert_eq!(v[0], 45.0);
        assert_eq!(v[1], 1.0); // twice a day
        assert_eq!(v[2], 1.0); // floss
        assert_eq!(v[4], 1.0); // smoker
        assert_eq!(v[7], 1.0); // male
        assert_eq!(v[8], 3.0); // minutes
    }

    #[test]
    fn test_raw_record_rejects_bad_flag() {
        let mut raw = RawPatientRecord::from(PatientAttributes::builder().build().unwrap());
        raw.is_smoker = 2;
        let err = PatientAttributes::try_from(raw).unwrap_err();
        assert_eq!(err.field, "is_smoker");
    }

    #[test]
    fn test_rank_factors_is_stable() {
        let ranked = rank_factors(vec![
            RiskFactor::new("a", 0.05),
            RiskFactor::new("b", 0.20),
            RiskFactor::new("c", 0.05),
            RiskFactor::new("d", 0.20),
        ]);
        let names: Vec<&str> = ranked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_probability_is_clamped() {
        let result = RiskResult::from_probability(120.0, vec![], Strategy::Heuristic);
        assert_eq!(result.probability, 95.0);
        assert!(result.high_risk);

        let result = RiskResult::from_probability(50.0, vec![], Strategy::Heuristic);
        assert!(!result.high_risk);
    }

    #[test]
    fn test_band_from_probability() {
        assert_eq!(RiskBand::from_probability(10.0), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(30.0), RiskBand::Low);
        assert_eq!(RiskBand::from_probability(30.5), RiskBand::Moderate);
        assert_eq!(RiskBand::from_probability(60.0), RiskBand::Elevated);
        assert_eq!(RiskBand::from_probability(95.0), RiskBand::High);
        assert_eq!(RiskBand::High.color_code(), "#d73027");
    }
}
