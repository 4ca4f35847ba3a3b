//! OdontoFast Library
//!
//! Oral-health risk evaluation from a patient's habits and history:
//! - Validated patient attribute record
//! - Classifier-backed scoring from a JSON random-forest artifact
//! - Deterministic heuristic fallback
//! - Ranked contributing factors for display

pub mod core;
pub mod models;
pub mod ui;
pub mod utils;

pub use crate::core::{Evaluator, ForestModel, HeuristicEvaluator, ModelBackedEvaluator, RiskEvaluator};
pub use models::{
    AppConfig, AppError, AppResult, BrushingFrequency, Consumption, DentistVisits, ErrorCode,
    FormOption, Gender, OralProblem, PatientAttributes, PatientAttributesBuilder,
    RawPatientRecord, RiskBand, RiskFactor, RiskResult, Strategy, ValidationError,
};
