//! Core Module - Risk Evaluation
//!
//! Heuristic scoring, the classifier artifact and the strategy selector.

pub mod evaluator;
pub mod heuristic;
pub mod model;

pub use evaluator::*;
pub use heuristic::*;
pub use model::*;
