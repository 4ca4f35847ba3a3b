//! Terminal front end: patient form and report rendering

pub mod form;
pub mod render;

pub use form::{read_patient_json, PatientForm};
pub use render::{render_about, render_banner, render_bar_chart, render_report, EvaluationReport};
