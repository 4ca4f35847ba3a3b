//! Report rendering
//!
//! Text report for the terminal and a JSON envelope for scripting.

use serde::Serialize;
use std::fmt::Write;

use crate::models::types::{RiskBand, RiskFactor, RiskResult, Strategy};
use crate::utils::constants::{
    ABOUT_BENEFITS, ABOUT_TEXT, APP_NAME, APP_VERSION, CHART_EXPLANATION, CHART_WIDTH,
    HIGH_RISK_RECOMMENDATIONS, HOW_IT_WORKS, LOW_RISK_RECOMMENDATIONS, MAX_CHART_FACTORS,
};

/// Static advice for the verdict branch
pub fn recommendations(high_risk: bool) -> &'static [&'static str] {
    if high_risk {
        &HIGH_RISK_RECOMMENDATIONS
    } else {
        &LOW_RISK_RECOMMENDATIONS
    }
}

pub fn verdict_label(high_risk: bool) -> &'static str {
    if high_risk {
        "HIGH RISK"
    } else {
        "LOW RISK"
    }
}

/// Horizontal bars scaled to the heaviest factor shown
pub fn render_bar_chart(factors: &[RiskFactor], max_rows: usize) -> String {
    let rows = &factors[..factors.len().min(max_rows)];
    let name_width = rows.iter().map(|f| f.name.chars().count()).max().unwrap_or(0);
    let max_weight = rows.iter().map(|f| f.weight).fold(0.0, f64::max);

    let mut out = String::new();
    for factor in rows {
        let len = if max_weight > 0.0 {
            ((factor.weight / max_weight) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {:<width$} │{} {:.2}",
            factor.name,
            "█".repeat(len),
            factor.weight,
            width = name_width
        );
    }
    out
}

/// Full text report for one result
pub fn render_report(result: &RiskResult) -> String {
    let band = result.band();
    let mut out = String::new();

    let _ = writeln!(out, "\n=== Analysis result ===");
    let _ = writeln!(
        out,
        "{} {}",
        if result.high_risk { "🚨" } else { "✅" },
        verdict_label(result.high_risk)
    );
    let _ = writeln!(
        out,
        "Probability of oral problems: {} {:.1}% ({})",
        band.emoji(),
        result.probability,
        band.color_code()
    );
    if result.strategy == Strategy::Heuristic {
        let _ = writeln!(out, "(estimated with the built-in heuristic)");
    }

    let _ = writeln!(out, "\n=== Recommendations ===");
    for line in recommendations(result.high_risk) {
        let _ = writeln!(out, "  - {}", line);
    }

    let _ = writeln!(out, "\n=== Main risk factors ===");
    out.push_str(&render_bar_chart(&result.factors, MAX_CHART_FACTORS));
    let _ = writeln!(out, "\n{}", CHART_EXPLANATION);

    out
}

/// Shown when no analysis is requested
pub fn render_about() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== How it works ===");
    for (i, step) in HOW_IT_WORKS.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }
    let _ = writeln!(out, "\n=== About {} ===", APP_NAME);
    let _ = writeln!(out, "{}", ABOUT_TEXT);
    let _ = writeln!(out, "\nMain benefits:");
    for benefit in ABOUT_BENEFITS {
        let _ = writeln!(out, "  - {}", benefit);
    }
    out
}

pub fn render_banner() -> String {
    format!(
        "🦷 {} v{} - Predictive analysis of oral health problems\n   Predicting oral health risk from patient history and habits",
        APP_NAME, APP_VERSION
    )
}

/// JSON output envelope
#[derive(Debug, Serialize)]
pub struct EvaluationReport<'a> {
    pub result: &'a RiskResult,
    pub verdict: &'static str,
    pub band: RiskBand,
    pub color: &'static str,
    pub recommendations: &'static [&'static str],
    /// Factors the chart would show
    pub top_factors: &'a [RiskFactor],
    pub generated_at: i64,
}

impl<'a> EvaluationReport<'a> {
    pub fn new(result: &'a RiskResult) -> Self {
        let band = result.band();
        Self {
            result,
            verdict: verdict_label(result.high_risk),
            band,
            color: band.color_code(),
            recommendations: recommendations(result.high_risk),
            top_factors: result.top_factors(MAX_CHART_FACTORS),
            generated_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(high_risk: bool, probability: f64) -> RiskResult {
        RiskResult::new(
            high_risk,
            probability,
            vec![
                RiskFactor::new("Smoker", 0.30),
                RiskFactor::new("Age", 0.15),
                RiskFactor::new("Floss use", 0.05),
            ],
            Strategy::Heuristic,
        )
    }

    #[test]
    fn test_bar_chart_scaling() {
        let chart = render_bar_chart(&result(true, 80.0).factors, MAX_CHART_FACTORS);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].matches('█').count(), CHART_WIDTH);
        assert_eq!(lines[1].matches('█').count(), CHART_WIDTH / 2);
        assert!(lines[0].ends_with("0.30"));
        assert!(lines[2].contains("Floss use"));
    }

    #[test]
    fn test_bar_chart_caps_rows() {
        let factors: Vec<RiskFactor> = (0..10)
            .map(|i| RiskFactor::new(format!("f{}", i), 0.1))
            .collect();
        assert_eq!(render_bar_chart(&factors, 6).lines().count(), 6);
        assert_eq!(render_bar_chart(&[], 6), "");
    }

    #[test]
    fn test_report_branches() {
        let high = render_report(&result(true, 80.0));
        assert!(high.contains("HIGH RISK"));
        assert!(high.contains("80.0%"));
        assert!(high.contains("#d73027"));
        assert!(high.contains("within the next 30 days"));

        let low = render_report(&result(false, 22.0));
        assert!(low.contains("LOW RISK"));
        assert!(low.contains("#1a9850"));
        assert!(low.contains("Drink plenty of water"));
    }

    #[test]
    fn test_json_envelope() {
        let r = result(true, 60.0);
        let json = serde_json::to_value(EvaluationReport::new(&r)).unwrap();
        assert_eq!(json["verdict"], "HIGH RISK");
        assert_eq!(json["band"], "elevated");
        assert_eq!(json["color"], "#fc8d59");
        assert_eq!(json["result"]["strategy"], "heuristic");
        assert_eq!(json["top_factors"][0]["name"], "Smoker");
    }

    #[test]
    fn test_about_lists_steps() {
        let about = render_about();
        assert!(about.contains("1. Fill in every patient field"));
        assert!(about.contains("Early risk identification"));
    }
}
