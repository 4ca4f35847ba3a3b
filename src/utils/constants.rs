//! Constants Module - Single Source of Truth
//!
//! Feature layout, display thresholds and the static report text live
//! here. Scoring increments live next to the heuristic in
//! `core::heuristic`.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "OdontoFast";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model artifact looked up when nothing else is configured
pub const DEFAULT_MODEL_PATH: &str = "modelo_problema_bucal.json";

/// Environment variable overriding the model path
pub const ENV_MODEL_PATH: &str = "ODONTOFAST_MODEL_PATH";

/// Environment variable forcing the heuristic strategy
pub const ENV_DISABLE_MODEL: &str = "ODONTOFAST_DISABLE_MODEL";

// ============================================
// ATTRIBUTE DOMAINS
// ============================================

pub const AGE_MIN: i64 = 1;
pub const AGE_MAX: i64 = 120;
pub const BRUSHING_MINUTES_MIN: i64 = 1;
pub const BRUSHING_MINUTES_MAX: i64 = 10;

// ============================================
// FEATURE VECTOR LAYOUT
// ============================================

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 12;

/// Column order of the encoded feature vector
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "brushing_frequency",
    "uses_floss",
    "uses_mouthwash",
    "is_smoker",
    "prior_oral_problem",
    "family_history",
    "gender",
    "brushing_duration_minutes",
    "sugar_consumption",
    "dentist_visit_frequency",
    "alcohol_consumption",
];

/// Display names, aligned with `FEATURE_NAMES`
pub const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Age",
    "Brushing frequency",
    "Floss use",
    "Mouthwash use",
    "Smoker",
    "Prior problems",
    "Family history",
    "Gender",
    "Brushing duration",
    "Sugar consumption",
    "Dentist visits",
    "Alcohol consumption",
];

/// Class label the classifier uses for "high risk"
pub const HIGH_RISK_CLASS: i64 = 1;

// ============================================
// PROBABILITY
// ============================================

/// Upper clamp of every reported probability
pub const MAX_PROBABILITY: f64 = 95.0;

/// Probability above which a result is high risk
pub const HIGH_RISK_THRESHOLD: f64 = 50.0;

/// Display bands (probability strictly above the bound)
pub const BAND_HIGH_ABOVE: f64 = 70.0;
pub const BAND_ELEVATED_ABOVE: f64 = 50.0;
pub const BAND_MODERATE_ABOVE: f64 = 30.0;

// ============================================
// REPORT
// ============================================

/// Bars shown in the factor chart
pub const MAX_CHART_FACTORS: usize = 6;

/// Width of the longest bar in characters
pub const CHART_WIDTH: usize = 40;

pub const HIGH_RISK_RECOMMENDATIONS: [&str; 5] = [
    "⚠️  Book a dentist appointment within the next 30 days",
    "🪥 Brush at least 3 times a day, for 2-3 minutes",
    "🧵 Floss every day",
    "🍬 Cut down on sugar and acidic food",
    "🧪 Use a fluoride mouthwash",
];

pub const LOW_RISK_RECOMMENDATIONS: [&str; 4] = [
    "✅ Keep up regular dentist check-ups (every 6 months)",
    "🪥 Keep your oral hygiene routine",
    "🧵 Floss regularly",
    "💧 Drink plenty of water",
];

pub const CHART_EXPLANATION: &str = "What does this mean? The chart shows the factors that contribute \
most to the risk level. The longer the bar, the larger the factor's influence on oral health.";

pub const HOW_IT_WORKS: [&str; 3] = [
    "Fill in every patient field in the form",
    "Submit the form to get a personalised prediction",
    "Review the result and the recommendations",
];

pub const ABOUT_TEXT: &str = "OdontoFast is a predictive analysis system for oral health problems. \
It uses a machine learning model, trained on patient history, to help dentists and patients spot \
risks before they become serious problems. It is a decision-support tool and must always be used \
together with a dentist's professional assessment.";

pub const ABOUT_BENEFITS: [&str; 4] = [
    "Early risk identification",
    "Personalised preventive plans",
    "Better patient education on oral health",
    "Long-term cost savings",
];
