//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so degrade paths can be
//! told apart in the logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - VAL_xxx: patient attribute validation
//! - MODEL_xxx: model artifact load/invocation
//! - CFG_xxx: configuration
//! - INPUT_xxx: form or file input

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Validation Errors
    // ============================================
    /// Attribute value outside its documented domain
    ValidationOutOfRange,

    // ============================================
    // Model Errors
    // ============================================
    /// Model artifact not present on disk
    ModelNotFound,
    /// Model artifact could not be parsed or failed structural checks
    ModelMalformed,
    /// Feature vector or leaf shape does not match the model
    ModelShapeMismatch,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Input Errors
    // ============================================
    /// Form or JSON input could not be read
    InputInvalid,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationOutOfRange => "VAL_OUT_OF_RANGE",
            Self::ModelNotFound => "MODEL_NOT_FOUND",
            Self::ModelMalformed => "MODEL_MALFORMED",
            Self::ModelShapeMismatch => "MODEL_SHAPE_MISMATCH",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::InputInvalid => "INPUT_INVALID",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Errors the evaluator absorbs by switching to the heuristic
    pub fn is_model_error(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound | Self::ModelMalformed | Self::ModelShapeMismatch
        )
    }
}

// ============================================
// Validation error
// ============================================

/// Rejected patient attribute: which field, what value, what was allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

impl ValidationError {
    pub fn new(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self {
            field,
            value,
            min,
            max,
        }
    }

    /// Check `value` against an inclusive range
    pub fn check(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, Self> {
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(Self::new(field, value, min, max))
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} is outside the allowed range {}..={}",
            self.field, self.value, self.min, self.max
        )
    }
}

impl std::error::Error for ValidationError {}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Model file missing
    pub fn model_not_found(path: &std::path::Path) -> Self {
        Self::new(
            ErrorCode::ModelNotFound,
            format!("Model artifact not found: {}", path.display()),
        )
    }

    /// Model failed structural checks
    pub fn model_malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelMalformed, msg)
    }

    /// Input or leaf shape mismatch
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelShapeMismatch, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }

    /// Form or file input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InputInvalid, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::with_source(ErrorCode::ValidationOutOfRange, err.to_string(), err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::InputInvalid, "JSON parse error", err)
    }
}
