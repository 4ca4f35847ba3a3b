//! Runtime configuration
//!
//! Read from the environment; the binary lets command-line flags
//! override both values.

use std::path::PathBuf;
use tracing::info;

use super::errors::{AppError, AppResult};
use crate::utils::constants::{DEFAULT_MODEL_PATH, ENV_DISABLE_MODEL, ENV_MODEL_PATH};

/// Evaluator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Classifier artifact location
    pub model_path: PathBuf,
    /// When false the heuristic is used without touching the disk
    pub use_model: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            use_model: true,
        }
    }
}

impl AppConfig {
    /// Load from `ODONTOFAST_MODEL_PATH` / `ODONTOFAST_DISABLE_MODEL`
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_MODEL_PATH).filter(|p| !p.trim().is_empty()) {
            config.model_path = PathBuf::from(path.trim());
        }

        if let Some(value) = lookup(ENV_DISABLE_MODEL) {
            config.use_model = !parse_flag(ENV_DISABLE_MODEL, &value)?;
        }

        info!(
            "⚙️  Config: model_path={} use_model={}",
            config.model_path.display(),
            config.use_model
        );

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::invalid_config(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model_path, PathBuf::from("modelo_problema_bucal.json"));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_MODEL_PATH, "/models/forest.json"),
            (ENV_DISABLE_MODEL, "yes"),
        ]))
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/models/forest.json"));
        assert!(!config.use_model);
    }

    #[test]
    fn test_invalid_flag_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_DISABLE_MODEL, "maybe")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }
}
