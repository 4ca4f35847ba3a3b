//! Process-wide model cache
//!
//! The classifier artifact is read at most once per process. The first
//! caller's path decides what is loaded; later calls get the same
//! immutable handle (or the same "no model" answer) without touching the
//! disk again. A failed load is warned about once and then remembered.

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::model::ForestModel;

/// Outcome of the one-time load
#[derive(Debug)]
struct CachedModel {
    path: PathBuf,
    model: Option<Arc<ForestModel>>,
}

static SHARED_MODEL: OnceCell<CachedModel> = OnceCell::new();

/// Shared read-only model handle, loading it on first use
pub fn shared_model(path: &Path) -> Option<Arc<ForestModel>> {
    let cached = SHARED_MODEL.get_or_init(|| {
        let model = match ForestModel::load(path) {
            Ok(model) => Some(Arc::new(model)),
            Err(e) => {
                warn!(
                    code = e.code_str(),
                    "⚠️ Model unavailable ({}). Using the heuristic for this session.",
                    e
                );
                None
            }
        };
        CachedModel {
            path: path.to_path_buf(),
            model,
        }
    });

    if cached.path != path {
        debug!(
            "📦 Model already initialized from {}, ignoring {}",
            cached.path.display(),
            path.display()
        );
    }
    cached.model.clone()
}

/// Whether the one-time load has run and produced a model
pub fn is_model_loaded() -> bool {
    SHARED_MODEL
        .get()
        .map(|c| c.model.is_some())
        .unwrap_or(false)
}
