//! Error types for manifest loading and template rendering.
//!
//! Execution failures (filesystem writes, subprocesses) are never errors;
//! they are reported as [`ActionResult`](crate::generator::ActionResult)s.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Failed to read template {}: {reason}", path.display())]
    TemplateReadError { path: PathBuf, reason: String },

    #[error("Template render error: {0}")]
    RenderError(String),

    #[error("Manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Template directory not found: {}", .0.display())]
    TemplateDirNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
