//! Product configuration trait for CLI binaries
//!
//! Each binary built on this library implements this trait to define its
//! identity, where template sets are found, and what to print after a
//! project has been generated.

use crate::generator::DEFAULT_TEMPLATE_DIR;
use crate::templates::manifest::TemplateManifest;
use std::path::{Path, PathBuf};

/// Configuration trait for scaffolding products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Environment variable name for overriding the template directory
    fn template_dir_env(&self) -> &'static str;

    /// Template directory used when neither flag nor environment variable is set
    fn default_template_dir(&self) -> PathBuf {
        PathBuf::from(DEFAULT_TEMPLATE_DIR)
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, project_slug: &str, manifest: &TemplateManifest)
        -> Vec<String>;
}

/// Pick the template directory: explicit flag, then environment, then default
pub fn resolve_template_dir<C: ProductConfig>(config: &C, flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }

    match std::env::var(config.template_dir_env()) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => config.default_template_dir(),
    }
}
