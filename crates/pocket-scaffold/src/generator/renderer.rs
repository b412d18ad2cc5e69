//! Template rendering for structure paths, template names and file contents
//!
//! Rendering uses minijinja with chainable undefined values, so
//! `{{ missing.key }}` renders as an empty string and
//! `{% if missing.key %}` is false instead of failing the render.

use super::context::ContextValue;
use crate::error::{Result, ScaffoldError};
use minijinja::{Environment, UndefinedBehavior};
use std::path::Path;

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_keep_trailing_newline(true);
    env
}

/// Check whether a string carries template markup
pub fn contains_markup(s: &str) -> bool {
    s.contains("{{") || s.contains("{%")
}

/// Render a template string against the context
pub fn render_template_string(template: &str, context: &ContextValue) -> Result<String> {
    environment()
        .render_str(template, context)
        .map_err(|e| ScaffoldError::RenderError(e.to_string()))
}

/// Read a template file and render it against the context
///
/// Unlike generation, which falls back to empty content, a missing file is
/// an error here.
pub fn render_template_file(path: &Path, context: &ContextValue) -> Result<String> {
    if !path.exists() {
        return Err(ScaffoldError::TemplateNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| ScaffoldError::TemplateReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let template = String::from_utf8(bytes).map_err(|_| ScaffoldError::TemplateReadError {
        path: path.to_path_buf(),
        reason: "file is not valid UTF-8 text".to_string(),
    })?;

    render_template_string(&template, context)
}
