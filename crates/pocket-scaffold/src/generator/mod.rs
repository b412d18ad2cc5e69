//! Project generation from a template manifest
//!
//! This module provides:
//! - Render context construction (context)
//! - Condition evaluation over the context (condition)
//! - Template rendering (renderer)
//! - Filesystem and subprocess operations (actions)
//! - Post-generation action dispatch (registry)
//!
//! [`ProjectGenerator::generate`] walks the manifest's structure, then its
//! post-generation actions, and returns one [`ActionResult`] per step taken.
//! It never stops early: a failed step is recorded and the walk continues.

pub mod actions;
pub mod condition;
pub mod context;
pub mod registry;
pub mod renderer;

pub use actions::{summarize, ActionExecutor, ActionResult};
pub use condition::{condition_holds, evaluate_condition};
pub use context::{build_context, ContextValue, RenderContext};
pub use registry::{ActionHandler, ActionRegistry};
pub use renderer::{render_template_file, render_template_string};

use crate::templates::manifest::{
    ActionParams, ItemKind, PostGenAction, StructureItem, TemplateManifest,
};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Default base directory holding template sets
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// User selections for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub tool_choices: BTreeMap<String, String>,
    pub features: BTreeMap<String, bool>,
    pub description: String,
}

impl Selections {
    /// Seed every tool choice and feature with the manifest's default
    ///
    /// The description starts empty; the manifest's own description
    /// describes the template, not the generated project.
    pub fn from_manifest_defaults(manifest: &TemplateManifest) -> Self {
        Self {
            tool_choices: manifest
                .tool_choices
                .iter()
                .map(|(key, choice)| (key.clone(), choice.default.clone()))
                .collect(),
            features: manifest
                .features
                .iter()
                .map(|f| (f.name.clone(), f.default))
                .collect(),
            description: String::new(),
        }
    }
}

/// Generates a project from a manifest into an output directory
#[derive(Debug)]
pub struct ProjectGenerator {
    manifest: TemplateManifest,
    project_name: String,
    template_base_path: PathBuf,
    selections: Selections,
    executor: ActionExecutor,
    registry: ActionRegistry,
}

impl ProjectGenerator {
    pub fn new(
        manifest: TemplateManifest,
        project_name: impl Into<String>,
        output_path: impl Into<PathBuf>,
        template_base_path: Option<PathBuf>,
    ) -> Self {
        Self {
            manifest,
            project_name: project_name.into(),
            executor: ActionExecutor::new(output_path),
            template_base_path: template_base_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR)),
            selections: Selections::default(),
            registry: ActionRegistry::builtin(),
        }
    }

    pub fn set_selections(
        &mut self,
        tool_choices: BTreeMap<String, String>,
        features: BTreeMap<String, bool>,
        description: impl Into<String>,
    ) {
        self.selections = Selections {
            tool_choices,
            features,
            description: description.into(),
        };
    }

    pub fn with_selections(mut self, selections: Selections) -> Self {
        self.selections = selections;
        self
    }

    /// Register additional post-generation actions
    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    pub fn output_path(&self) -> &Path {
        self.executor.output_path()
    }

    /// Post-generation action names no handler is registered for
    pub fn unregistered_actions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for action in &self.manifest.post_generation {
            let name = action.action.as_str();
            if !self.registry.contains(name) && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Context the run renders against
    pub fn context(&self) -> RenderContext {
        build_context(
            &self.project_name,
            &self.selections.description,
            &self.selections.tool_choices,
            &self.selections.features,
            &self.manifest.python_version,
        )
    }

    /// Directory holding this manifest's template files
    pub fn template_set_dir(&self) -> PathBuf {
        self.template_base_path.join(&self.manifest.name)
    }

    /// Materialize the structure, then run post-generation actions
    pub fn generate(&self) -> Vec<ActionResult> {
        let mut results = Vec::new();
        let context = self.context().to_value();

        log::info!(
            "Generating '{}' from template '{}' into {}",
            self.project_name,
            self.manifest.name,
            self.output_path().display()
        );

        if let Err(e) = std::fs::create_dir_all(self.output_path()) {
            results.push(ActionResult::failure(format!(
                "Failed to create output directory {}: {}",
                self.output_path().display(),
                e
            )));
        }

        for item in &self.manifest.structure {
            if !condition_holds(item.condition.as_deref(), &context) {
                log::debug!("Skipping '{}': condition not met", item.path);
                continue;
            }
            results.push(self.materialize(item, &context));
        }

        for action in &self.manifest.post_generation {
            if !condition_holds(action.condition.as_deref(), &context) {
                log::debug!("Skipping action '{}': condition not met", action.action);
                continue;
            }
            results.push(self.run_action(action, &context));
        }

        results
    }

    fn materialize(&self, item: &StructureItem, context: &ContextValue) -> ActionResult {
        let rendered = match render_template_string(&item.path, context) {
            Ok(path) => path,
            Err(e) => {
                return ActionResult::failure(format!("Failed to render path '{}': {}", item.path, e))
            }
        };

        let relative = match confine(&rendered) {
            Some(relative) => relative,
            None => {
                return ActionResult::failure(format!(
                    "Refusing to write outside output directory: {}",
                    rendered
                ))
            }
        };
        let full_path = self.output_path().join(relative);
        log::debug!("Materializing {:?} {}", item.kind, full_path.display());

        match item.kind {
            ItemKind::Directory => self.executor.create_directory(&full_path),
            ItemKind::File => match self.file_content(item, context) {
                Ok(content) => self.executor.write_file(&full_path, &content),
                Err(message) => ActionResult::failure(message),
            },
        }
    }

    /// Content for a file item; a missing template file yields empty content
    fn file_content(
        &self,
        item: &StructureItem,
        context: &ContextValue,
    ) -> std::result::Result<String, String> {
        let Some(template) = &item.template else {
            return Ok(String::new());
        };

        let template_name = render_template_string(template, context)
            .map_err(|e| format!("Failed to render template name '{}': {}", template, e))?;
        let template_path = self.template_set_dir().join(&template_name);

        if !template_path.exists() {
            log::debug!(
                "Template {} not found, writing empty file",
                template_path.display()
            );
            return Ok(String::new());
        }

        render_template_file(&template_path, context).map_err(|e| e.to_string())
    }

    fn run_action(&self, action: &PostGenAction, context: &ContextValue) -> ActionResult {
        log::debug!("Running action '{}'", action.action);
        match render_params(&action.params, context) {
            Ok(params) => self
                .registry
                .dispatch(&action.action, &self.executor, &params, context),
            Err(message) => ActionResult::failure(message),
        }
    }
}

/// Render every string parameter that carries template markup
fn render_params(
    params: &ActionParams,
    context: &ContextValue,
) -> std::result::Result<ActionParams, String> {
    params
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) if renderer::contains_markup(s) => render_template_string(s, context)
                .map(|rendered| (key.clone(), Value::String(rendered)))
                .map_err(|e| format!("Failed to render parameter '{}': {}", key, e)),
            _ => Ok((key.clone(), value.clone())),
        })
        .collect()
}

/// Relative path confined to the output root, or `None` if it would escape it
fn confine(rendered: &str) -> Option<PathBuf> {
    let path = Path::new(rendered.trim());
    let mut confined = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => confined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if confined.as_os_str().is_empty() {
        None
    } else {
        Some(confined)
    }
}
