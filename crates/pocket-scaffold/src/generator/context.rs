//! Render context built once per generation run

use crate::templates::version;
use heck::{ToSnakeCase, ToTitleCase};
use serde::Serialize;
use std::collections::BTreeMap;

/// Value tree consumed by template rendering and condition evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Str(String),
    Bool(bool),
    Map(BTreeMap<String, ContextValue>),
}

impl ContextValue {
    /// Build a map value from key/value pairs
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        ContextValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Child value of a map; `None` for missing keys and non-map values
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        match self {
            ContextValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Booleans as is, strings and maps when non-empty
    pub fn is_truthy(&self) -> bool {
        match self {
            ContextValue::Str(s) => !s.is_empty(),
            ContextValue::Bool(b) => *b,
            ContextValue::Map(entries) => !entries.is_empty(),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Str(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Str(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<BTreeMap<String, ContextValue>> for ContextValue {
    fn from(value: BTreeMap<String, ContextValue>) -> Self {
        ContextValue::Map(value)
    }
}

/// Snapshot of user selections plus derived names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub project_name: String,
    /// Title-cased project name (`my_awesome_cli` -> `My Awesome Cli`)
    pub project_display_name: String,
    /// Importable package name (`My Awesome-CLI` -> `my_awesome_cli`)
    pub project_slug: String,
    pub description: String,
    pub tool_choices: BTreeMap<String, String>,
    pub features: BTreeMap<String, bool>,
    pub python_version: String,
    /// Lowest `major.minor` allowed by `python_version`, empty if unknown
    pub python_min_version: String,
}

impl RenderContext {
    /// Flatten into the value tree used by the renderer
    pub fn to_value(&self) -> ContextValue {
        ContextValue::map([
            ("project_name", ContextValue::from(self.project_name.as_str())),
            (
                "project_display_name",
                self.project_display_name.as_str().into(),
            ),
            ("project_slug", self.project_slug.as_str().into()),
            ("description", self.description.as_str().into()),
            (
                "tool_choices",
                ContextValue::map(
                    self.tool_choices
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.as_str())),
                ),
            ),
            (
                "features",
                ContextValue::map(self.features.iter().map(|(k, v)| (k.as_str(), *v))),
            ),
            ("python_version", self.python_version.as_str().into()),
            ("python_min_version", self.python_min_version.as_str().into()),
        ])
    }
}

/// Title-case a project name, treating `_`, `-` and spaces as word separators
pub fn display_name(project_name: &str) -> String {
    project_name.to_title_case()
}

/// Build the render context for one generation run
pub fn build_context(
    project_name: &str,
    description: &str,
    tool_choices: &BTreeMap<String, String>,
    features: &BTreeMap<String, bool>,
    python_version: &str,
) -> RenderContext {
    RenderContext {
        project_name: project_name.to_string(),
        project_display_name: display_name(project_name),
        project_slug: project_name.to_snake_case(),
        description: description.to_string(),
        tool_choices: tool_choices.clone(),
        features: features.clone(),
        python_version: python_version.to_string(),
        python_min_version: version::minimum_python(python_version).unwrap_or_default(),
    }
}
