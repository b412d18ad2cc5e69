//! Template manifest types and parsing

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single selectable value within a tool choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOption {
    pub name: String,
    pub description: String,
}

/// A category of tool choices (e.g., which CLI framework to use)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChoice {
    /// Question shown to the user
    pub prompt: String,

    /// Preselected option name. Not required to match an option.
    pub default: String,

    pub options: Vec<ToolOption>,
}

impl ToolChoice {
    /// Check if an option with this name is offered
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    /// Check if the default names one of the offered options
    pub fn default_is_listed(&self) -> bool {
        self.has_option(&self.default)
    }
}

/// A toggleable capability of the generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,

    /// Used when the user makes no explicit selection
    #[serde(default)]
    pub default: bool,
}

/// Whether a structure item materializes as a file or a directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    File,
    Directory,
}

/// A file or directory in the generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureItem {
    /// Relative path, may contain placeholders
    pub path: String,

    #[serde(rename = "type", default)]
    pub kind: ItemKind,

    /// Template file backing the content. Ignored for directories.
    #[serde(default)]
    pub template: Option<String>,

    /// Dotted context lookup gating this item (e.g. `features.testing`)
    #[serde(default)]
    pub condition: Option<String>,
}

impl StructureItem {
    /// A directory entry with no condition
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ItemKind::Directory,
            template: None,
            condition: None,
        }
    }

    /// A file entry, optionally backed by a template
    pub fn file(path: impl Into<String>, template: Option<&str>) -> Self {
        Self {
            path: path.into(),
            kind: ItemKind::File,
            template: template.map(str::to_string),
            condition: None,
        }
    }

    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Parameters of a post-generation action
pub type ActionParams = BTreeMap<String, serde_yaml::Value>;

/// A step run after the structure has been materialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostGenAction {
    /// Registered action name (e.g. `git_init`)
    pub action: String,

    #[serde(default)]
    pub condition: Option<String>,

    #[serde(default)]
    pub params: ActionParams,
}

impl PostGenAction {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            condition: None,
            params: ActionParams::new(),
        }
    }

    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Per-template manifest (templates/<name>/template.yaml)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Template set identifier, also the directory holding its template files
    pub name: String,

    pub display_name: String,

    pub description: String,

    /// Runtime version constraint written into generated projects (e.g. `>=3.11`)
    pub python_version: String,

    #[serde(default)]
    pub tool_choices: BTreeMap<String, ToolChoice>,

    #[serde(default)]
    pub features: Vec<Feature>,

    /// Materialized in declaration order
    #[serde(default)]
    pub structure: Vec<StructureItem>,

    /// Executed in declaration order
    #[serde(default)]
    pub post_generation: Vec<PostGenAction>,
}

impl TemplateManifest {
    /// Look up a declared feature by name
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }
}
