//! Template manifests and template set discovery
//!
//! This module provides:
//! - Template manifest types (TemplateManifest, StructureItem, PostGenAction)
//! - Loading manifests from a local template directory
//! - Runtime version requirement checks

pub mod loader;
pub mod manifest;
pub mod version;

pub use loader::{
    list_templates, load_manifest, load_template_set, validate_manifest, MANIFEST_FILE,
};
pub use manifest::{
    ActionParams, Feature, ItemKind, PostGenAction, StructureItem, TemplateManifest, ToolChoice,
    ToolOption,
};
