//! Loading template manifests from a local template directory
//!
//! A template directory holds one sub-directory per template set:
//!
//! ```text
//! templates/
//!   python-cli/
//!     template.yaml
//!     main.py.j2
//! ```

use super::manifest::{ItemKind, TemplateManifest};
use super::version;
use crate::error::{Result, ScaffoldError};
use std::path::Path;
use walkdir::WalkDir;

/// Manifest file name inside each template set
pub const MANIFEST_FILE: &str = "template.yaml";

/// Read and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<TemplateManifest> {
    if !path.exists() {
        return Err(ScaffoldError::ManifestNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ScaffoldError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: TemplateManifest =
        serde_yaml::from_str(&content).map_err(|source| ScaffoldError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

    log::info!("Loaded manifest '{}' from {}", manifest.name, path.display());
    for warning in validate_manifest(&manifest) {
        log::warn!("{}: {}", path.display(), warning);
    }

    Ok(manifest)
}

/// Load the manifest of a named template set under `base`
pub fn load_template_set(base: &Path, name: &str) -> Result<TemplateManifest> {
    let manifest = load_manifest(&base.join(name).join(MANIFEST_FILE))?;
    if manifest.name != name {
        log::warn!(
            "Template set directory '{}' declares name '{}'; template files are looked up under '{}'",
            name,
            manifest.name,
            manifest.name
        );
    }
    Ok(manifest)
}

/// Discover every template set directly below `base`, sorted by directory name
///
/// Sets whose manifest cannot be loaded are skipped with a warning.
pub fn list_templates(base: &Path) -> Result<Vec<(String, TemplateManifest)>> {
    if !base.is_dir() {
        return Err(ScaffoldError::TemplateDirNotFound(base.to_path_buf()));
    }

    let mut templates = Vec::new();
    for entry in WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let dir_name = entry.file_name().to_string_lossy().to_string();
        let manifest_path = entry.path().join(MANIFEST_FILE);
        if !manifest_path.exists() {
            continue;
        }

        match load_manifest(&manifest_path) {
            Ok(manifest) => templates.push((dir_name, manifest)),
            Err(e) => log::warn!("Skipping template set '{}': {}", dir_name, e),
        }
    }

    Ok(templates)
}

/// Collect non-fatal problems in a manifest
///
/// None of these stop generation; they point at latent authoring mistakes.
pub fn validate_manifest(manifest: &TemplateManifest) -> Vec<String> {
    let mut warnings = Vec::new();

    for (key, choice) in &manifest.tool_choices {
        if !choice.default_is_listed() {
            warnings.push(format!(
                "tool choice '{}' defaults to '{}', which is not one of its options",
                key, choice.default
            ));
        }
    }

    for (i, item) in manifest.structure.iter().enumerate() {
        if item.path.trim().is_empty() {
            warnings.push(format!("structure item {} has an empty path", i + 1));
        }
        if item.kind == ItemKind::Directory && item.template.is_some() {
            warnings.push(format!(
                "directory '{}' declares a template, which is ignored",
                item.path
            ));
        }
    }

    if let Some(warning) = version::check_python_requirement(&manifest.python_version) {
        warnings.push(warning);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::manifest::{StructureItem, ToolChoice, ToolOption};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
name: minimal
display_name: Minimal
description: Smallest possible template
python_version: ">=3.11"
"#;

    fn manifest() -> TemplateManifest {
        serde_yaml::from_str(MINIMAL).unwrap()
    }

    #[test]
    fn test_load_manifest_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_manifest(&dir.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(matches!(err, ScaffoldError::ManifestNotFound(_)));
    }

    #[test]
    fn test_load_manifest_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "name: [unclosed").unwrap();

        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, ScaffoldError::ManifestParse { .. }));
    }

    #[test]
    fn test_list_templates_skips_broken_sets() {
        let dir = TempDir::new().unwrap();
        for (name, content) in [
            ("b-set", MINIMAL),
            ("a-set", MINIMAL),
            ("broken", "not: [valid"),
        ] {
            let set = dir.path().join(name);
            std::fs::create_dir_all(&set).unwrap();
            std::fs::write(set.join(MANIFEST_FILE), content).unwrap();
        }
        std::fs::create_dir_all(dir.path().join("no-manifest")).unwrap();

        let templates = list_templates(dir.path()).unwrap();
        let names: Vec<&str> = templates.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a-set", "b-set"]);
    }

    #[test]
    fn test_list_templates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = list_templates(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateDirNotFound(_)));
    }

    #[test]
    fn test_validate_clean_manifest() {
        assert!(validate_manifest(&manifest()).is_empty());
    }

    #[test]
    fn test_validate_reports_latent_defects() {
        let mut m = manifest();
        m.python_version = "latest".to_string();
        m.tool_choices = BTreeMap::from([(
            "package_manager".to_string(),
            ToolChoice {
                prompt: "Package manager?".to_string(),
                default: "pdm".to_string(),
                options: vec![ToolOption {
                    name: "uv".to_string(),
                    description: "uv".to_string(),
                }],
            },
        )]);
        let mut dir = StructureItem::directory("src");
        dir.template = Some("unused.j2".to_string());
        m.structure = vec![dir, StructureItem::file("", None)];

        let warnings = validate_manifest(&m);
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("pdm"));
    }
}
