//! Detection of the external tools post-generation actions rely on

use crate::generator::condition::condition_holds;
use crate::generator::context::ContextValue;
use crate::generator::registry::{param_str, DEFAULT_PACKAGE_MANAGER};
use crate::generator::renderer::{contains_markup, render_template_string};
use crate::templates::manifest::TemplateManifest;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

/// Check if a program is available by asking for its version
pub fn check_tool(program: &str) -> ToolInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            ToolInfo {
                name: program.to_string(),
                version: (!version.is_empty()).then_some(version),
                available: true,
            }
        }
        _ => ToolInfo {
            name: program.to_string(),
            version: None,
            available: false,
        },
    }
}

/// Check each program in turn
pub fn check_tools(programs: &[String]) -> Vec<ToolInfo> {
    programs.iter().map(|p| check_tool(p)).collect()
}

/// Programs the manifest's enabled post-generation actions will invoke
///
/// Conditions are evaluated and package manager parameters rendered the
/// same way generation does. `run_command` is not inspected.
pub fn required_tools(manifest: &TemplateManifest, context: &ContextValue) -> Vec<String> {
    let mut tools: Vec<String> = Vec::new();
    let mut add = |tool: String| {
        if !tool.is_empty() && !tools.contains(&tool) {
            tools.push(tool);
        }
    };

    for action in &manifest.post_generation {
        if !condition_holds(action.condition.as_deref(), context) {
            continue;
        }

        match action.action.as_str() {
            "git_init" => add("git".to_string()),
            "create_venv" | "install_dependencies" => {
                let raw = param_str(&action.params, "package_manager", DEFAULT_PACKAGE_MANAGER);
                let package_manager = if contains_markup(&raw) {
                    render_template_string(&raw, context).unwrap_or_default()
                } else {
                    raw
                };
                match package_manager.as_str() {
                    "pip" | "venv" | "python" => add("python3".to_string()),
                    _ => add(package_manager),
                }
            }
            _ => {}
        }
    }

    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::manifest::PostGenAction;

    fn manifest(actions: Vec<PostGenAction>) -> TemplateManifest {
        TemplateManifest {
            name: "demo".to_string(),
            display_name: "Demo".to_string(),
            description: String::new(),
            python_version: ">=3.11".to_string(),
            tool_choices: Default::default(),
            features: Vec::new(),
            structure: Vec::new(),
            post_generation: actions,
        }
    }

    fn context(package_manager: &str, git: bool) -> ContextValue {
        ContextValue::map([
            (
                "tool_choices",
                ContextValue::map([("package_manager", package_manager)]),
            ),
            ("features", ContextValue::map([("git", git)])),
        ])
    }

    #[test]
    fn test_required_tools_follow_conditions() {
        let m = manifest(vec![
            PostGenAction::new("git_init").when("features.git"),
            PostGenAction::new("create_venv")
                .param("package_manager", "{{ tool_choices.package_manager }}"),
            PostGenAction::new("install_dependencies")
                .param("package_manager", "{{ tool_choices.package_manager }}"),
            PostGenAction::new("run_command").param("command", "make"),
        ]);

        assert_eq!(required_tools(&m, &context("uv", true)), vec!["git", "uv"]);
        assert_eq!(required_tools(&m, &context("poetry", false)), vec!["poetry"]);
        assert_eq!(required_tools(&m, &context("pip", false)), vec!["python3"]);
    }

    #[test]
    fn test_default_package_manager() {
        let m = manifest(vec![PostGenAction::new("install_dependencies")]);
        assert_eq!(required_tools(&m, &context("", false)), vec!["uv"]);
    }

    #[test]
    fn test_missing_tool_unavailable() {
        let info = check_tool("definitely-not-a-real-tool-xyz");
        assert!(!info.available);
        assert!(info.version.is_none());
    }
}
