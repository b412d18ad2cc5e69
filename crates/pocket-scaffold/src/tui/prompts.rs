//! Charm-style CLI prompts using cliclack

use crate::generator::{summarize, ActionResult, ProjectGenerator, Selections};
use crate::product::{resolve_template_dir, ProductConfig};
use crate::runtime::check;
use crate::templates::{self, TemplateManifest};
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Directory holding template sets instead of the configured default
    pub template_dir: Option<PathBuf>,

    /// Template set to use
    pub template: Option<String>,

    /// Project name
    pub name: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Project description
    pub description: Option<String>,

    /// Tool selections as `key=value`
    pub choices: Vec<String>,

    /// Features to enable
    pub with: Vec<String>,

    /// Features to disable
    pub without: Vec<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Locate template sets
    let template_dir = resolve_template_dir(config, args.template_dir.as_deref());

    // Step 2: Select template
    let manifest = select_template(&template_dir, args.template.as_deref())?;

    // Step 3: Name and directory
    let project_name = select_project_name(&args)?;
    let project_dir = select_directory(&args, &project_name)?;

    // Step 4: Description, tools and features
    let selections = select_options(&manifest, &args)?;

    let generator = ProjectGenerator::new(
        manifest,
        project_name,
        project_dir.clone(),
        Some(template_dir),
    )
    .with_selections(selections);

    // Step 5: Check external tools (advisory)
    check_tools(&generator)?;

    // Step 6: Create project
    let results = create_project(&generator)?;
    print_results(&results);

    let (_, failed) = summarize(&results);
    if failed > 0 {
        cliclack::outro_cancel(format!("{} step(s) failed", failed))?;
        anyhow::bail!("Project generation finished with {} failed step(s).", failed);
    }

    // Step 7: Show next steps
    print_next_steps(config, &project_dir, &generator)?;

    Ok(())
}

fn select_template(template_dir: &Path, specified_template: Option<&str>) -> Result<TemplateManifest> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let templates = match templates::list_templates(template_dir) {
        Ok(templates) => templates,
        Err(e) => {
            spinner.stop("Failed to load templates");
            return Err(e).context("Set --template-dir to a directory of template sets");
        }
    };

    // If a template was specified via --template flag, use it directly
    if let Some(template_name) = specified_template {
        let Some((_, manifest)) = templates.iter().find(|(name, _)| name == template_name) else {
            spinner.stop("Failed to load templates");
            let available: Vec<&str> = templates.iter().map(|(n, _)| n.as_str()).collect();
            anyhow::bail!(
                "Template '{}' not found. Available templates: {}",
                template_name,
                available.join(", ")
            );
        };

        spinner.stop(format!(
            "Template: {} - {}",
            manifest.display_name, manifest.description
        ));
        return Ok(manifest.clone());
    }

    spinner.stop("Templates loaded");

    if templates.is_empty() {
        anyhow::bail!("No templates found in {}.", template_dir.display());
    }

    // If only one template, use it automatically
    if templates.len() == 1 {
        let (_, manifest) = templates.into_iter().next().context("No templates found.")?;
        cliclack::log::info(format!(
            "Using template: {} - {}",
            manifest.display_name, manifest.description
        ))?;
        return Ok(manifest);
    }

    // Build select prompt - use indices to avoid borrow issues
    let mut select = cliclack::select("Select a template");
    for (idx, (_, manifest)) in templates.iter().enumerate() {
        select = select.item(idx, &manifest.display_name, &manifest.description);
    }

    let selected_idx: usize = select.interact()?;

    let (_, manifest) = templates
        .into_iter()
        .nth(selected_idx)
        .context("Selected template is no longer available")?;

    Ok(manifest)
}

fn select_project_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.name {
        if name.trim().is_empty() {
            anyhow::bail!("Project name cannot be empty.");
        }
        return Ok(name.trim().to_string());
    }

    // Fall back to the target directory's name
    if let Some(name) = args
        .directory
        .as_ref()
        .and_then(|d| d.file_name())
        .map(|n| n.to_string_lossy().to_string())
    {
        cliclack::log::info(format!("Project name: {}", name))?;
        return Ok(name);
    }

    if args.yes {
        anyhow::bail!("A project name is required in --yes mode (use --name).");
    }

    let name: String = cliclack::input("Project name")
        .placeholder("my_project")
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a project name")
            } else {
                Ok(())
            }
        })
        .interact()?;

    Ok(name.trim().to_string())
}

fn select_directory(args: &CreateArgs, project_name: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Use --directory flag if provided
    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir.join(project_name)
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(project_name)
            .default_input(project_name)
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Warn if directory exists and has files
    if path.exists() && path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                // Auto-confirm with --yes flag
                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway? Existing files may be overwritten")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

/// Parse a `key=value` tool selection
fn parse_choice(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid tool choice '{}', expected key=value", raw))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        anyhow::bail!("Invalid tool choice '{}', expected key=value", raw);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Apply `--choice`, `--with` and `--without` on top of the manifest defaults
///
/// Returns the selections plus the tool choice keys given explicitly.
fn apply_args(manifest: &TemplateManifest, args: &CreateArgs) -> Result<(Selections, Vec<String>)> {
    let mut selections = Selections::from_manifest_defaults(manifest);
    let mut explicit = Vec::new();

    for raw in &args.choices {
        let (key, value) = parse_choice(raw)?;
        match manifest.tool_choices.get(&key) {
            Some(choice) if !choice.has_option(&value) => {
                cliclack::log::warning(format!(
                    "'{}' is not a listed option for {}, using it anyway",
                    value, key
                ))?;
            }
            Some(_) => {}
            None => {
                cliclack::log::warning(format!("Unknown tool choice: {}", key))?;
                continue;
            }
        }
        selections.tool_choices.insert(key.clone(), value);
        explicit.push(key);
    }

    for (names, enabled) in [(&args.with, true), (&args.without, false)] {
        for name in names {
            if manifest.feature(name).is_none() {
                cliclack::log::warning(format!("Unknown feature: {}", name))?;
                continue;
            }
            selections.features.insert(name.clone(), enabled);
        }
    }

    Ok((selections, explicit))
}

fn select_options(manifest: &TemplateManifest, args: &CreateArgs) -> Result<Selections> {
    let (mut selections, explicit) = apply_args(manifest, args)?;

    selections.description = match &args.description {
        Some(description) => description.clone(),
        None if args.yes => String::new(),
        None => cliclack::input("Project description")
            .placeholder("A short description")
            .default_input(&format!("A {} project", manifest.display_name))
            .interact()?,
    };

    if !args.yes {
        for (key, choice) in &manifest.tool_choices {
            if explicit.contains(key) || choice.options.is_empty() {
                continue;
            }

            let mut select = cliclack::select(&choice.prompt);
            for option in &choice.options {
                select = select.item(option.name.clone(), &option.name, &option.description);
            }
            if choice.default_is_listed() {
                select = select.initial_value(choice.default.clone());
            }

            let selected: String = select.interact()?;
            selections.tool_choices.insert(key.clone(), selected);
        }

        let features_given = !args.with.is_empty() || !args.without.is_empty();
        if !features_given && !manifest.features.is_empty() {
            let mut multi = cliclack::multiselect("Select features");
            for feature in &manifest.features {
                multi = multi.item(feature.name.clone(), &feature.name, &feature.description);
            }

            let initial: Vec<String> = manifest
                .features
                .iter()
                .filter(|f| f.default)
                .map(|f| f.name.clone())
                .collect();
            let enabled: Vec<String> = multi.initial_values(initial).required(false).interact()?;

            selections.features = manifest
                .features
                .iter()
                .map(|f| (f.name.clone(), enabled.contains(&f.name)))
                .collect::<BTreeMap<_, _>>();
        }
    }

    let chosen: Vec<String> = selections
        .tool_choices
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    if !chosen.is_empty() {
        cliclack::log::success(format!("Tools: {}", chosen.join(", ")))?;
    }

    let enabled: Vec<&str> = selections
        .features
        .iter()
        .filter(|(_, on)| **on)
        .map(|(name, _)| name.as_str())
        .collect();
    if !enabled.is_empty() {
        cliclack::log::success(format!("Features: {}", enabled.join(", ")))?;
    }

    Ok(selections)
}

fn check_tools(generator: &ProjectGenerator) -> Result<()> {
    let unknown = generator.unregistered_actions();
    if !unknown.is_empty() {
        cliclack::log::warning(format!("Unknown actions will fail: {}", unknown.join(", ")))?;
    }

    let context = generator.context().to_value();
    let required = check::required_tools(generator.manifest(), &context);
    if required.is_empty() {
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start("Checking tools...");

    let tools = check::check_tools(&required);
    let tool_info: Vec<String> = tools
        .iter()
        .map(|t| {
            if t.available {
                format!("{} ({})", t.name, t.version.as_deref().unwrap_or("unknown"))
            } else {
                format!("{} (not installed)", t.name)
            }
        })
        .collect();
    spinner.stop(format!("Detected tools: {}", tool_info.join(", ")));

    let missing: Vec<&str> = tools
        .iter()
        .filter(|t| !t.available)
        .map(|t| t.name.as_str())
        .collect();
    if !missing.is_empty() {
        cliclack::log::warning(format!(
            "Actions using {} will fail until installed",
            missing.join(", ")
        ))?;
    }

    Ok(())
}

fn create_project(generator: &ProjectGenerator) -> Result<Vec<ActionResult>> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let results = generator.generate();

    let (succeeded, _) = summarize(&results);
    spinner.stop(format!(
        "Completed {} of {} steps in {}",
        succeeded,
        results.len(),
        generator.output_path().display()
    ));

    Ok(results)
}

fn print_results(results: &[ActionResult]) {
    println!();
    for result in results {
        if result.success {
            println!("  {} {}", "✓".green(), result.message);
        } else {
            println!("  {} {}", "✗".red(), result.message.red());
        }
    }
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    generator: &ProjectGenerator,
) -> Result<()> {
    let context = generator.context();
    let steps = config.next_steps(project_dir, &context.project_slug, generator.manifest());

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(
            parse_choice("package_manager=uv").unwrap(),
            ("package_manager".to_string(), "uv".to_string())
        );
        assert_eq!(
            parse_choice(" cli = typer ").unwrap(),
            ("cli".to_string(), "typer".to_string())
        );
        assert!(parse_choice("package_manager").is_err());
        assert!(parse_choice("=uv").is_err());
    }
}
