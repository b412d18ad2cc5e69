//! pocket-init - Project scaffolding from pocket template sets

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use pocket_scaffold::product::resolve_template_dir;
use pocket_scaffold::templates;
use pocket_scaffold::tui::CreateArgs;
use pocket_scaffold::{ProductConfig, TemplateManifest};
use std::path::{Path, PathBuf};

/// pocket-init product configuration
#[derive(Clone)]
pub struct PocketConfig;

impl ProductConfig for PocketConfig {
    fn name(&self) -> &'static str {
        "pocket-init"
    }

    fn display_name(&self) -> &'static str {
        "pocket init"
    }

    fn cli_description(&self) -> &'static str {
        "Create a new project from a pocket template set"
    }

    fn template_dir_env(&self) -> &'static str {
        "POCKET_TEMPLATE_DIR"
    }

    fn next_steps(&self, dir: &Path, project_slug: &str, manifest: &TemplateManifest) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Run the generated package when the template ships a CLI entry point
        if manifest.tool_choices.contains_key("cli_framework") {
            steps.push(format!("python -m {} --help", project_slug));
        }

        steps.push("Open README.md to get started".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "pocket-init")]
#[command(about = "Create a new project from a pocket template set")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    Create(CliCreateArgs),
    /// List available template sets
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Directory containing template sets (overrides POCKET_TEMPLATE_DIR)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template set to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Project name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Project directory to create (defaults to ./<name>)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,

    /// Tool selection as key=value (repeatable, e.g. --choice package_manager=uv)
    #[arg(short, long = "choice")]
    pub choices: Vec<String>,

    /// Features to enable (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub with: Vec<String>,

    /// Features to disable (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub without: Vec<String>,

    /// Auto-confirm all prompts and accept defaults (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            template: args.template,
            name: args.name,
            directory: args.directory,
            description: args.description,
            choices: args.choices,
            with: args.with,
            without: args.without,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Directory containing template sets (overrides POCKET_TEMPLATE_DIR)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

fn list_templates(config: &PocketConfig, args: ListArgs) -> Result<()> {
    let dir = resolve_template_dir(config, args.template_dir.as_deref());
    let sets = templates::list_templates(&dir)?;

    if sets.is_empty() {
        println!("{} No template sets found in {}", "Warning:".yellow(), dir.display());
        return Ok(());
    }

    println!("{}", format!("Template sets in {}", dir.display()).cyan().bold());
    println!();
    for (name, manifest) in &sets {
        println!(
            "  {} {} ({})",
            "->".blue(),
            name.bold(),
            manifest.display_name
        );
        println!("     {}", manifest.description.dimmed());
    }

    Ok(())
}

fn create(config: &PocketConfig, args: CreateArgs) -> Result<()> {
    let result = pocket_scaffold::run(config, args);

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = PocketConfig;

    match args.command {
        Some(Command::Create(create_args)) => create(&config, create_args.into()),
        Some(Command::List(list_args)) => list_templates(&config, list_args),
        // No subcommand provided, default to create behavior (interactive mode)
        None => create(&config, CreateArgs::default()),
    }
}
