//! Pocket Scaffold - manifest-driven project scaffolding
//!
//! A template set is a directory holding a `template.yaml` manifest and the
//! template files it references. The manifest declares tool choices,
//! toggleable features, the file/directory structure to create (each entry
//! optionally conditional) and post-generation actions such as `git_init`.
//!
//! # Architecture
//!
//! - **Manifests** - `templates` loads and validates template sets
//! - **Generation** - `generator` builds the render context, materializes the
//!   structure and runs post-generation actions, returning one result per step
//! - **CLI/TUI Interface** - optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use pocket_scaffold::{templates, ProjectGenerator, Selections};
//! use std::path::Path;
//!
//! let base = Path::new("templates");
//! let manifest = templates::load_template_set(base, "python-cli")?;
//! let selections = Selections::from_manifest_defaults(&manifest);
//! let generator = ProjectGenerator::new(manifest, "my_cli", "./my_cli", Some(base.into()))
//!     .with_selections(selections);
//!
//! for result in generator.generate() {
//!     println!("{}", result);
//! }
//! ```

pub mod error;
pub mod generator;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{Result, ScaffoldError};
pub use generator::{
    build_context, evaluate_condition, render_template_file, render_template_string,
    ActionExecutor, ActionRegistry, ActionResult, ContextValue, ProjectGenerator, RenderContext,
    Selections,
};
pub use product::ProductConfig;
pub use templates::TemplateManifest;

#[cfg(feature = "tui")]
pub use tui::run;
