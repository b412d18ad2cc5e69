//! Name-to-handler registry for post-generation actions

use super::actions::{ActionExecutor, ActionResult};
use super::context::ContextValue;
use crate::templates::manifest::ActionParams;
use serde_yaml::Value;
use std::collections::HashMap;

/// Handler invoked for one post-generation action
pub type ActionHandler =
    Box<dyn Fn(&ActionExecutor, &ActionParams, &ContextValue) -> ActionResult + Send + Sync>;

/// Default package manager when an action does not name one
pub const DEFAULT_PACKAGE_MANAGER: &str = "uv";

/// Registry of post-generation actions
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    /// An empty registry; every dispatch reports an unknown action
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with the built-in actions
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        registry.register("git_init", |executor, _, _| executor.execute_git_init());
        registry.register("create_venv", |executor, params, _| {
            let package_manager = param_str(params, "package_manager", DEFAULT_PACKAGE_MANAGER);
            executor.create_venv(&package_manager)
        });
        registry.register("install_dependencies", |executor, params, _| {
            let package_manager = param_str(params, "package_manager", DEFAULT_PACKAGE_MANAGER);
            let dev = param_bool(params, "dev", true);
            executor.install_dependencies(&package_manager, dev)
        });
        registry.register("run_command", |executor, params, _| {
            executor.run_command(&param_str(params, "command", ""))
        });
        registry.register("display_next_steps", |_, _, _| {
            ActionResult::ok("Project generated successfully!")
        });

        registry
    }

    /// Add or replace the handler for an action name
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&ActionExecutor, &ActionParams, &ContextValue) -> ActionResult + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), Box::new(handler));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered action names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the handler registered under `name`
    pub fn dispatch(
        &self,
        name: &str,
        executor: &ActionExecutor,
        params: &ActionParams,
        context: &ContextValue,
    ) -> ActionResult {
        match self.handlers.get(name) {
            Some(handler) => handler(executor, params, context),
            None => ActionResult::failure(format!("Unknown action: {}", name)),
        }
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

/// Read a scalar parameter as a string
pub fn param_str(params: &ActionParams, key: &str, default: &str) -> String {
    match params.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Read a boolean parameter; rendered strings such as `"false"` are accepted
pub fn param_bool(params: &ActionParams, key: &str, default: bool) -> bool {
    match params.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => true,
            "false" | "no" | "0" | "" => false,
            _ => default,
        },
        _ => default,
    }
}
