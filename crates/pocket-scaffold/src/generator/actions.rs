//! Side-effecting operations run while generating a project
//!
//! Every operation returns an [`ActionResult`]. Failures of any kind (missing
//! tool, non-zero exit, permission denied) are folded into the result message
//! and never propagated as errors.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Outcome of one generation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "ok" } else { "failed" };
        write!(f, "[{}] {}", status, self.message)
    }
}

/// Count succeeded and failed steps
pub fn summarize(results: &[ActionResult]) -> (usize, usize) {
    let succeeded = results.iter().filter(|r| r.success).count();
    (succeeded, results.len() - succeeded)
}

/// Executes filesystem and subprocess operations rooted at one output directory
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    output_path: PathBuf,
}

impl ActionExecutor {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Directory every operation runs in
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Create a directory and any missing parents
    pub fn create_directory(&self, path: &Path) -> ActionResult {
        match std::fs::create_dir_all(path) {
            Ok(()) => ActionResult::ok(format!("Created directory: {}", path.display())),
            Err(e) => ActionResult::failure(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            )),
        }
    }

    /// Write a file, creating parent directories and overwriting existing content
    pub fn write_file(&self, path: &Path, content: &str) -> ActionResult {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return ActionResult::failure(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ));
            }
        }

        match std::fs::write(path, content) {
            Ok(()) => ActionResult::ok(format!("Created file: {}", path.display())),
            Err(e) => {
                ActionResult::failure(format!("Failed to write file {}: {}", path.display(), e))
            }
        }
    }

    /// Initialize a git repository in the output directory
    pub fn execute_git_init(&self) -> ActionResult {
        if self.output_path.join(".git").exists() {
            return ActionResult::failure(format!(
                "Git repository already exists in {}",
                self.output_path.display()
            ));
        }

        self.run_program("git", &["init"], "Initialized git repository")
    }

    /// Create an isolated environment with the given package manager
    ///
    /// Unknown package managers are attempted as `<name> venv`.
    pub fn create_venv(&self, package_manager: &str) -> ActionResult {
        let (program, args) = venv_command(package_manager);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_program(
            &program,
            &args,
            &format!("Created virtual environment with {}", package_manager),
        )
    }

    /// Install project dependencies, including development ones when `dev` is set
    pub fn install_dependencies(&self, package_manager: &str, dev: bool) -> ActionResult {
        // Absolute so the venv's pip is not resolved against the child's working directory
        let root = std::path::absolute(&self.output_path)
            .unwrap_or_else(|_| self.output_path.clone());
        let (program, args) = install_command(package_manager, dev, &root);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_program(
            &program,
            &args,
            &format!("Installed dependencies with {}", package_manager),
        )
    }

    /// Run a shell command inside the output directory
    pub fn run_command(&self, command: &str) -> ActionResult {
        if command.trim().is_empty() {
            return ActionResult::failure("No command specified");
        }

        let (shell, flag) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        self.run_program(shell, &[flag, command], &format!("Ran command: {}", command))
    }

    fn run_program(&self, program: &str, args: &[&str], success_message: &str) -> ActionResult {
        log::info!(
            "Running '{} {}' in {}",
            program,
            args.join(" "),
            self.output_path.display()
        );

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.output_path)
            .output();

        match output {
            Ok(out) if out.status.success() => ActionResult::ok(success_message),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
                let detail = if stderr.is_empty() { stdout } else { stderr };
                let code = out
                    .status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());

                if detail.is_empty() {
                    ActionResult::failure(format!("'{}' exited with status {}", program, code))
                } else {
                    ActionResult::failure(format!(
                        "'{}' exited with status {}: {}",
                        program, code, detail
                    ))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ActionResult::failure(format!("'{}' not found. Is it installed?", program))
            }
            Err(e) => ActionResult::failure(format!("Failed to run '{}': {}", program, e)),
        }
    }
}

/// Program and arguments creating an environment for a package manager
fn venv_command(package_manager: &str) -> (String, Vec<String>) {
    match package_manager {
        "poetry" => ("poetry".into(), vec!["env".into(), "use".into(), "python3".into()]),
        "pip" | "venv" | "python" => (
            "python3".into(),
            vec!["-m".into(), "venv".into(), ".venv".into()],
        ),
        other => (other.to_string(), vec!["venv".into()]),
    }
}

/// Program and arguments installing dependencies for a package manager
fn install_command(package_manager: &str, dev: bool, output_path: &Path) -> (String, Vec<String>) {
    match package_manager {
        "uv" => {
            let mut args = vec!["sync".to_string()];
            if !dev {
                args.push("--no-dev".into());
            }
            ("uv".into(), args)
        }
        "poetry" => {
            let mut args = vec!["install".to_string()];
            if !dev {
                args.extend(["--without".to_string(), "dev".to_string()]);
            }
            ("poetry".into(), args)
        }
        "pip" => {
            let target = if dev { ".[dev]" } else { "." };
            (
                venv_pip(output_path).to_string_lossy().to_string(),
                vec!["install".into(), "-e".into(), target.into()],
            )
        }
        other => (other.to_string(), vec!["install".into()]),
    }
}

fn venv_pip(output_path: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        output_path.join(".venv").join("Scripts").join("pip.exe")
    } else {
        output_path.join(".venv").join("bin").join("pip")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_directory_idempotent() {
        let dir = TempDir::new().unwrap();
        let executor = ActionExecutor::new(dir.path());
        let target = dir.path().join("a/b/c");

        assert!(executor.create_directory(&target).success);
        assert!(executor.create_directory(&target).success);
        assert!(target.is_dir());
    }

    #[test]
    fn test_write_file_creates_parents_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let executor = ActionExecutor::new(dir.path());
        let target = dir.path().join("src/pkg/__init__.py");

        assert!(executor.write_file(&target, "first").success);
        assert!(executor.write_file(&target, "second").success);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
    }

    #[test]
    fn test_create_directory_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let executor = ActionExecutor::new(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let target = blocker.join("child");
        let result = executor.create_directory(&target);
        assert!(!result.success);
        assert!(result.message.contains(&target.display().to_string()));
        assert!(!target.exists());
    }

    #[test]
    fn test_write_file_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let executor = ActionExecutor::new(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let result = executor.write_file(&blocker.join("child.txt"), "x");
        assert!(!result.success);
        assert!(result.message.contains("blocker"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pip_install_with_relative_output_root() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new_in(".").unwrap();
        let root = dir
            .path()
            .strip_prefix(".")
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| dir.path().to_path_buf());
        assert!(root.is_relative());

        let bin = dir.path().join(".venv/bin");
        std::fs::create_dir_all(&bin).unwrap();
        let pip = bin.join("pip");
        std::fs::write(&pip, "#!/bin/sh\necho \"$@\" > pip-args.txt\n").unwrap();
        std::fs::set_permissions(&pip, std::fs::Permissions::from_mode(0o755)).unwrap();

        let result = ActionExecutor::new(root.clone()).install_dependencies("pip", true);
        assert!(result.success, "{}", result.message);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("pip-args.txt"))
                .unwrap()
                .trim(),
            "install -e .[dev]"
        );
    }

    #[test]
    fn test_run_command_empty() {
        let dir = TempDir::new().unwrap();
        let result = ActionExecutor::new(dir.path()).run_command("   ");
        assert!(!result.success);
        assert_eq!(result.message, "No command specified");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_in_output_dir() {
        let dir = TempDir::new().unwrap();
        let executor = ActionExecutor::new(dir.path());

        let result = executor.run_command("echo hello > marker.txt");
        assert!(result.success, "{}", result.message);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("marker.txt"))
                .unwrap()
                .trim(),
            "hello"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        let result = ActionExecutor::new(dir.path()).run_command("echo broken >&2; exit 3");
        assert!(!result.success);
        assert!(result.message.contains("status 3"));
        assert!(result.message.contains("broken"));
    }

    #[test]
    fn test_unknown_package_manager_attempted_verbatim() {
        let dir = TempDir::new().unwrap();
        let result = ActionExecutor::new(dir.path()).create_venv("definitely-not-a-real-pm-xyz");
        assert!(!result.success);
        assert!(result.message.contains("definitely-not-a-real-pm-xyz"));
    }

    #[test]
    fn test_git_init_existing_repository() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();

        let result = ActionExecutor::new(dir.path()).execute_git_init();
        assert!(!result.success);
        assert!(result.message.contains("already exists"));
    }

    #[test]
    fn test_install_commands() {
        let root = Path::new("/tmp/project");

        assert_eq!(
            install_command("uv", false, root),
            ("uv".to_string(), vec!["sync".to_string(), "--no-dev".to_string()])
        );
        assert_eq!(
            install_command("poetry", true, root),
            ("poetry".to_string(), vec!["install".to_string()])
        );
        let (program, args) = install_command("pip", true, root);
        assert!(program.contains(".venv"));
        assert_eq!(args.last().map(String::as_str), Some(".[dev]"));
        assert_eq!(install_command("pdm", true, root).1, vec!["install".to_string()]);
    }

    #[test]
    fn test_venv_commands() {
        assert_eq!(venv_command("uv").0, "uv");
        assert_eq!(venv_command("pip").0, "python3");
        assert_eq!(venv_command("poetry").1[0], "env");
    }

    #[test]
    fn test_summarize() {
        let results = vec![
            ActionResult::ok("a"),
            ActionResult::failure("b"),
            ActionResult::ok("c"),
        ];
        assert_eq!(summarize(&results), (2, 1));
        assert_eq!(results[1].to_string(), "[failed] b");
    }
}
