//! External process execution behind an injectable [`Executor`] trait.
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over running external programs.
///
/// Handlers and resources never spawn processes directly; they go through an
/// `Executor` so that tests can substitute a scripted mock.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a program, failing if it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a program with `dir` as the child's working directory, failing if
    /// it exits non-zero.
    ///
    /// Only the child process sees `dir`; the caller's working directory is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a program, returning the result even when it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Whether `program` resolves on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        execute_checked(cmd, &format!("{program} in {}", dir.display()))
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;

        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Execute a command and return the result, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        bail!(
            "{label} failed (exit {}): {}",
            result.code.unwrap_or(-1),
            result.stderr.trim()
        );
    }
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Helper: run a simple echo command cross-platform.
    fn echo_result(msg: &str) -> Result<ExecResult> {
        #[cfg(windows)]
        {
            SystemExecutor.run("cmd", &["/C", "echo", msg])
        }
        #[cfg(not(windows))]
        {
            SystemExecutor.run("echo", &[msg])
        }
    }

    #[test]
    fn run_echo() {
        let result = echo_result("hello").unwrap();
        assert!(result.success, "echo command should succeed");
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_failure() {
        #[cfg(windows)]
        let result = SystemExecutor.run("cmd", &["/C", "exit", "1"]);
        #[cfg(not(windows))]
        let result = SystemExecutor.run("false", &[]);
        assert!(result.is_err(), "non-zero exit should produce an error");
    }

    #[test]
    fn run_unchecked_failure() {
        #[cfg(windows)]
        let result = SystemExecutor.run_unchecked("cmd", &["/C", "exit", "1"]).unwrap();
        #[cfg(not(windows))]
        let result = SystemExecutor.run_unchecked("false", &[]).unwrap();
        assert!(!result.success, "non-zero exit should set success=false");
    }

    #[test]
    fn run_missing_program_is_error() {
        let result = SystemExecutor.run("this-program-does-not-exist-12345", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn which_missing_program() {
        assert!(
            !SystemExecutor.which("this-program-does-not-exist-12345"),
            "non-existent program should not be found"
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_in_uses_child_working_directory_only() {
        let dir = tempfile::tempdir().unwrap();
        let before = std::env::current_dir().unwrap();
        let result = SystemExecutor.run_in(dir.path(), "pwd", &[]).unwrap();
        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
        assert_eq!(
            std::env::current_dir().unwrap(),
            before,
            "parent working directory must not change"
        );
    }
}
