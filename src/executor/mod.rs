//! Command execution abstraction for devstrap.
//!
//! This module provides:
//! - [`CommandSpec`]: Specification for commands to execute
//! - [`ExecutionResult`]: Result of command execution
//! - [`CommandExecutor`]: Trait for command execution strategies
//! - [`RealCommandExecutor`]: Production implementation using `std::process::Command`
//! - [`run`]: Maps an execution onto the exit-code contract used by tasks

mod real;

use std::process::ExitStatus;

use camino::Utf8PathBuf;

use crate::error::{DevstrapError, LAUNCH_FAILURE_CODE};
use crate::privilege::PrivilegeMethod;

pub use real::RealCommandExecutor;

/// Formats string arguments into a space-separated, debug-quoted string.
pub(crate) fn format_command_args(args: &[String]) -> String {
    args.iter()
        .map(|a| format!("{:?}", a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Specification for a command to be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The command to execute (e.g., "curl")
    pub command: String,
    /// Command arguments
    pub args: Vec<String>,
    /// Working directory (optional, defaults to current directory)
    pub cwd: Option<Utf8PathBuf>,
    /// Environment variables to set (in addition to inherited environment)
    pub env: Vec<(String, String)>,
    /// Privilege escalation method to wrap the command
    pub privilege: Option<PrivilegeMethod>,
}

impl CommandSpec {
    /// Creates a new CommandSpec with command and args
    #[must_use]
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
            privilege: None,
        }
    }

    /// Sets the privilege escalation method
    #[must_use]
    pub fn with_privilege(mut self, privilege: Option<PrivilegeMethod>) -> Self {
        self.privilege = privilege;
        self
    }

    /// Sets the working directory
    #[must_use]
    pub fn with_cwd(mut self, cwd: Utf8PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    /// Adds an environment variable
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Returns the program and arguments actually launched.
    ///
    /// With a privilege method set, the elevation tool becomes the program
    /// and the original command its first argument.
    pub fn argv(&self) -> (String, Vec<String>) {
        match self.privilege {
            Some(method) => {
                let mut args = Vec::with_capacity(self.args.len() + 1);
                args.push(self.command.clone());
                args.extend(self.args.iter().cloned());
                (method.command_name().to_string(), args)
            }
            None => (self.command.clone(), self.args.clone()),
        }
    }

    /// Renders the launched command line for logs and error messages.
    pub fn display(&self) -> String {
        let (program, args) = self.argv();
        if args.is_empty() {
            program
        } else {
            format!("{} {}", program, format_command_args(&args))
        }
    }
}

/// Result of command execution
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the command (None in dry-run mode)
    pub status: Option<ExitStatus>,
}

impl ExecutionResult {
    /// Returns true if the command executed successfully.
    ///
    /// In dry-run mode (status is None), this always returns true.
    pub fn success(&self) -> bool {
        self.status.is_none_or(|s| s.success())
    }

    /// Returns the exit code if available
    pub fn code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }
}

/// Trait for command execution.
pub trait CommandExecutor: Send + Sync {
    /// Executes a command with the given specification.
    ///
    /// Returns `Err` only when the process could not be launched; a process
    /// that ran and exited non-zero is reported through [`ExecutionResult`].
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult, DevstrapError>;
}

/// Runs a command and maps the outcome onto an exit code.
///
/// - success (or dry run) → `Ok(0)`
/// - clean non-zero exit → `Execution` error carrying that exact code
/// - termination by signal → `Execution` error with code `-1`
/// - launch failure → the executor's error, whose exit code is `-1`
pub fn run(executor: &dyn CommandExecutor, spec: &CommandSpec) -> Result<i32, DevstrapError> {
    let result = executor.execute(spec)?;
    match result.status {
        None => Ok(0),
        Some(status) if status.success() => Ok(0),
        Some(status) => match status.code() {
            Some(code) => Err(DevstrapError::Execution {
                command: spec.display(),
                code,
                status: format!("command failed to execute with status code {}", code),
            }),
            None => Err(DevstrapError::Execution {
                command: spec.display(),
                code: LAUNCH_FAILURE_CODE,
                status: format!("process terminated without exit code ({})", status),
            }),
        },
    }
}
