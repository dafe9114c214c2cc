//! Real command executor implementation.
//!
//! This module provides [`RealCommandExecutor`], which executes commands
//! using `std::process::Command`. Standard streams are inherited so the
//! operator sees tool output (and answers tool prompts) directly.

use std::process::{Command, Stdio};

use which::which;

use super::{CommandExecutor, CommandSpec, ExecutionResult};
use crate::error::{DevstrapError, LAUNCH_FAILURE_CODE};

/// Command executor that runs actual system commands.
///
/// When `dry_run` is true, commands are logged but not executed,
/// and `execute()` returns `Ok(ExecutionResult { status: None })`.
pub struct RealCommandExecutor {
    pub dry_run: bool,
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult, DevstrapError> {
        if self.dry_run {
            tracing::info!("dry run: {}", spec.display());
            return Ok(ExecutionResult { status: None });
        }

        let (program, args) = spec.argv();
        let resolved = which(&program).map_err(|_| DevstrapError::CommandNotFound {
            command: program.clone(),
        })?;
        tracing::trace!("command found: {}: {}", program, resolved.to_string_lossy());

        let mut command = Command::new(resolved);
        command.args(&args);

        if let Some(ref cwd) = spec.cwd {
            command.current_dir(cwd);
        }

        for (key, value) in &spec.env {
            command.env(key, value);
        }

        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::debug!("running: {}", spec.display());

        let mut child = command.spawn().map_err(|e| DevstrapError::Execution {
            command: spec.display(),
            code: LAUNCH_FAILURE_CODE,
            status: format!("failed to run {}: {}", program, e),
        })?;

        tracing::trace!("spawned command: {}: pid={}", program, child.id());

        let status = child.wait().map_err(|e| DevstrapError::Execution {
            command: spec.display(),
            code: LAUNCH_FAILURE_CODE,
            status: format!("failed to wait for command: {}", e),
        })?;

        tracing::trace!("executed command: {}: success={}", program, status.success());

        Ok(ExecutionResult {
            status: Some(status),
        })
    }
}
