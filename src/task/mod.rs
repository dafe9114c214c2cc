//! Task module for provisioning steps.
//!
//! This module provides the `Task` type: a named unit of work whose
//! `TaskKind` variant carries a strongly-typed configuration. Methods on
//! `TaskKind` dispatch via Rust's exhaustive pattern matching, so a task
//! can never be paired with another variant's configuration.
//!
//! Adding a new task type requires:
//! 1. Adding a new variant to `TaskKind`
//! 2. Creating a corresponding config struct with `validate` and `run`
//! 3. Implementing the match arms in `TaskKind::validate` and `TaskKind::run`
//!
//! Every task is used exactly once: `validate()` first, then `run()`.

pub mod archive;
pub mod download;
pub mod file_ops;
pub mod node;
pub mod oh_my_zsh;
pub mod package;
pub mod path_ops;
pub mod repo;
pub mod validation;

use tracing::{debug, info, warn};

pub use archive::{ArchiveInstallConfig, Toolchain};
pub use download::DownloadConfig;
pub use node::NodeVersionManagerConfig;
pub use oh_my_zsh::OhMyZshConfig;
pub use package::InstallPackageConfig;
pub use path_ops::{DeletePathConfig, DirectoryPromptConfig, PromptAction};
pub use repo::{CloneRepoConfig, DotfilesConfig};

use crate::error::DevstrapError;
use crate::executor::{self, CommandExecutor, CommandSpec};
use crate::prompt::Prompter;

/// Collaborators a task needs while running.
#[derive(Clone, Copy)]
pub struct TaskContext<'a> {
    executor: &'a dyn CommandExecutor,
    prompter: &'a dyn Prompter,
    dry_run: bool,
}

impl<'a> TaskContext<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        prompter: &'a dyn Prompter,
        dry_run: bool,
    ) -> Self {
        Self {
            executor,
            prompter,
            dry_run,
        }
    }

    /// Runs a command, returning its exit code (see [`executor::run`]).
    pub fn run(&self, spec: &CommandSpec) -> Result<i32, DevstrapError> {
        executor::run(self.executor, spec)
    }

    /// Asks the operator a yes/no question.
    pub fn confirm(&self, question: &str) -> Result<bool, DevstrapError> {
        self.prompter.confirm(question)
    }

    /// Returns whether filesystem writes should be skipped.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// The variant-specific part of a task.
#[derive(Debug, strum::IntoStaticStr)]
pub enum TaskKind<'a> {
    /// Fetch a URL to a file
    Download(DownloadConfig),
    /// Install an OS package by name or from a local archive
    InstallPackage(InstallPackageConfig),
    /// Clone a plugin repository into place
    CloneRepo(CloneRepoConfig),
    /// Install oh-my-zsh and switch the login shell
    OhMyZsh(OhMyZshConfig),
    /// Extract a toolchain archive and put it on PATH
    InstallArchive(ArchiveInstallConfig),
    /// Install a subset of a dotfiles repository
    Dotfiles(DotfilesConfig),
    /// Bootstrap a node runtime through its version manager
    NodeVersionManager(NodeVersionManagerConfig),
    /// Recursively remove a path
    DeletePath(DeletePathConfig),
    /// Ask before touching an existing path
    DirectoryPrompt(DirectoryPromptConfig<'a>),
}

impl TaskKind<'_> {
    /// Returns the variant name, e.g. `"Download"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    fn validate(&self) -> Result<(), DevstrapError> {
        match self {
            Self::Download(cfg) => cfg.validate(),
            Self::InstallPackage(cfg) => cfg.validate(),
            Self::CloneRepo(cfg) => cfg.validate(),
            Self::OhMyZsh(cfg) => cfg.validate(),
            Self::InstallArchive(cfg) => cfg.validate(),
            Self::Dotfiles(cfg) => cfg.validate(),
            Self::NodeVersionManager(cfg) => cfg.validate(),
            Self::DeletePath(cfg) => cfg.validate(),
            Self::DirectoryPrompt(cfg) => cfg.validate(),
        }
    }

    fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        match self {
            Self::Download(cfg) => cfg.run(ctx),
            Self::InstallPackage(cfg) => cfg.run(ctx),
            Self::CloneRepo(cfg) => cfg.run(ctx),
            Self::OhMyZsh(cfg) => cfg.run(ctx),
            Self::InstallArchive(cfg) => cfg.run(ctx),
            Self::Dotfiles(cfg) => cfg.run(ctx),
            Self::NodeVersionManager(cfg) => cfg.run(ctx),
            Self::DeletePath(cfg) => cfg.run(ctx),
            Self::DirectoryPrompt(cfg) => cfg.run(ctx),
        }
    }
}

/// A named provisioning task.
#[derive(Debug)]
pub struct Task<'a> {
    name: String,
    kind: TaskKind<'a>,
}

impl<'a> Task<'a> {
    /// Creates a task. An empty name falls back to the variant name.
    pub fn new(name: impl Into<String>, kind: TaskKind<'a>) -> Self {
        let mut name = name.into();
        if name.is_empty() {
            name = kind.name().to_string();
            warn!(task_name = %name, "task name is empty, using task type instead");
        }
        Self { name, kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TaskKind<'a> {
        &self.kind
    }

    /// Runs the pre-flight checks. Performs no side effects.
    pub fn validate(&self) -> Result<(), DevstrapError> {
        self.kind
            .validate()
            .map_err(|e| DevstrapError::task(&self.name, e))
    }

    /// Performs the task. Call [`validate`](Self::validate) first.
    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        info!(task = %self.name, kind = self.kind.name(), "running task");
        self.kind
            .run(ctx)
            .map_err(|e| DevstrapError::task(&self.name, e))
    }

    /// Validates (unless dry run), then runs.
    ///
    /// Dry runs skip validation: the files earlier tasks would have
    /// produced do not exist.
    pub fn execute(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        if ctx.dry_run() {
            debug!(task = %self.name, "dry run: skipping validation");
        } else {
            self.validate()?;
        }
        self.run(ctx)
    }
}
