//! Path deletion and the overwrite prompt.

use std::fmt;

use camino::Utf8PathBuf;

use super::TaskContext;
use super::file_ops::{delete_path, path_exists};
use super::validation::validate_entry;
use crate::error::DevstrapError;
use crate::privilege::PrivilegeMethod;

/// Recursively removes `path`, which must exist. A dangling symlink counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePathConfig {
    pub path: Utf8PathBuf,
    pub privilege: Option<PrivilegeMethod>,
}

impl DeletePathConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_entry(&self.path)
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        delete_path(ctx, &self.path, self.privilege)
    }
}

/// Continuation receiving the operator's answer.
pub type PromptAction<'a> = Box<dyn Fn(&TaskContext<'_>, bool) -> Result<(), DevstrapError> + 'a>;

/// Asks before overwriting an existing `path`.
///
/// A missing path is a no-op. Otherwise the operator's answer is passed to
/// `action`, and its error (if any) is the task's error.
pub struct DirectoryPromptConfig<'a> {
    pub path: Utf8PathBuf,
    pub action: PromptAction<'a>,
}

impl fmt::Debug for DirectoryPromptConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryPromptConfig")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DirectoryPromptConfig<'_> {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        Ok(())
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        if !path_exists(&self.path)? {
            return Ok(());
        }
        let question = format!(
            "Directory '{}' is not empty. Do you want to overwrite it? (y/n): ",
            self.path
        );
        let answer = ctx.confirm(&question)?;
        (self.action)(ctx, answer)
    }
}
