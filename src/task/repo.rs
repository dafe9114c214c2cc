//! Git-backed tasks: plugin clones and dotfiles subsets.

use camino::{Utf8Component, Utf8PathBuf};

use super::TaskContext;
use super::file_ops::{create_dir_all, git_clone, move_path};
use super::validation::{validate_path, validate_url};
use crate::error::DevstrapError;
use crate::path::SplitPath;
use crate::privilege::PrivilegeMethod;

/// Clones `url` into `path.join()`. `path.base` must already exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRepoConfig {
    pub path: SplitPath,
    pub url: String,
    pub privilege: Option<PrivilegeMethod>,
}

impl CloneRepoConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_path(&self.path.base, true)?;
        validate_url(&self.url)
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        git_clone(ctx, &self.url, &self.path.join(), self.privilege)
    }
}

/// Installs selected entries of a dotfiles repository.
///
/// The repository is cloned into `tmp_dir`; every entry of `subpaths` is
/// then moved from `tmp_dir/repo_subdir/<entry>` to `path.join()/<entry>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotfilesConfig {
    pub path: SplitPath,
    pub url: String,
    pub tmp_dir: Utf8PathBuf,
    pub repo_subdir: Utf8PathBuf,
    pub subpaths: Vec<Utf8PathBuf>,
    pub privilege: Option<PrivilegeMethod>,
}

impl DotfilesConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_path(&self.path.base, true)?;
        validate_path(&self.tmp_dir, true)?;
        validate_url(&self.url)?;
        for sub in &self.subpaths {
            let escapes = sub
                .components()
                .any(|c| matches!(c, Utf8Component::ParentDir | Utf8Component::RootDir));
            if sub.as_str().is_empty() || escapes {
                return Err(DevstrapError::Validation(format!(
                    "dotfiles sub-path '{}' must be a non-empty relative path without '..'",
                    sub
                )));
            }
        }
        Ok(())
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        git_clone(ctx, &self.url, &self.tmp_dir, self.privilege)?;

        let dst_root = self.path.join();
        create_dir_all(&dst_root, ctx.dry_run())?;

        let src_root = self.tmp_dir.join(&self.repo_subdir);
        for sub in &self.subpaths {
            move_path(ctx, &src_root.join(sub), &dst_root.join(sub), self.privilege)?;
        }
        Ok(())
    }
}
