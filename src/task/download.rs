//! Download task.

use super::TaskContext;
use super::file_ops::download;
use super::validation::{validate_path, validate_url};
use crate::error::DevstrapError;
use crate::path::SplitPath;
use crate::privilege::PrivilegeMethod;

/// Fetches `url` to `path.join()`; `path.sub` is the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    pub path: SplitPath,
    pub url: String,
    pub privilege: Option<PrivilegeMethod>,
}

impl DownloadConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_url(&self.url)?;
        validate_path(&self.path.base, true)?;
        if self.path.sub.as_str().is_empty() {
            return Err(DevstrapError::Validation(
                "download filename (sub-path) is missing".to_string(),
            ));
        }
        Ok(())
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        download(ctx, &self.url, &self.path.join(), self.privilege)
    }
}
