//! Scoped temporary working directory.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::DevstrapError;

/// RAII guard owning the run's scratch directory.
///
/// Downloads, installers and clones land here. The directory is removed
/// when the guard drops, on success and on error alike.
#[derive(Debug)]
pub struct WorkDir {
    path: Utf8PathBuf,
}

impl WorkDir {
    /// Creates `devstrap-<uuid>` under the system temp directory.
    pub fn create() -> Result<Self, DevstrapError> {
        let tmp = Utf8PathBuf::from_path_buf(std::env::temp_dir()).map_err(|p| {
            DevstrapError::Validation(format!(
                "temp directory is not valid UTF-8: {}",
                p.display()
            ))
        })?;
        Self::create_in(&tmp)
    }

    /// Creates `devstrap-<uuid>` under `parent`.
    pub fn create_in(parent: &Utf8Path) -> Result<Self, DevstrapError> {
        let path = parent.join(format!("devstrap-{}", uuid::Uuid::new_v4()));
        fs::create_dir(&path).map_err(|e| {
            DevstrapError::io(format!("failed to create working directory {}", path), e)
        })?;
        tracing::debug!("created working directory: {}", path);
        Ok(Self { path })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!("cleaned up working directory: {}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("working directory already removed: {}", self.path);
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path,
                    error_kind = ?e.kind(),
                    "failed to clean up working directory: {}",
                    e,
                );
            }
        }
    }
}
