//! OS package installation task.

use camino::Utf8PathBuf;
use tracing::info;

use super::TaskContext;
use super::file_ops::{install_package, is_package_installed};
use super::validation::{validate_not_empty, validate_path};
use crate::error::DevstrapError;
use crate::privilege::PrivilegeMethod;

/// Installs `name` through the system package manager.
///
/// When `local_path` is set the package is installed from that archive
/// instead of the repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPackageConfig {
    pub name: String,
    pub local_path: Option<Utf8PathBuf>,
    pub privilege: Option<PrivilegeMethod>,
}

impl InstallPackageConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_not_empty(&self.name, "package name")?;
        if let Some(path) = &self.local_path {
            validate_path(path, false)?;
        }
        Ok(())
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        if is_package_installed(ctx, &self.name, self.privilege)? {
            let question = format!(
                "Package '{}' is already installed. Would you like to install/update it? (y/n): ",
                self.name
            );
            if !ctx.confirm(&question)? {
                info!("keeping installed package {}", self.name);
                return Ok(());
            }
        }

        let identifier = match &self.local_path {
            Some(path) => path.as_str(),
            None => self.name.as_str(),
        };
        install_package(ctx, identifier, self.privilege)
    }
}
