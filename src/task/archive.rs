//! Toolchain archive installation.
//!
//! Extracts a downloaded `.tar.gz` into an install directory and exports
//! the toolchain's `bin` directory from the shell startup file. The Go
//! flavor also installs its language server with the fresh toolchain.

use camino::Utf8PathBuf;

use super::TaskContext;
use super::file_ops::{extract_tar, update_ownership};
use super::validation::validate_path;
use crate::error::DevstrapError;
use crate::executor::CommandSpec;
use crate::path::{ShrcConfig, SplitPath};
use crate::privilege::PrivilegeMethod;

/// Which toolchain an archive holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toolchain {
    Neovim,
    Golang {
        /// Package passed to `go install`, e.g. `golang.org/x/tools/gopls@latest`.
        aux_tool: String,
    },
}

/// Extracts `archive` into `path.base`; the archive's top-level directory
/// is `path.sub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInstallConfig {
    pub path: SplitPath,
    pub archive: Utf8PathBuf,
    pub shrc: ShrcConfig,
    pub toolchain: Toolchain,
    /// Hand the extracted tree to this owner (used when extracting elevated).
    pub owner: Option<String>,
    pub privilege: Option<PrivilegeMethod>,
}

impl ArchiveInstallConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_path(&self.path.base, true)?;
        validate_path(&self.archive, false)?;
        validate_path(&self.shrc.path, false)
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        extract_tar(ctx, &self.archive, &self.path.base, self.privilege)?;

        let installed = self.path.join();
        if let Some(owner) = &self.owner {
            update_ownership(ctx, &installed, owner, true, self.privilege)?;
        }

        if let Toolchain::Golang { aux_tool } = &self.toolchain {
            let go = installed.join("bin/go");
            ctx.run(&CommandSpec::new(go.as_str(), ["install", aux_tool.as_str()]))?;
        }

        self.shrc.append(ctx.dry_run())?;
        Ok(())
    }
}
