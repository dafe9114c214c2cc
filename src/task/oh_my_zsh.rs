//! oh-my-zsh installation task.

use camino::Utf8PathBuf;
use tracing::info;

use super::TaskContext;
use super::file_ops::download;
use super::validation::{validate_not_empty, validate_path, validate_url};
use crate::error::DevstrapError;
use crate::executor::CommandSpec;
use crate::privilege::PrivilegeMethod;

const INSTALLER_NAME: &str = "install.sh";
const INSTALLER_INTERPRETER: &str = "/bin/sh";
const CHSH: &str = "/usr/bin/chsh";

/// Downloads and runs the oh-my-zsh installer, then makes `login_shell`
/// the operator's login shell unless `current_shell` already is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OhMyZshConfig {
    pub tmp_dir: Utf8PathBuf,
    pub username: String,
    pub url: String,
    pub current_shell: String,
    pub login_shell: String,
    /// Elevation used for `chsh`, which always runs privileged.
    pub privilege: PrivilegeMethod,
}

impl OhMyZshConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_not_empty(&self.username, "username")?;
        validate_path(&self.tmp_dir, true)?;
        validate_url(&self.url)
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        let script = self.tmp_dir.join(INSTALLER_NAME);
        download(ctx, &self.url, &script, None)?;

        // the installer would otherwise chsh and exec zsh itself
        let install = CommandSpec::new(INSTALLER_INTERPRETER, [script.as_str()])
            .with_env("RUNZSH", "no")
            .with_env("CHSH", "no");
        ctx.run(&install)?;

        if self.current_shell == self.login_shell {
            info!("login shell is already {}", self.login_shell);
            return Ok(());
        }

        let args = [self.username.as_str(), "-s", self.login_shell.as_str()];
        let chsh = CommandSpec::new(CHSH, args).with_privilege(Some(self.privilege));
        ctx.run(&chsh)?;
        Ok(())
    }
}
