//! Node runtime bootstrap through nvm.

use camino::Utf8PathBuf;

use super::TaskContext;
use super::file_ops::update_permission;
use super::validation::{validate_not_empty, validate_path};
use crate::error::DevstrapError;
use crate::executor::CommandSpec;
use crate::path::ShrcConfig;
use crate::privilege::PrivilegeMethod;

/// Runs the nvm installer, installs node `version`, then installs
/// `global_packages` with that version's npm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeVersionManagerConfig {
    pub version: String,
    pub install_script: Utf8PathBuf,
    pub home: Utf8PathBuf,
    pub shrc: ShrcConfig,
    pub shell: String,
    pub global_packages: Vec<String>,
    pub privilege: Option<PrivilegeMethod>,
}

impl NodeVersionManagerConfig {
    pub fn validate(&self) -> Result<(), DevstrapError> {
        validate_path(&self.install_script, false)?;
        validate_path(&self.home, false)?;
        validate_path(&self.shrc.path, false)?;
        validate_not_empty(&self.version, "node version")?;
        validate_not_empty(&self.shell, "shell")
    }

    fn nvm_script(&self) -> Utf8PathBuf {
        self.home.join(".nvm/nvm.sh")
    }

    fn npm(&self) -> Utf8PathBuf {
        self.home
            .join(format!(".nvm/versions/node/v{}/bin/npm", self.version))
    }

    fn shell_command(&self, script: &str) -> CommandSpec {
        CommandSpec::new(self.shell.as_str(), ["-c", script])
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        update_permission(ctx, &self.install_script, "u+x", false, self.privilege)?;
        ctx.run(
            &self
                .shell_command(self.install_script.as_str())
                .with_privilege(self.privilege),
        )?;

        let source = format!("source {}", self.nvm_script());
        ctx.run(&self.shell_command(&format!("{} && nvm install {}", source, self.version)))?;

        if !self.global_packages.is_empty() {
            let install = format!(
                "{} && {} install -g {}",
                source,
                self.npm(),
                self.global_packages.join(" ")
            );
            ctx.run(&self.shell_command(&install))?;
        }

        self.shrc.append(ctx.dry_run())?;
        Ok(())
    }
}
