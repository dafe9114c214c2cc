//! The provisioning sequence.
//!
//! Steps run in a fixed order. Each step builds its tasks from the
//! profile, runs the overwrite confirmation flow for the destination it
//! populates, and then validates and runs its tasks. The first error stops
//! the whole run; completed steps are left as they are.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use strum::IntoEnumIterator;
use tracing::info;

use crate::config::Profile;
use crate::error::DevstrapError;
use crate::overwrite::{OverwriteOptions, handle_overwrite};
use crate::path::{ShrcConfig, SplitPath};
use crate::privilege::PrivilegeMethod;
use crate::task::file_ops::create_dir_all;
use crate::task::validation::url_file_name;
use crate::task::{
    ArchiveInstallConfig, CloneRepoConfig, DotfilesConfig, DownloadConfig, InstallPackageConfig,
    NodeVersionManagerConfig, OhMyZshConfig, Task, TaskContext, TaskKind, Toolchain,
};

/// A provisioning step, in execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter, clap::ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
    Packages,
    OhMyZsh,
    Neovim,
    NeovimLsp,
    Golang,
    Node,
    Dotfiles,
}

/// Ordered steps bound to a profile.
pub struct Workflow<'p> {
    profile: &'p Profile,
    steps: Vec<Step>,
}

impl<'p> Workflow<'p> {
    /// All steps.
    pub fn new(profile: &'p Profile) -> Self {
        Self {
            profile,
            steps: Step::iter().collect(),
        }
    }

    /// Only the selected steps, still in canonical order.
    pub fn with_steps(profile: &'p Profile, selected: &[Step]) -> Self {
        Self {
            profile,
            steps: Step::iter().filter(|s| selected.contains(s)).collect(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs every step. `workdir` is the scratch directory for the run.
    pub fn run(&self, ctx: &TaskContext<'_>, workdir: &Utf8Path) -> Result<()> {
        info!("starting workflow with {} step(s)", self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            info!("running step {}/{}: {}", index + 1, self.steps.len(), step);
            self.run_step(*step, ctx, workdir)
                .with_context(|| format!("step '{}' failed", step))?;
        }
        info!("workflow completed successfully");
        Ok(())
    }

    fn run_step(
        &self,
        step: Step,
        ctx: &TaskContext<'_>,
        workdir: &Utf8Path,
    ) -> Result<(), DevstrapError> {
        match step {
            Step::Packages => self.packages(ctx, workdir),
            Step::OhMyZsh => self.oh_my_zsh(ctx, workdir),
            Step::Neovim => self.neovim(ctx, workdir),
            Step::NeovimLsp => self.neovim_lsp(ctx),
            Step::Golang => self.golang(ctx, workdir),
            Step::Node => self.node(ctx, workdir),
            Step::Dotfiles => self.dotfiles(ctx, workdir),
        }
    }

    fn elevation(&self) -> Option<PrivilegeMethod> {
        Some(self.profile.privilege_method)
    }

    fn packages(&self, ctx: &TaskContext<'_>, workdir: &Utf8Path) -> Result<(), DevstrapError> {
        for package in &self.profile.packages {
            let local_path = match package.file_name() {
                Some(file_name) => {
                    let path = SplitPath::new(workdir, file_name);
                    let url = package.url.clone().unwrap_or_default();
                    download(ctx, &format!("DownloadTask {}", package.name), &url, &path)?;
                    Some(path.join())
                }
                None => None,
            };

            Task::new(
                format!("InstallPackage {}", package.name),
                TaskKind::InstallPackage(InstallPackageConfig {
                    name: package.name.clone(),
                    local_path,
                    privilege: self.elevation(),
                }),
            )
            .execute(ctx)?;
        }
        Ok(())
    }

    fn oh_my_zsh(&self, ctx: &TaskContext<'_>, workdir: &Utf8Path) -> Result<(), DevstrapError> {
        let profile = self.profile;
        let dest = SplitPath::new(&profile.home, &profile.oh_my_zsh.dir);
        if !proceed(ctx, dest, None)? {
            return Ok(());
        }

        Task::new(
            "OhMyZshTask",
            TaskKind::OhMyZsh(OhMyZshConfig {
                tmp_dir: workdir.to_path_buf(),
                username: profile.username.clone(),
                url: profile.oh_my_zsh.url.clone(),
                current_shell: profile.current_shell.clone(),
                login_shell: profile.login_shell.clone(),
                privilege: profile.privilege_method,
            }),
        )
        .execute(ctx)
    }

    fn neovim(&self, ctx: &TaskContext<'_>, workdir: &Utf8Path) -> Result<(), DevstrapError> {
        let settings = &self.profile.neovim;
        self.install_archive(
            ctx,
            workdir,
            "Neovim",
            &settings.url,
            &settings.install_dir,
            &settings.archive_root,
            self.profile.neovim_path_line(),
            Toolchain::Neovim,
        )
    }

    fn golang(&self, ctx: &TaskContext<'_>, workdir: &Utf8Path) -> Result<(), DevstrapError> {
        let settings = &self.profile.golang;
        self.install_archive(
            ctx,
            workdir,
            "Golang",
            &settings.url,
            &settings.install_dir,
            &settings.archive_root,
            self.profile.golang_path_line(),
            Toolchain::Golang {
                aux_tool: settings.aux_tool.clone(),
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn install_archive(
        &self,
        ctx: &TaskContext<'_>,
        workdir: &Utf8Path,
        label: &str,
        url: &str,
        install_dir: &Utf8Path,
        archive_root: &str,
        path_line: String,
        toolchain: Toolchain,
    ) -> Result<(), DevstrapError> {
        let profile = self.profile;
        let privilege = profile.privilege_for(install_dir);
        let dest = SplitPath::new(profile.resolve(install_dir), archive_root);
        if !proceed(ctx, dest.clone(), privilege)? {
            return Ok(());
        }

        let archive = SplitPath::new(workdir, archive_file_name(url, archive_root));
        download(ctx, &format!("DownloadTask {}", label), url, &archive)?;

        Task::new(
            format!("Install{}Task", label),
            TaskKind::InstallArchive(ArchiveInstallConfig {
                path: dest,
                archive: archive.join(),
                shrc: ShrcConfig::new(profile.shell_rc_path(), path_line),
                toolchain,
                owner: privilege.map(|_| profile.username.clone()),
                privilege,
            }),
        )
        .execute(ctx)
    }

    fn neovim_lsp(&self, ctx: &TaskContext<'_>) -> Result<(), DevstrapError> {
        let settings = &self.profile.neovim;
        let dest = SplitPath::new(self.profile.resolve(&settings.lsp_dir), &settings.lsp_name);
        if !proceed(ctx, dest.clone(), None)? {
            return Ok(());
        }

        Task::new(
            "NeovimLSPTask",
            TaskKind::CloneRepo(CloneRepoConfig {
                path: dest,
                url: settings.lsp_url.clone(),
                privilege: None,
            }),
        )
        .execute(ctx)
    }

    fn node(&self, ctx: &TaskContext<'_>, workdir: &Utf8Path) -> Result<(), DevstrapError> {
        let profile = self.profile;
        let settings = &profile.node;
        let dest = SplitPath::new(
            &profile.home,
            format!(".nvm/versions/node/v{}", settings.version),
        );
        if !proceed(ctx, dest, None)? {
            return Ok(());
        }

        let script = SplitPath::new(workdir, "nvm_install.sh");
        download(ctx, "DownloadTask Node", &settings.nvm_url, &script)?;

        Task::new(
            "InstallNodeTask",
            TaskKind::NodeVersionManager(NodeVersionManagerConfig {
                version: settings.version.clone(),
                install_script: script.join(),
                home: profile.home.clone(),
                shrc: ShrcConfig::new(profile.shell_rc_path(), profile.nvm_loader()),
                shell: settings.shell.clone(),
                global_packages: settings.global_packages.clone(),
                privilege: None,
            }),
        )
        .execute(ctx)
    }

    fn dotfiles(&self, ctx: &TaskContext<'_>, workdir: &Utf8Path) -> Result<(), DevstrapError> {
        let settings = &self.profile.neovim;
        let dest = SplitPath::new(
            self.profile.resolve(&settings.config_dir),
            &settings.config_name,
        );

        let mut subpaths = Vec::with_capacity(settings.dotfiles_subpaths.len());
        for sub in &settings.dotfiles_subpaths {
            if proceed(ctx, SplitPath::new(dest.join(), sub), None)? {
                subpaths.push(sub.clone());
            }
        }
        if subpaths.is_empty() {
            info!("no dotfiles left to install");
            return Ok(());
        }

        let clone_dir = workdir.join("dotfiles");
        create_dir_all(&clone_dir, ctx.dry_run())?;

        Task::new(
            "NeovimDotTask",
            TaskKind::Dotfiles(DotfilesConfig {
                path: dest,
                url: settings.dotfiles_url.clone(),
                tmp_dir: clone_dir,
                repo_subdir: settings.dotfiles_root.clone(),
                subpaths,
                privilege: None,
            }),
        )
        .execute(ctx)
    }
}

/// Runs the overwrite flow; returns whether the guarded step should run.
fn proceed(
    ctx: &TaskContext<'_>,
    path: SplitPath,
    privilege: Option<PrivilegeMethod>,
) -> Result<bool, DevstrapError> {
    let outcome = handle_overwrite(ctx, &OverwriteOptions { path, privilege })?;
    Ok(!outcome.is_skipped())
}

fn download(
    ctx: &TaskContext<'_>,
    name: &str,
    url: &str,
    path: &SplitPath,
) -> Result<(), DevstrapError> {
    Task::new(
        name,
        TaskKind::Download(DownloadConfig {
            path: path.clone(),
            url: url.to_string(),
            privilege: None,
        }),
    )
    .execute(ctx)
}

/// File name for a downloaded archive: the URL's last segment, or
/// `<archive_root>.tar.gz` when the URL ends in a slash.
fn archive_file_name(url: &str, archive_root: &str) -> Utf8PathBuf {
    url_file_name(url)
        .unwrap_or_else(|| format!("{}.tar.gz", archive_root))
        .into()
}
