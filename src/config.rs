//! Profile configuration.
//!
//! A profile describes the workstation layout: the operator, their home
//! and shell, the packages to install and where each toolchain goes. Every
//! field has a default, so an empty YAML document is a valid profile.
//! Relative paths are resolved against `home`.

use std::env;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DevstrapError;
use crate::privilege::PrivilegeMethod;
use crate::task::validation::{url_file_name, validate_url};

const FALLBACK_HOME: &str = "/root";

const NVM_LOADER: &str = "export NVM_DIR=\"$HOME/.nvm\"\n\
[ -s \"$NVM_DIR/nvm.sh\" ] && \\. \"$NVM_DIR/nvm.sh\"  # This loads nvm\n\
[ -s \"$NVM_DIR/bash_completion\" ] && \\. \"$NVM_DIR/bash_completion\"  # This loads nvm bash_completion\n";

/// An OS package, optionally fetched from a URL instead of the repositories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PackageSpec {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: None,
        }
    }

    /// File name the package archive is downloaded to.
    pub fn file_name(&self) -> Option<String> {
        self.url.as_deref().and_then(url_file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OhMyZshSettings {
    pub url: String,
    pub dir: Utf8PathBuf,
}

impl Default for OhMyZshSettings {
    fn default() -> Self {
        Self {
            url: "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh"
                .to_string(),
            dir: ".oh-my-zsh".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NeovimSettings {
    pub url: String,
    pub install_dir: Utf8PathBuf,
    /// Top-level directory inside the release archive.
    pub archive_root: String,
    pub lsp_url: String,
    pub lsp_dir: Utf8PathBuf,
    pub lsp_name: String,
    pub dotfiles_url: String,
    pub config_dir: Utf8PathBuf,
    pub config_name: String,
    /// Directory inside the dotfiles repository holding the config.
    pub dotfiles_root: Utf8PathBuf,
    pub dotfiles_subpaths: Vec<Utf8PathBuf>,
}

impl Default for NeovimSettings {
    fn default() -> Self {
        Self {
            url: "https://github.com/neovim/neovim/releases/download/v0.10.4/nvim-linux-x86_64.tar.gz"
                .to_string(),
            install_dir: ".local/share".into(),
            archive_root: "nvim-linux-x86_64".to_string(),
            lsp_url: "https://github.com/neovim/nvim-lspconfig".to_string(),
            lsp_dir: ".config/nvim/pack/nvim/start".into(),
            lsp_name: "nvim-lspconfig".to_string(),
            dotfiles_url: "https://github.com/AlexKhomych/neovim-dot.git".to_string(),
            config_dir: ".config".into(),
            config_name: "nvim".to_string(),
            dotfiles_root: "nvim".into(),
            dotfiles_subpaths: vec!["init.lua".into(), "lua".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GolangSettings {
    pub url: String,
    pub install_dir: Utf8PathBuf,
    pub archive_root: String,
    pub aux_tool: String,
}

impl Default for GolangSettings {
    fn default() -> Self {
        Self {
            url: "https://go.dev/dl/go1.24.1.linux-amd64.tar.gz".to_string(),
            install_dir: ".local/share".into(),
            archive_root: "go".to_string(),
            aux_tool: "golang.org/x/tools/gopls@latest".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSettings {
    pub nvm_url: String,
    pub version: String,
    pub shell: String,
    pub global_packages: Vec<String>,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            nvm_url: "https://raw.githubusercontent.com/nvm-sh/nvm/v0.40.2/install.sh".to_string(),
            version: "22.14.0".to_string(),
            shell: "/bin/zsh".to_string(),
            global_packages: vec![
                "typescript-language-server".to_string(),
                "typescript".to_string(),
            ],
        }
    }
}

/// Workstation profile, built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub home: Utf8PathBuf,
    pub username: String,
    /// The operator's current login shell.
    pub current_shell: String,
    /// The login shell to switch to.
    pub login_shell: String,
    pub shell_rc: Utf8PathBuf,
    pub privilege_method: PrivilegeMethod,
    pub packages: Vec<PackageSpec>,
    pub oh_my_zsh: OhMyZshSettings,
    pub neovim: NeovimSettings,
    pub golang: GolangSettings,
    pub node: NodeSettings,
}

impl Default for Profile {
    /// Defaults taken from `$HOME`, `$USER` and `$SHELL`.
    fn default() -> Self {
        let home = home_or_fallback(env::var("HOME").ok());
        let username = env::var("USER").unwrap_or_default();
        let shell = env::var("SHELL").unwrap_or_default();
        Self::new(home, username, shell)
    }
}

fn home_or_fallback(home: Option<String>) -> String {
    match home {
        Some(home) if !home.is_empty() => home,
        _ => {
            warn!("HOME is not set, using {} as home", FALLBACK_HOME);
            FALLBACK_HOME.to_string()
        }
    }
}

impl Profile {
    pub fn new(
        home: impl Into<Utf8PathBuf>,
        username: impl Into<String>,
        current_shell: impl Into<String>,
    ) -> Self {
        Self {
            home: home.into(),
            username: username.into(),
            current_shell: current_shell.into(),
            login_shell: "/bin/zsh".to_string(),
            shell_rc: ".zshrc".into(),
            privilege_method: PrivilegeMethod::default(),
            packages: vec![
                PackageSpec::named("curl"),
                PackageSpec::named("htop"),
                PackageSpec::named("vim"),
                PackageSpec::named("zsh"),
                PackageSpec::named("git"),
                PackageSpec::named("build-essential"),
                PackageSpec {
                    name: "ripgrep".to_string(),
                    url: Some(
                        "https://github.com/BurntSushi/ripgrep/releases/download/14.1.0/ripgrep_14.1.0-1_amd64.deb"
                            .to_string(),
                    ),
                },
            ],
            oh_my_zsh: OhMyZshSettings::default(),
            neovim: NeovimSettings::default(),
            golang: GolangSettings::default(),
            node: NodeSettings::default(),
        }
    }

    /// Resolves `path` against the home directory. Absolute paths are kept.
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        self.home.join(path)
    }

    pub fn shell_rc_path(&self) -> Utf8PathBuf {
        self.resolve(&self.shell_rc)
    }

    /// Returns the privilege method when `path` lies outside the home directory.
    pub fn privilege_for(&self, path: &Utf8Path) -> Option<PrivilegeMethod> {
        self.privilege_method
            .when(!self.resolve(path).starts_with(&self.home))
    }

    /// Shell-rc line putting the neovim binaries on PATH.
    pub fn neovim_path_line(&self) -> String {
        let bin = self
            .resolve(&self.neovim.install_dir)
            .join(&self.neovim.archive_root)
            .join("bin");
        format!("export PATH=$PATH:{}\n", bin)
    }

    /// Shell-rc line putting the go toolchain and `go install` targets on PATH.
    pub fn golang_path_line(&self) -> String {
        let bin = self
            .resolve(&self.golang.install_dir)
            .join(&self.golang.archive_root)
            .join("bin");
        format!("export PATH=$PATH:{}:{}\n", bin, self.home.join("go/bin"))
    }

    /// Shell-rc lines loading nvm.
    pub fn nvm_loader(&self) -> &'static str {
        NVM_LOADER
    }

    /// Checks the profile before anything is executed.
    pub fn validate(&self) -> Result<(), DevstrapError> {
        if !self.home.is_absolute() {
            return Err(DevstrapError::Validation(format!(
                "home must be an absolute path: {}",
                self.home
            )));
        }
        for (label, value) in [
            ("username", &self.username),
            ("login_shell", &self.login_shell),
            ("node.version", &self.node.version),
            ("node.shell", &self.node.shell),
            ("neovim.archive_root", &self.neovim.archive_root),
            ("golang.archive_root", &self.golang.archive_root),
        ] {
            if value.is_empty() {
                return Err(DevstrapError::Validation(format!("{} must not be empty", label)));
            }
        }
        for url in [
            &self.oh_my_zsh.url,
            &self.neovim.url,
            &self.neovim.lsp_url,
            &self.neovim.dotfiles_url,
            &self.golang.url,
            &self.node.nvm_url,
        ] {
            validate_url(url)?;
        }
        for package in &self.packages {
            if package.name.is_empty() {
                return Err(DevstrapError::Validation(
                    "package name must not be empty".to_string(),
                ));
            }
            if let Some(url) = &package.url {
                validate_url(url)?;
                if package.file_name().is_none() {
                    return Err(DevstrapError::Validation(format!(
                        "package '{}' URL has no file name: {}",
                        package.name, url
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Loads a profile from a YAML file.
pub fn load_profile(path: &Utf8Path) -> Result<Profile, DevstrapError> {
    let content = fs::read_to_string(path)
        .map_err(|e| DevstrapError::io(format!("failed to load file: {}", path), e))?;
    parse_profile(&content)
        .map_err(|e| DevstrapError::Config(format!("failed to parse yaml: {}: {}", path, e)))
}

/// Parses a profile from YAML text.
pub fn parse_profile(yaml: &str) -> Result<Profile, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Profile::default());
    }
    serde_yaml::from_str(yaml)
}
