//! Filesystem helpers and external tool invocations used by tasks.
//!
//! Each command helper builds exactly one [`CommandSpec`] with the argument
//! grammar the host tools expect and runs it through the task context.
//! Directory creation, existence checks and shell-rc appends happen
//! in-process.

use std::fs::{self, OpenOptions};
use std::io::Write;

use camino::Utf8Path;
use tracing::{debug, info};

use super::TaskContext;
use crate::error::DevstrapError;
use crate::executor::CommandSpec;
use crate::privilege::PrivilegeMethod;

/// Exit code `dpkg-query --status` uses for an unknown package.
const DPKG_QUERY_NOT_INSTALLED: i32 = 1;

/// Downloads `url` to `dst` with curl, following redirects.
pub(crate) fn download(
    ctx: &TaskContext<'_>,
    url: &str,
    dst: &Utf8Path,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    info!("downloading {} to {}", url, dst);
    let spec = CommandSpec::new("curl", ["-L", url, "-o", dst.as_str()]).with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

/// Clones a git repository into `dst`.
pub(crate) fn git_clone(
    ctx: &TaskContext<'_>,
    url: &str,
    dst: &Utf8Path,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    info!("cloning {} into {}", url, dst);
    let spec = CommandSpec::new("git", ["clone", url, dst.as_str()]).with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

/// Extracts a gzip-compressed tarball into `dir`.
pub(crate) fn extract_tar(
    ctx: &TaskContext<'_>,
    file: &Utf8Path,
    dir: &Utf8Path,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    info!("extracting {} into {}", file, dir);
    let spec = CommandSpec::new("tar", ["xzf", file.as_str(), "-C", dir.as_str()])
        .with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

pub(crate) fn move_path(
    ctx: &TaskContext<'_>,
    src: &Utf8Path,
    dst: &Utf8Path,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    info!("moving {} to {}", src, dst);
    let spec = CommandSpec::new("mv", [src.as_str(), dst.as_str()]).with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

/// Recursively removes `path`.
pub(crate) fn delete_path(
    ctx: &TaskContext<'_>,
    path: &Utf8Path,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    info!("deleting {}", path);
    let spec = CommandSpec::new("rm", ["-rf", path.as_str()]).with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

/// Changes permissions with a chmod mode string such as `u+x` or `0644`.
pub(crate) fn update_permission(
    ctx: &TaskContext<'_>,
    path: &Utf8Path,
    mode: &str,
    recursive: bool,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    let mut args = Vec::with_capacity(3);
    if recursive {
        args.push("--recursive");
    }
    args.extend([mode, path.as_str()]);
    let spec = CommandSpec::new("chmod", args).with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

/// Changes ownership to `owner` (`user` or `user:group`).
pub(crate) fn update_ownership(
    ctx: &TaskContext<'_>,
    path: &Utf8Path,
    owner: &str,
    recursive: bool,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    let mut args = Vec::with_capacity(3);
    if recursive {
        args.push("--recursive");
    }
    args.extend([owner, path.as_str()]);
    let spec = CommandSpec::new("chown", args).with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

/// Asks dpkg whether `name` is installed.
///
/// A dry run has no real exit status to inspect, so the package is reported
/// as not installed and the install shows up in the plan.
pub(crate) fn is_package_installed(
    ctx: &TaskContext<'_>,
    name: &str,
    privilege: Option<PrivilegeMethod>,
) -> Result<bool, DevstrapError> {
    let spec = CommandSpec::new("dpkg-query", ["--status", name]).with_privilege(privilege);
    if ctx.dry_run() {
        ctx.run(&spec)?;
        debug!("dry run: treating package {} as not installed", name);
        return Ok(false);
    }
    match ctx.run(&spec) {
        Ok(_) => Ok(true),
        Err(e) if e.exit_code() == Some(DPKG_QUERY_NOT_INSTALLED) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Installs a package by name or from a local `.deb` path.
pub(crate) fn install_package(
    ctx: &TaskContext<'_>,
    identifier: &str,
    privilege: Option<PrivilegeMethod>,
) -> Result<(), DevstrapError> {
    info!("installing package {}", identifier);
    let spec =
        CommandSpec::new("apt", ["install", "--yes", identifier]).with_privilege(privilege);
    ctx.run(&spec).map(drop)
}

/// Creates `path` and any missing parents. Skipped in dry run.
pub fn create_dir_all(path: &Utf8Path, dry_run: bool) -> Result<(), DevstrapError> {
    if dry_run {
        debug!("dry run: create directory {}", path);
        return Ok(());
    }
    fs::create_dir_all(path)
        .map_err(|e| DevstrapError::io(format!("failed to create directory {}", path), e))
}

/// Returns whether anything exists at `path`.
///
/// A missing entry is `false`; any other stat failure is an error.
pub fn path_exists(path: &Utf8Path) -> Result<bool, DevstrapError> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(DevstrapError::io(format!("failed to check path stat: {}", path), e)),
    }
}

/// Appends `content` to `file`, creating it with mode 0644 when missing.
pub fn append_content(file: &Utf8Path, content: &str) -> Result<(), DevstrapError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut handle = options
        .open(file)
        .map_err(|e| DevstrapError::io(format!("failed to open a file {}", file), e))?;
    handle
        .write_all(content.as_bytes())
        .map_err(|e| DevstrapError::io(format!("failed to append content to {}", file), e))
}
