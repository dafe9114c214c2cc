//! Path values embedded in task configurations.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::error::DevstrapError;
use crate::task::file_ops::append_content;

/// A destination expressed as a base directory plus a sub-path.
///
/// Validation usually targets `base` (it must already exist) while the
/// work lands on the joined path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    pub base: Utf8PathBuf,
    pub sub: Utf8PathBuf,
}

impl SplitPath {
    pub fn new(base: impl Into<Utf8PathBuf>, sub: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base: base.into(),
            sub: sub.into(),
        }
    }

    /// Joins base and sub-path. An empty sub-path yields the base itself.
    pub fn join(&self) -> Utf8PathBuf {
        self.base.join(&self.sub)
    }
}

/// Lines to add to the shell startup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrcConfig {
    pub path: Utf8PathBuf,
    pub content: String,
}

impl ShrcConfig {
    pub fn new(path: impl Into<Utf8PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Appends the content unless the file already contains it verbatim.
    ///
    /// Returns `true` when the file was written. Nothing is written in dry run.
    pub fn append(&self, dry_run: bool) -> Result<bool, DevstrapError> {
        if self.already_present(&self.path)? {
            info!("{} already contains the requested lines, not appending", self.path);
            return Ok(false);
        }
        if dry_run {
            info!("dry run: append {} byte(s) to {}", self.content.len(), self.path);
            return Ok(false);
        }
        append_content(&self.path, &self.content)?;
        info!("appended to {}", self.path);
        Ok(true)
    }

    fn already_present(&self, path: &Utf8Path) -> Result<bool, DevstrapError> {
        match fs::read_to_string(path) {
            Ok(existing) => Ok(!self.content.is_empty() && existing.contains(&self.content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DevstrapError::io(format!("failed to read {}", path), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_concatenates_base_and_sub() {
        let path = SplitPath::new("/home/dev/.config", "nvim");
        assert_eq!(path.join(), Utf8PathBuf::from("/home/dev/.config/nvim"));
    }

    #[test]
    fn join_with_empty_sub_returns_base() {
        let path = SplitPath::new("/opt", "");
        assert_eq!(path.join(), Utf8PathBuf::from("/opt"));
    }

    #[test]
    fn join_with_nested_sub() {
        let path = SplitPath::new("/home/dev", ".nvm/versions/node/v22.14.0");
        assert_eq!(path.join(), Utf8PathBuf::from("/home/dev/.nvm/versions/node/v22.14.0"));
    }

    fn temp_rc(initial: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let rc = Utf8PathBuf::from_path_buf(dir.path().join(".zshrc"))
            .expect("path should be valid UTF-8");
        fs::write(&rc, initial).expect("failed to write rc file");
        (dir, rc)
    }

    #[test]
    fn append_writes_once() {
        let (_dir, rc) = temp_rc("# existing\n");
        let shrc = ShrcConfig::new(rc.clone(), "export PATH=$PATH:/opt/go/bin\n");

        assert!(shrc.append(false).unwrap());
        assert!(!shrc.append(false).unwrap(), "second append should be skipped");

        let content = fs::read_to_string(&rc).unwrap();
        assert_eq!(content, "# existing\nexport PATH=$PATH:/opt/go/bin\n");
    }

    #[test]
    fn append_in_dry_run_leaves_file_untouched() {
        let (_dir, rc) = temp_rc("");
        let shrc = ShrcConfig::new(rc.clone(), "export PATH=$PATH:/opt/nvim/bin\n");

        assert!(!shrc.append(true).unwrap());
        assert_eq!(fs::read_to_string(&rc).unwrap(), "");
    }
}
