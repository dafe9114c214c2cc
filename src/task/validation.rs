//! Validation utilities for task configuration.
//!
//! Pre-flight checks shared by every task: non-empty values, existing
//! paths (optionally directories) and well-formed absolute URLs. None of
//! these touch anything beyond a `stat`.

use std::fs;

use camino::Utf8Path;
use url::Url;

use crate::error::DevstrapError;

/// Fails when `value` is empty. `label` names the value in the message.
pub(crate) fn validate_not_empty(value: &str, label: &str) -> Result<(), DevstrapError> {
    if value.is_empty() {
        return Err(DevstrapError::Validation(format!("{} must not be empty", label)));
    }
    Ok(())
}

/// Validates that `path` names an existing filesystem entry.
///
/// With `must_be_dir` set the entry must also be a directory; otherwise
/// files and directories are both accepted.
pub fn validate_path(path: &Utf8Path, must_be_dir: bool) -> Result<(), DevstrapError> {
    if path.as_str().is_empty() {
        return Err(DevstrapError::Validation("empty path value".to_string()));
    }

    let metadata = fs::metadata(path)
        .map_err(|e| DevstrapError::io(format!("failed to read metadata: {}", path), e))?;

    if must_be_dir && !metadata.is_dir() {
        return Err(DevstrapError::Validation(format!("not a directory: {}", path)));
    }
    Ok(())
}

/// Validates that `path` names a directory entry, without following a
/// trailing symlink. A dangling link passes.
pub fn validate_entry(path: &Utf8Path) -> Result<(), DevstrapError> {
    if path.as_str().is_empty() {
        return Err(DevstrapError::Validation("empty path value".to_string()));
    }
    fs::symlink_metadata(path)
        .map(drop)
        .map_err(|e| DevstrapError::io(format!("failed to read metadata: {}", path), e))
}

/// Returns the last path segment of `raw`, ignoring query and fragment.
///
/// `None` when the URL does not parse or its path ends with `/`.
pub fn url_file_name(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let name = parsed.path_segments()?.next_back()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Validates that `raw` is an absolute URL with a scheme and a path.
pub fn validate_url(raw: &str) -> Result<(), DevstrapError> {
    if raw.is_empty() {
        return Err(DevstrapError::Validation("empty URL value".to_string()));
    }
    let parsed = Url::parse(raw)
        .map_err(|e| DevstrapError::Validation(format!("invalid URL '{}': {}", raw, e)))?;
    if parsed.cannot_be_a_base() {
        return Err(DevstrapError::Validation(format!(
            "invalid URL '{}': not an absolute request URI",
            raw
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_utf8() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("path should be valid UTF-8");
        (dir, path)
    }

    #[test]
    fn empty_path_fails() {
        let err = validate_path(Utf8Path::new(""), true).unwrap_err();
        assert!(err.to_string().contains("empty path value"));
    }

    #[test]
    fn existing_file_is_not_a_directory() {
        let (_dir, root) = temp_utf8();
        let file = root.join("file.txt");
        fs::write(&file, "x").unwrap();
        let err = validate_path(&file, true).unwrap_err();
        assert!(matches!(err, DevstrapError::Validation(_)));
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn existing_file_passes_without_dir_requirement() {
        let (_dir, root) = temp_utf8();
        let file = root.join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(validate_path(&file, false).is_ok());
    }

    #[test]
    fn existing_directory_passes() {
        let (_dir, root) = temp_utf8();
        assert!(validate_path(&root, true).is_ok());
    }

    #[test]
    fn nonexistent_path_fails() {
        let (_dir, root) = temp_utf8();
        let err = validate_path(&root.join("missing"), false).unwrap_err();
        assert!(matches!(err, DevstrapError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_an_entry_but_not_a_path() {
        let (_dir, root) = temp_utf8();
        let link = root.join("init.lua");
        std::os::unix::fs::symlink(root.join("gone"), &link).unwrap();
        assert!(validate_entry(&link).is_ok());
        assert!(validate_path(&link, false).is_err());
        assert!(validate_entry(&root.join("missing")).is_err());
    }

    #[test]
    fn url_file_name_drops_query_and_fragment() {
        assert_eq!(
            url_file_name("https://example.com/dl/x.deb?raw=1#top").as_deref(),
            Some("x.deb")
        );
        assert_eq!(
            url_file_name("https://go.dev/dl/go1.24.1.linux-amd64.tar.gz").as_deref(),
            Some("go1.24.1.linux-amd64.tar.gz")
        );
        assert_eq!(url_file_name("https://example.com/latest/"), None);
        assert_eq!(url_file_name("https://example.com"), None);
        assert_eq!(url_file_name("not a url"), None);
    }

    #[test]
    fn url_accepts_absolute_https() {
        assert!(validate_url("https://example.com/f.tar.gz").is_ok());
        assert!(validate_url("https://github.com/neovim/nvim-lspconfig").is_ok());
    }

    #[test]
    fn url_rejects_relative_and_garbage() {
        assert!(validate_url("").is_err());
        assert!(validate_url("example.com/f.tar.gz").is_err());
        assert!(validate_url("/just/a/path").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("mailto:dev@example.com").is_err());
    }

    #[test]
    fn not_empty_names_the_value() {
        let err = validate_not_empty("", "package name").unwrap_err();
        assert_eq!(err.to_string(), "validation error: package name must not be empty");
        assert!(validate_not_empty("htop", "package name").is_ok());
    }
}
