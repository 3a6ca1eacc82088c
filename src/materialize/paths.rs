use std::path::{Component, Path, PathBuf};

use crate::error::GithubctlError;

/// Effective file path for a single-file download.
///
/// An existing directory destination receives the source's base name;
/// anything else is taken as the full target path.
pub fn resolve_target(source: &str, destination: &Path) -> PathBuf {
    if destination.is_dir() {
        let file_name = Path::new(source)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(source));
        destination.join(file_name)
    } else {
        destination.to_path_buf()
    }
}

/// Create `path` and any missing ancestors.
///
/// An existing directory is success; every other failure is returned,
/// including a path component that exists as a regular file.
pub fn ensure_dir(path: &Path) -> Result<(), GithubctlError> {
    match std::fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(_) if path.is_dir() => Ok(()),
        Err(source) => Err(GithubctlError::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Join a repository-relative path onto `root`, refusing anything that
/// would land outside of it.
pub fn local_path(root: &Path, repo_path: &str) -> Result<PathBuf, GithubctlError> {
    let relative = Path::new(repo_path);
    let escapes = relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));

    if escapes || repo_path.is_empty() {
        return Err(GithubctlError::UnsafePath {
            path: repo_path.to_string(),
        });
    }

    Ok(root.join(relative))
}
