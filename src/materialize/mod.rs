//! Writing repository content to local disk.
//!
//! File mode fetches one blob into an exact path. Directory mode walks a
//! subtree at a fixed commit and recreates it under a destination root,
//! keeping each entry's repository-relative path.

pub mod paths;

pub use paths::{ensure_dir, local_path, resolve_target};

use std::path::Path;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{error, info, warn};

use crate::error::GithubctlError;
use crate::remote::{CommitId, EntryKind, RepoHost, RepoRef};

/// What the source path names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentType {
    File,
    Directory,
}

impl FromStr for ContentType {
    type Err = GithubctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" | "f" => Ok(ContentType::File),
            "directory" | "dir" | "d" => Ok(ContentType::Directory),
            _ => Err(GithubctlError::UnsupportedType(format!(
                "'{}' (supported: file, f, directory, dir, d)",
                s
            ))),
        }
    }
}

/// Summary of a materialization run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub files_written: usize,
    pub bytes_written: u64,
    /// Entries with no file content: submodules and links that do not
    /// resolve to a file.
    pub skipped: Vec<String>,
}

/// Decode a base64 blob payload. Embedded line breaks are ignored.
pub fn decode_blob(path: &str, payload: &str) -> Result<Vec<u8>, GithubctlError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|source| GithubctlError::Decode {
            path: path.to_string(),
            source,
        })
}

/// Download one file to `destination`, overwriting it.
pub fn download_file(
    host: &dyn RepoHost,
    repo: &RepoRef,
    commit: &CommitId,
    source: &str,
    destination: &Path,
) -> Result<MaterializeReport, GithubctlError> {
    info!(source, repository = %repo, "fetching file");
    let mut report = MaterializeReport::default();

    fetch_and_write(host, repo, commit, source, destination, &mut report).map_err(|err| {
        error!(source, error = %err, "download failed");
        GithubctlError::download(source, err)
    })?;

    Ok(report)
}

/// Recreate the subtree at `source` under `destination_root`.
///
/// The first failing entry stops the walk. Files written before it are
/// left in place.
pub fn download_directory(
    host: &dyn RepoHost,
    repo: &RepoRef,
    commit: &CommitId,
    source: &str,
    destination_root: &Path,
) -> Result<MaterializeReport, GithubctlError> {
    info!(source, repository = %repo, "fetching directory");
    let mut report = MaterializeReport::default();
    walk(host, repo, commit, source, destination_root, &mut report)?;
    info!(
        files = report.files_written,
        bytes = report.bytes_written,
        skipped = report.skipped.len(),
        "directory fetched"
    );
    Ok(report)
}

fn walk(
    host: &dyn RepoHost,
    repo: &RepoRef,
    commit: &CommitId,
    source: &str,
    root: &Path,
    report: &mut MaterializeReport,
) -> Result<(), GithubctlError> {
    let entries = host
        .list_directory(repo, source, commit.as_str())
        .map_err(|err| {
            error!(entry = source, error = %err, "listing failed, aborting walk");
            GithubctlError::download(source, err)
        })?;

    for entry in entries {
        match entry.kind {
            EntryKind::Directory => walk(host, repo, commit, &entry.path, root, report)?,
            EntryKind::File => {
                let written = host
                    .get_blob(repo, &entry.path, commit.as_str())
                    .and_then(|payload| write_entry(root, &entry.path, &payload, report));
                if let Err(err) = written {
                    error!(entry = %entry.path, error = %err, "download failed, aborting walk");
                    return Err(GithubctlError::download(&entry.path, err));
                }
            }
            // Links to files come back with the target's content; anything
            // else (directory or dangling links) has no blob to write.
            EntryKind::Symlink => match host.get_blob(repo, &entry.path, commit.as_str()) {
                Ok(payload) => {
                    if let Err(err) = write_entry(root, &entry.path, &payload, report) {
                        error!(entry = %entry.path, error = %err, "download failed, aborting walk");
                        return Err(GithubctlError::download(&entry.path, err));
                    }
                }
                Err(err) => {
                    warn!(entry = %entry.path, error = %err, "symlink has no file content, skipping");
                    report.skipped.push(entry.path);
                }
            },
            EntryKind::Other(kind) => {
                warn!(entry = %entry.path, kind = %kind, "skipping unsupported entry");
                report.skipped.push(entry.path);
            }
        }
    }

    Ok(())
}

/// Write a blob fetched during a walk below `root`, creating its parents.
fn write_entry(
    root: &Path,
    repo_path: &str,
    payload: &str,
    report: &mut MaterializeReport,
) -> Result<(), GithubctlError> {
    let target = local_path(root, repo_path)?;
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }
    write_blob(repo_path, payload, &target, report)
}

fn fetch_and_write(
    host: &dyn RepoHost,
    repo: &RepoRef,
    commit: &CommitId,
    source: &str,
    target: &Path,
    report: &mut MaterializeReport,
) -> Result<(), GithubctlError> {
    let payload = host.get_blob(repo, source, commit.as_str())?;
    write_blob(source, &payload, target, report)
}

fn write_blob(
    source: &str,
    payload: &str,
    target: &Path,
    report: &mut MaterializeReport,
) -> Result<(), GithubctlError> {
    let bytes = decode_blob(source, payload)?;

    std::fs::write(target, &bytes).map_err(|source| GithubctlError::Write {
        path: target.to_path_buf(),
        source,
    })?;
    info!(path = %target.display(), bytes = bytes.len(), "wrote");

    report.files_written += 1;
    report.bytes_written += bytes.len() as u64;
    Ok(())
}
