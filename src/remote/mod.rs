//! GitHub API access.
//!
//! This module owns everything that talks to the hosting service: the
//! [`RepoHost`] capability the resolver and materializer consume, the HTTP
//! client that implements it, and credential handling. Tree walking and
//! local file writes stay in `crate::materialize`.

pub mod auth;
pub mod client;

use std::fmt;

use crate::error::GithubctlError;

pub use auth::Credentials;
pub use client::{ClientConfig, GithubClient};

/// A repository on the hosting service, addressed as `owner/name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Immutable identifier of a repository snapshot (a commit sha).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A branch or tag together with the commit it points to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedCommit {
    pub name: String,
    pub commit: CommitId,
}

impl NamedCommit {
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: CommitId::new(sha),
        }
    }
}

/// Kind of an item in a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Served as the target file's content when the link points at a file.
    Symlink,
    /// Submodules and anything else the host reports.
    Other(String),
}

/// One item of a directory listing. `path` is relative to the repository root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// The hosted Git API capabilities githubctl depends on.
///
/// `reference` may be a branch, a tag or a commit sha; the resolver and
/// materializer only ever pass resolved commit shas.
pub trait RepoHost {
    fn list_branches(&self, repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError>;

    fn list_tags(&self, repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError>;

    fn list_directory(
        &self,
        repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>, GithubctlError>;

    /// Returns the blob content as the host's base64 payload.
    fn get_blob(&self, repo: &RepoRef, path: &str, reference: &str)
        -> Result<String, GithubctlError>;
}
