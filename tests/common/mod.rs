#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use githubctl::remote::{EntryKind, NamedCommit, RepoHost, RepoRef, TreeEntry};
use githubctl::GithubctlError;

/// In-memory stand-in for the GitHub API.
///
/// Directories are implied by file paths. Blobs are served base64-encoded
/// and wrapped at 60 columns like the real contents endpoint.
#[derive(Default)]
pub struct MemoryHost {
    pub branches: Vec<NamedCommit>,
    pub tags: Vec<NamedCommit>,
    pub files: BTreeMap<String, Vec<u8>>,
    /// Link path to the content it resolves to; `None` for links that
    /// do not point at a file.
    pub symlinks: BTreeMap<String, Option<Vec<u8>>>,
    pub submodules: BTreeSet<String>,
    pub failing_blobs: BTreeSet<String>,
    pub requested_refs: RefCell<Vec<String>>,
    pub fetched_blobs: RefCell<Vec<String>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branch(mut self, name: &str, sha: &str) -> Self {
        self.branches.push(NamedCommit::new(name, sha));
        self
    }

    pub fn tag(mut self, name: &str, sha: &str) -> Self {
        self.tags.push(NamedCommit::new(name, sha));
        self
    }

    pub fn file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(path.to_string(), content.to_vec());
        self
    }

    pub fn file_symlink(mut self, path: &str, target_content: &[u8]) -> Self {
        self.symlinks
            .insert(path.to_string(), Some(target_content.to_vec()));
        self
    }

    pub fn dir_symlink(mut self, path: &str) -> Self {
        self.symlinks.insert(path.to_string(), None);
        self
    }

    pub fn submodule(mut self, path: &str) -> Self {
        self.submodules.insert(path.to_string());
        self
    }

    pub fn failing_blob(mut self, path: &str) -> Self {
        self.failing_blobs.insert(path.to_string());
        self
    }

    fn not_found(path: &str) -> GithubctlError {
        GithubctlError::Api {
            url: format!("memory://{path}"),
            message: "not found (HTTP 404)".to_string(),
        }
    }
}

pub fn encode_wrapped(content: &[u8]) -> String {
    let encoded = STANDARD.encode(content);
    let mut wrapped = String::new();
    for chunk in encoded.as_bytes().chunks(60) {
        wrapped.push_str(std::str::from_utf8(chunk).expect("ascii"));
        wrapped.push('\n');
    }
    wrapped
}

impl RepoHost for MemoryHost {
    fn list_branches(&self, _repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError> {
        Ok(self.branches.clone())
    }

    fn list_tags(&self, _repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError> {
        Ok(self.tags.clone())
    }

    fn list_directory(
        &self,
        _repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>, GithubctlError> {
        self.requested_refs.borrow_mut().push(reference.to_string());

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path.trim_end_matches('/'))
        };

        let mut children: BTreeMap<String, EntryKind> = BTreeMap::new();
        for file in self
            .files
            .keys()
            .chain(self.symlinks.keys())
            .chain(self.submodules.iter())
        {
            let Some(rest) = file.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    children.insert(format!("{prefix}{dir}"), EntryKind::Directory);
                }
                None if self.symlinks.contains_key(file) => {
                    children.insert(file.clone(), EntryKind::Symlink);
                }
                None if self.submodules.contains(file) => {
                    children.insert(file.clone(), EntryKind::Other("submodule".to_string()));
                }
                None => {
                    children.insert(file.clone(), EntryKind::File);
                }
            }
        }

        if children.is_empty() {
            return Err(Self::not_found(path));
        }

        Ok(children
            .into_iter()
            .map(|(path, kind)| TreeEntry { path, kind })
            .collect())
    }

    fn get_blob(
        &self,
        _repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> Result<String, GithubctlError> {
        self.requested_refs.borrow_mut().push(reference.to_string());
        self.fetched_blobs.borrow_mut().push(path.to_string());

        if self.failing_blobs.contains(path) {
            return Err(GithubctlError::Api {
                url: format!("memory://{path}"),
                message: "HTTP 500".to_string(),
            });
        }

        if let Some(target) = self.symlinks.get(path) {
            return target
                .as_deref()
                .map(encode_wrapped)
                .ok_or_else(|| GithubctlError::Api {
                    url: format!("memory://{path}"),
                    message: "response carries no content".to_string(),
                });
        }

        self.files
            .get(path)
            .map(|content| encode_wrapped(content))
            .ok_or_else(|| Self::not_found(path))
    }
}

pub fn repo() -> RepoRef {
    RepoRef::new("octo", "hello")
}
