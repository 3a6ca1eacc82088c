//! Branch and tag resolution.

use tracing::debug;

use crate::error::GithubctlError;
use crate::remote::{CommitId, NamedCommit, RepoHost, RepoRef};

/// Ref used when neither a branch nor a tag is requested.
pub const DEFAULT_BRANCH: &str = "master";

/// Pick the ref name to resolve. A branch wins over a tag; with neither,
/// [`DEFAULT_BRANCH`] is used.
pub fn select_ref<'a>(branch: Option<&'a str>, tag: Option<&'a str>) -> &'a str {
    branch.or(tag).unwrap_or(DEFAULT_BRANCH)
}

/// Resolve a branch or tag name to the commit it points at.
///
/// Branches are searched before tags, so a branch shadows a tag of the same
/// name. Tags are only listed when no branch matches.
pub fn resolve_commit(
    host: &dyn RepoHost,
    repo: &RepoRef,
    name: &str,
) -> Result<CommitId, GithubctlError> {
    let branches = host.list_branches(repo)?;
    if let Some(commit) = first_match(&branches, name) {
        debug!(name, sha = %commit, "matched branch");
        return Ok(commit);
    }

    let tags = host.list_tags(repo)?;
    if let Some(commit) = first_match(&tags, name) {
        debug!(name, sha = %commit, "matched tag");
        return Ok(commit);
    }

    Err(GithubctlError::RefNotFound {
        name: name.to_string(),
        repository: repo.to_string(),
    })
}

fn first_match(refs: &[NamedCommit], name: &str) -> Option<CommitId> {
    refs.iter()
        .find(|candidate| candidate.name == name)
        .map(|candidate| candidate.commit.clone())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::remote::TreeEntry;

    struct RefsOnly {
        branches: Vec<NamedCommit>,
        tags: Vec<NamedCommit>,
        tag_calls: Cell<usize>,
    }

    impl RefsOnly {
        fn new(branches: &[(&str, &str)], tags: &[(&str, &str)]) -> Self {
            Self {
                branches: to_refs(branches),
                tags: to_refs(tags),
                tag_calls: Cell::new(0),
            }
        }
    }

    fn to_refs(refs: &[(&str, &str)]) -> Vec<NamedCommit> {
        refs.iter()
            .map(|(name, sha)| NamedCommit::new(*name, *sha))
            .collect()
    }

    impl RepoHost for RefsOnly {
        fn list_branches(&self, _repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError> {
            Ok(self.branches.clone())
        }

        fn list_tags(&self, _repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError> {
            self.tag_calls.set(self.tag_calls.get() + 1);
            Ok(self.tags.clone())
        }

        fn list_directory(
            &self,
            _repo: &RepoRef,
            _path: &str,
            _reference: &str,
        ) -> Result<Vec<TreeEntry>, GithubctlError> {
            unreachable!("resolution never lists directories")
        }

        fn get_blob(
            &self,
            _repo: &RepoRef,
            _path: &str,
            _reference: &str,
        ) -> Result<String, GithubctlError> {
            unreachable!("resolution never fetches blobs")
        }
    }

    fn repo() -> RepoRef {
        RepoRef::new("octo", "hello")
    }

    #[test]
    fn select_ref_prefers_branch_then_tag_then_default() {
        assert_eq!(select_ref(Some("dev"), Some("release-1.0")), "dev");
        assert_eq!(select_ref(None, Some("release-1.0")), "release-1.0");
        assert_eq!(select_ref(Some("master"), None), "master");
        assert_eq!(select_ref(None, None), "master");
    }

    #[test]
    fn branch_shadows_tag_with_same_name() {
        let host = RefsOnly::new(&[("v1", "branch-sha")], &[("v1", "tag-sha")]);
        let commit = resolve_commit(&host, &repo(), "v1").expect("resolve");
        assert_eq!(commit.as_str(), "branch-sha");
        assert_eq!(host.tag_calls.get(), 0);
    }

    #[test]
    fn falls_back_to_tags() {
        let host = RefsOnly::new(&[("dev", "commitA")], &[("release-1.0", "commitB")]);
        let commit = resolve_commit(&host, &repo(), "release-1.0").expect("resolve");
        assert_eq!(commit.as_str(), "commitB");
        assert_eq!(host.tag_calls.get(), 1);
    }

    #[test]
    fn first_duplicate_wins() {
        let host = RefsOnly::new(&[("dev", "first"), ("dev", "second")], &[]);
        let commit = resolve_commit(&host, &repo(), "dev").expect("resolve");
        assert_eq!(commit.as_str(), "first");
    }

    #[test]
    fn match_is_exact() {
        let host = RefsOnly::new(&[("Dev", "a"), ("dev-2", "b")], &[("dev ", "c")]);
        let err = resolve_commit(&host, &repo(), "dev").expect_err("should fail");
        match err {
            GithubctlError::RefNotFound { name, repository } => {
                assert_eq!(name, "dev");
                assert_eq!(repository, "octo/hello");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
