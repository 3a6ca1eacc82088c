use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::GithubctlError;

use super::{Credentials, EntryKind, NamedCommit, RepoHost, RepoRef, TreeEntry};

pub const PUBLIC_API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const USER_AGENT: &str = concat!("githubctl/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`GithubClient`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    pub credentials: Credentials,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        Self {
            base_url,
            credentials,
            verify_tls: true,
            timeout: Duration::from_secs(30),
        }
    }
}

/// API root for a hostname: the public service when absent, the
/// Enterprise `/api/v3` root otherwise.
pub fn base_url(hostname: Option<&str>) -> Result<Url, GithubctlError> {
    let Some(hostname) = hostname else {
        return Url::parse(PUBLIC_API_URL).map_err(|source| GithubctlError::InvalidHostname {
            message: source.to_string(),
        });
    };

    let trimmed = hostname.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(GithubctlError::InvalidHostname {
            message: "hostname must not be blank or empty".to_string(),
        });
    }
    if trimmed.contains("://") || trimmed.contains('/') {
        return Err(GithubctlError::InvalidHostname {
            message: format!("expected a bare host name like 'github.example.com', found '{trimmed}'"),
        });
    }

    Url::parse(&format!("https://{trimmed}/api/v3")).map_err(|source| {
        GithubctlError::InvalidHostname {
            message: format!("'{trimmed}': {source}"),
        }
    })
}

/// Blocking GitHub REST client.
pub struct GithubClient {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl GithubClient {
    pub fn new(config: ClientConfig) -> Self {
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(!config.verify_tls)
            .build();
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .tls_config(tls)
            .build();
        let agent: ureq::Agent = agent_config.into();

        Self { agent, config }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, GithubctlError> {
        debug!(url = %url, "GET");
        let api_error = |message: String| GithubctlError::Api {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .agent
            .get(url.as_str())
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("Authorization", &self.config.credentials.header_value())
            .call()
            .map_err(|source| match source {
                ureq::Error::StatusCode(404) => api_error("not found (HTTP 404)".to_string()),
                ureq::Error::StatusCode(401) => {
                    api_error("bad credentials (HTTP 401)".to_string())
                }
                ureq::Error::StatusCode(code) => api_error(format!("HTTP {code}")),
                other => api_error(other.to_string()),
            })?;

        response
            .body_mut()
            .read_json::<T>()
            .map_err(|source| api_error(format!("unexpected response body: {source}")))
    }

    fn list_named(
        &self,
        repo: &RepoRef,
        collection: &str,
    ) -> Result<Vec<NamedCommit>, GithubctlError> {
        let all = collect_pages(|page| {
            let mut url = endpoint(&self.config.base_url, repo, &[collection])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            self.get_json(&url)
        })?;

        debug!(repository = %repo, collection, count = all.len(), "listed refs");
        Ok(all)
    }

    fn get_contents(
        &self,
        repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> Result<(Url, Contents), GithubctlError> {
        let mut segments = vec!["contents"];
        segments.extend(content_segments(path)?);

        let mut url = endpoint(&self.config.base_url, repo, &segments)?;
        url.query_pairs_mut().append_pair("ref", reference);

        let contents = self.get_json(&url)?;
        Ok((url, contents))
    }
}

impl RepoHost for GithubClient {
    fn list_branches(&self, repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError> {
        self.list_named(repo, "branches")
    }

    fn list_tags(&self, repo: &RepoRef) -> Result<Vec<NamedCommit>, GithubctlError> {
        self.list_named(repo, "tags")
    }

    fn list_directory(
        &self,
        repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> Result<Vec<TreeEntry>, GithubctlError> {
        match self.get_contents(repo, path, reference)? {
            (_, Contents::Listing(items)) => Ok(items.into_iter().map(TreeEntry::from).collect()),
            (url, Contents::File(_)) => Err(GithubctlError::Api {
                url: url.to_string(),
                message: format!("'{path}' is a file, not a directory"),
            }),
        }
    }

    fn get_blob(
        &self,
        repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> Result<String, GithubctlError> {
        match self.get_contents(repo, path, reference)? {
            (url, Contents::Listing(_)) => Err(GithubctlError::Api {
                url: url.to_string(),
                message: format!("'{path}' is a directory, not a file"),
            }),
            (url, Contents::File(file)) => file.into_base64().map_err(|message| {
                GithubctlError::Api {
                    url: url.to_string(),
                    message,
                }
            }),
        }
    }
}

/// Request pages `1..` until one comes back short of [`PER_PAGE`].
fn collect_pages<F>(mut fetch_page: F) -> Result<Vec<NamedCommit>, GithubctlError>
where
    F: FnMut(usize) -> Result<Vec<NamedRef>, GithubctlError>,
{
    let mut all = Vec::new();
    let mut page = 1usize;

    loop {
        let items = fetch_page(page)?;
        let count = items.len();
        all.extend(
            items
                .into_iter()
                .map(|item| NamedCommit::new(item.name, item.commit.sha)),
        );

        if count < PER_PAGE {
            return Ok(all);
        }
        page += 1;
    }
}

/// Split a repository path into URL segments. `.` and `..` are refused so
/// a path can never leave the `contents` route.
fn content_segments(path: &str) -> Result<Vec<&str>, GithubctlError> {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    if segments.iter().any(|segment| matches!(*segment, "." | "..")) {
        return Err(GithubctlError::UnsafePath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// `{base}/repos/{owner}/{name}/{segments..}` with every segment percent-encoded.
fn endpoint(base: &Url, repo: &RepoRef, segments: &[&str]) -> Result<Url, GithubctlError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| GithubctlError::InvalidHostname {
            message: format!("'{base}' cannot be used as an API root"),
        })?
        .pop_if_empty()
        .push("repos")
        .push(&repo.owner)
        .push(&repo.name)
        .extend(segments);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

/// Body of a `contents` response: an array for directories, an object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Listing(Vec<ContentItem>),
    File(ContentFile),
}

impl Contents {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentItem {
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

impl From<ContentItem> for TreeEntry {
    fn from(item: ContentItem) -> Self {
        let kind = match item.item_type.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Directory,
            "symlink" => EntryKind::Symlink,
            _ => EntryKind::Other(item.item_type),
        };
        TreeEntry {
            path: item.path,
            kind,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentFile {
    /// The inline base64 payload. Files above the inline size limit come
    /// back with encoding `none` and no content.
    pub fn into_base64(self) -> Result<String, String> {
        match (self.encoding.as_deref(), self.content) {
            (Some("base64") | None, Some(content)) => Ok(content),
            (Some(other), _) if other != "base64" => Err(format!(
                "content is not available inline (encoding '{other}')"
            )),
            _ => Err("response carries no content".to_string()),
        }
    }
}
