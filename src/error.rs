use std::path::PathBuf;
use thiserror::Error;

/// The main error type for githubctl operations.
#[derive(Debug, Error)]
pub enum GithubctlError {
    #[error("No tag or branch named '{name}' exists in {repository}")]
    RefNotFound { name: String, repository: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Invalid hostname: {message}")]
    InvalidHostname { message: String },

    #[error("GitHub API request to {url} failed: {message}")]
    Api { url: String, message: String },

    #[error("Failed to decode content of '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Failed to download '{path}': {source}")]
    Download {
        path: String,
        #[source]
        source: Box<GithubctlError>,
    },

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to write '{path}' outside of the destination directory")]
    UnsafePath { path: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GithubctlError {
    /// Wrap a failure that happened while handling `path`.
    pub(crate) fn download(path: &str, source: GithubctlError) -> Self {
        GithubctlError::Download {
            path: path.to_string(),
            source: Box::new(source),
        }
    }
}
