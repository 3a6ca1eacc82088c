use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::GithubctlError;

/// Credentials sent with every API request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

impl Credentials {
    /// Pick credentials from user input. A token wins over a username/password pair.
    pub fn from_options(
        token: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, GithubctlError> {
        fn non_empty(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        if let Some(token) = non_empty(token) {
            return Ok(Credentials::Token(token.to_string()));
        }

        match (non_empty(username), non_empty(password)) {
            (Some(username), Some(password)) => Ok(Credentials::Basic {
                username: username.to_string(),
                password: password.to_string(),
            }),
            (Some(_), None) => Err(GithubctlError::Authentication {
                message: "--username requires --password".to_string(),
            }),
            (None, Some(_)) => Err(GithubctlError::Authentication {
                message: "--password requires --username".to_string(),
            }),
            (None, None) => Err(GithubctlError::Authentication {
                message: "supply --auth-token or both --username and --password".to_string(),
            }),
        }
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Credentials::Token(token) => format!("token {token}"),
            Credentials::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
        }
    }
}

// Never print secrets in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(***)"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}
