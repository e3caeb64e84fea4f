use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Invalid lookup configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Vault request error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Vault returned an error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Unexpected Vault response: {0}")]
    Protocol(String),
}

/// Coarse classification of a [`VaultError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    Network,
    Remote,
    Protocol,
}

impl VaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Network(_) => ErrorKind::Network,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Protocol(_) => ErrorKind::Protocol,
        }
    }

    /// True when the request gave up after the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }
}

/// Problems with the caller-supplied options or the local files they name.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the vault lookup requires the 'uri' option")]
    MissingUri,

    #[error("the vault lookup requires the 'ca_trust' option")]
    MissingCaTrust,

    #[error("the 'ca_trust' file was not found: {}", .0.display())]
    CaTrustNotFound(PathBuf),

    #[error("the 'token_file' does not exist: {}", .0.display())]
    TokenFileNotFound(PathBuf),

    #[error("the vault lookup requires either 'token_file' or 'auth_path'")]
    MissingAuth,

    #[error("failed to parse 'uri' {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("failed to parse a hostname from {0}")]
    MissingHost(String),

    #[error("'uri' must use https, got {0}://")]
    InsecureScheme(String),

    #[error("'auth_path' does not name an auth mount: {0:?}")]
    InvalidAuthPath(String),

    #[error("'timeout' must be a positive number of seconds")]
    InvalidTimeout,

    #[error("'client_cert' and 'client_key' must be given together")]
    IncompleteIdentity,

    #[error("client identity file does not exist: {}", .0.display())]
    IdentityFileNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CA bundle {}: {reason}", path.display())]
    InvalidCaBundle { path: PathBuf, reason: String },

    #[error("invalid client identity: {0}")]
    InvalidIdentity(String),

    #[error("the token file is empty: {}", .0.display())]
    EmptyToken(PathBuf),

    #[error("failed to build HTTP client: {0}")]
    Transport(#[source] reqwest::Error),
}
