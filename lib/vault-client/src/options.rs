use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Options handed over by the calling configuration engine.
///
/// Every field is optional at the type level so that validation can report
/// exactly which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupOptions {
    /// Complete URI of a Vault KV secret path.
    pub uri: Option<String>,
    /// PEM bundle of CAs trusted to sign the Vault server certificate.
    pub ca_trust: Option<PathBuf>,
    /// File holding a pre-issued Vault token. Takes priority over `auth_path`.
    pub token_file: Option<PathBuf>,
    /// Mount of the `cert` auth method used when no token file is given.
    pub auth_path: Option<String>,
    /// KV engine version, `v1` unless this is exactly `v2`.
    pub version: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(alias = "timeout_seconds")]
    pub timeout: Option<u64>,
    /// PEM client certificate presented during the TLS handshake.
    pub client_cert: Option<PathBuf>,
    /// PEM private key matching `client_cert`.
    pub client_key: Option<PathBuf>,
}

/// KV secrets engine version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KvVersion {
    #[default]
    V1,
    V2,
}

impl KvVersion {
    /// Anything other than exactly `v2` falls back to v1.
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some("v2") => Self::V2,
            Some("v1") | None => Self::V1,
            Some(other) => {
                tracing::warn!(version = other, "Unknown KV version, using v1");
                Self::V1
            }
        }
    }
}

/// How the bearer token for this lookup is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSource {
    TokenFile(PathBuf),
    CertificateLogin { mount: String },
}

/// PEM files forming the client identity for the TLS handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Options that passed validation. Nothing here has touched the network.
#[derive(Debug, Clone)]
pub struct ValidatedOptions {
    pub uri: Url,
    pub ca_trust: PathBuf,
    pub auth: AuthSource,
    pub version: KvVersion,
    pub timeout: Duration,
    pub identity: Option<ClientIdentity>,
}

impl ValidatedOptions {
    /// Path and query of the secret, relative to the server origin.
    pub fn secret_path(&self) -> String {
        match self.uri.query() {
            Some(query) => format!("{}?{}", self.uri.path(), query),
            None => self.uri.path().to_string(),
        }
    }
}

impl LookupOptions {
    /// Checks every option before any I/O beyond file existence happens.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    pub fn validate(&self) -> Result<ValidatedOptions, ConfigError> {
        let raw_uri = self.uri.as_deref().ok_or(ConfigError::MissingUri)?;

        let ca_trust = self.ca_trust.as_ref().ok_or(ConfigError::MissingCaTrust)?;
        if !ca_trust.is_file() {
            return Err(ConfigError::CaTrustNotFound(ca_trust.clone()));
        }

        if let Some(token_file) = &self.token_file {
            if !token_file.is_file() {
                return Err(ConfigError::TokenFileNotFound(token_file.clone()));
            }
        }

        if self.token_file.is_none() && self.auth_path.is_none() {
            return Err(ConfigError::MissingAuth);
        }

        let uri = Url::parse(raw_uri).map_err(|e| ConfigError::InvalidUri {
            uri: raw_uri.to_string(),
            reason: e.to_string(),
        })?;
        if uri.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingHost(raw_uri.to_string()));
        }
        if uri.scheme() != "https" {
            return Err(ConfigError::InsecureScheme(uri.scheme().to_string()));
        }

        let auth = match (&self.token_file, &self.auth_path) {
            (Some(path), _) => AuthSource::TokenFile(path.clone()),
            (None, Some(auth_path)) => AuthSource::CertificateLogin {
                mount: mount_name(auth_path)?,
            },
            (None, None) => return Err(ConfigError::MissingAuth),
        };

        let timeout = match self.timeout {
            Some(0) => return Err(ConfigError::InvalidTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let identity = match (&self.client_cert, &self.client_key) {
            (Some(cert), Some(key)) => Some(ClientIdentity {
                cert: existing_file(cert)?,
                key: existing_file(key)?,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteIdentity),
        };

        Ok(ValidatedOptions {
            uri,
            ca_trust: ca_trust.clone(),
            auth,
            version: KvVersion::from_option(self.version.as_deref()),
            timeout,
            identity,
        })
    }
}

fn mount_name(auth_path: &str) -> Result<String, ConfigError> {
    let mount = auth_path.trim_matches('/');
    if mount.is_empty() {
        return Err(ConfigError::InvalidAuthPath(auth_path.to_string()));
    }
    Ok(mount.to_string())
}

fn existing_file(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ConfigError::IdentityFileNotFound(path.to_path_buf()))
    }
}
