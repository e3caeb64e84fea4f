use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Certificate, Identity};
use url::Url;

use crate::error::{ConfigError, VaultError};
use crate::options::ClientIdentity;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client pinned to a CA bundle and a per-request timeout.
///
/// Built fresh for every lookup; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SecureClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SecureClient {
    pub fn builder(uri: &Url) -> SecureClientBuilder {
        SecureClientBuilder::new(uri)
    }

    /// `scheme://host[:port]` of the Vault server.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Places a path (optionally with a query) on the server origin.
    ///
    /// The host never changes, even for paths starting with `//`.
    pub fn url_for(&self, path: &str) -> Url {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut url = self.base_url.clone();
        url.set_path(path);
        url.set_query(query);
        url
    }
}

pub struct SecureClientBuilder {
    base_url: Url,
    ca_trust: Option<PathBuf>,
    identity: Option<ClientIdentity>,
    timeout: Duration,
}

impl SecureClientBuilder {
    pub fn new(uri: &Url) -> Self {
        let mut base_url = uri.clone();
        base_url.set_path("/");
        base_url.set_query(None);
        base_url.set_fragment(None);

        Self {
            base_url,
            ca_trust: None,
            identity: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn ca_trust(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_trust = Some(path.into());
        self
    }

    pub fn identity(mut self, identity: Option<ClientIdentity>) -> Self {
        self.identity = identity;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SecureClient, VaultError> {
        let ca_trust = self.ca_trust.ok_or(ConfigError::MissingCaTrust)?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .https_only(true)
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        for cert in load_ca_bundle(&ca_trust)? {
            builder = builder.add_root_certificate(cert);
        }

        if let Some(identity) = &self.identity {
            builder = builder.identity(load_identity(identity)?);
        }

        let http = builder.build().map_err(ConfigError::Transport)?;

        tracing::debug!(
            base_url = %self.base_url,
            ca_trust = %ca_trust.display(),
            timeout_secs = self.timeout.as_secs(),
            client_identity = self.identity.is_some(),
            "Built Vault transport"
        );

        Ok(SecureClient {
            http,
            base_url: self.base_url,
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })
}

fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>, ConfigError> {
    let pem = read_file(path)?;
    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| ConfigError::InvalidCaBundle {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if certs.is_empty() {
        return Err(ConfigError::InvalidCaBundle {
            path: path.to_path_buf(),
            reason: "no PEM certificates found".to_string(),
        });
    }

    Ok(certs)
}

fn load_identity(identity: &ClientIdentity) -> Result<Identity, ConfigError> {
    let mut pem = read_file(&identity.cert)?;
    pem.push(b'\n');
    pem.extend(read_file(&identity.key)?);

    Identity::from_pem(&pem).map_err(|e| ConfigError::InvalidIdentity(e.to_string()))
}
