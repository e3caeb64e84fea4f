mod cert;
mod token_file;

pub use cert::CertAuth;
pub use token_file::TokenFileAuth;

use std::fmt;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::VaultError;
use crate::options::AuthSource;
use crate::transport::SecureClient;

/// Bearer credential for a single lookup. Redacted in `Debug` output.
pub struct Token(SecretString);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

/// Trait for authentication methods
#[async_trait]
pub trait AuthMethod: Send + Sync {
    /// Produce a token valid for the rest of this lookup
    async fn authenticate(&self, client: &SecureClient) -> Result<Token, VaultError>;
}

impl AuthSource {
    pub fn authenticator(&self) -> Box<dyn AuthMethod> {
        match self {
            Self::TokenFile(path) => Box::new(TokenFileAuth::new(path.clone())),
            Self::CertificateLogin { mount } => Box::new(CertAuth::new(mount.clone())),
        }
    }
}
