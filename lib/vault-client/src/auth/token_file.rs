use std::path::PathBuf;

use async_trait::async_trait;

use super::{AuthMethod, Token};
use crate::VaultError;
use crate::error::ConfigError;
use crate::transport::SecureClient;

/// Pre-issued token read from a local file
pub struct TokenFileAuth {
    path: PathBuf,
}

impl TokenFileAuth {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_token(&self) -> Result<Token, ConfigError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| ConfigError::UnreadableFile {
                path: self.path.clone(),
                source,
            })?;

        let token = contents.trim();
        if token.is_empty() {
            return Err(ConfigError::EmptyToken(self.path.clone()));
        }
        Ok(Token::new(token))
    }
}

#[async_trait]
impl AuthMethod for TokenFileAuth {
    async fn authenticate(&self, _client: &SecureClient) -> Result<Token, VaultError> {
        tracing::debug!(token_file = %self.path.display(), "Using Vault token from file");
        Ok(self.read_token()?)
    }
}
