use async_trait::async_trait;
use serde::Deserialize;

use super::{AuthMethod, Token};
use crate::VaultError;
use crate::transport::SecureClient;

/// TLS certificate authentication.
///
/// No credentials travel in the body: Vault identifies the caller by the
/// client certificate presented during the handshake.
pub struct CertAuth {
    pub mount: String,
}

impl CertAuth {
    pub fn new(mount: String) -> Self {
        Self { mount }
    }

    fn login_path(&self) -> String {
        format!("/v1/auth/{}/login", self.mount)
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: Option<AuthData>,
}

#[derive(Deserialize)]
struct AuthData {
    client_token: Option<String>,
}

#[async_trait]
impl AuthMethod for CertAuth {
    async fn authenticate(&self, client: &SecureClient) -> Result<Token, VaultError> {
        let url = client.url_for(&self.login_path());
        tracing::debug!(mount = %self.mount, "Logging in to Vault with client certificate");

        let response = client
            .http()
            .post(url)
            .send()
            .await
            .map_err(VaultError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(VaultError::Network)?;

        if !status.is_success() {
            return Err(VaultError::Authentication(format!(
                "cert login at '{}' rejected ({}): {}",
                self.mount,
                status.as_u16(),
                body
            )));
        }

        let login: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            VaultError::Authentication(format!("Invalid login response: {}", e))
        })?;

        login
            .auth
            .and_then(|auth| auth.client_token)
            .filter(|token| !token.is_empty())
            .map(Token::new)
            .ok_or_else(|| {
                VaultError::Authentication("login response carries no client_token".to_string())
            })
    }
}
