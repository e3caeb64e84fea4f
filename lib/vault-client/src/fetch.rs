use reqwest::StatusCode;

use crate::auth::Token;
use crate::error::VaultError;
use crate::transport::SecureClient;

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Reads the raw JSON envelope stored at `path` on the Vault server.
pub async fn fetch(
    client: &SecureClient,
    path: &str,
    token: &Token,
) -> Result<serde_json::Value, VaultError> {
    let url = client.url_for(path);
    tracing::debug!(path, "Fetching Vault secret");

    let response = client
        .http()
        .get(url)
        .header(TOKEN_HEADER, token.expose())
        .send()
        .await
        .map_err(VaultError::Network)?;

    let status = response.status();
    let body = response.text().await.map_err(VaultError::Network)?;

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(VaultError::Authentication(format!(
                "Vault denied access to {} ({}): {}",
                path,
                status.as_u16(),
                body
            )));
        }
        s if !s.is_success() => {
            return Err(VaultError::Remote {
                status: s.as_u16(),
                body,
            });
        }
        _ => {}
    }

    serde_json::from_str(&body)
        .map_err(|e| VaultError::Protocol(format!("response from {} is not JSON: {}", path, e)))
}
