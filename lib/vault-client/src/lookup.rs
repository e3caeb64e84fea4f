use crate::context::LookupContext;
use crate::error::VaultError;
use crate::fetch::fetch;
use crate::models::{LookupOutcome, SecretData, parse};
use crate::options::LookupOptions;
use crate::transport::SecureClient;

/// Resolves every key/value pair stored at `options.uri`.
///
/// Validation completes before any network traffic. Each call builds its own
/// transport and credentials; failures are returned as-is, without retry.
pub async fn lookup(
    options: &LookupOptions,
    context: &dyn LookupContext,
) -> Result<LookupOutcome, VaultError> {
    let options = options.validate()?;
    tracing::debug!(uri = %options.uri, version = ?options.version, "Using Vault uri");

    let client = SecureClient::builder(&options.uri)
        .ca_trust(&options.ca_trust)
        .identity(options.identity.clone())
        .timeout(options.timeout)
        .build()?;

    let token = options.auth.authenticator().authenticate(&client).await?;
    let envelope = fetch(&client, &options.secret_path(), &token).await?;
    let data = parse(&envelope, options.version)?;

    Ok(finalize(data, context))
}

fn finalize(data: SecretData, context: &dyn LookupContext) -> LookupOutcome {
    if data.is_empty() {
        context.not_found();
        return LookupOutcome::NotFound;
    }

    tracing::debug!(keys = data.len(), "Vault lookup succeeded");
    context.cache_all(&data);
    LookupOutcome::Found(data)
}
