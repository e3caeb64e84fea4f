use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use vault_client::LookupOptions;

/// Fetch every key/value pair stored at a Vault KV path
#[derive(Debug, Parser)]
#[command(name = "vault-hiera-lookup", version)]
pub struct Cli {
    /// JSON file with lookup options (uri, ca_trust, token_file, auth_path, version, timeout)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Complete URI of the Vault KV secret path
    #[arg(long)]
    pub uri: Option<String>,

    /// PEM bundle of CAs trusted to sign the Vault server certificate
    #[arg(long, env = "VAULT_CACERT", value_name = "FILE")]
    pub ca_trust: Option<PathBuf>,

    /// File holding a pre-issued Vault token
    #[arg(long, value_name = "FILE")]
    pub token_file: Option<PathBuf>,

    /// Mount of the cert auth method, used when no token file is given
    #[arg(long)]
    pub auth_path: Option<String>,

    /// KV secrets engine version (v1 or v2)
    #[arg(long)]
    pub kv_version: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// PEM client certificate for cert auth
    #[arg(long, env = "VAULT_CLIENT_CERT", value_name = "FILE")]
    pub client_cert: Option<PathBuf>,

    /// PEM private key for cert auth
    #[arg(long, env = "VAULT_CLIENT_KEY", value_name = "FILE")]
    pub client_key: Option<PathBuf>,

    /// Print only the value stored under this key
    #[arg(long)]
    pub key: Option<String>,
}

impl Cli {
    /// Options file values, overridden by any flag given on the command line.
    pub fn lookup_options(&self) -> anyhow::Result<LookupOptions> {
        let file = match &self.options {
            Some(path) => load_options_file(path)?,
            None => LookupOptions::default(),
        };

        Ok(LookupOptions {
            uri: self.uri.clone().or(file.uri),
            ca_trust: self.ca_trust.clone().or(file.ca_trust),
            token_file: self.token_file.clone().or(file.token_file),
            auth_path: self.auth_path.clone().or(file.auth_path),
            version: self.kv_version.clone().or(file.version),
            timeout: self.timeout.or(file.timeout),
            client_cert: self.client_cert.clone().or(file.client_cert),
            client_key: self.client_key.clone().or(file.client_key),
        })
    }
}

fn load_options_file(path: &Path) -> anyhow::Result<LookupOptions> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse options file {}", path.display()))
}
