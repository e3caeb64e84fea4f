//! vault-client - point-in-time reads of HashiCorp Vault KV secrets
//!
//! A lookup runs validate → transport → authenticate → fetch → parse and
//! reports the result to a caller-owned [`LookupContext`]. Authentication is
//! either:
//! 1. `token_file` → pre-issued token read from disk
//! 2. `auth_path` → TLS client certificate login against `auth/<mount>/login`

pub mod auth;
mod context;
mod error;
mod fetch;
mod lookup;
mod models;
mod options;
mod transport;

pub use auth::{AuthMethod, CertAuth, Token, TokenFileAuth};
pub use context::{CacheScope, LookupContext, MemoryCache, NoCache};
pub use error::{ConfigError, ErrorKind, VaultError};
pub use fetch::fetch;
pub use lookup::lookup;
pub use models::{LookupOutcome, SecretData, parse};
pub use options::{AuthSource, ClientIdentity, KvVersion, LookupOptions, ValidatedOptions};
pub use transport::{SecureClient, SecureClientBuilder};
