//! API-key handling for provider clients.
//!
//! Keys are read from per-provider environment variables and wrapped so they
//! cannot leak through `Debug` formatting or logs.

use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::types::ProviderKind;
use crate::{Error, Result};

/// A provider API key, kept out of `Debug` output and logs.
///
/// Backed by `SecretString`, so the value is zeroized on drop and only
/// readable through [`expose_secret`](Self::expose_secret).
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wrap a raw key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// The raw key value, for embedding in an outbound request.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Environment variable holding each provider's API key.
const ENV_VARS: &[(ProviderKind, &str)] = &[
    (ProviderKind::OpenAi, "OPENAI_API_KEY"),
    (ProviderKind::Gemini, "GEMINI_API_KEY"),
];

/// Get the environment variable name for a provider.
pub fn env_var_for(provider: ProviderKind) -> &'static str {
    ENV_VARS
        .iter()
        .find(|(p, _)| *p == provider)
        .map(|(_, v)| *v)
        .unwrap_or("")
}

/// Read a provider's API key from its environment variable.
pub fn api_key_from_env(provider: ProviderKind) -> Result<ApiKey> {
    match env::var(env_var_for(provider)) {
        Ok(value) if !value.trim().is_empty() => Ok(ApiKey::new(value)),
        _ => Err(Error::CredentialsNotFound(provider)),
    }
}
