//! Environment variable secret provider.
//!
//! The highest-priority provider in the resolution chain: env vars override
//! every other source.

use parley_core::secret::SecretProvider;
use parley_types::error::RepositoryError;

/// Reads secrets from the process environment, using the key as the variable name.
#[derive(Debug, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SecretProvider for EnvSecretProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        match std::env::var(key) {
            Ok(val) => Ok(Some(val)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            // Present but not valid Unicode; secrets must be strings
            Err(std::env::VarError::NotUnicode(_)) => Ok(None),
        }
    }
}
