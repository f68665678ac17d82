//! Secret provider trait and resolution service.
//!
//! SecretService resolves backend credentials through a chain of providers in
//! priority order (first match wins). The chain is assembled in parley-infra.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parley_types::error::RepositoryError;
use tracing::debug;

/// Read-only source of secret values (environment, dotenv file, ...).
pub trait SecretProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Look up `key`. Returns `None` if this provider does not have it.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;
}

/// Object-safe version of [`SecretProvider`] with boxed futures.
pub trait SecretProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, RepositoryError>> + Send + 'a>>;
}

impl<T: SecretProvider> SecretProviderDyn for T {
    fn name(&self) -> &str {
        SecretProvider::name(self)
    }

    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, RepositoryError>> + Send + 'a>> {
        Box::pin(self.get(key))
    }
}

/// Shared, type-erased secret provider.
pub type DynSecretProvider = Arc<dyn SecretProviderDyn>;

/// Resolves secrets across a provider chain.
pub struct SecretService {
    providers: Vec<DynSecretProvider>,
}

impl SecretService {
    /// Providers should be ordered by precedence (highest priority first).
    pub fn new(providers: Vec<DynSecretProvider>) -> Self {
        Self { providers }
    }

    /// Resolve `key` from the first provider that has a non-empty value.
    pub async fn get_secret(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        for provider in &self.providers {
            if let Some(value) = provider.get_boxed(key).await? {
                if value.trim().is_empty() {
                    continue;
                }
                debug!(key, provider = provider.name(), "Secret resolved");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Mask a secret value, showing only the last 4 characters.
    ///
    /// - "sk-abcdefghijklmnop" -> "****mnop"
    /// - "abc" -> "****"
    pub fn mask_secret(value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() <= 4 {
            "****".to_string()
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("****{tail}")
        }
    }
}
