//! Secret chain builder -- wires concrete providers in priority order.
//!
//! The resulting chain is passed to `SecretService` in `parley-core` via the
//! `DynSecretProvider` abstraction.
//!
//! Chain order: `[EnvSecretProvider, FileSecretProvider]`

use std::path::Path;
use std::sync::Arc;

use parley_core::secret::DynSecretProvider;

use super::env::EnvSecretProvider;
use super::file::FileSecretProvider;

/// Build the default secret resolution chain (first match wins).
///
/// 1. Environment variables (if `include_env` is true)
/// 2. `{data_dir}/.secret.local`
pub fn build_secret_chain(data_dir: &Path, include_env: bool) -> Vec<DynSecretProvider> {
    let mut chain: Vec<DynSecretProvider> = Vec::new();

    if include_env {
        chain.push(Arc::new(EnvSecretProvider::new()));
    }

    chain.push(Arc::new(FileSecretProvider::in_data_dir(data_dir)));

    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order() {
        let dir = std::path::PathBuf::from("/tmp/parley");
        let names: Vec<String> = build_secret_chain(&dir, true)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["env", "file"]);

        assert_eq!(build_secret_chain(&dir, false).len(), 1);
    }
}
