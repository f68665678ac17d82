//! Session store implementations.
//!
//! - [`json::JsonSessionStore`]: one JSON document per session on disk.
//! - [`memory::MemorySessionStore`]: process-local map, lost on exit.

pub mod json;
pub mod memory;

use std::path::Path;

use parley_core::chat::box_store::BoxSessionStore;
use parley_types::config::{StorageBackend, StorageConfig};

/// Build the configured session store. Relative directories resolve against `data_dir`.
pub fn create_session_store(config: &StorageConfig, data_dir: &Path) -> BoxSessionStore {
    match config.backend {
        StorageBackend::File => {
            let dir = data_dir.join(&config.sessions_dir);
            tracing::debug!(dir = %dir.display(), "Using JSON file session store");
            BoxSessionStore::new(json::JsonSessionStore::new(dir))
        }
        StorageBackend::Memory => {
            tracing::debug!("Using in-memory session store");
            BoxSessionStore::new(memory::MemorySessionStore::new())
        }
    }
}
