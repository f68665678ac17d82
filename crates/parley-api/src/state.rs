//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and the
//! REST API. Services are generic over the session store; AppState pins them
//! to the boxed store chosen by configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;

use parley_core::chat::box_store::BoxSessionStore;
use parley_core::chat::service::ChatSessionManager;
use parley_core::image::ImageRequestAdapter;
use parley_core::llm::registry::ModelRegistry;
use parley_core::secret::SecretService;
use parley_infra::config::{load_config_file, load_global_config};
use parley_infra::filesystem::resolve_data_dir;
use parley_infra::registry::build_model_registry;
use parley_infra::secret::chain::build_secret_chain;
use parley_infra::storage::create_session_store;
use parley_types::config::GlobalConfig;

/// Chat manager pinned to the runtime-selected store.
pub type ConcreteChatManager = ChatSessionManager<BoxSessionStore>;

/// Shared application state.
///
/// Cheap to clone; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ConcreteChatManager>,
    pub images: Arc<ImageRequestAdapter>,
    /// Bounds in-flight API operations. Requests wait for a permit.
    pub limiter: Arc<Semaphore>,
    pub config: Arc<GlobalConfig>,
}

impl AppState {
    /// Resolve the data directory, load configuration and credentials, and
    /// wire the registry and session store.
    ///
    /// `config_path` overrides `{data_dir}/config.toml`.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = match config_path {
            Some(path) => load_config_file(path).await,
            None => load_global_config(&data_dir).await,
        };

        let secrets = SecretService::new(build_secret_chain(&data_dir, true));
        let registry = build_model_registry(&config.models, &secrets).await?;
        let store = create_session_store(&config.storage, &data_dir);

        tracing::debug!(
            data_dir = %data_dir.display(),
            models = ?registry.chat_model_types(),
            "Application state initialized"
        );

        Ok(Self::from_parts(config, registry, store))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(config: GlobalConfig, registry: ModelRegistry, store: BoxSessionStore) -> Self {
        let registry = Arc::new(registry);

        let mut chat = ChatSessionManager::new(Arc::clone(&registry), store);
        if config.chat.serialize_session_writes {
            chat = chat.with_session_locks();
        }

        let permits = config.server.max_concurrent_requests.max(1);

        Self {
            chat: Arc::new(chat),
            images: Arc::new(ImageRequestAdapter::new(registry)),
            limiter: Arc::new(Semaphore::new(permits)),
            config: Arc::new(config),
        }
    }
}

/// Where the session files of a file-backed store live, for display.
pub fn sessions_dir(config: &GlobalConfig) -> PathBuf {
    resolve_data_dir().join(&config.storage.sessions_dir)
}
