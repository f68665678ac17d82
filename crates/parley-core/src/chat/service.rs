//! Chat session manager orchestrating the session lifecycle.
//!
//! ChatSessionManager coordinates the ModelRegistry and a SessionStore to
//! create sessions, drive batches of user messages through a model in order,
//! and delete sessions.

use std::sync::Arc;

use parley_types::error::{ChatError, RepositoryError};
use parley_types::llm::ModelType;
use parley_types::session::{GenerationConfig, MessageData, SessionData, SessionId};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

use super::locks::SessionLocks;
use super::session::ChatSession;
use super::store::SessionStore;
use crate::llm::registry::{ModelRegistry, RegisteredModel};

/// Orchestrates chat session lifecycle and message persistence.
///
/// Generic over `SessionStore` to maintain clean architecture (parley-core
/// never depends on parley-infra).
pub struct ChatSessionManager<S: SessionStore> {
    registry: Arc<ModelRegistry>,
    store: S,
    locks: Option<SessionLocks>,
}

impl<S: SessionStore> ChatSessionManager<S> {
    pub fn new(registry: Arc<ModelRegistry>, store: S) -> Self {
        Self {
            registry,
            store,
            locks: None,
        }
    }

    /// Serialize sends and deletes per session id within this process.
    pub fn with_session_locks(mut self) -> Self {
        self.locks = Some(SessionLocks::new());
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of per-session lock entries currently held in the table.
    pub fn tracked_locks(&self) -> usize {
        self.locks.as_ref().map_or(0, SessionLocks::len)
    }

    /// Create and persist a new session holding only the preamble.
    ///
    /// The model is resolved to validate the identifier; no model call is made.
    pub async fn create_session(
        &self,
        model_type: ModelType,
        config: &GenerationConfig,
    ) -> Result<SessionId, ChatError> {
        self.resolve(model_type)?;

        let session_id = SessionId::new();
        let mut session = SessionData::new(session_id.clone());
        session
            .main_thread_mut()
            .push(MessageData::preamble(config.system_instructions.clone()));

        self.store
            .save(&session_id, &session)
            .await
            .map_err(ChatError::Persistence)?;

        info!(session_id = %session_id, model = %model_type, "Chat session created");
        Ok(session_id)
    }

    /// Feed `messages` through the model in order and return the joined replies.
    ///
    /// Each reply that has text contributes `text + "\n"`; the result is
    /// trimmed. The session is saved after every successful turn. The first
    /// model failure aborts the batch; turns completed before it stay saved.
    pub async fn send_messages(
        &self,
        model_type: ModelType,
        session_id: &SessionId,
        messages: &[String],
        config: &GenerationConfig,
    ) -> Result<String, ChatError> {
        let guard = self.lock(session_id).await;

        let Some(mut data) = self.store.get(session_id).await else {
            // Unknown ids must not leave lock entries behind.
            drop(guard);
            self.forget_lock(session_id);
            return Err(ChatError::NotFound(session_id.clone()));
        };
        let _guard = guard;
        let model = self.resolve(model_type)?;

        // Turns are saved under the key the record was loaded from.
        data.id = session_id.clone();

        let mut chat = ChatSession::new(&self.store, model, config, data);
        let mut response = String::new();

        for (index, text) in messages.iter().enumerate() {
            match chat.send(text).await {
                Ok(reply) => {
                    if !reply.is_empty() {
                        response.push_str(&reply);
                        response.push('\n');
                    }
                }
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        model = %model_type,
                        turn = index,
                        error = %e,
                        "Message batch aborted"
                    );
                    return Err(e);
                }
            }
        }

        info!(
            session_id = %session_id,
            model = %model_type,
            messages = messages.len(),
            "Message batch completed"
        );
        Ok(response.trim().to_string())
    }

    /// Remove a session's persisted record.
    pub async fn delete_session(&self, session_id: &SessionId) -> Result<(), ChatError> {
        {
            let _guard = self.lock(session_id).await;
            self.store.delete(session_id).await.map_err(|e| match e {
                // An id that cannot name a record never had one.
                RepositoryError::NotFound | RepositoryError::InvalidKey(_) => {
                    ChatError::NotFound(session_id.clone())
                }
                other => ChatError::Persistence(other),
            })?;
        }

        self.forget_lock(session_id);
        info!(session_id = %session_id, "Chat session deleted");
        Ok(())
    }

    fn resolve(&self, model_type: ModelType) -> Result<&RegisteredModel, ChatError> {
        self.registry
            .chat_model(model_type)
            .ok_or_else(|| ChatError::ModelUnavailable(model_type.to_string()))
    }

    fn forget_lock(&self, session_id: &SessionId) {
        if let Some(locks) = &self.locks {
            locks.forget(session_id);
        }
    }

    async fn lock(&self, session_id: &SessionId) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(session_id).await),
            None => None,
        }
    }
}
