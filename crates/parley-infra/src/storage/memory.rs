//! In-memory session store backed by `DashMap`.

use dashmap::DashMap;

use parley_core::chat::store::{SessionStore, sanitize_session};
use parley_types::error::RepositoryError;
use parley_types::session::{SessionData, SessionId};

/// Process-local [`SessionStore`]. Same semantics as the file store, no durability.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &SessionId) -> Option<SessionData> {
        self.sessions
            .get(session_id)
            .map(|entry| sanitize_session(entry.value().clone()))
    }

    async fn save(
        &self,
        session_id: &SessionId,
        session: &SessionData,
    ) -> Result<(), RepositoryError> {
        self.sessions.insert(session_id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError> {
        self.sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::session::{MessageData, Role};

    #[tokio::test]
    async fn test_roundtrip_and_delete() {
        let store = MemorySessionStore::new();
        let mut data = SessionData::new(SessionId::from("m1"));
        data.main_thread_mut().push(MessageData::text(Role::User, "hi"));

        store.save(&data.id, &data).await.unwrap();
        assert_eq!(store.get(&data.id).await.unwrap(), data);
        assert_eq!(store.len(), 1);

        store.delete(&data.id).await.unwrap();
        assert!(store.get(&data.id).await.is_none());
        assert!(matches!(
            store.delete(&data.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_sanitizes() {
        let store = MemorySessionStore::new();
        let mut data = SessionData::new(SessionId::from("m2"));
        data.main_thread_mut().push(MessageData {
            role: Role::Model,
            content: vec![],
            metadata: None,
        });
        store.save(&data.id, &data).await.unwrap();

        assert!(store.get(&data.id).await.unwrap().main_thread().is_empty());
    }
}
