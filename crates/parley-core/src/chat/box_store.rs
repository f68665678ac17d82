//! BoxSessionStore -- object-safe dynamic dispatch wrapper for SessionStore.
//!
//! Lets the storage backend be chosen from configuration at startup while
//! `ChatSessionManager` stays generic.

use std::future::Future;
use std::pin::Pin;

use parley_types::error::RepositoryError;
use parley_types::session::{SessionData, SessionId};

use super::store::SessionStore;

/// Object-safe version of [`SessionStore`] with boxed futures.
pub trait SessionStoreDyn: Send + Sync {
    fn get_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> Pin<Box<dyn Future<Output = Option<SessionData>> + Send + 'a>>;

    fn save_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        session: &'a SessionData,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;

    fn delete_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;
}

impl<T: SessionStore> SessionStoreDyn for T {
    fn get_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> Pin<Box<dyn Future<Output = Option<SessionData>> + Send + 'a>> {
        Box::pin(self.get(session_id))
    }

    fn save_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        session: &'a SessionData,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.save(session_id, session))
    }

    fn delete_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.delete(session_id))
    }
}

/// Type-erased session store.
pub struct BoxSessionStore {
    inner: Box<dyn SessionStoreDyn + Send + Sync>,
}

impl BoxSessionStore {
    pub fn new<T: SessionStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl SessionStore for BoxSessionStore {
    async fn get(&self, session_id: &SessionId) -> Option<SessionData> {
        self.inner.get_boxed(session_id).await
    }

    async fn save(
        &self,
        session_id: &SessionId,
        session: &SessionData,
    ) -> Result<(), RepositoryError> {
        self.inner.save_boxed(session_id, session).await
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError> {
        self.inner.delete_boxed(session_id).await
    }
}
