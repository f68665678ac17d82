//! SessionStore trait definition and read-side sanitization.
//!
//! Reads and writes are deliberately asymmetric: a failed read is reported as
//! "no session" while every write failure propagates to the caller.

use parley_types::error::RepositoryError;
use parley_types::session::{MAIN_THREAD, SessionData, SessionId};

/// Durable persistence of session records keyed by session id.
///
/// Implementations live in parley-infra (e.g., `JsonSessionStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionStore: Send + Sync {
    /// Load a session, sanitized with [`sanitize_session`].
    ///
    /// Never fails: a missing, unreadable, or corrupt record is `None`.
    fn get(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Option<SessionData>> + Send;

    /// Overwrite the full record for `session_id`, creating storage as needed.
    fn save(
        &self,
        session_id: &SessionId,
        session: &SessionData,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove the record. A missing record is [`RepositoryError::NotFound`].
    fn delete(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Drop every `main`-thread message whose content sequence is empty.
///
/// Applied on load only; the persisted record is left as written.
pub fn sanitize_session(mut session: SessionData) -> SessionData {
    if let Some(thread) = session.threads.get_mut(MAIN_THREAD) {
        thread.retain(|message| !message.content.is_empty());
    }
    session
}

/// Whether `session_id` can be used as a storage key (a single file name).
pub fn is_valid_session_key(session_id: &SessionId) -> bool {
    let key = session_id.as_str();
    !key.is_empty()
        && key != "."
        && !key.contains("..")
        && !key.contains('/')
        && !key.contains('\\')
        && !key.contains('\0')
}
