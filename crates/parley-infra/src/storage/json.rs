//! JSON-file session store.
//!
//! Layout: `{dir}/{session_id}.json`, one compact JSON document per session.
//! Writes go to a hidden temporary sibling first and are then renamed over
//! the target, so readers never observe a half-written record.

use std::io::ErrorKind;
use std::path::PathBuf;

use parley_core::chat::store::{SessionStore, is_valid_session_key, sanitize_session};
use parley_types::error::RepositoryError;
use parley_types::session::{SessionData, SessionId};
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory-backed [`SessionStore`].
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    dir: PathBuf,
}

impl JsonSessionStore {
    /// The directory is created lazily on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record for `session_id`.
    pub fn session_path(&self, session_id: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", session_id.as_str()))
    }

    fn checked_path(&self, session_id: &SessionId) -> Result<PathBuf, RepositoryError> {
        if is_valid_session_key(session_id) {
            Ok(self.session_path(session_id))
        } else {
            Err(RepositoryError::InvalidKey(session_id.to_string()))
        }
    }
}

impl SessionStore for JsonSessionStore {
    async fn get(&self, session_id: &SessionId) -> Option<SessionData> {
        let path = match self.checked_path(session_id) {
            Ok(path) => path,
            Err(_) => {
                warn!(session_id = %session_id, "Rejected session id on load");
                return None;
            }
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(session_id = %session_id, "No session file");
                return None;
            }
            Err(err) => {
                warn!(session_id = %session_id, path = %path.display(), "Failed to read session: {err}");
                return None;
            }
        };

        match serde_json::from_slice::<SessionData>(&bytes) {
            Ok(session) => Some(sanitize_session(session)),
            Err(err) => {
                warn!(session_id = %session_id, path = %path.display(), "Corrupt session file: {err}");
                None
            }
        }
    }

    async fn save(
        &self,
        session_id: &SessionId,
        session: &SessionData,
    ) -> Result<(), RepositoryError> {
        let path = self.checked_path(session_id)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| RepositoryError::Io(format!("create {}: {e}", self.dir.display())))?;

        let bytes =
            serde_json::to_vec(session).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", session_id.as_str(), Uuid::now_v7().simple()));
        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(RepositoryError::Io(format!("write {}: {e}", tmp.display())));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(RepositoryError::Io(format!("rename to {}: {e}", path.display())));
        }

        debug!(session_id = %session_id, bytes = bytes.len(), "Session saved");
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError> {
        let path = self.checked_path(session_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(RepositoryError::NotFound),
            Err(err) => Err(RepositoryError::Io(format!(
                "remove {}: {err}",
                path.display()
            ))),
        }
    }
}
