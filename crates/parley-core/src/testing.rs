//! In-process test doubles shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use parley_types::error::RepositoryError;
use parley_types::llm::{
    CompletionRequest, CompletionResponse, ImageRequest, ImageResponse, LlmError, StopReason,
    Usage,
};
use parley_types::session::{SessionData, SessionId};

use crate::chat::store::{SessionStore, sanitize_session};
use crate::llm::image::ImageProvider;
use crate::llm::provider::LlmProvider;

/// Chat provider that replays a fixed script of replies and records requests.
///
/// Once the script runs out every call answers with an empty reply.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    /// Handle to the requests seen so far.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        self.requests.clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))?;
        Ok(CompletionResponse {
            id: "resp".to_string(),
            content: reply,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}

/// Image provider that always answers with the same locator.
pub struct StaticImageProvider {
    url: Option<String>,
    fail: bool,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl StaticImageProvider {
    pub fn returning(url: Option<&str>) -> Self {
        Self {
            url: url.map(str::to_string),
            fail: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(None)
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<ImageRequest>>> {
        self.requests.clone()
    }
}

impl ImageProvider for StaticImageProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(LlmError::RateLimited {
                retry_after_ms: None,
            });
        }
        Ok(ImageResponse {
            url: self.url.clone(),
            revised_prompt: None,
        })
    }
}

/// Map-backed store that can be told to fail writes.
#[derive(Default)]
pub struct TestStore {
    records: Mutex<HashMap<SessionId, SessionData>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The record as stored, without sanitization.
    pub fn raw(&self, session_id: &SessionId) -> Option<SessionData> {
        self.records.lock().unwrap().get(session_id).cloned()
    }
}

impl SessionStore for TestStore {
    async fn get(&self, session_id: &SessionId) -> Option<SessionData> {
        self.raw(session_id).map(sanitize_session)
    }

    async fn save(
        &self,
        session_id: &SessionId,
        session: &SessionData,
    ) -> Result<(), RepositoryError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Io("disk full".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .insert(session_id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .unwrap()
            .remove(session_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
