//! Per-turn chat session bound to a model, a generation config, and a store.
//!
//! A `ChatSession` owns the in-memory copy of a session record for the
//! duration of one operation. Each [`send`](ChatSession::send) submits a user
//! message against the accumulated thread, records both turns, and persists
//! the whole record.

use parley_types::error::ChatError;
use parley_types::llm::{CompletionRequest, Message, MessageRole};
use parley_types::session::{GenerationConfig, MessageData, Role, SessionData};
use tracing::debug;

use super::store::SessionStore;
use crate::llm::registry::RegisteredModel;

/// A loaded session with its model and generation config attached.
pub struct ChatSession<'a, S: SessionStore> {
    store: &'a S,
    model: &'a RegisteredModel,
    config: &'a GenerationConfig,
    data: SessionData,
}

impl<'a, S: SessionStore> ChatSession<'a, S> {
    /// Attach a model and config to `data`.
    ///
    /// The thread's preamble is replaced with `config.system_instructions`,
    /// so instructions given on this call win over those stored earlier.
    pub fn new(
        store: &'a S,
        model: &'a RegisteredModel,
        config: &'a GenerationConfig,
        mut data: SessionData,
    ) -> Self {
        let thread = data.main_thread_mut();
        thread.retain(|m| !m.is_preamble());
        thread.insert(0, MessageData::preamble(config.system_instructions.clone()));
        Self {
            store,
            model,
            config,
            data,
        }
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    /// Persist the current record as-is.
    pub async fn save(&self) -> Result<(), ChatError> {
        self.store
            .save(&self.data.id, &self.data)
            .await
            .map_err(ChatError::Persistence)
    }

    /// Submit one user message and return the model's reply text.
    ///
    /// On a model failure nothing is recorded. On success the user turn and
    /// the model turn are appended and the record is saved; a reply without
    /// text is stored as a model message with empty content.
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        let request = self.build_request(text);
        debug!(
            session_id = %self.data.id,
            model = %self.model.model,
            history = request.messages.len() - 1,
            "Submitting turn"
        );

        let response = self.model.provider.complete(&request).await?;

        let thread = self.data.main_thread_mut();
        thread.push(MessageData::text(Role::User, text));
        if response.content.is_empty() {
            thread.push(MessageData {
                role: Role::Model,
                content: Vec::new(),
                metadata: None,
            });
        } else {
            thread.push(MessageData::text(Role::Model, response.content.clone()));
        }

        self.save().await?;
        Ok(response.content)
    }

    fn build_request(&self, text: &str) -> CompletionRequest {
        let mut system = None;
        let mut messages = Vec::new();
        for message in self.data.main_thread() {
            if message.is_preamble() {
                system = Some(message.text_content());
                continue;
            }
            // Empty turns recorded earlier in this batch are not valid model input.
            if message.content.is_empty() {
                continue;
            }
            messages.push(Message {
                role: MessageRole::from(message.role),
                content: message.text_content(),
            });
        }
        messages.push(Message {
            role: MessageRole::User,
            content: text.to_string(),
        });

        CompletionRequest {
            model: self.model.model.clone(),
            messages,
            system,
            max_tokens: self.config.max_output_tokens,
            temperature: Some(self.model.effective_temperature(self.config)),
            stop_sequences: if self.config.stop_sequences.is_empty() {
                None
            } else {
                Some(self.config.stop_sequences.clone())
            },
        }
    }
}
