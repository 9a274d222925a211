//! The chat session controller.
//!
//! A [`ChatSession`] owns the transcript and the pending input for one
//! conversation. Sending happens in two phases so the UI can keep drawing
//! while the request is in flight:
//!
//! 1. [`ChatSession::begin_send`] appends the user's turn, marks the session
//!    busy and returns the request to dispatch.
//! 2. [`ChatSession::finish_send`] appends the model's turn (or the failure
//!    filler) and clears the busy flag and pending state.
//!
//! [`ChatSession::send`] runs both phases around a [`GeminiClient`] call for
//! callers that can simply await.

use tracing::{debug, warn};

use crate::api::{Content, GenerateContentResponse};
use crate::core::attachment::{Attachment, SelectedFile};
use crate::core::compose::{display_content, payload_content, reply_text, FAILURE_FALLBACK};
use crate::core::gemini::{GeminiClient, GenerateError};
use crate::core::message::{Message, Role};

/// A request produced by [`ChatSession::begin_send`].
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// Id of the user message that opened this exchange.
    pub request_id: u64,
    pub contents: Vec<Content>,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    pending_input: String,
    pending_file: Option<Attachment>,
    in_flight: Option<u64>,
    next_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn pending_file(&self) -> Option<&Attachment> {
        self.pending_file.as_ref()
    }

    /// Decode and stage a file for the next send. `None` leaves the current
    /// attachment in place.
    pub fn attach_file(&mut self, file: Option<SelectedFile>) {
        let Some(file) = file else {
            return;
        };
        let attachment = file.decode();
        debug!(name = %attachment.name, chars = attachment.content.len(), "attached file");
        self.pending_file = Some(attachment);
    }

    pub fn clear_attachment(&mut self) {
        self.pending_file = None;
    }

    /// Phase one of a send. Returns `None` without touching the transcript
    /// when there is nothing to send or a request is already outstanding.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingRequest> {
        if self.is_busy() {
            debug!("send ignored while a request is outstanding");
            return None;
        }

        let trimmed = text.trim();
        let has_file_text = self
            .pending_file
            .as_ref()
            .is_some_and(|file| !file.content.is_empty());
        if trimmed.is_empty() && !has_file_text {
            return None;
        }

        let attachment = self.pending_file.as_ref();
        let display = display_content(trimmed, attachment);
        let payload = payload_content(trimmed, attachment);

        let mut contents: Vec<Content> =
            self.messages.iter().map(Message::to_api_content).collect();
        contents.push(Content::text(Role::User.as_str(), payload));

        let request_id = self.push(Role::User, display);
        self.in_flight = Some(request_id);

        Some(PendingRequest {
            request_id,
            contents,
        })
    }

    /// Phase two of a send. Outcomes for a request that is not the one in
    /// flight are dropped and `false` is returned.
    pub fn finish_send(
        &mut self,
        request_id: u64,
        outcome: Result<GenerateContentResponse, GenerateError>,
    ) -> bool {
        if self.in_flight != Some(request_id) {
            debug!(request_id, "dropping outcome for stale request");
            return false;
        }

        let reply = match outcome {
            Ok(response) => reply_text(response.first_text()),
            Err(err) => {
                warn!(request_id, error = %err, "generateContent failed");
                FAILURE_FALLBACK.to_string()
            }
        };
        self.push(Role::Model, reply);

        self.in_flight = None;
        self.pending_input.clear();
        self.pending_file = None;
        true
    }

    /// Run a full exchange against `client`.
    pub async fn send(&mut self, text: &str, client: &GeminiClient) {
        let Some(request) = self.begin_send(text) else {
            return;
        };
        let outcome = client.generate(request.contents).await;
        self.finish_send(request.request_id, outcome);
    }

    fn push(&mut self, role: Role, content: String) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.messages.push(Message::new(id, role, content));
        id
    }
}
