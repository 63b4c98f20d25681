//! crates/evidentia_core/src/transcript.rs
//!
//! An ordered, append-only log of chat messages belonging to one session.
//! The transcript does not render anything itself; it exposes read access to
//! the message sequence and bumps a revision counter on every mutation so a
//! host view knows when to refresh.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::annotate::{annotate, AnnotatedBody};
use crate::domain::ExchangeRecord;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Immutable once created; entries are only ever
/// appended, or removed to retract a transient placeholder.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Annotated display fragment. Present on assistant messages; user
    /// messages and pending placeholders are plain text.
    pub body: Option<AnnotatedBody>,
    /// Marks the transient "Analyzing…" placeholder awaiting retraction.
    pub pending: bool,
}

/// The ordered message log. Insertion order is chronological order is
/// display order.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, annotating it when the role is assistant.
    /// Returns the new entry's id for later retraction.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> Uuid {
        self.append_at(role, text.into(), Utc::now(), false)
    }

    /// Appends a transient assistant placeholder (not annotated).
    pub fn append_pending(&mut self, text: impl Into<String>) -> Uuid {
        self.append_at(Role::Assistant, text.into(), Utc::now(), true)
    }

    fn append_at(
        &mut self,
        role: Role,
        text: String,
        created_at: DateTime<Utc>,
        pending: bool,
    ) -> Uuid {
        let body = match role {
            Role::Assistant if !pending => Some(annotate(&text)),
            _ => None,
        };
        let id = Uuid::new_v4();
        self.messages.push(Message {
            id,
            role,
            text,
            created_at,
            body,
            pending,
        });
        self.revision += 1;
        id
    }

    /// Removes a specific message by identity. No-op if already absent.
    pub fn retract(&mut self, id: Uuid) {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        if self.messages.len() != before {
            self.revision += 1;
        }
    }

    /// Clears the transcript and rebuilds it from persisted query records.
    ///
    /// Records are stable-sorted by creation time ascending; the order they
    /// arrive in is not trusted. Each record expands to a user message
    /// followed by the assistant's annotated answer. Re-invoking with the
    /// same input yields an identical transcript.
    pub fn reconstruct(&mut self, records: &[ExchangeRecord]) {
        self.messages.clear();
        let mut ordered: Vec<&ExchangeRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.created_at);
        for record in ordered {
            self.append_at(Role::User, record.question_text.clone(), record.created_at, false);
            self.append_at(
                Role::Assistant,
                record.answer_text.clone(),
                record.created_at,
                false,
            );
        }
        self.revision += 1;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Monotonic counter bumped on every mutation; lets a host view detect
    /// that a refresh is due without owning the rendering.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
