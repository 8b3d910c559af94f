//! Chat Sessions
//!
//! One session per open chat view of a deployed agent. The session owns
//! the transcript and the turn state machine; it is created with a
//! synthesized greeting and simply discarded when the view goes away —
//! nothing is persisted. Dropping a session (and with it any in-flight
//! turn future) is the cancellation path: exclusive `&mut` access means
//! no chunk can mutate a discarded session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::ChatMessage;
use crate::profile::AgentProfile;
use crate::provider::PromptMessage;
use crate::transcript::Transcript;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-session turn state
///
/// `Idle → Sending → Streaming → Idle` on success; failure short-circuits
/// back to `Idle`. The only way out of `Idle` is a new send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No turn in flight
    Idle,

    /// Request submitted, no chunk received yet
    Sending,

    /// Chunks arriving
    Streaming,
}

/// A chat session with one deployed agent
#[derive(Clone, Debug)]
pub struct ChatSession {
    /// Unique identifier
    pub id: SessionId,

    /// Profile of the agent this session talks to (read-only)
    pub profile: Arc<AgentProfile>,

    /// Conversation history
    pub transcript: Transcript,

    /// Turn state
    pub state: SessionState,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a session seeded with the agent's greeting
    ///
    /// The transcript starts with exactly one finalized assistant message
    /// synthesized from the profile.
    pub fn new(profile: Arc<AgentProfile>) -> Self {
        let now = Utc::now();
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::assistant(profile.greeting()));

        Self {
            id: SessionId::new(),
            profile,
            transcript,
            state: SessionState::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a turn is currently in flight; gates new sends
    pub fn is_pending(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// Build the request payload: system prompt plus the finalized
    /// history, roles and content only
    pub fn prompt_messages(&self) -> Vec<PromptMessage> {
        let mut messages = vec![PromptMessage::system(self.profile.system_prompt())];
        messages.extend(
            self.transcript
                .messages()
                .map(|m| PromptMessage::new(m.role, m.content.clone())),
        );
        messages
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Number of finalized messages
    pub fn message_count(&self) -> usize {
        self.transcript.finalized_len()
    }
}
