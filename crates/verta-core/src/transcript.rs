//! Conversation Transcript
//!
//! Ordered message history with a single in-progress entry for the reply
//! currently being streamed. Finalized entries are append-only; the
//! in-progress entry is mutated in place until the stream ends, then
//! replaced with a finalized message in the same position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::{ChatMessage, Role};

/// One entry in a transcript
///
/// The in-progress variant carries no id; a permanent [`crate::MessageId`]
/// is assigned only at finalization, so a half-streamed reply can never be
/// confused with a finished one.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// A completed message with a permanent id
    Finalized(ChatMessage),

    /// The assistant reply currently being streamed
    InProgress {
        /// Text accumulated so far, in chunk delivery order
        partial_content: String,

        /// When the first chunk arrived
        started_at: DateTime<Utc>,
    },
}

impl TranscriptEntry {
    /// Role of this entry (in-progress entries are always assistant)
    pub fn role(&self) -> Role {
        match self {
            TranscriptEntry::Finalized(msg) => msg.role,
            TranscriptEntry::InProgress { .. } => Role::Assistant,
        }
    }

    /// Text content regardless of state
    pub fn content(&self) -> &str {
        match self {
            TranscriptEntry::Finalized(msg) => &msg.content,
            TranscriptEntry::InProgress { partial_content, .. } => partial_content,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, TranscriptEntry::InProgress { .. })
    }
}

/// Ordered conversation history
///
/// Invariants:
/// - insertion order is conversation order;
/// - finalized entries are never reordered, mutated, or removed;
/// - at most one in-progress entry exists, and it is always the tail.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized message
    pub fn push(&mut self, message: ChatMessage) {
        debug_assert!(!self.has_in_progress(), "push while a reply is streaming");
        self.entries.push(TranscriptEntry::Finalized(message));
    }

    /// Start the in-progress entry; no-op if one already exists
    pub fn begin_streaming(&mut self, started_at: DateTime<Utc>) {
        if !self.has_in_progress() {
            self.entries.push(TranscriptEntry::InProgress {
                partial_content: String::new(),
                started_at,
            });
        }
    }

    /// Apply one streamed chunk, starting the in-progress entry on first use
    ///
    /// Chunks must be applied in delivery order; this simply extends the
    /// accumulated text.
    pub fn append_chunk(&mut self, text: &str) {
        if !self.has_in_progress() {
            self.begin_streaming(Utc::now());
        }
        if let Some(TranscriptEntry::InProgress { partial_content, .. }) = self.entries.last_mut()
        {
            partial_content.push_str(text);
        }
    }

    /// Atomically replace the in-progress entry with a finalized message
    ///
    /// The finalized message keeps the entry's position and first-chunk
    /// timestamp, and receives a fresh permanent id. Returns `None` when
    /// nothing is in progress.
    pub fn finalize_streaming(&mut self) -> Option<ChatMessage> {
        let (content, started_at) = match self.entries.last() {
            Some(TranscriptEntry::InProgress { partial_content, started_at }) => {
                (partial_content.clone(), *started_at)
            }
            _ => return None,
        };

        let message = ChatMessage::assistant_at(content, started_at);
        *self.entries.last_mut().expect("entry exists") =
            TranscriptEntry::Finalized(message.clone());
        Some(message)
    }

    /// Whether a reply is currently being streamed
    pub fn has_in_progress(&self) -> bool {
        self.entries.last().is_some_and(TranscriptEntry::is_in_progress)
    }

    /// Text accumulated so far for the in-progress entry, if any
    pub fn partial_content(&self) -> Option<&str> {
        match self.entries.last() {
            Some(TranscriptEntry::InProgress { partial_content, .. }) => Some(partial_content),
            _ => None,
        }
    }

    /// All entries in conversation order
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Finalized messages only, in conversation order
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|e| match e {
            TranscriptEntry::Finalized(msg) => Some(msg),
            TranscriptEntry::InProgress { .. } => None,
        })
    }

    /// Last entry, if any
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Total entry count (including the in-progress entry)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of finalized messages
    pub fn finalized_len(&self) -> usize {
        self.messages().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_preserve_delivery_order() {
        let mut transcript = Transcript::new();
        transcript.append_chunk("Hel");
        transcript.append_chunk("lo");

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.partial_content(), Some("Hello"));
    }

    #[test]
    fn test_single_in_progress_entry() {
        let mut transcript = Transcript::new();
        transcript.begin_streaming(Utc::now());
        transcript.begin_streaming(Utc::now());
        transcript.append_chunk("hi");

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.finalized_len(), 0);
    }

    #[test]
    fn test_finalize_keeps_position_and_assigns_id() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("question"));
        transcript.append_chunk("answer");

        let finalized = transcript.finalize_streaming().expect("was streaming");
        assert_eq!(finalized.content, "answer");
        assert_eq!(finalized.role, Role::Assistant);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.finalized_len(), 2);
        assert!(!transcript.has_in_progress());
        assert_eq!(transcript.messages().last().unwrap().content, "answer");
    }

    #[test]
    fn test_finalize_without_stream_is_none() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("hi"));
        assert!(transcript.finalize_streaming().is_none());
    }
}
