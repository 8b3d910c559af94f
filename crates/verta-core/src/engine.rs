//! Chat Session Engine
//!
//! Drives one conversation turn at a time: append the user message, stream
//! the reply from the provider, reconcile chunks into the transcript's
//! single in-progress entry, and finalize it at stream end. A provider
//! failure never escapes a turn — the partial reply is kept (or a fixed
//! error reply appended) and the session returns to idle, ready for the
//! next send.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use crate::error::{PlatformError, Result};
use crate::message::ChatMessage;
use crate::provider::{CompletionStream, GenerationOptions, LlmProvider};
use crate::session::{ChatSession, SessionState};

/// Reply appended when a turn fails before any text arrived
pub const FAILURE_REPLY: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Generation options for chat turns
    pub generation: GenerationOptions,

    /// Maximum wait between chunks before the turn is failed.
    /// `None` disables the timeout entirely.
    pub idle_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation: GenerationOptions {
                // Chat turns are capped well below the provider default to
                // keep replies conversational.
                max_tokens: 500,
                ..GenerationOptions::default()
            },
            idle_timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Result of a send call
///
/// Mirrors the turn error taxonomy: empty input and concurrent sends are
/// ignored, stream failures are recovered locally. No variant carries an
/// error — a failed turn leaves the session usable.
#[derive(Clone, Debug)]
pub enum SendOutcome {
    /// Input was blank, or a turn is already in flight; nothing changed
    Ignored,

    /// The turn completed; the finalized assistant reply
    Completed(ChatMessage),

    /// The stream failed; the reply holds the partial text received so
    /// far, or the fixed error reply if nothing arrived
    Recovered(ChatMessage),
}

impl SendOutcome {
    /// The assistant reply, when the turn produced one
    pub fn reply(&self) -> Option<&ChatMessage> {
        match self {
            SendOutcome::Ignored => None,
            SendOutcome::Completed(msg) | SendOutcome::Recovered(msg) => Some(msg),
        }
    }
}

/// The chat session engine
pub struct ChatEngine {
    provider: Arc<dyn LlmProvider>,
    config: EngineConfig,
}

impl ChatEngine {
    /// Create a new engine
    pub fn new(provider: Arc<dyn LlmProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, EngineConfig::default())
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one conversation turn
    ///
    /// Blank input and sends while a turn is pending are ignored without
    /// touching the transcript. Otherwise the user message is appended,
    /// the reply is streamed and reconciled, and the session is back to
    /// idle by the time this returns — on failure too.
    pub async fn send(&self, session: &mut ChatSession, text: &str) -> SendOutcome {
        self.send_observed(session, text, |_| {}).await
    }

    /// Same as [`ChatEngine::send`], invoking `observer` once per applied
    /// chunk, in delivery order
    pub async fn send_observed(
        &self,
        session: &mut ChatSession,
        text: &str,
        mut observer: impl FnMut(&str),
    ) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }
        if session.is_pending() {
            tracing::debug!(session = %session.id, "send rejected: turn already in flight");
            return SendOutcome::Ignored;
        }

        session.transcript.push(ChatMessage::user(text));
        session.state = SessionState::Sending;
        session.touch();

        let payload = session.prompt_messages();
        let result = match self
            .provider
            .complete_stream(&payload, &self.config.generation)
            .await
        {
            Ok(stream) => self.consume(session, stream, &mut observer).await,
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(()) => match session.transcript.finalize_streaming() {
                Some(reply) => SendOutcome::Completed(reply),
                // Clean end of stream without a single chunk of text;
                // recover the same way as a zero-text failure.
                None => SendOutcome::Recovered(push_failure_reply(session)),
            },
            Err(e) => {
                tracing::warn!(session = %session.id, error = %e, "chat turn failed");
                match session.transcript.finalize_streaming() {
                    Some(partial) => SendOutcome::Recovered(partial),
                    None => SendOutcome::Recovered(push_failure_reply(session)),
                }
            }
        };

        session.state = SessionState::Idle;
        session.touch();
        outcome
    }

    /// Single-consumer chunk loop: applies deltas in delivery order until
    /// the stream ends, reports done, errors, or goes idle too long
    async fn consume(
        &self,
        session: &mut ChatSession,
        mut stream: CompletionStream,
        observer: &mut impl FnMut(&str),
    ) -> Result<()> {
        loop {
            let next = match self.config.idle_timeout {
                Some(window) => tokio::time::timeout(window, stream.next())
                    .await
                    .map_err(|_| PlatformError::StreamTimeout {
                        secs: window.as_secs(),
                    })?,
                None => stream.next().await,
            };

            let Some(item) = next else {
                return Ok(());
            };
            let chunk = item?;

            if !chunk.delta.is_empty() {
                if session.state == SessionState::Sending {
                    session.state = SessionState::Streaming;
                }
                session.transcript.append_chunk(&chunk.delta);
                observer(&chunk.delta);
            }

            if chunk.done {
                return Ok(());
            }
        }
    }
}

fn push_failure_reply(session: &mut ChatSession) -> ChatMessage {
    let message = ChatMessage::assistant(FAILURE_REPLY);
    session.transcript.push(message.clone());
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::profile::{AgentProfile, PricingTier};
    use crate::provider::mock::{ScriptStep, ScriptedProvider};

    fn healthcare() -> Arc<AgentProfile> {
        Arc::new(AgentProfile {
            id: "healthcare-assistant".into(),
            name: "Healthcare Assistant".into(),
            description: "AI agent specialized in healthcare workflows".into(),
            category: "Healthcare".into(),
            icon: "🏥".into(),
            capabilities: vec![
                "Patient data analysis".into(),
                "Medical documentation".into(),
                "Appointment scheduling".into(),
                "Symptom assessment".into(),
            ],
            use_cases: vec![
                "Electronic health records".into(),
                "Patient triage".into(),
            ],
            pricing_tier: PricingTier::Pro,
        })
    }

    fn engine(provider: ScriptedProvider) -> ChatEngine {
        ChatEngine::with_defaults(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_successful_turn_appends_user_then_assistant() {
        let engine = engine(ScriptedProvider::with_chunks(["Sure, ", "I can help."]));
        let mut session = ChatSession::new(healthcare());

        let outcome = engine.send(&mut session, "Can you help?").await;

        let SendOutcome::Completed(reply) = outcome else {
            panic!("expected completed turn");
        };
        assert_eq!(reply.content, "Sure, I can help.");
        assert!(!session.is_pending());

        // greeting + user + assistant, all finalized, user before reply
        assert_eq!(session.message_count(), 3);
        let messages: Vec<_> = session.transcript.messages().collect();
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Can you help?");
        assert_eq!(messages[2].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_whitespace_input_is_a_noop() {
        let engine = engine(ScriptedProvider::with_chunks(["unused"]));
        let mut session = ChatSession::new(healthcare());

        let outcome = engine.send(&mut session, "   \n\t").await;

        assert!(matches!(outcome, SendOutcome::Ignored));
        assert_eq!(session.message_count(), 1);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_send_while_pending_is_rejected() {
        let engine = engine(ScriptedProvider::with_chunks(["unused"]));
        let mut session = ChatSession::new(healthcare());
        session.state = SessionState::Sending;

        let before = session.transcript.len();
        let outcome = engine.send(&mut session, "second send").await;

        assert!(matches!(outcome, SendOutcome::Ignored));
        assert_eq!(session.transcript.len(), before);
        assert_eq!(session.state, SessionState::Sending);
    }

    #[tokio::test]
    async fn test_chunks_are_applied_in_delivery_order() {
        let engine = engine(ScriptedProvider::with_chunks(["Hel", "lo"]));
        let mut session = ChatSession::new(healthcare());

        let outcome = engine.send(&mut session, "say hello").await;

        let reply = outcome.reply().expect("reply");
        assert_eq!(reply.content, "Hello");
        // one reply, not one message per chunk
        assert_eq!(session.message_count(), 3);
    }

    #[tokio::test]
    async fn test_failure_before_any_chunk_appends_error_reply() {
        let engine = engine(ScriptedProvider::failing("connection refused"));
        let mut session = ChatSession::new(healthcare());

        let outcome = engine.send(&mut session, "hello?").await;

        let SendOutcome::Recovered(reply) = outcome else {
            panic!("expected recovered turn");
        };
        assert_eq!(reply.content, FAILURE_REPLY);
        assert!(!session.is_pending());
        assert_eq!(session.message_count(), 3);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_partial_reply() {
        let engine = engine(ScriptedProvider::with_script(vec![
            ScriptStep::Delta("Partial ans".into()),
            ScriptStep::Fail("connection reset".into()),
        ]));
        let mut session = ChatSession::new(healthcare());

        let outcome = engine.send(&mut session, "go on").await;

        let SendOutcome::Recovered(reply) = outcome else {
            panic!("expected recovered turn");
        };
        assert_eq!(reply.content, "Partial ans");
        assert!(!session.is_pending());
        assert!(!session.transcript.has_in_progress());
    }

    #[tokio::test]
    async fn test_idle_timeout_follows_failure_path() {
        let provider = ScriptedProvider::with_chunks(["too late"])
            .with_step_delay(Duration::from_millis(200));
        let config = EngineConfig {
            idle_timeout: Some(Duration::from_millis(20)),
            ..EngineConfig::default()
        };
        let engine = ChatEngine::new(Arc::new(provider), config);
        let mut session = ChatSession::new(healthcare());

        let outcome = engine.send(&mut session, "are you there?").await;

        let SendOutcome::Recovered(reply) = outcome else {
            panic!("expected recovered turn");
        };
        assert_eq!(reply.content, FAILURE_REPLY);
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn test_observer_sees_chunks_in_order() {
        let engine = engine(ScriptedProvider::with_chunks(["I can ", "help."]));
        let mut session = ChatSession::new(healthcare());

        let mut seen = Vec::new();
        engine
            .send_observed(&mut session, "what can you do?", |chunk| {
                seen.push(chunk.to_string());
            })
            .await;

        assert_eq!(seen, vec!["I can ".to_string(), "help.".to_string()]);
    }

    #[tokio::test]
    async fn test_request_payload_is_system_prompt_plus_history() {
        let provider = Arc::new(ScriptedProvider::with_chunks(["ok"]));
        let engine = ChatEngine::with_defaults(provider.clone());
        let mut session = ChatSession::new(healthcare());

        engine.send(&mut session, "What can you do?").await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let payload = &requests[0];
        // system prompt, greeting, user message
        assert_eq!(payload.len(), 3);
        assert_eq!(payload[0].role, Role::System);
        assert!(payload[0].content.contains("You are a Healthcare Assistant"));
        assert!(payload[0].content.contains("- Symptom assessment"));
        assert_eq!(payload[2].content, "What can you do?");
    }

    #[tokio::test]
    async fn test_end_to_end_healthcare_scenario() {
        let engine = engine(ScriptedProvider::with_chunks([
            "I can ",
            "help with patient intake.",
        ]));
        let mut session = ChatSession::new(healthcare());

        let greeting = session.transcript.messages().next().unwrap().clone();
        assert!(greeting
            .content
            .contains("patient data analysis, medical documentation, appointment scheduling"));

        let outcome = engine.send(&mut session, "What can you do?").await;

        let SendOutcome::Completed(reply) = outcome else {
            panic!("expected completed turn");
        };
        assert_eq!(reply.content, "I can help with patient intake.");
        assert_ne!(reply.id, greeting.id);
        assert!(!session.is_pending());
    }
}
