//! # verta-core
//!
//! Core chat engine for the Verta vertical agent platform: provider-agnostic
//! LLM streaming and an append-only conversation transcript.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ChatEngine                              │
//! │  ┌─────────────┐  ┌──────────────┐  ┌──────────────────┐    │
//! │  │ ChatSession │  │  Transcript  │  │   LlmProvider    │    │
//! │  │ (per view)  │──│ (reconciler) │──│   (Strategy)     │    │
//! │  └─────────────┘  └──────────────┘  └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ChatSession` owns the ordered transcript for one deployed agent.
//! `ChatEngine::send` appends the user turn, streams the reply from the
//! `LlmProvider`, and reconciles chunks into a single in-progress entry
//! that is finalized atomically at stream end. Provider failures are
//! contained within the turn; the session always returns to idle.

pub mod engine;
pub mod error;
pub mod message;
pub mod profile;
pub mod provider;
pub mod session;
pub mod transcript;

pub use engine::{ChatEngine, EngineConfig, SendOutcome};
pub use error::{PlatformError, Result};
pub use message::{ChatMessage, MessageId, Role};
pub use profile::{AgentProfile, PricingTier};
pub use provider::{GenerationOptions, LlmProvider, PromptMessage, StreamChunk};
pub use session::{ChatSession, SessionId, SessionState};
pub use transcript::{Transcript, TranscriptEntry};
