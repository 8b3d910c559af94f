//! # verta-runtime
//!
//! Runtime providers for the Verta platform.
//!
//! ## Providers
//!
//! - **Ollama** (default): Local LLM inference via Ollama
//! - **Scripted** (re-exported from core): replayed streams for tests and
//!   offline demos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use verta_runtime::OllamaProvider;
//!
//! let provider = OllamaProvider::from_env();
//! let engine = ChatEngine::with_defaults(Arc::new(provider));
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;

// Re-export core types for convenience
pub use verta_core::{
    ChatEngine, ChatSession, GenerationOptions, LlmProvider, PlatformError, PromptMessage,
    Result, SendOutcome,
};
pub use verta_core::provider::ScriptedProvider;
