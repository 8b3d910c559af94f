//! Application State

use std::sync::Arc;

use verta_catalog::{DeploymentRegistry, Marketplace};
use verta_core::{ChatEngine, LlmProvider};

use crate::sessions::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Ollama, etc.)
    pub provider: Arc<dyn LlmProvider>,

    /// Chat session engine driving every turn
    pub engine: Arc<ChatEngine>,

    /// Agent catalog with marketplace search
    pub marketplace: Arc<Marketplace>,

    /// Deployed agent instances
    pub deployments: Arc<DeploymentRegistry>,

    /// One chat session per deployment
    pub sessions: Arc<SessionRegistry>,
}
