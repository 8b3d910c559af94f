//! Server-side Session Registry
//!
//! One chat session per deployment, created lazily on first use and
//! discarded with the deployment. Each session sits behind its own async
//! mutex: the holder of the lock is the single in-flight turn, and a
//! failed `try_lock` is how a concurrent send gets rejected at the
//! calling surface.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use uuid::Uuid;

use verta_catalog::Deployment;
use verta_core::ChatSession;

/// In-memory map of live chat sessions
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<ChatSession>>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get the session for a deployment, seeding it with the agent's
    /// greeting on first access
    pub fn get_or_create(&self, deployment: &Deployment) -> Arc<Mutex<ChatSession>> {
        if let Some(session) = self
            .sessions
            .read()
            .expect("session lock")
            .get(&deployment.id)
        {
            return session.clone();
        }

        let mut sessions = self.sessions.write().expect("session lock");
        sessions
            .entry(deployment.id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(ChatSession::new(Arc::new(
                    deployment.profile.clone(),
                ))))
            })
            .clone()
    }

    /// Discard the session for a deployment, if any
    pub fn remove(&self, deployment_id: Uuid) {
        self.sessions
            .write()
            .expect("session lock")
            .remove(&deployment_id);
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.read().expect("session lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verta_catalog::builtin_agents;

    fn sample_deployment() -> Deployment {
        Deployment::new(builtin_agents().remove(0), None)
    }

    #[tokio::test]
    async fn test_session_is_created_once() {
        let registry = SessionRegistry::new();
        let deployment = sample_deployment();

        let first = registry.get_or_create(&deployment);
        let second = registry.get_or_create(&deployment);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        let session = first.lock().await;
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn test_remove_discards_session() {
        let registry = SessionRegistry::new();
        let deployment = sample_deployment();

        registry.get_or_create(&deployment);
        registry.remove(deployment.id);
        assert!(registry.is_empty());
    }
}
