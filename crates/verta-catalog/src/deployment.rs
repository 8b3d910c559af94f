//! Deployments
//!
//! A deployment is a user's running instance of a catalog agent. The
//! registry is process-local state: deploying adds an entry, tearing the
//! deployment down removes it, and restarting the process starts empty.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use verta_core::AgentProfile;

use crate::error::{CatalogError, Result};

/// Deployment lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Active,
    Paused,
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentStatus::Active => write!(f, "active"),
            DeploymentStatus::Paused => write!(f, "paused"),
        }
    }
}

/// A deployed agent instance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deployment {
    /// Unique deployment identifier
    pub id: Uuid,

    /// The catalog profile this instance runs
    pub profile: AgentProfile,

    /// User-visible instance name
    pub name: String,

    /// Lifecycle status
    pub status: DeploymentStatus,

    /// When the agent was deployed
    pub created_at: DateTime<Utc>,
}

impl Deployment {
    /// Deploy a profile, defaulting the instance name to "My {agent}"
    pub fn new(profile: AgentProfile, name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| format!("My {}", profile.name));
        Self {
            id: Uuid::new_v4(),
            profile,
            name,
            status: DeploymentStatus::Active,
            created_at: Utc::now(),
        }
    }
}

/// In-memory deployment registry
pub struct DeploymentRegistry {
    deployments: RwLock<HashMap<Uuid, Deployment>>,
}

impl Default for DeploymentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeploymentRegistry {
    pub fn new() -> Self {
        Self {
            deployments: RwLock::new(HashMap::new()),
        }
    }

    /// Deploy an agent and return the new instance
    pub fn deploy(&self, profile: AgentProfile, name: Option<String>) -> Deployment {
        let deployment = Deployment::new(profile, name);
        tracing::info!(
            deployment = %deployment.id,
            agent = %deployment.profile.id,
            "agent deployed"
        );

        let mut deployments = self.deployments.write().expect("registry lock");
        deployments.insert(deployment.id, deployment.clone());
        deployment
    }

    /// Look up a deployment
    pub fn get(&self, id: Uuid) -> Result<Deployment> {
        let deployments = self.deployments.read().expect("registry lock");
        deployments
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::DeploymentNotFound(id.to_string()))
    }

    /// All deployments, newest first
    pub fn list(&self) -> Vec<Deployment> {
        let deployments = self.deployments.read().expect("registry lock");
        let mut result: Vec<_> = deployments.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    /// Update a deployment's status
    pub fn set_status(&self, id: Uuid, status: DeploymentStatus) -> Result<Deployment> {
        let mut deployments = self.deployments.write().expect("registry lock");
        let deployment = deployments
            .get_mut(&id)
            .ok_or_else(|| CatalogError::DeploymentNotFound(id.to_string()))?;
        deployment.status = status;
        Ok(deployment.clone())
    }

    /// Tear a deployment down
    pub fn remove(&self, id: Uuid) -> Result<Deployment> {
        let mut deployments = self.deployments.write().expect("registry lock");
        deployments
            .remove(&id)
            .ok_or_else(|| CatalogError::DeploymentNotFound(id.to_string()))
    }

    /// Number of deployments
    pub fn len(&self) -> usize {
        self.deployments.read().expect("registry lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::builtin_agents;

    fn sample_profile() -> AgentProfile {
        builtin_agents().remove(0)
    }

    #[test]
    fn test_deploy_defaults_name_and_status() {
        let registry = DeploymentRegistry::new();
        let deployment = registry.deploy(sample_profile(), None);

        assert_eq!(deployment.name, "My Healthcare Assistant");
        assert_eq!(deployment.status, DeploymentStatus::Active);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_and_remove() {
        let registry = DeploymentRegistry::new();
        let deployment = registry.deploy(sample_profile(), Some("Ward 3".into()));

        let found = registry.get(deployment.id).unwrap();
        assert_eq!(found.name, "Ward 3");

        registry.remove(deployment.id).unwrap();
        assert!(registry.get(deployment.id).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let registry = DeploymentRegistry::new();
        let first = registry.deploy(sample_profile(), None);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = registry.deploy(sample_profile(), None);

        let listed = registry.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn test_set_status() {
        let registry = DeploymentRegistry::new();
        let deployment = registry.deploy(sample_profile(), None);

        let updated = registry
            .set_status(deployment.id, DeploymentStatus::Paused)
            .unwrap();
        assert_eq!(updated.status, DeploymentStatus::Paused);
    }
}
