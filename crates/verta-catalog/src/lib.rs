//! # verta-catalog
//!
//! The vertical agent catalog: the platform's built-in agents, marketplace
//! search over them, and the in-memory registry of agents a user has
//! deployed.
//!
//! Nothing here persists. The catalog is static launch data and
//! deployments live for the lifetime of the process, which is exactly the
//! product's contract: browse, deploy, chat, walk away.

pub mod agents;
pub mod deployment;
pub mod error;
pub mod marketplace;

pub use agents::builtin_agents;
pub use deployment::{Deployment, DeploymentRegistry, DeploymentStatus};
pub use error::{CatalogError, Result};
pub use marketplace::Marketplace;
