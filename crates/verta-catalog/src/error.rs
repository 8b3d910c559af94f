//! Error Types for the Catalog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Deployment not found: {0}")]
    DeploymentNotFound(String),
}
