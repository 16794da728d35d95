//! Orchestration service clients for dobie
//!
//! The orchestration service owns builds, containers and generated files.
//! This crate exposes the two contracts the run page needs from it:
//! [`StatusClient`] for the aggregate run status and [`ActionClient`] for
//! commands and file retrieval, plus the HTTP implementation.

pub mod decode;
mod error;
mod http;
mod types;

pub use error::*;
pub use http::HttpOrchestrator;
pub use types::*;

use async_trait::async_trait;
use dobie_config::GlobalConfig;

/// Reads the current run status of a project
#[async_trait]
pub trait StatusClient: Send + Sync {
    async fn fetch_run_status(&self, project: &ProjectId) -> Result<ProjectStatus>;
}

/// Commands and file lookups for a project
#[async_trait]
pub trait ActionClient: Send + Sync {
    /// Build images; the service answers once the build has finished
    async fn build(&self, project: &ProjectId) -> Result<BuildOutcome>;

    /// Start every container of the project
    async fn start(&self, project: &ProjectId) -> Result<()>;

    /// Stop every container of the project
    async fn stop(&self, project: &ProjectId) -> Result<()>;

    /// Delete the project. Irreversible; callers confirm with the user first.
    async fn delete_project(&self, project: &ProjectId) -> Result<()>;

    async fn fetch_nginx_config(&self, project: &ProjectId) -> Result<String>;

    async fn fetch_docker_compose(&self, project: &ProjectId) -> Result<String>;

    /// Fetch a generated file by kind
    async fn fetch_file(&self, project: &ProjectId, kind: FileKind) -> Result<String> {
        match kind {
            FileKind::Nginx => self.fetch_nginx_config(project).await,
            FileKind::DockerCompose => self.fetch_docker_compose(project).await,
        }
    }
}

/// Both contracts, as held by the run controller
pub trait OrchestratorClient: StatusClient + ActionClient {}

impl<T: StatusClient + ActionClient + ?Sized> OrchestratorClient for T {}

/// Create the HTTP client described by the global config
pub fn create_client(config: &GlobalConfig) -> Result<Box<dyn OrchestratorClient>> {
    let client = HttpOrchestrator::new(config)?;
    tracing::debug!("Using orchestration service at {}", client.base_url());
    Ok(Box::new(client))
}
