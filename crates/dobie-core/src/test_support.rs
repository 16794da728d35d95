//! Test support utilities for dobie-core
//!
//! Provides MockClient and helpers for exercising the run controller without
//! an orchestration service.

use crate::{PageState, RunController};
use async_trait::async_trait;
use dobie_client::*;
use dobie_config::{BuildFailurePolicy, Endpoint};
use std::sync::{Arc, Mutex};

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    FetchRunStatus { project: String },
    Build { project: String },
    Start { project: String },
    Stop { project: String },
    Delete { project: String },
    FetchNginxConfig { project: String },
    FetchDockerCompose { project: String },
}

impl MockCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            MockCall::FetchRunStatus { .. } => Endpoint::RunStatus,
            MockCall::Build { .. } => Endpoint::Build,
            MockCall::Start { .. } => Endpoint::Start,
            MockCall::Stop { .. } => Endpoint::Stop,
            MockCall::Delete { .. } => Endpoint::Delete,
            MockCall::FetchNginxConfig { .. } => Endpoint::NginxConfig,
            MockCall::FetchDockerCompose { .. } => Endpoint::DockerCompose,
        }
    }
}

/// Configurable in-memory orchestration service
pub struct MockClient {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Result for fetch_run_status calls
    pub status_result: Arc<Mutex<Result<ProjectStatus>>>,
    /// Result for build calls
    pub build_result: Arc<Mutex<Result<BuildOutcome>>>,
    /// Result for start calls
    pub start_result: Arc<Mutex<Result<()>>>,
    /// Result for stop calls
    pub stop_result: Arc<Mutex<Result<()>>>,
    /// Result for delete_project calls
    pub delete_result: Arc<Mutex<Result<()>>>,
    /// Result for fetch_nginx_config calls
    pub nginx_result: Arc<Mutex<Result<String>>>,
    /// Result for fetch_docker_compose calls
    pub compose_result: Arc<Mutex<Result<String>>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    /// Create a mock whose project is stopped and every call succeeds
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            status_result: Arc::new(Mutex::new(Ok(ProjectStatus::new(RunStatus::NotRunning)))),
            build_result: Arc::new(Mutex::new(Ok(BuildOutcome::default()))),
            start_result: Arc::new(Mutex::new(Ok(()))),
            stop_result: Arc::new(Mutex::new(Ok(()))),
            delete_result: Arc::new(Mutex::new(Ok(()))),
            nginx_result: Arc::new(Mutex::new(Ok(
                "server {\n    listen 80;\n}\n".to_string()
            ))),
            compose_result: Arc::new(Mutex::new(Ok(
                "services:\n  app:\n    build: .\n".to_string()
            ))),
        }
    }

    /// Create a mock whose project reports the given run status
    pub fn with_status(status: RunStatus) -> Self {
        let mock = Self::new();
        *mock.status_result.lock().unwrap() = Ok(ProjectStatus::new(status));
        mock
    }

    /// Record a call
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    /// Number of calls that hit `endpoint`
    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }
}

/// Helper to clone a Result<T> from an Arc<Mutex<Result<T>>>
fn clone_result<T: Clone>(r: &Arc<Mutex<Result<T>>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_client_error(e)),
    }
}

/// Clone a ClientError (thiserror types don't implement Clone)
pub fn clone_client_error(e: &ClientError) -> ClientError {
    match e {
        ClientError::Transport { endpoint, .. } => ClientError::Timeout {
            endpoint: *endpoint,
        },
        ClientError::Timeout { endpoint } => ClientError::Timeout {
            endpoint: *endpoint,
        },
        ClientError::Http {
            endpoint,
            status,
            body,
        } => ClientError::Http {
            endpoint: *endpoint,
            status: *status,
            body: body.clone(),
        },
        ClientError::Application {
            endpoint,
            status,
            message,
        } => ClientError::Application {
            endpoint: *endpoint,
            status: status.clone(),
            message: message.clone(),
        },
        ClientError::Decode { endpoint, reason } => ClientError::Decode {
            endpoint: *endpoint,
            reason: reason.clone(),
        },
        ClientError::InvalidProjectId(id) => ClientError::InvalidProjectId(id.clone()),
        ClientError::Config(c) => ClientError::Decode {
            endpoint: Endpoint::RunStatus,
            reason: format!("config error (cloned): {}", c),
        },
    }
}

/// Envelope status other than `SUCCESS`
pub fn rejected(endpoint: Endpoint) -> ClientError {
    ClientError::Application {
        endpoint,
        status: "ERROR".to_string(),
        message: None,
    }
}

/// Connection-level failure
pub fn unreachable(endpoint: Endpoint) -> ClientError {
    ClientError::Http {
        endpoint,
        status: 503,
        body: String::new(),
    }
}

/// Fresh page state for project `p1`
pub fn test_state(policy: BuildFailurePolicy) -> PageState {
    PageState::new(Project::new(ProjectId::new("p1"), "shop"), policy)
}

/// Controller over `mock` with the page already mounted
pub async fn mounted_controller(
    mock: Arc<MockClient>,
    policy: BuildFailurePolicy,
) -> RunController<MockClient> {
    let mut controller = RunController::new(mock, test_state(policy));
    controller.dispatch(crate::Msg::Mount).await;
    controller
}

#[async_trait]
impl StatusClient for MockClient {
    async fn fetch_run_status(&self, project: &ProjectId) -> Result<ProjectStatus> {
        self.record(MockCall::FetchRunStatus {
            project: project.0.clone(),
        });
        clone_result(&self.status_result)
    }
}

#[async_trait]
impl ActionClient for MockClient {
    async fn build(&self, project: &ProjectId) -> Result<BuildOutcome> {
        self.record(MockCall::Build {
            project: project.0.clone(),
        });
        clone_result(&self.build_result)
    }

    async fn start(&self, project: &ProjectId) -> Result<()> {
        self.record(MockCall::Start {
            project: project.0.clone(),
        });
        clone_result(&self.start_result)
    }

    async fn stop(&self, project: &ProjectId) -> Result<()> {
        self.record(MockCall::Stop {
            project: project.0.clone(),
        });
        clone_result(&self.stop_result)
    }

    async fn delete_project(&self, project: &ProjectId) -> Result<()> {
        self.record(MockCall::Delete {
            project: project.0.clone(),
        });
        clone_result(&self.delete_result)
    }

    async fn fetch_nginx_config(&self, project: &ProjectId) -> Result<String> {
        self.record(MockCall::FetchNginxConfig {
            project: project.0.clone(),
        });
        clone_result(&self.nginx_result)
    }

    async fn fetch_docker_compose(&self, project: &ProjectId) -> Result<String> {
        self.record(MockCall::FetchDockerCompose {
            project: project.0.clone(),
        });
        clone_result(&self.compose_result)
    }
}
