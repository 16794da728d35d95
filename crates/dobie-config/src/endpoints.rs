//! Endpoint routing for the orchestration service
//!
//! Every operation is project-scoped: the client appends `projectId` as a
//! query parameter to the configured path.

use crate::{ConfigError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Operations exposed by the orchestration service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    RunStatus,
    Build,
    Start,
    Stop,
    Delete,
    NginxConfig,
    DockerCompose,
}

impl Endpoint {
    pub fn all() -> &'static [Endpoint] {
        &[
            Endpoint::RunStatus,
            Endpoint::Build,
            Endpoint::Start,
            Endpoint::Stop,
            Endpoint::Delete,
            Endpoint::NginxConfig,
            Endpoint::DockerCompose,
        ]
    }

    /// Key used in the `[endpoints]` table
    pub fn key(&self) -> &'static str {
        match self {
            Endpoint::RunStatus => "status",
            Endpoint::Build => "build",
            Endpoint::Start => "start",
            Endpoint::Stop => "stop",
            Endpoint::Delete => "delete",
            Endpoint::NginxConfig => "nginx",
            Endpoint::DockerCompose => "compose",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// HTTP method and path of one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub method: String,
    pub path: String,
}

impl EndpointConfig {
    fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    /// Parse the configured method. Only the verbs the service uses are accepted.
    pub fn http_method(&self) -> std::result::Result<Method, String> {
        match self.method.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(self.method.clone()),
        }
    }
}

/// Per-operation endpoint table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub status: EndpointConfig,
    pub build: EndpointConfig,
    pub start: EndpointConfig,
    pub stop: EndpointConfig,
    pub delete: EndpointConfig,
    pub nginx: EndpointConfig,
    pub compose: EndpointConfig,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            status: EndpointConfig::new("GET", "/containercheck/proceeding"),
            build: EndpointConfig::new("POST", "/project/build"),
            start: EndpointConfig::new("POST", "/project/start"),
            stop: EndpointConfig::new("POST", "/project/stop"),
            delete: EndpointConfig::new("DELETE", "/project/delete"),
            nginx: EndpointConfig::new("GET", "/nginx/conf"),
            compose: EndpointConfig::new("GET", "/docker/compose"),
        }
    }
}

impl EndpointsConfig {
    pub fn get(&self, endpoint: Endpoint) -> &EndpointConfig {
        match endpoint {
            Endpoint::RunStatus => &self.status,
            Endpoint::Build => &self.build,
            Endpoint::Start => &self.start,
            Endpoint::Stop => &self.stop,
            Endpoint::Delete => &self.delete,
            Endpoint::NginxConfig => &self.nginx,
            Endpoint::DockerCompose => &self.compose,
        }
    }

    /// Check that every method parses and every path is absolute
    pub fn validate(&self) -> Result<()> {
        for endpoint in Endpoint::all() {
            let cfg = self.get(*endpoint);
            cfg.http_method().map_err(|method| ConfigError::InvalidMethod {
                endpoint: endpoint.key().to_string(),
                method,
            })?;
            if !cfg.path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "endpoint '{}' path must start with '/': {}",
                    endpoint, cfg.path
                )));
            }
        }
        Ok(())
    }
}
