//! Wire and domain types shared by the clients and the controller

use crate::{ClientError, Result};
use dobie_config::Endpoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Opaque project identifier assigned by the orchestration service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate user input: surrounding whitespace is dropped, empty ids are rejected
    pub fn parse(id: &str) -> Result<Self> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidProjectId(id.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A deployable unit managed by the orchestration service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Aggregate run state of a project's containers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Every container is up (`"Run"` on the wire)
    Running,
    /// Not running, or not known to be running (`"null"`, JSON null, or absent)
    #[default]
    NotRunning,
    /// Any other value the service reports, kept verbatim
    Other(String),
}

impl RunStatus {
    pub const RUNNING: &'static str = "Run";
    pub const NOT_RUNNING: &'static str = "null";

    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some(Self::RUNNING) => Self::Running,
            None | Some(Self::NOT_RUNNING) | Some("") => Self::NotRunning,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Running => Self::RUNNING,
            Self::NotRunning => Self::NOT_RUNNING,
            Self::Other(s) => s,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_wire(value.as_deref()))
    }
}

/// Payload of the run status endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatus {
    #[serde(rename = "allRunning", default)]
    pub all_running: RunStatus,
    /// Remaining fields (per-service state and the like), shown as-is
    #[serde(flatten)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl ProjectStatus {
    pub fn new(all_running: RunStatus) -> Self {
        Self {
            all_running,
            details: BTreeMap::new(),
        }
    }
}

/// Result of an accepted build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutcome {
    pub data: serde_json::Value,
}

impl BuildOutcome {
    /// Server-provided message, when the payload is a plain string
    pub fn message(&self) -> Option<&str> {
        self.data.as_str()
    }
}

/// Generated files that can be viewed for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Nginx,
    DockerCompose,
}

impl FileKind {
    pub fn all() -> &'static [FileKind] {
        &[FileKind::Nginx, FileKind::DockerCompose]
    }

    /// Marker the page uses to tag modal content
    pub fn tag(&self) -> &'static str {
        match self {
            FileKind::Nginx => "nginx",
            FileKind::DockerCompose => "dockerCompose",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            FileKind::Nginx => "nginx.conf",
            FileKind::DockerCompose => "docker-compose.yml",
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            FileKind::Nginx => Endpoint::NginxConfig,
            FileKind::DockerCompose => Endpoint::DockerCompose,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Response envelope used by the orchestration service
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    pub const SUCCESS: &'static str = "SUCCESS";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_wire_values() {
        assert_eq!(RunStatus::from_wire(Some("Run")), RunStatus::Running);
        assert_eq!(RunStatus::from_wire(Some("null")), RunStatus::NotRunning);
        assert_eq!(RunStatus::from_wire(None), RunStatus::NotRunning);
        assert_eq!(
            RunStatus::from_wire(Some("Partial")),
            RunStatus::Other("Partial".to_string())
        );
        assert_eq!(RunStatus::Other("Partial".into()).as_wire(), "Partial");
    }

    #[test]
    fn test_project_status_from_json() {
        let status: ProjectStatus =
            serde_json::from_str(r#"{"allRunning":"Run","backend":"running"}"#).unwrap();
        assert!(status.all_running.is_running());
        assert_eq!(status.details["backend"], "running");

        let status: ProjectStatus = serde_json::from_str(r#"{"allRunning":null}"#).unwrap();
        assert_eq!(status.all_running, RunStatus::NotRunning);

        let status: ProjectStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(status.all_running, RunStatus::NotRunning);
    }

    #[test]
    fn test_project_id_parse() {
        assert_eq!(ProjectId::parse("  p1 ").unwrap(), ProjectId::new("p1"));
        assert!(matches!(
            ProjectId::parse("   "),
            Err(ClientError::InvalidProjectId(_))
        ));
    }

    #[test]
    fn test_file_kind_tags() {
        assert_eq!(FileKind::Nginx.tag(), "nginx");
        assert_eq!(FileKind::DockerCompose.tag(), "dockerCompose");
        assert_eq!(FileKind::DockerCompose.endpoint(), Endpoint::DockerCompose);
    }

    #[test]
    fn test_build_outcome_message() {
        let outcome = BuildOutcome {
            data: serde_json::json!("image built"),
        };
        assert_eq!(outcome.message(), Some("image built"));
        assert_eq!(BuildOutcome::default().message(), None);
    }
}
