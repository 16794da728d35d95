//! Global configuration for dobie
//!
//! Located at `~/.config/dobie/config.toml`

use crate::{ConfigError, EndpointsConfig, Result};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding `server.base_url`
pub const SERVER_ENV: &str = "DOBIE_SERVER";

/// Global dobie configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub server: ServerConfig,
    pub endpoints: EndpointsConfig,
    pub behavior: BehaviorConfig,
    pub projects: Vec<ProjectEntry>,
}

/// Orchestration server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL every endpoint path is joined onto
    pub base_url: String,
    /// Request timeout in seconds. Builds run synchronously on the server,
    /// so this has to cover a full image build.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 300,
        }
    }
}

/// What the page does when a build is rejected or fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildFailurePolicy {
    /// Hide the progress indicator and show an error notice
    #[default]
    Notify,
    /// Log only; the progress indicator stays up
    Silent,
}

/// How a response body is turned into a result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `{ "status": "SUCCESS", "data": ... }`; the `status` field decides success
    #[default]
    Envelope,
    /// Unwrapped body; any 2xx HTTP status is success
    Raw,
}

/// Page behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub build_failure: BuildFailurePolicy,
    /// The compose endpoint answers with the bare file by default
    pub compose_response: ResponseFormat,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            build_failure: BuildFailurePolicy::Notify,
            compose_response: ResponseFormat::Raw,
        }
    }
}

/// A project known to this machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
}

impl GlobalConfig {
    /// Load global configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load global configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(
            "Loaded config from {:?}: server={}, {} project(s)",
            path,
            config.server.base_url,
            config.projects.len()
        );

        Ok(config)
    }

    /// Apply overrides from the environment; `lookup` is `std::env::var` outside tests
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(server) = lookup(SERVER_ENV).filter(|s| !s.trim().is_empty()) {
            tracing::debug!("{} overrides server URL: {}", SERVER_ENV, server);
            self.server.base_url = server;
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.clone(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "dobie").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Parsed server base URL
    pub fn server_url(&self) -> Result<Url> {
        let url = Url::parse(&self.server.base_url).map_err(|e| ConfigError::InvalidServerUrl {
            url: self.server.base_url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidServerUrl {
                url: self.server.base_url.clone(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// Validate everything the client needs before the first request
    pub fn validate(&self) -> Result<()> {
        self.server_url()?;
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.endpoints.validate()?;
        for project in &self.projects {
            if project.id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "project '{}' has an empty id",
                    project.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8080");
        assert_eq!(config.behavior.build_failure, BuildFailurePolicy::Notify);
        assert_eq!(config.behavior.compose_response, ResponseFormat::Raw);
        assert!(config.projects.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[server]
base_url = "https://dobie.example.com/api"
timeout_secs = 30

[endpoints.stop]
method = "PUT"
path = "/project/stop"

[behavior]
build_failure = "silent"
compose_response = "envelope"

[[projects]]
id = "p1"
name = "shop"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.base_url, "https://dobie.example.com/api");
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(config.endpoints.stop.method, "PUT");
        // untouched endpoints keep their defaults
        assert_eq!(config.endpoints.build.path, "/project/build");
        assert_eq!(config.behavior.build_failure, BuildFailurePolicy::Silent);
        assert_eq!(config.behavior.compose_response, ResponseFormat::Envelope);
        assert_eq!(
            config.projects,
            vec![ProjectEntry {
                id: "p1".to_string(),
                name: "shop".to_string()
            }]
        );
    }

    #[test]
    fn test_env_overrides_server() {
        let mut config = GlobalConfig::default();
        config.apply_env(|key| {
            (key == SERVER_ENV).then(|| "http://10.0.0.5:9000".to_string())
        });
        assert_eq!(config.server.base_url, "http://10.0.0.5:9000");

        // blank values are ignored
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.server.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn test_invalid_server_url() {
        let mut config = GlobalConfig::default();
        config.server.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidServerUrl { .. })
        ));

        config.server.base_url = "not a url".to_string();
        assert!(config.server_url().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = GlobalConfig::default();
        config.server.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = GlobalConfig::default();
        config.projects.push(ProjectEntry {
            id: "abc".to_string(),
            name: "blog".to_string(),
        });
        config.save_to(&path).unwrap();

        let loaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(loaded.projects, config.projects);
        assert_eq!(loaded.endpoints, config.endpoints);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GlobalConfig::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.timeout_secs, 300);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[server\nbase_url=").unwrap();
        match GlobalConfig::load_from(&path) {
            Err(ConfigError::TomlParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
