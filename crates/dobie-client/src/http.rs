//! HTTP implementation of the orchestration clients

use crate::decode::{decode, Payload};
use crate::{
    ActionClient, BuildOutcome, ClientError, ProjectId, ProjectStatus, Result, StatusClient,
};
use async_trait::async_trait;
use dobie_config::{ConfigError, Endpoint, EndpointsConfig, GlobalConfig, ResponseFormat};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

const PROJECT_ID_PARAM: &str = "projectId";

/// Orchestration service reached over HTTP
pub struct HttpOrchestrator {
    client: Client,
    base_url: Url,
    endpoints: EndpointsConfig,
    compose_format: ResponseFormat,
}

impl HttpOrchestrator {
    pub fn new(config: &GlobalConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.server.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.server_url()?,
            endpoints: config.endpoints.clone(),
            compose_format: config.behavior.compose_response,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of an endpoint. Paths are appended to the base URL so a base
    /// with a path prefix (`https://host/api`) keeps it.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        let path = &self.endpoints.get(endpoint).path;
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| {
            ClientError::Config(ConfigError::InvalidServerUrl {
                url: joined,
                reason: e.to_string(),
            })
        })
    }

    fn format_for(&self, endpoint: Endpoint) -> ResponseFormat {
        match endpoint {
            Endpoint::DockerCompose => self.compose_format,
            _ => ResponseFormat::Envelope,
        }
    }

    async fn call(&self, endpoint: Endpoint, project: &ProjectId) -> Result<Payload> {
        let cfg = self.endpoints.get(endpoint);
        let method = cfg
            .http_method()
            .map_err(|method| ConfigError::InvalidMethod {
                endpoint: endpoint.key().to_string(),
                method,
            })?;
        let url = self.endpoint_url(endpoint)?;

        tracing::debug!("{} {} ({}={})", method, url, PROJECT_ID_PARAM, project);

        let response = self
            .client
            .request(method, url)
            .query(&[(PROJECT_ID_PARAM, project.as_ref())])
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(endpoint, e))?;

        let status: StatusCode = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(endpoint, e))?;

        tracing::debug!("{} answered HTTP {} ({} bytes)", endpoint, status, body.len());

        decode(endpoint, self.format_for(endpoint), status, body)
    }
}

#[async_trait]
impl StatusClient for HttpOrchestrator {
    async fn fetch_run_status(&self, project: &ProjectId) -> Result<ProjectStatus> {
        self.call(Endpoint::RunStatus, project)
            .await?
            .into_typed(Endpoint::RunStatus)
    }
}

#[async_trait]
impl ActionClient for HttpOrchestrator {
    async fn build(&self, project: &ProjectId) -> Result<BuildOutcome> {
        let data = self
            .call(Endpoint::Build, project)
            .await?
            .into_typed::<serde_json::Value>(Endpoint::Build)?;
        Ok(BuildOutcome { data })
    }

    async fn start(&self, project: &ProjectId) -> Result<()> {
        self.call(Endpoint::Start, project).await.map(|_| ())
    }

    async fn stop(&self, project: &ProjectId) -> Result<()> {
        self.call(Endpoint::Stop, project).await.map(|_| ())
    }

    async fn delete_project(&self, project: &ProjectId) -> Result<()> {
        self.call(Endpoint::Delete, project).await.map(|_| ())
    }

    async fn fetch_nginx_config(&self, project: &ProjectId) -> Result<String> {
        self.call(Endpoint::NginxConfig, project)
            .await?
            .into_text(Endpoint::NginxConfig)
    }

    async fn fetch_docker_compose(&self, project: &ProjectId) -> Result<String> {
        self.call(Endpoint::DockerCompose, project)
            .await?
            .into_text(Endpoint::DockerCompose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator(base: &str) -> HttpOrchestrator {
        let mut config = GlobalConfig::default();
        config.server.base_url = base.to_string();
        HttpOrchestrator::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = orchestrator("https://deploy.example.com/api/");
        assert_eq!(
            client.endpoint_url(Endpoint::RunStatus).unwrap().as_str(),
            "https://deploy.example.com/api/containercheck/proceeding"
        );
    }

    #[test]
    fn test_compose_uses_configured_format() {
        let client = orchestrator("http://localhost:8080");
        assert_eq!(client.format_for(Endpoint::DockerCompose), ResponseFormat::Raw);
        assert_eq!(client.format_for(Endpoint::NginxConfig), ResponseFormat::Envelope);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GlobalConfig::default();
        config.server.base_url = "localhost".to_string();
        assert!(matches!(
            HttpOrchestrator::new(&config),
            Err(ClientError::Config(_))
        ));
    }
}
