//! Error types for orchestration service calls

use dobie_config::{ConfigError, Endpoint};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Timeout waiting for {endpoint}")]
    Timeout { endpoint: Endpoint },

    #[error("{endpoint} returned HTTP {status}")]
    Http {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("{endpoint} reported status {status}{}", detail(.message))]
    Application {
        endpoint: Endpoint,
        status: String,
        message: Option<String>,
    },

    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: Endpoint, reason: String },

    #[error("Invalid project id: {0:?}")]
    InvalidProjectId(String),

    #[error("Client configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Coarse classification used by callers that only care where a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout, or non-2xx HTTP status
    Transport,
    /// HTTP 200 with an envelope status other than `SUCCESS`
    Application,
    /// Body could not be understood
    Decode,
    /// Local misconfiguration; the request was never sent
    Config,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } | Self::Http { .. } => {
                ErrorKind::Transport
            }
            Self::Application { .. } => ErrorKind::Application,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidProjectId(_) | Self::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub(crate) fn from_reqwest(endpoint: Endpoint, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { endpoint }
        } else {
            Self::Transport { endpoint, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
