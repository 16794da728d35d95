//! Error types for dobie-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] dobie_config::ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] dobie_client::ClientError),

    #[error("Ambiguous project reference '{query}', matches: {}", .matches.join(", "))]
    AmbiguousProject { query: String, matches: Vec<String> },
}

pub type Result<T> = std::result::Result<T, CoreError>;
