//! Turning HTTP responses into results
//!
//! Every response goes through [`decode`], whichever shape the endpoint uses.
//! A non-2xx status is always a transport failure. After that, enveloped
//! endpoints succeed only when `status == "SUCCESS"`; raw endpoints succeed
//! on any 2xx and hand the body back untouched.

use crate::{ApiResponse, ClientError, Result};
use dobie_config::{Endpoint, ResponseFormat};
use reqwest::StatusCode;

/// A successful response body, in the shape the endpoint produced it
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `data` of a `SUCCESS` envelope
    Data(serde_json::Value),
    /// Unwrapped body text
    Raw(String),
}

impl Payload {
    /// Interpret the payload as file text
    pub fn into_text(self, endpoint: Endpoint) -> Result<String> {
        match self {
            Payload::Raw(text) => Ok(text),
            Payload::Data(serde_json::Value::String(text)) => Ok(text),
            Payload::Data(other) => Err(ClientError::Decode {
                endpoint,
                reason: format!("expected text payload, got {}", json_type(&other)),
            }),
        }
    }

    /// Deserialize an enveloped payload into `T`
    pub fn into_typed<T: serde::de::DeserializeOwned>(self, endpoint: Endpoint) -> Result<T> {
        let value = match self {
            Payload::Data(value) => value,
            Payload::Raw(text) => {
                serde_json::from_str(&text).map_err(|e| ClientError::Decode {
                    endpoint,
                    reason: e.to_string(),
                })?
            }
        };
        serde_json::from_value(value).map_err(|e| ClientError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

pub fn decode(
    endpoint: Endpoint,
    format: ResponseFormat,
    status: StatusCode,
    body: String,
) -> Result<Payload> {
    if !status.is_success() {
        return Err(ClientError::Http {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    match format {
        ResponseFormat::Raw => Ok(Payload::Raw(body)),
        ResponseFormat::Envelope => {
            let envelope: ApiResponse =
                serde_json::from_str(&body).map_err(|e| ClientError::Decode {
                    endpoint,
                    reason: format!("invalid response envelope: {}", e),
                })?;
            if envelope.is_success() {
                Ok(Payload::Data(envelope.data))
            } else {
                Err(ClientError::Application {
                    endpoint,
                    status: envelope.status,
                    message: envelope.message,
                })
            }
        }
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
