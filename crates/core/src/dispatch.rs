//! Submission of prompts to the remote generation endpoint.
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::EndpointConfig;
use crate::credential::Credential;
use crate::mode::Mode;
use crate::normalize::normalize_output;

/// Failure of a single submission round trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        SubmitError::Transport(e.to_string())
    }
}

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitRequest {
    pub prompt: String,
    #[serde(rename = "type")]
    pub mode: Mode,
}

impl SubmitRequest {
    pub fn new(prompt: impl Into<String>, mode: Mode) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
        }
    }
}

/// Produces display text for a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Performs one round trip and returns the normalized output.
    async fn generate(
        &self,
        request: &SubmitRequest,
        credential: &Credential,
    ) -> Result<String, SubmitError>;
}

/// Generator backed by the remote HTTP endpoint.
#[derive(Debug)]
pub struct HttpGenerator {
    endpoint: EndpointConfig,
    client: Client,
}

impl HttpGenerator {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self, SubmitError> {
        let mut builder = Client::builder();
        if let Some(timeout) = endpoint.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            endpoint: endpoint.clone(),
            client: builder.build()?,
        })
    }
}

/// Extracts the `output` field of a response body.
fn parse_output(body: &str) -> Result<Value, SubmitError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SubmitError::MalformedResponse(format!("invalid JSON: {e}")))?;
    match value {
        Value::Object(mut fields) => fields
            .remove("output")
            .ok_or_else(|| SubmitError::MalformedResponse("missing `output` field".to_string())),
        _ => Err(SubmitError::MalformedResponse(
            "expected a JSON object".to_string(),
        )),
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    #[instrument(skip(self, credential), fields(mode = %request.mode))]
    async fn generate(
        &self,
        request: &SubmitRequest,
        credential: &Credential,
    ) -> Result<String, SubmitError> {
        let start = Instant::now();
        let mut builder = self.client.post(self.endpoint.url.clone()).json(request);
        if let Some(token) = credential.token() {
            builder = builder.header(self.endpoint.token_header.as_str(), token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Received response"
        );

        if !status.is_success() {
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let output = parse_output(&body)?;
        Ok(normalize_output(&output))
    }
}
