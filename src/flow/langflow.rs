//! Langflow client for the `run` endpoint.
//!
//! One request per user message, no streaming:
//! `POST {base_url}/api/v1/run/{flow_id}` with a chat-typed body. Each attempt
//! runs under its own timeout and failed attempts are retried according to
//! the [`RetryPolicy`].

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

use crate::core::config::ResolvedConfig;
use crate::flow::envelope;
use crate::flow::{FlowClient, FlowError, FlowReply, RetryPolicy, RunRequest, new_session_id};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Langflow API client.
pub struct LangflowClient {
    base_url: String,
    flow_id: String,
    api_key: String,
    bearer_token: String,
    retry: RetryPolicy,
    timeout: Duration,
    client: reqwest::Client,
}

impl LangflowClient {
    /// Creates a client with the default retry policy and a 30s per-attempt timeout.
    ///
    /// # Arguments
    /// * `base_url` - Langflow server root, e.g. `https://flows.example.com`
    /// * `flow_id` - Flow to run
    /// * `api_key` - Sent as `x-api-key`
    /// * `bearer_token` - Sent as `Authorization: Bearer ...`
    pub fn new(base_url: String, flow_id: String, api_key: String, bearer_token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            flow_id,
            api_key,
            bearer_token,
            retry: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.flow_id.clone(),
            config.api_key.clone(),
            config.bearer_token.clone(),
        )
        .with_max_retries(config.max_retries)
        .with_timeout(config.timeout)
    }

    pub fn with_flow_id(mut self, flow_id: impl Into<String>) -> Self {
        self.flow_id = flow_id.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn run_url(&self) -> String {
        format!("{}/api/v1/run/{}", self.base_url, self.flow_id)
    }

    /// A single attempt: POST, status check, JSON parse, reply extraction.
    async fn attempt(&self, url: &str, body: &RunRequest) -> Result<FlowReply, FlowError> {
        let request = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .bearer_auth(&self.bearer_token)
            .json(body);

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| FlowError::Network(e.to_string()))?;

            let status = response.status();
            debug!("Langflow response status: {}", status);

            if !status.is_success() {
                let err_body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                warn!("Langflow API error: {} - {}", status.as_u16(), err_body);
                return Err(FlowError::Api {
                    status: status.as_u16(),
                    body: err_body,
                });
            }

            response
                .bytes()
                .await
                .map_err(|e| FlowError::Network(e.to_string()))
        };

        let bytes = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| FlowError::Timeout)??;

        let envelope: Value = serde_json::from_slice(&bytes).map_err(|e| {
            debug!("Langflow body is not JSON: {}", e);
            FlowError::Malformed("could not parse the API response".to_string())
        })?;

        let response = envelope::extract_reply(&envelope)?;
        let session_id = envelope::session_id(&envelope)
            .map(str::to_string)
            .unwrap_or_else(|| body.session_id.clone());

        Ok(FlowReply {
            response,
            session_id,
        })
    }
}

#[async_trait]
impl FlowClient for LangflowClient {
    fn name(&self) -> &str {
        "langflow"
    }

    async fn send(&self, message: &str, session_id: Option<&str>) -> Result<FlowReply, FlowError> {
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(new_session_id);
        let body = RunRequest::chat(message, session_id);
        let url = self.run_url();

        info!(
            "Langflow run request: flow={}, session={}, input_len={}, max_retries={}",
            self.flow_id,
            body.session_id,
            message.len(),
            self.retry.max_retries
        );

        let mut attempt = 0u32;
        loop {
            if let Some(delay) = self.retry.delay_before(attempt) {
                info!(
                    "Retrying in {}ms (attempt {}/{})",
                    delay.as_millis(),
                    attempt + 1,
                    self.retry.attempts()
                );
                tokio::time::sleep(delay).await;
            }

            match self.attempt(&url, &body).await {
                Ok(reply) => {
                    info!(
                        "Langflow reply received: {} bytes on attempt {}",
                        reply.response.len(),
                        attempt + 1
                    );
                    return Ok(reply);
                }
                Err(e) if attempt < self.retry.max_retries => {
                    warn!("Attempt {} failed: {:?}", attempt + 1, e.kind());
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        "Giving up after {} attempt(s): {:?} ({})",
                        attempt + 1,
                        e.kind(),
                        e
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LangflowClient {
        LangflowClient::new(
            "https://flows.example.com/".to_string(),
            "flow-123".to_string(),
            "key".to_string(),
            "token".to_string(),
        )
    }

    #[test]
    fn run_url_trims_trailing_slash() {
        assert_eq!(
            client().run_url(),
            "https://flows.example.com/api/v1/run/flow-123"
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let c = client()
            .with_flow_id("other")
            .with_base_url("http://localhost:7860/")
            .with_max_retries(5)
            .with_timeout(Duration::from_secs(3));
        assert_eq!(c.run_url(), "http://localhost:7860/api/v1/run/other");
        assert_eq!(c.retry.max_retries, 5);
        assert_eq!(c.timeout, Duration::from_secs(3));
    }

    #[test]
    fn defaults_match_documented_values() {
        let c = client();
        assert_eq!(c.retry, RetryPolicy::default());
        assert_eq!(c.timeout, DEFAULT_TIMEOUT);
        assert_eq!(c.name(), "langflow");
    }
}
