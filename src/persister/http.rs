//! [`WorkflowStore`] backed by the workflow REST API.

use super::config::{API_KEY_HEADER, ClientConfig};
use super::store::WorkflowStore;
use crate::definition::WorkflowRecord;
use crate::error::{TransportError, WorkflowError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

/// Tracing target for HTTP store operations.
pub const TRACING_TARGET: &str = "flowdraft::persister::http";

#[derive(Debug, Clone)]
pub struct HttpWorkflowStore {
    http: Client,
    config: ClientConfig,
}

impl HttpWorkflowStore {
    pub fn new(config: ClientConfig) -> Result<Self, WorkflowError> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.effective_timeout())
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|e| WorkflowError::Config(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout_ms = config.effective_timeout().as_millis(),
            "Created workflow store client"
        );

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, workflow_permanent_id: &str) -> Result<Url, TransportError> {
        self.config
            .workflow_url(workflow_permanent_id)
            .map_err(|e| TransportError::Request(e.to_string()))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(api_key) => request.header(API_KEY_HEADER, api_key),
            None => request,
        }
    }

    /// Passes a success response through, or turns the status and body into an error.
    async fn ensure_success(response: Response) -> Result<Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl WorkflowStore for HttpWorkflowStore {
    async fn fetch(&self, workflow_permanent_id: &str) -> Result<WorkflowRecord, TransportError> {
        let url = self.url(workflow_permanent_id)?;
        tracing::debug!(target: TRACING_TARGET, %url, "Fetching workflow");

        let response = self.authorize(self.http.get(url)).send().await?;
        let text = Self::ensure_success(response).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn replace(
        &self,
        workflow_permanent_id: &str,
        body: String,
    ) -> Result<Value, TransportError> {
        let url = self.url(workflow_permanent_id)?;
        tracing::debug!(target: TRACING_TARGET, %url, bytes = body.len(), "Replacing workflow definition");

        let request = self
            .http
            .put(url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body);
        let response = self.authorize(request).send().await?;
        let text = Self::ensure_success(response).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
