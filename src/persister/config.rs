//! Configuration for the HTTP workflow store.

use crate::error::WorkflowError;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the workflow API, e.g. `https://api.example.com/api/v1/`.
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: Self::default_user_agent(),
        }
    }

    fn default_user_agent() -> String {
        format!("flowdraft/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Returns the effective user agent, using default if empty.
    pub fn effective_user_agent(&self) -> String {
        if self.user_agent.is_empty() {
            Self::default_user_agent()
        } else {
            self.user_agent.clone()
        }
    }

    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.base_url.cannot_be_a_base() {
            return Err(WorkflowError::Config(format!(
                "base URL '{}' cannot carry a path",
                self.base_url
            )));
        }
        match self.base_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(WorkflowError::Config(format!(
                "unsupported URL scheme '{}'",
                other
            ))),
        }
    }

    /// URL of one workflow resource under the base URL.
    pub fn workflow_url(&self, workflow_permanent_id: &str) -> Result<Url, WorkflowError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                WorkflowError::Config(format!("base URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .push("workflows")
            .push(workflow_permanent_id);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig::new(Url::parse(base).unwrap())
    }

    #[test]
    fn test_config_defaults() {
        let config = config("http://localhost:8000/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("flowdraft/"));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_effective_timeout_uses_default_when_zero() {
        let config = config("http://localhost").with_timeout(Duration::ZERO);
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_workflow_url_with_and_without_trailing_slash() {
        for base in ["http://localhost:8000/api/v1", "http://localhost:8000/api/v1/"] {
            let url = config(base).workflow_url("wpid_1").unwrap();
            assert_eq!(url.as_str(), "http://localhost:8000/api/v1/workflows/wpid_1");
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config("http://localhost").with_api_key("sk-very-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_non_http_schemes() {
        assert!(config("ftp://localhost/").validate().is_err());
        assert!(config("mailto:someone@example.com").validate().is_err());
        assert!(config("https://localhost/").validate().is_ok());
    }
}
