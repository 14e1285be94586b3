use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::application::{ChatClient, CompletionRequest};
use crate::domain::DomainError;

pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o-mini-2024-07-18";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Static connection settings for an Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
    pub timeout: Duration,
}

impl AzureOpenAiConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read settings through `lookup`, which is usually the process
    /// environment with command-line overrides layered on top:
    ///
    /// | Variable                    | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `AZURE_OPENAI_ENDPOINT`     | required                 |
    /// | `AZURE_OPENAI_API_KEY`      | required                 |
    /// | `AZURE_OPENAI_API_VERSION`  | `2024-02-01`             |
    /// | `AZURE_OPENAI_DEPLOYMENT`   | `gpt-4o-mini-2024-07-18` |
    /// | `AZURE_OPENAI_TIMEOUT_SECS` | `30`                     |
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = non_empty("AZURE_OPENAI_ENDPOINT")
            .ok_or_else(|| DomainError::config("AZURE_OPENAI_ENDPOINT is not set"))?;
        let api_key = non_empty("AZURE_OPENAI_API_KEY")
            .ok_or_else(|| DomainError::config("AZURE_OPENAI_API_KEY is not set"))?;

        let mut config = Self::new(endpoint, api_key);
        if let Some(version) = non_empty("AZURE_OPENAI_API_VERSION") {
            config.api_version = version;
        }
        if let Some(deployment) = non_empty("AZURE_OPENAI_DEPLOYMENT") {
            config.deployment = deployment;
        }
        if let Some(secs) = non_empty("AZURE_OPENAI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DomainError::config(format!("AZURE_OPENAI_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs.max(1));
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Chat-completions URL without the `api-version` query parameter.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint.trim_end_matches('/'),
            self.deployment
        )
    }
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    messages: [ApiMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Only `choices[0].message.content` is read; every level may be missing.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`ChatClient`] for an Azure OpenAI chat-completions deployment.
///
/// Requests time out after the configured duration and surface as
/// [`DomainError::Timeout`]; non-2xx responses become
/// [`DomainError::Transport`] with the response body attached for logging.
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    config: AzureOpenAiConfig,
    url: String,
}

impl AzureOpenAiClient {
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| DomainError::config(format!("failed to build HTTP client: {e}")))?;
        let url = config.completions_url();

        Ok(Self {
            client,
            config,
            url,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            error!("Azure OpenAI request timed out after {:?}", self.config.timeout);
            DomainError::Timeout(self.config.timeout.as_secs())
        } else {
            error!("Azure OpenAI request failed: {e}");
            DomainError::transport(format!("request failed: {e}"))
        }
    }
}

#[async_trait]
impl ChatClient for AzureOpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        let body = ApiRequest {
            messages: [
                ApiMessage {
                    role: "system",
                    content: &request.system,
                },
                ApiMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            error!("Azure OpenAI error {status}: {text}");
            return Err(DomainError::http_status(status.as_u16(), text));
        }

        let api_response: ApiResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Azure OpenAI returned an unreadable envelope: {e}: {text}");
            DomainError::transport(format!("unreadable response envelope: {e}"))
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        debug!("Azure OpenAI raw completion: {content}");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_requires_endpoint_and_key() {
        let err = AzureOpenAiConfig::from_lookup(lookup(&[("AZURE_OPENAI_API_KEY", "k")]))
            .unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_ENDPOINT"));

        let err = AzureOpenAiConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "  "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_API_KEY"));
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let config = AzureOpenAiConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com/"),
            ("AZURE_OPENAI_API_KEY", "k"),
            ("AZURE_OPENAI_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.deployment, DEFAULT_DEPLOYMENT);
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(
            config.completions_url(),
            "https://example.openai.azure.com/openai/deployments/\
             gpt-4o-mini-2024-07-18/chat/completions"
        );
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err = AzureOpenAiConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_API_KEY", "k"),
            ("AZURE_OPENAI_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }
}
