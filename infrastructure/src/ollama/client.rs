//! HTTP client for a local Ollama server

use super::error::{OllamaError, Result};
use super::protocol::{GenerateOptions, GenerateRequest, GenerateResponse, TagsResponse};
use crate::config::FileOllamaConfig;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Time allowed to open a connection to the server
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time allowed for health checks
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Loads and evicts models on an inference server.
///
/// Used by [`ModelResidency`](super::residency::ModelResidency) so lease
/// counting can be tested without a server.
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    async fn load(&self, model: &str) -> Result<()>;
    async fn unload(&self, model: &str) -> Result<()>;
}

/// Ollama REST client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    options: GenerateOptions,
}

impl OllamaClient {
    pub fn new(config: &FileOllamaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            options: GenerateOptions {
                temperature: Some(config.temperature),
                num_predict: i32::try_from(config.max_tokens).ok(),
            },
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default generation options from configuration
    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// POST `/api/generate` and return the parsed response.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            images = request.images.len(),
            "Ollama generate"
        );

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(OllamaError::ModelNotFound(request.model.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        debug!(
            model = %parsed.model,
            eval_count = parsed.eval_count,
            done_reason = parsed.done_reason.as_deref().unwrap_or("-"),
            "Ollama response"
        );
        Ok(parsed)
    }

    /// GET `/api/tags`: names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check whether the server answers at all
    pub async fn is_available(&self) -> bool {
        self.list_models().await.is_ok()
    }
}

#[async_trait]
impl ModelRuntime for OllamaClient {
    async fn load(&self, model: &str) -> Result<()> {
        self.generate(&GenerateRequest::preload(model)).await?;
        Ok(())
    }

    async fn unload(&self, model: &str) -> Result<()> {
        self.generate(&GenerateRequest::unload(model)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = FileOllamaConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..Default::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.options().num_predict, Some(512));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_not_available() {
        let config = FileOllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let client = OllamaClient::new(&config).unwrap();
        assert!(!client.is_available().await);
    }
}
