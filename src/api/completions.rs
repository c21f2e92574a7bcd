use async_trait::async_trait;
use tracing::debug;

use crate::api::{ChatCompletionResponse, ChatRequest};
use crate::core::config::ClientConfig;
use crate::core::error::RequestError;
use crate::utils::url::construct_api_url;

/// Shown as the reply when the provider returns no usable content.
pub const EMPTY_REPLY: &str = "No response from the model";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReply {
    pub content: String,
    /// Model the provider reports having used, when present.
    pub model: Option<String>,
}

/// One attempt at a chat completion. Retries are layered on by the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<CompletionReply, RequestError>;
}

pub struct OpenRouterClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl OpenRouterClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: &ChatRequest) -> Result<CompletionReply, RequestError> {
        let url = construct_api_url(&self.config.base_url, "chat/completions");
        debug!(model = %request.model, %url, "sending completion request");

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("HTTP-Referer", &self.config.site_url)
            .header("X-Title", &self.config.site_name)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|err| RequestError::Decode(err.to_string()))?;

        let content = parsed
            .first_content()
            .filter(|content| !content.trim().is_empty())
            .unwrap_or(EMPTY_REPLY)
            .to_string();

        Ok(CompletionReply {
            content,
            model: parsed.model,
        })
    }
}
