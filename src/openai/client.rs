use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info};

use super::types::{ChatRequest, ChatResponse, ResponseMessage};
use crate::config::OpenAiConfig;
use crate::error::{ChatError, ChatResult};

/// Client for an OpenAI-compatible chat-completions API
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl ChatClient {
    /// Create a new chat client
    pub fn new(config: &OpenAiConfig) -> ChatResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(ChatError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    /// Request one completion and return the first candidate message.
    ///
    /// A single attempt only: a failed turn is surfaced to the caller
    /// rather than retried.
    pub async fn chat(&self, request: &ChatRequest) -> ChatResult<ResponseMessage> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "Requesting chat completion"
        );

        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    ChatError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let chat_response: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ChatError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        let message = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| ChatError::InvalidResponse {
                message: "No message received".to_string(),
            })?;

        info!(
            latency_ms = start.elapsed().as_millis() as u64,
            tool_calls = message.requested_calls().len(),
            "Chat completion succeeded"
        );

        Ok(message)
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = OpenAiConfig {
            api_key: "test_key".to_string(),
            base_url: "https://api.openai.com/".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_ms: 30000,
        };

        let client = ChatClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com");
    }
}
