//! Chat-completions client with schema-constrained output

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One schema-constrained completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Name the provider attaches to the schema, e.g. "story_character"
    pub schema_name: String,
    pub schema: serde_json::Value,
}

/// Seam between the extractor and the hosted model. Implemented by
/// [`OpenAiChat`] in production and by mocks in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Issue exactly one completion request and return the raw JSON content
    /// of the assistant message
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// Chat-completions client for OpenAI-compatible endpoints
pub struct OpenAiChat {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl OpenAiChat {
    /// Build a client from configuration; fails if no API key is available
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| Error::Transport("no API key configured (set OPENAI_API_KEY)".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt,
            }],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: request.schema_name,
                    strict: true,
                    schema: request.schema,
                },
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "completion request failed: {} {}",
                status, detail
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Schema("response contained no choices".to_string()))?;

        tracing::debug!(chars = choice.message.content.len(), "received completion");

        Ok(choice.message.content)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_key() {
        let config = Config {
            api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        let chat = OpenAiChat::from_config(&config).unwrap();
        assert_eq!(chat.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let config = Config {
            endpoint: "https://api.openai.com/v1/".to_string(),
            api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        let chat = OpenAiChat::from_config(&config).unwrap();
        assert_eq!(chat.endpoint, "https://api.openai.com/v1");
    }

    #[test]
    fn test_request_serializes_response_format() {
        let body = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: "story_character".to_string(),
                    strict: true,
                    schema: crate::types::story_character_schema(),
                },
            },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            value["response_format"]["json_schema"]["schema"]["required"][0],
            "name"
        );
    }
}
