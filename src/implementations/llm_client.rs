use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };

use crate::implementations::config::{ ApiConfig, OracleCredentials };
use crate::models::conversation::{ ChatMessage, Role };
use crate::traits::oracle::{ OracleError, TextOracle };

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// OpenAI API request and response types
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ChatResponseChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatResponseChoice>,
}

/// Chat-completion client for OpenAI-compatible and Anthropic endpoints.
///
/// # API Keys
/// Credentials are resolved once at startup (see [`crate::implementations::config::MigrationConfig::get_api_key`])
/// and handed in here; the client never reads the environment itself.
pub struct LlmOracle {
    http_client: reqwest::Client,
    provider: String,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl LlmOracle {
    pub fn new(config: &ApiConfig, credentials: OracleCredentials, model_override: Option<&str>) -> Result<Self, OracleError> {
        if credentials.api_key.trim().is_empty() {
            return Err(OracleError::MissingCredential(format!("empty API key for {}", credentials.provider)));
        }

        let timeout = config.timeout_secs.unwrap_or(120);
        let http_client = reqwest::Client
            ::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .map_err(|e| OracleError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        let is_anthropic = credentials.provider == "anthropic";
        let endpoint = config.api_endpoint.clone().unwrap_or_else(|| {
            if is_anthropic { ANTHROPIC_ENDPOINT.to_string() } else { OPENAI_ENDPOINT.to_string() }
        });
        let model = model_override
            .map(str::to_string)
            .or_else(|| config.model.clone())
            .unwrap_or_else(|| {
                if is_anthropic { "claude-3-sonnet-20240229".to_string() } else { "gpt-4".to_string() }
            });

        info!("Using {} provider with model {}", credentials.provider, model);

        Ok(Self {
            http_client,
            provider: credentials.provider,
            api_key: credentials.api_key,
            endpoint,
            model,
            temperature: config.temperature.unwrap_or(0.2),
            max_tokens: config.max_tokens.unwrap_or(4096),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, OracleError> {
        let response = request.send().await.map_err(|e| {
            let error_msg = format!("Network error when calling {} API: {}", self.provider, e);
            warn!("{}", error_msg);
            if e.is_timeout() {
                warn!("Request timed out");
            }
            if e.is_connect() {
                warn!("Connection error - check network connectivity");
            }
            OracleError::NetworkError(error_msg)
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());

            warn!("API error: HTTP {} - {}", status, error_text);
            return Err(OracleError::HttpError {
                status,
                message: error_text,
            });
        }

        let response_text = response.text().await.map_err(|e| {
            warn!("Failed to get response text: {}", e);
            OracleError::ParseError(e.to_string())
        })?;
        debug!("Response length: {} characters", response_text.len());
        Ok(response_text)
    }

    async fn call_anthropic(&self, messages: &[ChatMessage]) -> Result<String, OracleError> {
        let system = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let claude_request =
            serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": system,
            "messages": anthropic_turns(messages),
        });

        let request_builder = self.http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&claude_request);

        let response_text = self.send(request_builder).await?;
        let response_json: serde_json::Value = serde_json::from_str(&response_text).map_err(|e| {
            warn!("JSON parsing error: {}", e);
            OracleError::ParseError(e.to_string())
        })?;

        response_json["content"]
            .as_array()
            .and_then(|items| items.first())
            .and_then(|first| first["text"].as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                warn!("Failed to extract text from Anthropic response content");
                OracleError::ParseError("Missing text in Anthropic response content".to_string())
            })
    }

    async fn call_openai(&self, messages: &[ChatMessage]) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let request_builder = self.http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request);

        let response_text = self.send(request_builder).await?;
        let response_json: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            warn!("Failed to parse API response: {}", e);
            OracleError::ParseError(format!("Failed to parse API response: {}", e))
        })?;

        response_json.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                warn!("API returned empty choices array");
                OracleError::ApiError("No response from API".to_string())
            })
    }
}

/// Non-system turns with same-role neighbours merged, opening with a user turn
fn anthropic_turns(messages: &[ChatMessage]) -> Vec<serde_json::Value> {
    let mut turns: Vec<(Role, String)> = Vec::new();

    for message in messages.iter().filter(|m| m.role != Role::System) {
        match turns.last_mut() {
            Some((role, content)) if *role == message.role => {
                content.push_str("\n\n");
                content.push_str(&message.content);
            }
            _ => turns.push((message.role, message.content.clone())),
        }
    }
    if matches!(turns.first(), Some((Role::Assistant, _))) {
        turns.insert(0, (Role::User, "Your previous answer follows.".to_string()));
    }

    turns
        .into_iter()
        .map(|(role, content)| {
            let role = if role == Role::Assistant { "assistant" } else { "user" };
            serde_json::json!({ "role": role, "content": content })
        })
        .collect()
}

#[async_trait]
impl TextOracle for LlmOracle {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, OracleError> {
        info!("Making LLM API request to {}", self.provider);
        debug!("API endpoint: {}", self.endpoint);
        debug!(
            "Conversation: {} messages, {} characters",
            messages.len(),
            messages
                .iter()
                .map(|m| m.content.len())
                .sum::<usize>()
        );

        let content = if self.provider == "anthropic" {
            self.call_anthropic(messages).await?
        } else {
            self.call_openai(messages).await?
        };

        debug!("Response content length: {} characters", content.len());
        info!("API call completed successfully");
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anthropic_turns_merge_and_open_with_user() {
        let messages = vec![
            ChatMessage::system("sys"),
            ChatMessage::assistant("rejected"),
            ChatMessage::user("fix it"),
            ChatMessage::user("again")
        ];
        let turns = anthropic_turns(&messages);
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[1]["content"], "rejected");
        assert_eq!(turns[2]["content"], "fix it\n\nagain");
    }
}
