use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use shoply_core::config::LlmConfig;

use crate::llm::{AssistantTurn, ChatMessage, LlmClient, LlmError, ToolCallRequest, ToolDefinition};

const ERROR_DETAIL_LIMIT: usize = 300;

/// Chat completion client for OpenAI-compatible endpoints, including the
/// Gemini compatibility surface the default configuration points at.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    chat_url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiCompatClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        Ok(Self {
            http,
            chat_url: chat_completions_url(&config.base_url),
            api_key,
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            tools: wire_tools(tools),
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        debug!(
            event_name = "llm.chat.request",
            model = %self.model,
            message_count = messages.len(),
            tool_count = tools.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&self.chat_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|error| LlmError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), detail: clip_detail(&detail) });
        }

        let payload =
            response.text().await.map_err(|error| LlmError::Transport(error.to_string()))?;
        let turn = parse_assistant_turn(&payload)?;

        debug!(
            event_name = "llm.chat.response",
            has_content = turn.content.is_some(),
            tool_calls = turn.tool_calls.len(),
            finish_reason = turn.finish_reason.as_deref().unwrap_or("unknown"),
            "received chat completion response"
        );

        Ok(turn)
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Tools go over the wire nested under a `function` envelope.
fn wire_tools(tools: &[ToolDefinition]) -> Option<Vec<Value>> {
    if tools.is_empty() {
        return None;
    }

    let wired = tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                },
            })
        })
        .collect();
    Some(wired)
}

fn clip_detail(detail: &str) -> String {
    let trimmed = detail.trim();
    if trimmed.chars().count() <= ERROR_DETAIL_LIMIT {
        return trimmed.to_owned();
    }
    trimmed.chars().take(ERROR_DETAIL_LIMIT).collect()
}

fn parse_assistant_turn(body: &str) -> Result<AssistantTurn, LlmError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|error| LlmError::Malformed(error.to_string()))?;

    if let Some(usage) = &response.usage {
        debug!(
            event_name = "llm.chat.usage",
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "chat completion token usage"
        );
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Malformed("response contained no choices".to_owned()))?;

    Ok(AssistantTurn {
        content: choice.message.content,
        tool_calls: choice.message.tool_calls.unwrap_or_default(),
        finish_reason: choice.finish_reason,
    })
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<UsageStats>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallRequest>>,
}

#[derive(Debug, Default, Deserialize)]
struct UsageStats {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}
