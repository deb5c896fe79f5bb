use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One entry of the chat transcript, shaped for the OpenAI-compatible
/// chat completion wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self::text(ChatRole::System, content)
    }

    pub fn user(content: &str) -> Self {
        Self::text(ChatRole::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::text(ChatRole::Assistant, content)
    }

    /// Assistant turn that requested tool calls. Content may be absent
    /// when the model only emitted calls.
    pub fn assistant_with_calls(content: Option<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content,
            name: None,
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Tool output message answering a specific call id.
    pub fn tool(tool_call_id: &str, tool_name: &str, content: &str) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(content.to_owned()),
            name: Some(tool_name.to_owned()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.to_owned()),
        }
    }

    fn text(role: ChatRole, content: &str) -> Self {
        Self {
            role,
            content: Some(content.to_owned()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// A tool invocation requested by the model. `arguments` stays a raw
/// JSON string until the runtime parses it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type", default = "function_call_type")]
    pub call_type: String,
    pub function: ToolCallFunction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    pub arguments: String,
}

fn function_call_type() -> String {
    "function".to_owned()
}

/// Tool advertised to the model. `parameters` holds a JSON schema
/// object describing the accepted arguments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Parsed assistant reply from one chat completion call.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AssistantTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
    pub finish_reason: Option<String>,
}

impl AssistantTurn {
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("api key is not configured")]
    MissingApiKey,
    #[error("chat request failed: {0}")]
    Transport(String),
    #[error("chat endpoint responded with status {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("chat response was malformed: {0}")]
    Malformed(String),
}

impl LlmError {
    /// Console-safe wording for recoverable failures.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => {
                "No API key is configured. Set SHOPLY_LLM_API_KEY (or GEMINI_API_KEY) and restart."
            }
            Self::Transport(_) => {
                "I could not reach the language model. Please check your network connection and try again."
            }
            Self::Api { status: 401 | 403, .. } => {
                "The language model rejected the request. Please check that your API key is valid."
            }
            Self::Api { .. } => {
                "The language model service returned an error. Please try again in a moment."
            }
            Self::Malformed(_) => {
                "The language model returned something I could not read. Please try again."
            }
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn, LlmError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ChatMessage, ChatRole, LlmError, ToolCallFunction, ToolCallRequest};

    #[test]
    fn plain_messages_serialize_without_optional_fields() {
        let message = ChatMessage::user("show me shoes");
        let value = serde_json::to_value(&message).expect("message should serialize");

        assert_eq!(value, json!({ "role": "user", "content": "show me shoes" }));
    }

    #[test]
    fn tool_messages_carry_call_id_and_name() {
        let message = ChatMessage::tool("call-1", "get_products_api", "{\"status\":\"ok\"}");
        let value = serde_json::to_value(&message).expect("message should serialize");

        assert_eq!(
            value,
            json!({
                "role": "tool",
                "content": "{\"status\":\"ok\"}",
                "name": "get_products_api",
                "tool_call_id": "call-1",
            })
        );
    }

    #[test]
    fn assistant_tool_call_turns_keep_the_wire_shape() {
        let message = ChatMessage::assistant_with_calls(
            None,
            vec![ToolCallRequest {
                id: "call-9".to_owned(),
                call_type: "function".to_owned(),
                function: ToolCallFunction {
                    name: "get_products_api".to_owned(),
                    arguments: "{\"query\":\"shoes\"}".to_owned(),
                },
            }],
        );
        let value = serde_json::to_value(&message).expect("message should serialize");

        assert_eq!(
            value,
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call-9",
                    "type": "function",
                    "function": {
                        "name": "get_products_api",
                        "arguments": "{\"query\":\"shoes\"}",
                    },
                }],
            })
        );
    }

    #[test]
    fn tool_call_type_defaults_to_function_when_absent() {
        let raw = json!({
            "id": "call-2",
            "function": { "name": "get_products_api", "arguments": "{}" },
        });

        let call: ToolCallRequest =
            serde_json::from_value(raw).expect("tool call should deserialize");
        assert_eq!(call.call_type, "function");
    }

    #[test]
    fn auth_failures_map_to_an_api_key_hint() {
        let error = LlmError::Api { status: 401, detail: "unauthorized".to_owned() };
        assert!(error.user_message().contains("API key"));

        let error = LlmError::Api { status: 503, detail: "overloaded".to_owned() };
        assert!(error.user_message().contains("try again"));
    }
}
