use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::conversation::Conversation;
use crate::llm::{LlmClient, LlmError, ToolCallRequest, ToolDefinition};
use crate::tools::ToolRegistry;

/// Upper bound on tool rounds within a single user turn. Each round is one
/// chat completion followed by the tool calls it requested.
pub const MAX_TOOL_ROUNDS: usize = 4;

pub const SYSTEM_PROMPT: &str = "\
You are a helpful shopping assistant. Your primary goal is to assist users in finding products.
You have access to a `get_products_api` tool to fetch product information.

When a user asks for products:
1. Call the `get_products_api` tool to get product data.
2. If the user's query contains keywords (like product names, types, or categories), pass that \
as the 'query' argument to the tool.
3. If no specific product is mentioned, you can call the tool without a 'query' to list general \
products.
4. Once you have the product data, present up to 5 relevant products to the user.
5. For each product, display its name and price, and optionally its description or category if \
relevant to the user's query. Prices from the tool are already in dollars (for example \
\"129.99\"); present them with a dollar sign, like $129.99.
6. If no products are found for a specific query, politely inform the user and perhaps suggest \
some general popular products.
7. Be friendly, concise, and always offer further assistance.
";

const EMPTY_REPLY_FALLBACK: &str =
    "I was not able to come up with a reply. Please try again or rephrase your request.";

const ROUND_LIMIT_FALLBACK: &str =
    "I could not finish looking that up. Please try a more specific request.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl AgentError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Llm(error) => error.user_message(),
        }
    }
}

/// One executed tool call, kept for console display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolTraceEntry {
    pub tool: String,
    pub arguments: String,
    pub output: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentReply {
    pub text: String,
    pub trace: Vec<ToolTraceEntry>,
}

pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    max_tool_rounds: usize,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self { llm, tools, max_tool_rounds: MAX_TOOL_ROUNDS }
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn start_conversation(&self) -> Conversation {
        Conversation::new(SYSTEM_PROMPT)
    }

    /// Run one user turn to completion: call the model, execute any tool
    /// calls it requests, feed the outputs back, and repeat until the model
    /// answers in plain text or the round limit is hit.
    pub async fn respond(
        &self,
        conversation: &mut Conversation,
        user_text: &str,
    ) -> Result<AgentReply, AgentError> {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "agent.turn.started",
            correlation_id = %correlation_id,
            "agent turn started"
        );

        conversation.push_user(user_text);
        let definitions: Vec<ToolDefinition> = self.tools.definitions();
        let mut trace = Vec::new();

        for round in 0..self.max_tool_rounds {
            let turn = self.llm.chat(conversation.messages(), &definitions).await?;

            if !turn.wants_tools() {
                let text = turn.content.unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_owned());
                conversation.push_assistant_text(&text);
                info!(
                    event_name = "agent.turn.completed",
                    correlation_id = %correlation_id,
                    rounds = round + 1,
                    tool_calls = trace.len(),
                    "agent turn completed"
                );
                return Ok(AgentReply { text, trace });
            }

            conversation.push_assistant_turn(&turn);
            for call in &turn.tool_calls {
                let output = self.run_tool_call(call, &correlation_id).await;
                trace.push(ToolTraceEntry {
                    tool: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                    output: output.clone(),
                });
                conversation.push_tool_result(&call.id, &call.function.name, &output);
            }
        }

        warn!(
            event_name = "agent.turn.round_limit",
            correlation_id = %correlation_id,
            max_tool_rounds = self.max_tool_rounds,
            "tool round limit reached before a final reply"
        );
        conversation.push_assistant_text(ROUND_LIMIT_FALLBACK);
        Ok(AgentReply { text: ROUND_LIMIT_FALLBACK.to_owned(), trace })
    }

    /// Tool failures never abort the turn; they are folded into the result
    /// payload so the model can explain them.
    async fn run_tool_call(&self, call: &ToolCallRequest, correlation_id: &str) -> String {
        let name = call.function.name.as_str();
        let raw_arguments = call.function.arguments.trim();
        // Some providers send an empty arguments string for no-argument calls.
        let raw_arguments = if raw_arguments.is_empty() { "{}" } else { raw_arguments };

        let input: Value = match serde_json::from_str(raw_arguments) {
            Ok(value) => value,
            Err(error) => {
                warn!(
                    event_name = "agent.tool.invalid_arguments",
                    correlation_id = %correlation_id,
                    tool = name,
                    error = %error,
                    "tool call arguments were not valid JSON"
                );
                return error_payload(&format!("tool arguments were not valid JSON: {error}"));
            }
        };

        debug!(
            event_name = "agent.tool.dispatch",
            correlation_id = %correlation_id,
            tool = name,
            "dispatching tool call"
        );

        match self.tools.dispatch(name, input).await {
            Ok(output) => output.to_string(),
            Err(error) => {
                warn!(
                    event_name = "agent.tool.failed",
                    correlation_id = %correlation_id,
                    tool = name,
                    error = %error,
                    "tool call failed"
                );
                error_payload(&error.to_string())
            }
        }
    }
}

fn error_payload(message: &str) -> String {
    serde_json::json!({ "status": "error", "message": message }).to_string()
}
