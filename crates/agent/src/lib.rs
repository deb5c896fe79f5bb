pub mod catalog_tool;
pub mod conversation;
pub mod llm;
pub mod openai;
pub mod runtime;
pub mod tools;

pub use catalog_tool::{GetProductsTool, GET_PRODUCTS_TOOL_NAME};
pub use conversation::Conversation;
pub use llm::{
    AssistantTurn, ChatMessage, ChatRole, LlmClient, LlmError, ToolCallFunction, ToolCallRequest,
    ToolDefinition,
};
pub use openai::OpenAiCompatClient;
pub use runtime::{
    AgentError, AgentReply, AgentRuntime, ToolTraceEntry, MAX_TOOL_ROUNDS, SYSTEM_PROMPT,
};
pub use tools::{Tool, ToolError, ToolRegistry};
