use crate::llm::{AssistantTurn, ChatMessage};

/// Ordered chat transcript for one console session. The system prompt is
/// pinned as the first message and every turn appends after it.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(system_prompt: &str) -> Self {
        Self { messages: vec![ChatMessage::system(system_prompt)] }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, text: &str) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_assistant_text(&mut self, text: &str) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// Record an assistant turn that requested tool calls, so follow-up
    /// completions see what the model asked for.
    pub fn push_assistant_turn(&mut self, turn: &AssistantTurn) {
        self.messages
            .push(ChatMessage::assistant_with_calls(turn.content.clone(), turn.tool_calls.clone()));
    }

    pub fn push_tool_result(&mut self, tool_call_id: &str, tool_name: &str, content: &str) {
        self.messages.push(ChatMessage::tool(tool_call_id, tool_name, content));
    }
}

#[cfg(test)]
mod tests {
    use super::Conversation;
    use crate::llm::{AssistantTurn, ChatRole, ToolCallFunction, ToolCallRequest};

    #[test]
    fn new_conversations_start_with_the_system_prompt() {
        let conversation = Conversation::new("You are a helpful shopping assistant.");

        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, ChatRole::System);
        assert_eq!(
            conversation.messages()[0].content.as_deref(),
            Some("You are a helpful shopping assistant.")
        );
    }

    #[test]
    fn turns_append_in_order_with_matching_roles() {
        let mut conversation = Conversation::new("system");
        conversation.push_user("show me shoes");
        conversation.push_assistant_turn(&AssistantTurn {
            content: None,
            tool_calls: vec![ToolCallRequest {
                id: "call-1".to_owned(),
                call_type: "function".to_owned(),
                function: ToolCallFunction {
                    name: "get_products_api".to_owned(),
                    arguments: "{\"query\":\"shoes\"}".to_owned(),
                },
            }],
            finish_reason: None,
        });
        conversation.push_tool_result("call-1", "get_products_api", "{\"status\":\"ok\"}");
        conversation.push_assistant_text("Here are two options.");

        let roles: Vec<ChatRole> =
            conversation.messages().iter().map(|message| message.role).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::System,
                ChatRole::User,
                ChatRole::Assistant,
                ChatRole::Tool,
                ChatRole::Assistant,
            ]
        );

        let tool_message = &conversation.messages()[3];
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call-1"));
        assert_eq!(tool_message.name.as_deref(), Some("get_products_api"));
    }
}
