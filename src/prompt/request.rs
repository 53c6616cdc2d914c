use serde_json::{json, Value};

/// Fixed message template: the app always asks for the same kind of
/// prompt, so the template is baked in rather than configurable.
const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";
const USER_MESSAGE: &str =
    "Generate a fun prompt that can be answered in 30 seconds and sent to close friends.";
const DEVELOPER_MESSAGE: &str = "Provide fun prompts for quick and engaging responses.";

const MAX_TOKENS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Immutable value describing one chat-completion request. Constructed
/// fresh per fetch; nothing is persisted between attempts.
#[derive(Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl std::fmt::Debug for PromptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRequest")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("messages", &self.messages)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl PromptRequest {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            messages: vec![
                ChatMessage::new("system", SYSTEM_MESSAGE),
                ChatMessage::new("user", USER_MESSAGE),
                ChatMessage::new("developer", DEVELOPER_MESSAGE),
            ],
            max_tokens: MAX_TOKENS,
        }
    }

    /// JSON body in the shape the chat-completion API expects.
    pub fn body(&self) -> Value {
        json!({
            "model": self.model,
            "messages": self
                .messages
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect::<Vec<_>>(),
            "max_tokens": self.max_tokens,
        })
    }
}
