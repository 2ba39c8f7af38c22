//! Chat-completion request body built fresh for every target file.

use crate::prompt::Instruction;
use serde::Serialize;

/// Sampling temperature used for every request.
pub const TEMPERATURE: f64 = 0.7;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction message
    System,
    /// Target file content
    User,
}

/// One message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

/// Body of a chat-completion request.
///
/// Always holds exactly two messages: the instruction, then the file text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Conversation
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Builds a fresh request for one target file.
    #[must_use]
    pub fn compose(instruction: &Instruction, model: &str, file_content: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: instruction.as_str().to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: file_content.to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compose_message_order() {
        let instruction = Instruction::compose("RULES", "");
        let request = ChatRequest::compose(&instruction, "gpt-4o", "openapi: 3.0.0");

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "RULES");
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "openapi: 3.0.0");
    }

    #[test]
    fn test_requests_are_independent() {
        let instruction = Instruction::compose("RULES", "");
        let first = ChatRequest::compose(&instruction, "m", "a");
        let second = ChatRequest::compose(&instruction, "m", "b");

        assert_eq!(second.messages.len(), 2);
        assert_eq!(second.messages[1].content, "b");
        assert_ne!(first, second);
    }

    #[test]
    fn test_wire_format() {
        let instruction = Instruction::compose("RULES", "");
        let request = ChatRequest::compose(&instruction, "gpt-4o", "{}");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(
            value["messages"],
            json!([
                {"role": "system", "content": "RULES"},
                {"role": "user", "content": "{}"}
            ])
        );
    }
}
