//! Model inference transport seam.
//!
//! The analyzer only builds prompts and reads raw text back; how the request
//! reaches a hosted model is owned by a [`ModelClient`] implementation such as
//! [`WorkersAiClient`](crate::WorkersAiClient).

use async_trait::async_trait;
use serde::Serialize;

use crate::Result;

/// One chat turn sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// A complete inference request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRequest {
    /// Model identifier; transports that put it in the URL skip it in the body.
    #[serde(skip)]
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Sends a prompt to a hosted model and returns its raw text answer.
///
/// Implementations must be thread-safe; the returned text may carry
/// formatting noise such as Markdown fences, which the caller strips.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn run(&self, request: &ModelRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_omits_model() {
        let request = ModelRequest {
            model: "@cf/meta/llama".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: 10,
            temperature: 0.1,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 10);
    }
}
