// src/models/chat.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One turn of a chat-completions conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// DTO for `POST /api/ai-dialog`.
#[derive(Debug, Deserialize, Validate)]
pub struct DialogRequest {
    #[validate(length(min = 1, max = 2000, message = "Question must be 1-2000 characters."))]
    pub question: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Llm,
    Fallback,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DialogReply {
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
    pub timestamp: DateTime<Utc>,
}
