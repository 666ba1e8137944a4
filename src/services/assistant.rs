// src/services/assistant.rs

//! Chat assistant backed by an OpenAI-compatible chat-completions API.
//!
//! The assistant never fails a request: without an API key, or when the
//! upstream call fails, it answers from a small keyword table instead.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    config::LlmConfig,
    models::chat::{AnswerSource, ChatMessage},
};

const SYSTEM_PROMPT: &str = r#"You are the guide of a showcase site for the intangible cultural heritage of the Yangtze River Delta.

You answer questions about heritage items, their inheritors, and related books and films, and you point visitors to the site's sections (heritage map, quiz community, craftsman library, AI dialog).

Well-known items of the region include:
- Jiangsu: Kunqu opera, Suzhou pingtan, Nanjing yunjin brocade, Suzhou gardens, Yixing zisha pottery
- Zhejiang: Longjing tea processing, Yue opera, Zhejiang paper cutting, Dongyang wood carving
- Shanghai: Shanghai opera, Benbang cuisine techniques
- Anhui: Xuan paper making, Hui ink making, Huizhou wood carving, Huangmei opera

Keep answers short (under 200 words), structured as a few points, friendly and accurate. Answer in the language of the question. When unsure, suggest which part of the site to explore."#;

/// Most recent history turns forwarded upstream.
const MAX_HISTORY: usize = 10;

const UNAUTHORIZED_REPLY: &str =
    "Sorry, the assistant is not configured correctly right now. Please contact the site administrator.";
const RATE_LIMITED_REPLY: &str =
    "Many visitors are chatting at the moment. Please try again in a little while.";

/// Keyword → canned answer, checked in order.
const FALLBACK_ANSWERS: &[(&[&str], &str)] = &[
    (
        &["什么是非遗", "intangible", "what is heritage"],
        "Intangible cultural heritage covers the traditional practices, performing arts, crafts and \
         knowledge passed down between generations. The Yangtze River Delta is rich in it: Kunqu \
         opera, Suzhou pingtan and Nanjing yunjin brocade are a few examples.",
    ),
    (
        &["长三角", "yangtze", "delta"],
        "Highlights of the Yangtze River Delta include:\n- Kunqu opera (Suzhou)\n- Suzhou pingtan \
         storytelling\n- Zhejiang paper cutting\n- Longjing tea processing (Hangzhou)\n- Xuan paper \
         making (Anhui)",
    ),
    (
        &["如何学习", "learn", "study"],
        "Ways to learn and help preserve heritage:\n1. Join workshops held by inheritors\n2. Visit \
         heritage exhibitions\n3. Watch live performances\n4. Take part in our quiz community\n5. \
         Read inheritors' stories in the craftsman library",
    ),
    (
        &["传承人", "inheritor", "master"],
        "Inheritors are the guardians of a craft: they spend decades mastering a technique and \
         teaching it to the next generation. The craftsman library on this site collects many of \
         their stories.",
    ),
];

/// Answer used when a question matches no keyword.
pub fn default_answer(question: &str) -> String {
    format!(
        "Thanks for asking about \"{}\"! You could:\n1. Browse the heritage map to discover items\n\
         2. Join the quiz in the community section\n3. Read inheritors' stories in the craftsman \
         library\nFeel free to ask another question.",
        question
    )
}

/// Keyword-matched offline answer.
pub fn fallback_answer(question: &str) -> String {
    let lowered = question.to_lowercase();
    FALLBACK_ANSWERS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, answer)| answer.to_string())
        .unwrap_or_else(|| default_answer(question))
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
    pub usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl CompletionResponse {
    /// First non-empty choice, trimmed.
    pub fn reply(&self) -> Option<&str> {
        self.choices
            .iter()
            .map(|c| c.message.content.trim())
            .find(|content| !content.is_empty())
    }
}

#[derive(Clone)]
pub struct HeritageAssistant {
    client: Client,
    config: LlmConfig,
}

impl HeritageAssistant {
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Answers `question`, consulting the upstream model when configured.
    pub async fn answer(&self, question: &str, history: &[ChatMessage]) -> (String, AnswerSource) {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::debug!("No LLM API key configured, answering from fallback table");
            return (fallback_answer(question), AnswerSource::Fallback);
        };

        match self.complete(api_key, question, history).await {
            Ok(reply) => (reply, AnswerSource::Llm),
            Err(UpstreamError::Status(status)) if status == StatusCode::UNAUTHORIZED => {
                (UNAUTHORIZED_REPLY.to_string(), AnswerSource::Fallback)
            }
            Err(UpstreamError::Status(status)) if status == StatusCode::TOO_MANY_REQUESTS => {
                (RATE_LIMITED_REPLY.to_string(), AnswerSource::Fallback)
            }
            Err(e) => {
                tracing::warn!("LLM call failed, using fallback answer: {}", e);
                (fallback_answer(question), AnswerSource::Fallback)
            }
        }
    }

    async fn complete(
        &self,
        api_key: &str,
        question: &str,
        history: &[ChatMessage],
    ) -> Result<String, UpstreamError> {
        let recent = &history[history.len().saturating_sub(MAX_HISTORY)..];
        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        messages.extend(
            recent
                .iter()
                .filter(|m| m.role == "user" || m.role == "assistant")
                .cloned(),
        );
        messages.push(ChatMessage::user(question));

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: 0.7,
            max_tokens: 500,
            top_p: 0.9,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("LLM API responded {}: {}", status, body);
            return Err(UpstreamError::Status(status));
        }

        let completion: CompletionResponse =
            response.json().await.map_err(UpstreamError::Transport)?;

        if let Some(usage) = &completion.usage {
            tracing::info!(
                "LLM reply ok | prompt {} completion {} total {} tokens",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        completion
            .reply()
            .map(str::to_string)
            .ok_or(UpstreamError::EmptyReply)
    }
}

#[derive(Debug)]
enum UpstreamError {
    Transport(reqwest::Error),
    Status(StatusCode),
    EmptyReply,
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::Transport(e) => write!(f, "transport error: {}", e),
            UpstreamError::Status(status) => write!(f, "upstream status {}", status),
            UpstreamError::EmptyReply => f.write_str("upstream returned no content"),
        }
    }
}
