// src/handlers/chat.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::chat::{DialogReply, DialogRequest},
    services::assistant::HeritageAssistant,
    utils::response::ApiResponse,
};

/// Answers a visitor's question through the heritage assistant.
pub async fn ai_dialog(
    State(assistant): State<HeritageAssistant>,
    payload: Result<Json<DialogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest("Question must not be empty".to_string()));
    }

    let (answer, source) = assistant.answer(question, &req.history).await;

    Ok(ApiResponse::new(DialogReply {
        question: question.to_string(),
        answer,
        source,
        timestamp: Utc::now(),
    }))
}
