// src/openapi.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::{
    handlers::quiz,
    models::quiz_question::QuizQuestion,
    models::quiz_record::{
        BestScore, BestScores, Difficulty, LeaderboardEntry, Leaderboards, SubmitQuizData,
        SubmitQuizRequest,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        quiz::submit_quiz,
        quiz::get_leaderboard,
        quiz::get_best_scores,
        quiz::get_quiz_questions
    ),
    components(schemas(
        Difficulty,
        SubmitQuizRequest,
        SubmitQuizData,
        LeaderboardEntry,
        Leaderboards,
        BestScore,
        BestScores,
        QuizQuestion
    )),
    tags((name = "quiz", description = "Quiz attempts and leaderboards"))
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_quiz_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/submit-quiz",
            "/api/leaderboard",
            "/api/quiz-best-scores/{user_id}",
            "/api/quiz-questions",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
