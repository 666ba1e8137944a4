// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::IntoResponse,
};

use crate::{
    error::AppError,
    leaderboard::{LeaderboardEngine, clamp_limit},
    models::quiz_question::{QuizQuestion, question_bank},
    models::quiz_record::{
        BestScores, Difficulty, LeaderboardEntry, LeaderboardParams, Leaderboards,
        ParseDifficultyError, SubmitQuizData, SubmitQuizRequest,
    },
    utils::response::ApiResponse,
};

/// Records one quiz attempt.
///
/// * Rejects a question count that does not match the difficulty.
/// * Appends the attempt; earlier attempts are never overwritten.
/// * Responds with the new record id and the user's current rank.
#[utoipa::path(
    post,
    path = "/api/submit-quiz",
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Attempt recorded, wrapped in the success envelope", body = SubmitQuizData),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Datastore unavailable")
    ),
    tag = "quiz"
)]
pub async fn submit_quiz(
    State(engine): State<LeaderboardEngine>,
    payload: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    validator::Validate::validate(&req)?;

    let attempt = engine.record_attempt(req).await?;

    // The attempt is stored at this point; a failed rank lookup must not turn
    // into an error the client would retry.
    let rank = match engine.rank_of(attempt.user_id, attempt.difficulty).await {
        Ok(rank) => rank,
        Err(e) => {
            tracing::warn!(
                "Rank lookup failed after recording attempt {}: {:?}",
                attempt.id,
                e
            );
            None
        }
    };

    Ok(ApiResponse::new(SubmitQuizData {
        record_id: attempt.id,
        submitted_at: attempt.created_at,
        rank,
    })
    .with("message", "Quiz result saved"))
}

/// The static question bank.
#[utoipa::path(
    get,
    path = "/api/quiz-questions",
    responses(
        (status = 200, description = "Every question with its answer index", body = [QuizQuestion])
    ),
    tag = "quiz"
)]
pub async fn get_quiz_questions() -> impl IntoResponse {
    let questions = question_bank();
    let total = questions.len();
    ApiResponse::new(questions).with("total", total)
}

/// Ranked best records per difficulty.
///
/// Without `difficulty` every bracket is returned keyed by name;
/// with it, only that bracket's array.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Leaderboards keyed by difficulty, or one bracket's entries", body = Leaderboards),
        (status = 400, description = "Unknown difficulty or malformed limit")
    ),
    tag = "quiz"
)]
pub async fn get_leaderboard(
    State(engine): State<LeaderboardEngine>,
    params: Result<Query<LeaderboardParams>, QueryRejection>,
) -> Result<axum::response::Response, AppError> {
    let Query(params) = params?;
    let limit = clamp_limit(params.limit);

    match params.difficulty.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(raw) => {
            let difficulty: Difficulty = raw
                .parse()
                .map_err(|e: ParseDifficultyError| AppError::BadRequest(e.to_string()))?;
            let entries: Vec<LeaderboardEntry> = engine.leaderboard(difficulty, limit).await?;
            Ok(ApiResponse::new(entries)
                .with("difficulty", difficulty)
                .into_response())
        }
        None => {
            let boards = engine.leaderboards(limit).await?;
            Ok(ApiResponse::new(boards).into_response())
        }
    }
}

/// The user's best attempt and rank in every bracket (null where unplayed).
#[utoipa::path(
    get,
    path = "/api/quiz-best-scores/{user_id}",
    params(("user_id" = i64, Path, description = "User whose best scores are requested")),
    responses(
        (status = 200, description = "Best record per difficulty", body = BestScores),
        (status = 400, description = "Malformed user id")
    ),
    tag = "quiz"
)]
pub async fn get_best_scores(
    State(engine): State<LeaderboardEngine>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(user_id) = user_id?;
    let scores = engine.best_scores(user_id).await?;
    Ok(ApiResponse::new(scores))
}
