// src/models/quiz_record.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, postgres::PgRow};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Quiz difficulty bracket. Each bracket has a fixed question count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Number of questions a paper of this difficulty must contain.
    pub fn expected_questions(self) -> i32 {
        match self {
            Difficulty::Beginner => 10,
            Difficulty::Intermediate => 20,
            Difficulty::Advanced => 25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDifficultyError(pub String);

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown difficulty '{}', expected one of beginner, intermediate, advanced",
            self.0
        )
    }
}

impl std::error::Error for ParseDifficultyError {}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Represents the 'quiz_records' table in the database.
/// One immutable row per submitted attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub difficulty: Difficulty,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: i32,
    /// Seconds spent on the paper.
    pub time_spent: i32,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for QuizAttempt {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let level: String = row.try_get("difficulty_level")?;
        let difficulty = level
            .parse::<Difficulty>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "difficulty_level".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            difficulty,
            total_questions: row.try_get("total_questions")?,
            correct_answers: row.try_get("correct_answers")?,
            score: row.try_get("score")?,
            time_spent: row.try_get("time_spent")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A validated attempt ready to be appended to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuizAttempt {
    pub user_id: i64,
    pub username: String,
    pub difficulty: Difficulty,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: i32,
    pub time_spent: i32,
}

/// DTO for `POST /api/submit-quiz`.
///
/// `difficulty` stays a string here so an unknown bracket is reported
/// through the validation envelope rather than as a JSON rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub user_id: i64,
    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    pub username: String,
    pub difficulty: String,
    #[validate(range(min = 1))]
    pub total_questions: i32,
    #[validate(range(min = 0))]
    pub correct_answers: i32,
    #[validate(range(min = 0))]
    pub score: i32,
    #[validate(range(min = 0))]
    pub time_spent: i32,
}

/// `data` payload returned after a successful submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizData {
    pub record_id: i64,
    pub submitted_at: DateTime<Utc>,
    pub rank: Option<usize>,
}

/// One ranked row of a difficulty bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: i64,
    pub username: String,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: i32,
    pub time_spent: i32,
    pub submitted_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn from_attempt(rank: usize, attempt: QuizAttempt) -> Self {
        Self {
            rank,
            user_id: attempt.user_id,
            username: attempt.username,
            total_questions: attempt.total_questions,
            correct_answers: attempt.correct_answers,
            score: attempt.score,
            time_spent: attempt.time_spent,
            submitted_at: attempt.created_at,
        }
    }
}

/// Leaderboards of every bracket, keyed by difficulty name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Leaderboards {
    pub beginner: Vec<LeaderboardEntry>,
    pub intermediate: Vec<LeaderboardEntry>,
    pub advanced: Vec<LeaderboardEntry>,
}

/// A user's best attempt within one bracket, with its current rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestScore {
    pub record_id: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score: i32,
    pub time_spent: i32,
    pub submitted_at: DateTime<Utc>,
    pub rank: usize,
}

/// Best score per bracket; `None` where the user has never played it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BestScores {
    pub beginner: Option<BestScore>,
    pub intermediate: Option<BestScore>,
    pub advanced: Option<BestScore>,
}

/// Query parameters for `GET /api/leaderboard`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    /// Restrict the response to one bracket.
    pub difficulty: Option<String>,
    /// Entries per bracket (1-50, default 50).
    pub limit: Option<i64>,
}
