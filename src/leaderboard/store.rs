// src/leaderboard/store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::quiz_record::{Difficulty, NewQuizAttempt, QuizAttempt},
    utils::retry::{RetryPolicy, with_retry},
};

/// Append-only log of quiz attempts.
#[async_trait]
pub trait QuizRecordStore: Send + Sync {
    /// Appends one attempt and returns it with its id and timestamp.
    async fn insert(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, AppError>;

    /// Every attempt `user_id` made at `difficulty`.
    async fn attempts_for_user(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<Vec<QuizAttempt>, AppError>;

    /// Every attempt made at `difficulty`, by any user.
    async fn attempts_in(&self, difficulty: Difficulty) -> Result<Vec<QuizAttempt>, AppError>;
}

const ATTEMPT_COLUMNS: &str = "id, user_id, username, difficulty_level, total_questions, \
     correct_answers, score, time_spent, created_at";

/// Stores attempts in the `quiz_records` table.
#[derive(Clone)]
pub struct PgQuizRecordStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PgQuizRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl QuizRecordStore for PgQuizRecordStore {
    async fn insert(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, AppError> {
        let sql = format!(
            r#"
            INSERT INTO quiz_records
                (user_id, username, difficulty_level, total_questions, correct_answers, score, time_spent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ATTEMPT_COLUMNS
        );

        with_retry(self.retry, "insert quiz record", || {
            sqlx::query_as::<_, QuizAttempt>(&sql)
                .bind(attempt.user_id)
                .bind(&attempt.username)
                .bind(attempt.difficulty.as_str())
                .bind(attempt.total_questions)
                .bind(attempt.correct_answers)
                .bind(attempt.score)
                .bind(attempt.time_spent)
                .fetch_one(&self.pool)
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz record: {:?}", e);
            AppError::from(e)
        })
    }

    async fn attempts_for_user(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<Vec<QuizAttempt>, AppError> {
        let sql = format!(
            "SELECT {} FROM quiz_records WHERE user_id = $1 AND difficulty_level = $2",
            ATTEMPT_COLUMNS
        );

        with_retry(self.retry, "fetch user quiz records", || {
            sqlx::query_as::<_, QuizAttempt>(&sql)
                .bind(user_id)
                .bind(difficulty.as_str())
                .fetch_all(&self.pool)
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz records for user {}: {:?}", user_id, e);
            AppError::from(e)
        })
    }

    async fn attempts_in(&self, difficulty: Difficulty) -> Result<Vec<QuizAttempt>, AppError> {
        let sql = format!(
            "SELECT {} FROM quiz_records WHERE difficulty_level = $1",
            ATTEMPT_COLUMNS
        );

        with_retry(self.retry, "fetch quiz records", || {
            sqlx::query_as::<_, QuizAttempt>(&sql)
                .bind(difficulty.as_str())
                .fetch_all(&self.pool)
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch {} quiz records: {:?}", difficulty, e);
            AppError::from(e)
        })
    }
}

/// Keeps attempts in process memory. Used by tests and database-less runs.
#[derive(Default)]
pub struct MemoryQuizStore {
    records: RwLock<Vec<QuizAttempt>>,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attempt with an explicit timestamp.
    pub async fn insert_at(&self, attempt: NewQuizAttempt, created_at: DateTime<Utc>) -> QuizAttempt {
        let mut records = self.records.write().await;
        let stored = QuizAttempt {
            id: records.len() as i64 + 1,
            user_id: attempt.user_id,
            username: attempt.username,
            difficulty: attempt.difficulty,
            total_questions: attempt.total_questions,
            correct_answers: attempt.correct_answers,
            score: attempt.score,
            time_spent: attempt.time_spent,
            created_at,
        };
        records.push(stored.clone());
        stored
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl QuizRecordStore for MemoryQuizStore {
    async fn insert(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt, AppError> {
        Ok(self.insert_at(attempt, Utc::now()).await)
    }

    async fn attempts_for_user(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<Vec<QuizAttempt>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id && r.difficulty == difficulty)
            .cloned()
            .collect())
    }

    async fn attempts_in(&self, difficulty: Difficulty) -> Result<Vec<QuizAttempt>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.difficulty == difficulty)
            .cloned()
            .collect())
    }
}
