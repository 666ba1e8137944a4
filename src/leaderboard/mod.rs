// src/leaderboard/mod.rs

//! Quiz leaderboard engine.
//!
//! Best records and rankings are derived from the append-only attempt log on
//! every read: attempts are reduced to one best row per user, then the
//! reduced set is sorted and numbered.

pub mod store;

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use crate::{
    error::AppError,
    models::quiz_record::{
        BestScore, BestScores, Difficulty, LeaderboardEntry, Leaderboards, NewQuizAttempt,
        ParseDifficultyError, QuizAttempt, SubmitQuizRequest,
    },
    utils::html::clean_text,
};

pub use store::{MemoryQuizStore, PgQuizRecordStore, QuizRecordStore};

/// Largest number of entries returned for one bracket.
pub const MAX_LEADERBOARD_LIMIT: usize = 50;

/// Total order over attempts, best first: higher score, then less time,
/// then the more recent submission, then the later-inserted row.
pub fn compare_attempts(a: &QuizAttempt, b: &QuizAttempt) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.time_spent.cmp(&b.time_spent))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Picks the best attempt out of `attempts`.
pub fn best_of<'a, I>(attempts: I) -> Option<&'a QuizAttempt>
where
    I: IntoIterator<Item = &'a QuizAttempt>,
{
    attempts
        .into_iter()
        .min_by(|a, b| compare_attempts(a, b))
}

/// Reduces attempts to one best row per user and sorts the result best first.
pub fn best_records(attempts: Vec<QuizAttempt>) -> Vec<QuizAttempt> {
    let mut best: HashMap<i64, QuizAttempt> = HashMap::new();
    for attempt in attempts {
        let replaces = best
            .get(&attempt.user_id)
            .is_none_or(|current| compare_attempts(&attempt, current) == Ordering::Less);
        if replaces {
            best.insert(attempt.user_id, attempt);
        }
    }

    let mut records: Vec<QuizAttempt> = best.into_values().collect();
    records.sort_by(compare_attempts);
    records
}

/// Numbers sorted best records from 1.
pub fn rank(records: Vec<QuizAttempt>, limit: usize) -> Vec<LeaderboardEntry> {
    records
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, attempt)| LeaderboardEntry::from_attempt(i + 1, attempt))
        .collect()
}

/// Clamps a requested limit into `1..=MAX_LEADERBOARD_LIMIT`.
pub fn clamp_limit(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n < 1 => 1,
        Some(n) => (n as usize).min(MAX_LEADERBOARD_LIMIT),
        None => MAX_LEADERBOARD_LIMIT,
    }
}

/// Validates a submission against its bracket and normalizes the username.
pub fn validate_submission(req: SubmitQuizRequest) -> Result<NewQuizAttempt, AppError> {
    let difficulty: Difficulty = req
        .difficulty
        .parse()
        .map_err(|e: ParseDifficultyError| AppError::BadRequest(e.to_string()))?;

    let expected = difficulty.expected_questions();
    if req.total_questions != expected {
        return Err(AppError::BadRequest(format!(
            "{} quizzes have {} questions, got {}",
            difficulty, expected, req.total_questions
        )));
    }

    if req.correct_answers < 0 || req.correct_answers > req.total_questions {
        return Err(AppError::BadRequest(format!(
            "correctAnswers must be between 0 and {}",
            req.total_questions
        )));
    }

    if req.score < 0 || req.time_spent < 0 {
        return Err(AppError::BadRequest(
            "score and timeSpent must not be negative".to_string(),
        ));
    }

    let username = clean_text(&req.username);
    if username.is_empty() || username.chars().count() > 100 {
        return Err(AppError::BadRequest(
            "username must be 1-100 characters".to_string(),
        ));
    }

    Ok(NewQuizAttempt {
        user_id: req.user_id,
        username,
        difficulty,
        total_questions: req.total_questions,
        correct_answers: req.correct_answers,
        score: req.score,
        time_spent: req.time_spent,
    })
}

/// Answers best-record and ranking questions over an injected attempt store.
#[derive(Clone)]
pub struct LeaderboardEngine {
    store: Arc<dyn QuizRecordStore>,
}

impl LeaderboardEngine {
    pub fn new(store: Arc<dyn QuizRecordStore>) -> Self {
        Self { store }
    }

    /// Validates and appends one attempt. Nothing is written on rejection.
    pub async fn record_attempt(&self, req: SubmitQuizRequest) -> Result<QuizAttempt, AppError> {
        let attempt = validate_submission(req)?;
        let stored = self.store.insert(attempt).await?;
        tracing::info!(
            "Recorded quiz attempt {} for user {} ({}, score {})",
            stored.id,
            stored.user_id,
            stored.difficulty,
            stored.score
        );
        Ok(stored)
    }

    pub async fn best_record_for(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<Option<QuizAttempt>, AppError> {
        let attempts = self.store.attempts_for_user(user_id, difficulty).await?;
        Ok(best_of(&attempts).cloned())
    }

    /// 1-based position of the user's best record, `None` without attempts.
    pub async fn rank_of(
        &self,
        user_id: i64,
        difficulty: Difficulty,
    ) -> Result<Option<usize>, AppError> {
        let records = best_records(self.store.attempts_in(difficulty).await?);
        Ok(records
            .iter()
            .position(|r| r.user_id == user_id)
            .map(|i| i + 1))
    }

    pub async fn leaderboard(
        &self,
        difficulty: Difficulty,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let records = best_records(self.store.attempts_in(difficulty).await?);
        Ok(rank(records, limit))
    }

    pub async fn leaderboards(&self, limit: usize) -> Result<Leaderboards, AppError> {
        Ok(Leaderboards {
            beginner: self.leaderboard(Difficulty::Beginner, limit).await?,
            intermediate: self.leaderboard(Difficulty::Intermediate, limit).await?,
            advanced: self.leaderboard(Difficulty::Advanced, limit).await?,
        })
    }

    /// Best record and rank for every bracket.
    ///
    /// Ranks are relative to everyone, so each bracket is read and reduced
    /// in full even though only one user's row is kept.
    pub async fn best_scores(&self, user_id: i64) -> Result<BestScores, AppError> {
        let mut scores = BestScores::default();
        for difficulty in Difficulty::ALL {
            let records = best_records(self.store.attempts_in(difficulty).await?);
            let best = records
                .into_iter()
                .enumerate()
                .find(|(_, r)| r.user_id == user_id)
                .map(|(i, r)| BestScore {
                    record_id: r.id,
                    total_questions: r.total_questions,
                    correct_answers: r.correct_answers,
                    score: r.score,
                    time_spent: r.time_spent,
                    submitted_at: r.created_at,
                    rank: i + 1,
                });

            match difficulty {
                Difficulty::Beginner => scores.beginner = best,
                Difficulty::Intermediate => scores.intermediate = best,
                Difficulty::Advanced => scores.advanced = best,
            }
        }
        Ok(scores)
    }
}
