use std::sync::Arc;

use crate::{
    config::Config,
    leaderboard::{LeaderboardEngine, PgQuizRecordStore, QuizRecordStore},
    services::assistant::HeritageAssistant,
};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub leaderboard: LeaderboardEngine,
    pub assistant: HeritageAssistant,
}

impl AppState {
    /// State backed entirely by Postgres.
    pub fn new(pool: PgPool, config: Config) -> Self {
        let store = Arc::new(PgQuizRecordStore::new(pool.clone()));
        Self::with_quiz_store(pool, config, store)
    }

    /// State whose quiz attempts live in `store` instead of the pool.
    pub fn with_quiz_store(pool: PgPool, config: Config, store: Arc<dyn QuizRecordStore>) -> Self {
        let assistant = HeritageAssistant::new(config.llm.clone());
        Self {
            pool,
            leaderboard: LeaderboardEngine::new(store),
            assistant,
            config,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for LeaderboardEngine {
    fn from_ref(state: &AppState) -> Self {
        state.leaderboard.clone()
    }
}

impl FromRef<AppState> for HeritageAssistant {
    fn from_ref(state: &AppState) -> Self {
        state.assistant.clone()
    }
}
