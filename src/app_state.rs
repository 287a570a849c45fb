use std::sync::Arc;

use chrono::Duration;

use crate::{
    config::{Config, SessionStoreBackend},
    db::Database,
    errors::AppResult,
    repositories::{InMemoryQuizSessionRepository, MongoQuizSessionRepository, QuizSessionRepository},
    services::{question_bank::QuestionBank, quiz_service::QuizService},
    session::SessionTokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub session_tokens: Arc<SessionTokenService>,
    pub session_store: Arc<dyn QuizSessionRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Loads the question bank and opens the configured session store.
    /// Any failure here means the server must not start.
    pub async fn new(config: Config) -> AppResult<Self> {
        let bank = QuestionBank::load_from_path(&config.question_bank_path)?;

        let session_store: Arc<dyn QuizSessionRepository> = match config.session_store {
            SessionStoreBackend::Memory => {
                log::info!(
                    "Using in-memory quiz session store ({}h session lifetime)",
                    config.session_expiration_hours
                );
                Arc::new(InMemoryQuizSessionRepository::with_ttl(Duration::hours(
                    config.session_expiration_hours,
                )))
            }
            SessionStoreBackend::Mongo => {
                let db = Database::connect(&config).await?;
                let repository =
                    MongoQuizSessionRepository::new(&db, &config.quiz_sessions_collection);
                repository
                    .ensure_indexes(config.session_expiration_hours)
                    .await?;
                Arc::new(repository)
            }
        };

        Self::from_parts(config, bank, session_store)
    }

    pub fn from_parts(
        config: Config,
        bank: QuestionBank,
        session_store: Arc<dyn QuizSessionRepository>,
    ) -> AppResult<Self> {
        let quiz_service = Arc::new(QuizService::new(
            Arc::new(bank),
            Arc::clone(&session_store),
            config.questions_per_quiz,
            &config.quiz_title,
        )?);

        let session_tokens = Arc::new(SessionTokenService::new(
            &config.session_secret,
            config.session_expiration_hours,
            &config.session_cookie_name,
        ));

        Ok(Self {
            quiz_service,
            session_tokens,
            session_store,
            config: Arc::new(config),
        })
    }
}
