use std::{env, str::FromStr};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const DEFAULT_SESSION_SECRET: &str = "dev_session_secret_change_in_production";
const MIN_SESSION_SECRET_LEN: usize = 32;
const MAX_SESSION_EXPIRATION_HOURS: i64 = 24 * 365;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStoreBackend {
    Memory,
    Mongo,
}

impl FromStr for SessionStoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(SessionStoreBackend::Memory),
            "mongo" | "mongodb" => Ok(SessionStoreBackend::Mongo),
            other => Err(AppError::Config(format!(
                "unknown SESSION_STORE '{}', expected 'memory' or 'mongo'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub quiz_title: String,
    pub questions_per_quiz: usize,
    pub question_bank_path: String,
    pub session_secret: SecretString,
    pub session_expiration_hours: i64,
    pub session_cookie_name: String,
    pub session_store: SessionStoreBackend,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub quiz_sessions_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for anything the lookup does not provide.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default: i64| -> AppResult<i64> {
            match lookup(key) {
                Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                    AppError::Config(format!("{} '{}' is not a number", key, raw))
                }),
                None => Ok(default),
            }
        };

        let questions_per_quiz = usize::try_from(number("QUESTIONS_PER_QUIZ", 20)?)
            .map_err(|_| AppError::Config("QUESTIONS_PER_QUIZ must not be negative".to_string()))?;

        let session_expiration_hours = number("SESSION_EXPIRATION_HOURS", 24)?;
        if !(1..=MAX_SESSION_EXPIRATION_HOURS).contains(&session_expiration_hours) {
            return Err(AppError::Config(format!(
                "SESSION_EXPIRATION_HOURS must be between 1 and {}, got {}",
                MAX_SESSION_EXPIRATION_HOURS, session_expiration_hours
            )));
        }

        let web_server_port = u16::try_from(number("WEB_SERVER_PORT", 5000)?).map_err(|_| {
            AppError::Config("WEB_SERVER_PORT must be between 0 and 65535".to_string())
        })?;

        let session_store = match lookup("SESSION_STORE") {
            Some(raw) => raw.parse()?,
            None => SessionStoreBackend::Memory,
        };

        Ok(Self {
            app_env: var("APP_ENV", "development"),
            quiz_title: var("QUIZ_TITLE", "Random Quiz"),
            questions_per_quiz,
            question_bank_path: var("QUESTION_BANK_PATH", "data/QUESTION_BANK.csv"),
            session_secret: SecretString::from(var("SESSION_SECRET", DEFAULT_SESSION_SECRET)),
            session_expiration_hours,
            session_cookie_name: var("SESSION_COOKIE_NAME", "quiz_session"),
            session_store,
            mongo_conn_string: var("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: var("MONGO_DB_NAME", "random-quiz-local"),
            quiz_sessions_collection: var("QUIZ_SESSIONS_COLLECTION", "quiz_sessions"),
            web_server_host: var("WEB_SERVER_HOST", "127.0.0.1"),
            web_server_port,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Rejects configuration that must never reach a production deployment.
    pub fn validate_for_production(&self) -> AppResult<()> {
        let secret = self.session_secret.expose_secret();

        if secret == DEFAULT_SESSION_SECRET {
            return Err(AppError::Config(
                "SESSION_SECRET is using the default value; set it to a secure random string"
                    .to_string(),
            ));
        }

        if secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "SESSION_SECRET is too short ({}); it must be at least {} characters",
                secret.len(),
                MIN_SESSION_SECRET_LEN
            )));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            quiz_title: "Test Quiz".to_string(),
            questions_per_quiz: 5,
            question_bank_path: "data/QUESTION_BANK.csv".to_string(),
            session_secret: SecretString::from("test_session_secret_key".to_string()),
            session_expiration_hours: 1,
            session_cookie_name: "quiz_session".to_string(),
            session_store: SessionStoreBackend::Memory,
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "random-quiz-test".to_string(),
            quiz_sessions_collection: "quiz_sessions".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
        }
    }
}
