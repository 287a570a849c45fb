use actix_web::{
    http::{header::LOCATION, StatusCode},
    HttpResponse, ResponseError,
};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

/// Where clients are sent when they submit without an active quiz.
pub const QUIZ_START_PATH: &str = "/api/quiz";

const GENERIC_FAILURE: &str = "Internal server error";

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Question bank schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No active quiz session")]
    NoActiveSession,

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Schema(_) => "SCHEMA_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::NoActiveSession => "NO_ACTIVE_SESSION",
            AppError::Integrity(_) => "INTEGRITY_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message that is safe to hand to a client. Internal failures are
    /// reported generically; their detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Integrity(_)
            | AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::Schema(_)
            | AppError::Config(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoActiveSession => StatusCode::SEE_OTHER,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Schema(_)
            | AppError::Config(_)
            | AppError::Integrity(_)
            | AppError::DatabaseError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::NoActiveSession = self {
            builder.insert_header((LOCATION, QUIZ_START_PATH));
        }

        builder.json(ErrorResponse {
            error: self.public_message(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}
impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Schema(err.to_string())
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized(format!("Invalid session token: {}", err))
    }
}
impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if matches!(self, AppError::Integrity(_) | AppError::InternalError(_)) {
            log::error!("{}", self);
        }

        async_graphql::Error::new(self.public_message()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
