use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{self, doc},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::QuizSession,
};

/// Keyed storage of active quiz sessions. Implementations must make
/// `insert_if_absent` and `take` atomic per session id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizSessionRepository: Send + Sync {
    async fn find(&self, sid: &str) -> AppResult<Option<QuizSession>>;

    /// Stores `session` unless one already exists for its id, and returns
    /// whichever session ends up stored.
    async fn insert_if_absent(&self, session: QuizSession) -> AppResult<QuizSession>;

    /// Removes and returns the session. Of two concurrent calls for the same
    /// id, only one receives it.
    async fn take(&self, sid: &str) -> AppResult<Option<QuizSession>>;

    async fn delete(&self, sid: &str) -> AppResult<()>;

    async fn health_check(&self) -> AppResult<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuizSessionDocument {
    sid: String,
    question_ids: Vec<String>,
    started_at: bson::DateTime,
}

impl From<QuizSessionDocument> for QuizSession {
    fn from(document: QuizSessionDocument) -> Self {
        QuizSession {
            sid: document.sid,
            question_ids: document.question_ids,
            started_at: DateTime::<Utc>::from_timestamp_millis(
                document.started_at.timestamp_millis(),
            )
            .unwrap_or_default(),
        }
    }
}

pub struct MongoQuizSessionRepository {
    db: Database,
    collection: Collection<QuizSessionDocument>,
}

impl MongoQuizSessionRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self {
            db: db.clone(),
            collection,
        }
    }

    /// Unique index on the session id plus a TTL index so abandoned quizzes
    /// disappear once their token could no longer be presented.
    pub async fn ensure_indexes(&self, session_ttl_hours: i64) -> AppResult<()> {
        log::info!("Creating indexes for quiz_sessions collection");

        let sid_index = IndexModel::builder()
            .keys(doc! { "sid": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("sid_unique".to_string())
                    .build(),
            )
            .build();

        let ttl_secs = session_ttl_hours.max(1) as u64 * 3600;
        let ttl_index = IndexModel::builder()
            .keys(doc! { "started_at": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(ttl_secs))
                    .name("started_at_ttl".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(sid_index).await?;
        self.collection.create_index(ttl_index).await?;

        log::info!("Successfully created indexes for quiz_sessions collection");
        Ok(())
    }
}

#[async_trait]
impl QuizSessionRepository for MongoQuizSessionRepository {
    async fn find(&self, sid: &str) -> AppResult<Option<QuizSession>> {
        let document = self.collection.find_one(doc! { "sid": sid }).await?;
        Ok(document.map(QuizSession::from))
    }

    async fn insert_if_absent(&self, session: QuizSession) -> AppResult<QuizSession> {
        let started_at = bson::DateTime::from_millis(session.started_at.timestamp_millis());
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let stored = self
            .collection
            .find_one_and_update(
                doc! { "sid": session.sid.as_str() },
                doc! {
                    "$setOnInsert": {
                        "question_ids": session.question_ids.clone(),
                        "started_at": started_at,
                    }
                },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(format!(
                    "upsert of quiz session '{}' returned no document",
                    session.sid
                ))
            })?;

        Ok(stored.into())
    }

    async fn take(&self, sid: &str) -> AppResult<Option<QuizSession>> {
        let document = self
            .collection
            .find_one_and_delete(doc! { "sid": sid })
            .await?;
        Ok(document.map(QuizSession::from))
    }

    async fn delete(&self, sid: &str) -> AppResult<()> {
        self.collection.delete_one(doc! { "sid": sid }).await?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
