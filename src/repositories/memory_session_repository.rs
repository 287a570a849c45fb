use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::{
    errors::AppResult, models::domain::QuizSession,
    repositories::quiz_session_repository::QuizSessionRepository,
};

/// Process-local session store. Sessions live until taken or deleted; with a
/// time to live, sessions started longer ago than that are treated as gone
/// and swept out whenever a new session is inserted.
#[derive(Default)]
pub struct InMemoryQuizSessionRepository {
    sessions: RwLock<HashMap<String, QuizSession>>,
    ttl: Option<Duration>,
}

impl InMemoryQuizSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::default(),
            ttl: Some(ttl),
        }
    }

    fn is_live(&self, session: &QuizSession, now: DateTime<Utc>) -> bool {
        self.ttl
            .map_or(true, |ttl| session.started_at + ttl > now)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl QuizSessionRepository for InMemoryQuizSessionRepository {
    async fn find(&self, sid: &str) -> AppResult<Option<QuizSession>> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        Ok(sessions
            .get(sid)
            .filter(|session| self.is_live(session, now))
            .cloned())
    }

    async fn insert_if_absent(&self, session: QuizSession) -> AppResult<QuizSession> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();

        let before = sessions.len();
        sessions.retain(|_, stored| self.is_live(stored, now));
        let expired = before - sessions.len();
        if expired > 0 {
            log::debug!("Dropped {} expired quiz sessions", expired);
        }

        let stored = sessions.entry(session.sid.clone()).or_insert(session);
        Ok(stored.clone())
    }

    async fn take(&self, sid: &str) -> AppResult<Option<QuizSession>> {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        Ok(sessions
            .remove(sid)
            .filter(|session| self.is_live(session, now)))
    }

    async fn delete(&self, sid: &str) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(sid);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn session(sid: &str, ids: &[&str]) -> QuizSession {
        QuizSession::start(sid, ids.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first_session() {
        let repo = InMemoryQuizSessionRepository::new();

        let first = repo.insert_if_absent(session("s1", &["Q1", "Q2"])).await.unwrap();
        let second = repo.insert_if_absent(session("s1", &["Q3", "Q4"])).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.question_ids, vec!["Q1", "Q2"]);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn take_removes_session_once() {
        let repo = InMemoryQuizSessionRepository::new();
        repo.insert_if_absent(session("s1", &["Q1"])).await.unwrap();

        assert!(repo.take("s1").await.unwrap().is_some());
        assert!(repo.take("s1").await.unwrap().is_none());
        assert!(repo.find("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_takes_have_one_winner() {
        let repo = Arc::new(InMemoryQuizSessionRepository::new());
        repo.insert_if_absent(session("s1", &["Q1"])).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.take("s1").await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryQuizSessionRepository::new();

        repo.delete("missing").await.unwrap();
        repo.insert_if_absent(session("s1", &["Q1"])).await.unwrap();
        repo.delete("s1").await.unwrap();
        repo.delete("s1").await.unwrap();

        assert!(repo.is_empty().await);
    }

    fn started_hours_ago(sid: &str, hours: i64) -> QuizSession {
        let mut stale = session(sid, &["Q1"]);
        stale.started_at = Utc::now() - Duration::hours(hours);
        stale
    }

    #[tokio::test]
    async fn abandoned_sessions_are_swept_on_insert() {
        let repo = InMemoryQuizSessionRepository::with_ttl(Duration::hours(24));
        for i in 0..1_000 {
            repo.insert_if_absent(started_hours_ago(&format!("old-{}", i), 48))
                .await
                .unwrap();
        }

        repo.insert_if_absent(session("fresh", &["Q2"])).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert!(repo.find("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn expired_session_is_not_found_or_taken() {
        let repo = InMemoryQuizSessionRepository::with_ttl(Duration::hours(24));
        repo.insert_if_absent(session("recent", &["Q1"])).await.unwrap();
        repo.sessions
            .write()
            .await
            .insert("stale".to_string(), started_hours_ago("stale", 25));

        assert!(repo.find("stale").await.unwrap().is_none());
        assert!(repo.take("stale").await.unwrap().is_none());
        assert!(repo.find("recent").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn expired_session_is_replaced_on_insert() {
        let repo = InMemoryQuizSessionRepository::with_ttl(Duration::hours(1));
        repo.sessions
            .write()
            .await
            .insert("s1".to_string(), started_hours_ago("s1", 2));

        let stored = repo.insert_if_absent(session("s1", &["Q9"])).await.unwrap();

        assert_eq!(stored.question_ids, vec!["Q9"]);
    }

    #[tokio::test]
    async fn store_without_ttl_keeps_old_sessions() {
        let repo = InMemoryQuizSessionRepository::new();
        repo.insert_if_absent(started_hours_ago("old", 1_000)).await.unwrap();
        repo.insert_if_absent(session("new", &["Q2"])).await.unwrap();

        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn sessions_are_isolated_per_id() {
        let repo = InMemoryQuizSessionRepository::new();
        repo.insert_if_absent(session("s1", &["Q1"])).await.unwrap();
        repo.insert_if_absent(session("s2", &["Q2"])).await.unwrap();

        repo.take("s1").await.unwrap();

        let remaining = repo.find("s2").await.unwrap().unwrap();
        assert_eq!(remaining.question_ids, vec!["Q2"]);
    }
}
