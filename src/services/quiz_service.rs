use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AnswerSubmission, QuizSession, ScoreResult},
        dto::response::QuizView,
    },
    repositories::QuizSessionRepository,
    services::{
        question_bank::QuestionBank, quiz_selector::QuizSelector, scoring_service::ScoringService,
    },
};

fn short_sid(sid: &str) -> &str {
    sid.get(..8).unwrap_or(sid)
}

/// Drives the per-session quiz lifecycle: a session is created on first
/// view, reused until submitted or reset, and cleared once scored.
pub struct QuizService {
    bank: Arc<QuestionBank>,
    sessions: Arc<dyn QuizSessionRepository>,
    quiz_size: usize,
    title: String,
}

impl QuizService {
    pub fn new(
        bank: Arc<QuestionBank>,
        sessions: Arc<dyn QuizSessionRepository>,
        quiz_size: usize,
        title: &str,
    ) -> AppResult<Self> {
        QuizSelector::check_quiz_size(&bank, quiz_size)?;

        Ok(Self {
            bank,
            sessions,
            quiz_size,
            title: title.to_string(),
        })
    }

    pub fn quiz_size(&self) -> usize {
        self.quiz_size
    }

    pub fn bank_size(&self) -> usize {
        self.bank.len()
    }

    pub async fn get_or_create_quiz_view(&self, sid: &str) -> AppResult<QuizView> {
        let session = match self.sessions.find(sid).await? {
            Some(session) => session,
            None => self.start_session(sid).await?,
        };

        let questions = match self.bank.lookup(&session.question_ids) {
            Ok(questions) => questions,
            Err(e) => {
                // The stored set cannot be shown again; drop it so the next
                // visit starts over instead of failing forever.
                log::error!("Session {} references unknown questions: {}", short_sid(sid), e);
                self.sessions.delete(sid).await?;
                return Err(e);
            }
        };

        Ok(QuizView::new(&self.title, session.started_at, &questions))
    }

    async fn start_session(&self, sid: &str) -> AppResult<QuizSession> {
        let question_ids = QuizSelector::select_random(&self.bank, self.quiz_size)?;
        let candidate = QuizSession::start(sid, question_ids);
        let started_at = candidate.started_at;

        let stored = self.sessions.insert_if_absent(candidate).await?;
        if stored.started_at == started_at {
            log::info!(
                "Started quiz session {} with {} questions",
                short_sid(sid),
                stored.len()
            );
        }

        Ok(stored)
    }

    /// Scores the active quiz and ends it. The session is taken out of the
    /// store before scoring, so a repeated submit finds nothing to score.
    pub async fn submit_answers(
        &self,
        sid: &str,
        submission: &AnswerSubmission,
    ) -> AppResult<ScoreResult> {
        let Some(session) = self.sessions.take(sid).await? else {
            log::warn!("Submit without an active quiz for session {}", short_sid(sid));
            return Err(AppError::NoActiveSession);
        };

        let mut result = ScoringService::score(&self.bank, &session.question_ids, submission)
            .inspect_err(|e| {
                log::error!("Scoring failed for session {}: {}", short_sid(sid), e);
            })?;
        result.started_at = Some(session.started_at);

        log::info!(
            "Scored quiz session {}: {}/{}",
            short_sid(sid),
            result.score,
            result.total
        );
        Ok(result)
    }

    pub async fn reset_session(&self, sid: &str) -> AppResult<()> {
        self.sessions.delete(sid).await?;
        log::info!("Reset quiz session {}", short_sid(sid));
        Ok(())
    }
}
