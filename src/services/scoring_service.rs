use chrono::Utc;

use crate::{
    errors::AppResult,
    models::domain::{AnswerSubmission, ReviewItem, ScoreResult},
    services::question_bank::QuestionBank,
};

pub struct ScoringService;

impl ScoringService {
    /// Grade a submission against the stored question set.
    ///
    /// The review follows `question_ids` exactly. Question text is read from
    /// the bank at scoring time, not remembered from when the quiz was drawn.
    /// Scoring has no side effects; clearing the session is up to the caller.
    pub fn score(
        bank: &QuestionBank,
        question_ids: &[String],
        submission: &AnswerSubmission,
    ) -> AppResult<ScoreResult> {
        let questions = bank.lookup(question_ids)?;

        let mut score: u32 = 0;
        let mut review = Vec::with_capacity(questions.len());

        for question in questions {
            let your_answer = submission.answer_for(&question.id);
            let is_correct = question.is_correct(your_answer);
            if is_correct {
                score += 1;
            }

            review.push(ReviewItem {
                question_id: question.id.clone(),
                question_text: question.text.clone(),
                your_answer: your_answer.map(str::to_string),
                correct_answer: question.correct_answer,
                is_correct,
            });
        }

        Ok(ScoreResult {
            score,
            total: review.len() as u32,
            review,
            started_at: None,
            submitted_at: Utc::now(),
        })
    }
}
