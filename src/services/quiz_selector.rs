use rand::{seq::index, Rng};

use crate::{
    errors::{AppError, AppResult},
    services::question_bank::QuestionBank,
};

pub struct QuizSelector;

impl QuizSelector {
    /// Draws `count` distinct question ids uniformly at random from the bank,
    /// using the thread-local generator.
    pub fn select_random(bank: &QuestionBank, count: usize) -> AppResult<Vec<String>> {
        Self::select_random_with(bank, count, &mut rand::rng())
    }

    pub fn select_random_with<R: Rng + ?Sized>(
        bank: &QuestionBank,
        count: usize,
        rng: &mut R,
    ) -> AppResult<Vec<String>> {
        Self::check_quiz_size(bank, count)?;

        let questions = bank.questions();
        Ok(index::sample(rng, questions.len(), count)
            .into_iter()
            .map(|i| questions[i].id.clone())
            .collect())
    }

    /// A quiz size the bank cannot satisfy without repeats is a startup
    /// configuration error.
    pub fn check_quiz_size(bank: &QuestionBank, count: usize) -> AppResult<()> {
        if count == 0 {
            return Err(AppError::Config(
                "quiz size must be at least 1".to_string(),
            ));
        }

        if count > bank.len() {
            return Err(AppError::Config(format!(
                "quiz size {} exceeds question bank size {}",
                count,
                bank.len()
            )));
        }

        Ok(())
    }
}
