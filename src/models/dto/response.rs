use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{OptionLabel, Question};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AnswerOptionView {
    pub label: OptionLabel,
    pub text: String,
}

/// A question as shown to the quiz taker. Carries no correct answer.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<AnswerOptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            text: question.text.clone(),
            options: question
                .options()
                .map(|(label, text)| AnswerOptionView {
                    label,
                    text: text.to_string(),
                })
                .collect(),
            category: question.category.clone(),
            difficulty: question.difficulty.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizView {
    pub title: String,
    pub count: u32,
    pub started_at: DateTime<Utc>,
    pub questions: Vec<QuestionView>,
}

impl QuizView {
    pub fn new(title: &str, started_at: DateTime<Utc>, questions: &[&Question]) -> Self {
        QuizView {
            title: title.to_string(),
            count: questions.len() as u32,
            started_at,
            questions: questions.iter().map(|q| QuestionView::from(*q)).collect(),
        }
    }
}
