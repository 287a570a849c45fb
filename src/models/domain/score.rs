use std::collections::HashMap;

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::question::OptionLabel;

/// Submitted labels keyed by question id. Unanswered questions are either
/// missing or mapped to `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AnswerSubmission(HashMap<String, Option<String>>);

impl AnswerSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, question_id: &str, label: &str) -> Self {
        self.0
            .insert(question_id.to_string(), Some(label.to_string()));
        self
    }

    /// Blank values, as sent by an untouched form field, count as unanswered.
    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.0
            .get(question_id)
            .and_then(|label| label.as_deref())
            .filter(|label| !label.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, Option<String>>> for AnswerSubmission {
    fn from(answers: HashMap<String, Option<String>>) -> Self {
        Self(answers)
    }
}

impl From<HashMap<String, String>> for AnswerSubmission {
    fn from(answers: HashMap<String, String>) -> Self {
        Self(answers.into_iter().map(|(id, label)| (id, Some(label))).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct ReviewItem {
    pub question_id: String,
    pub question_text: String,
    pub your_answer: Option<String>,
    pub correct_answer: OptionLabel,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct ScoreResult {
    pub score: u32,
    pub total: u32,
    pub review: Vec<ReviewItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}
